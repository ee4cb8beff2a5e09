//! Repository for the `residents` table.

use opvang_core::types::DbId;
use sqlx::PgPool;

use crate::models::resident::{CreateResident, Resident, UpdateResident};

/// Column list for residents queries.
const COLUMNS: &str = "id, badge, first_name, last_name, room, nationality, ov_number, \
    register_number, date_of_birth, age, gender, reference_person, date_in, date_out, \
    days_of_stay, status, remarks, room_remarks, photo_url, created_at, updated_at";

/// Provides CRUD operations for residents.
pub struct ResidentRepo;

impl ResidentRepo {
    /// List all residents, ordered by badge ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Resident>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM residents ORDER BY badge ASC");
        sqlx::query_as::<_, Resident>(&query).fetch_all(pool).await
    }

    /// Find a resident by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Resident>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM residents WHERE id = $1");
        sqlx::query_as::<_, Resident>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a resident, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateResident) -> Result<Resident, sqlx::Error> {
        let query = format!(
            "INSERT INTO residents (badge, first_name, last_name, room, nationality, ov_number,
                register_number, date_of_birth, age, gender, reference_person, date_in, date_out,
                days_of_stay, status, remarks, room_remarks, photo_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resident>(&query)
            .bind(input.badge)
            .bind(input.first_name.trim())
            .bind(input.last_name.trim())
            .bind(&input.room)
            .bind(&input.nationality)
            .bind(&input.ov_number)
            .bind(&input.register_number)
            .bind(input.date_of_birth)
            .bind(input.age)
            .bind(&input.gender)
            .bind(&input.reference_person)
            .bind(input.date_in)
            .bind(input.date_out)
            .bind(input.days_of_stay)
            .bind(&input.status)
            .bind(&input.remarks)
            .bind(&input.room_remarks)
            .bind(&input.photo_url)
            .fetch_one(pool)
            .await
    }

    /// Update a resident by ID, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateResident,
    ) -> Result<Option<Resident>, sqlx::Error> {
        let query = format!(
            "UPDATE residents SET
                badge = COALESCE($2, badge),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                room = COALESCE($5, room),
                nationality = COALESCE($6, nationality),
                ov_number = COALESCE($7, ov_number),
                register_number = COALESCE($8, register_number),
                date_of_birth = COALESCE($9, date_of_birth),
                age = COALESCE($10, age),
                gender = COALESCE($11, gender),
                reference_person = COALESCE($12, reference_person),
                date_in = COALESCE($13, date_in),
                date_out = COALESCE($14, date_out),
                days_of_stay = COALESCE($15, days_of_stay),
                status = COALESCE($16, status),
                remarks = COALESCE($17, remarks),
                room_remarks = COALESCE($18, room_remarks),
                photo_url = COALESCE($19, photo_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resident>(&query)
            .bind(id)
            .bind(input.badge)
            .bind(input.first_name.as_deref().map(str::trim))
            .bind(input.last_name.as_deref().map(str::trim))
            .bind(&input.room)
            .bind(&input.nationality)
            .bind(&input.ov_number)
            .bind(&input.register_number)
            .bind(input.date_of_birth)
            .bind(input.age)
            .bind(&input.gender)
            .bind(&input.reference_person)
            .bind(input.date_in)
            .bind(input.date_out)
            .bind(input.days_of_stay)
            .bind(&input.status)
            .bind(&input.remarks)
            .bind(&input.room_remarks)
            .bind(&input.photo_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a resident by ID. Returns `true` if a row was deleted.
    ///
    /// Documents of the resident stay behind with `resident_id = NULL`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM residents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
