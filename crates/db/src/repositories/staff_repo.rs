//! Repository for the `toewijzingen_staff` table.

use opvang_core::staff_grid::StaffAssignment;
use opvang_core::types::Date;
use sqlx::PgPool;

use crate::models::toewijzingen::StaffMember;

/// Column list for toewijzingen_staff queries.
const COLUMNS: &str = "id, assignment_date, staff_index, staff_name, assignment_count, \
    annotations, created_at, updated_at";

/// Provides queries for the staff column headers of the grid.
pub struct StaffRepo;

impl StaffRepo {
    /// Staff of one day (all days when `None`), ordered by position.
    pub async fn list(pool: &PgPool, date: Option<Date>) -> Result<Vec<StaffMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM toewijzingen_staff
             WHERE ($1::DATE IS NULL OR assignment_date = $1)
             ORDER BY assignment_date ASC, staff_index ASC"
        );
        sqlx::query_as::<_, StaffMember>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Put a staff member at a position for a day, replacing whoever was there.
    ///
    /// Fails with a unique violation on `uq_staff_name_per_date` when the
    /// name already holds another position that day.
    pub async fn upsert(pool: &PgPool, input: &StaffAssignment) -> Result<StaffMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO toewijzingen_staff (assignment_date, staff_index, staff_name)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_staff_position_per_date
             DO UPDATE SET staff_name = EXCLUDED.staff_name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StaffMember>(&query)
            .bind(input.assignment_date)
            .bind(input.position)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }
}
