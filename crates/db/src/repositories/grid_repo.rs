//! Repository for the `toewijzingen_grid` table.

use opvang_core::staff_grid::GridCell;
use opvang_core::types::Date;
use sqlx::PgPool;

use crate::models::toewijzingen::GridAssignment;

/// Column list for toewijzingen_grid queries.
const COLUMNS: &str = "id, assignment_date, row_number, column_number, resident_name, \
    color_status, created_at, updated_at";

/// Provides queries for grid cells.
pub struct GridRepo;

impl GridRepo {
    /// Cells of one day (all days when `None`), ordered by row then column.
    pub async fn list(
        pool: &PgPool,
        date: Option<Date>,
    ) -> Result<Vec<GridAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM toewijzingen_grid
             WHERE ($1::DATE IS NULL OR assignment_date = $1)
             ORDER BY assignment_date ASC, row_number ASC, column_number ASC"
        );
        sqlx::query_as::<_, GridAssignment>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Write a cell, replacing its content when the position is taken.
    pub async fn upsert(pool: &PgPool, cell: &GridCell) -> Result<GridAssignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO toewijzingen_grid
                (assignment_date, row_number, column_number, resident_name, color_status)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_grid_position_per_date
             DO UPDATE SET
                resident_name = EXCLUDED.resident_name,
                color_status = EXCLUDED.color_status
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GridAssignment>(&query)
            .bind(cell.assignment_date)
            .bind(cell.row_number)
            .bind(cell.column_number)
            .bind(&cell.resident_name)
            .bind(&cell.color_status)
            .fetch_one(pool)
            .await
    }

    /// Remove the cell at a position. Returns the number of rows deleted.
    pub async fn delete_cell(
        pool: &PgPool,
        date: Date,
        row_number: i32,
        column_number: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM toewijzingen_grid
             WHERE assignment_date = $1 AND row_number = $2 AND column_number = $3",
        )
        .bind(date)
        .bind(row_number)
        .bind(column_number)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remove every cell holding `resident_name`, on one day or on all days.
    pub async fn delete_by_resident(
        pool: &PgPool,
        resident_name: &str,
        date: Option<Date>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM toewijzingen_grid
             WHERE resident_name = $1 AND ($2::DATE IS NULL OR assignment_date = $2)",
        )
        .bind(resident_name)
        .bind(date)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
