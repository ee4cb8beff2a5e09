//! Staff assignment grid ("toewijzingen") models.

use opvang_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `toewijzingen_staff` table: one staff column header.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StaffMember {
    pub id: DbId,
    pub assignment_date: Date,
    pub staff_index: i32,
    pub staff_name: String,
    pub assignment_count: Option<i32>,
    pub annotations: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `toewijzingen_grid` table: one resident placed in a cell.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GridAssignment {
    pub id: DbId,
    pub assignment_date: Date,
    pub row_number: i32,
    pub column_number: i32,
    pub resident_name: String,
    pub color_status: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
