//! Handlers for the staff assignment grid (`/toewijzingen`).
//!
//! Listings without `date` return every day. Writes without a date apply to
//! today. Deleting by position defaults to today; deleting by resident name
//! spans every day unless `date` is given.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use opvang_core::staff_grid::{sanitize_cell, validate_staff, GridCellInput, StaffInput};
use opvang_core::types::Date;
use opvang_db::repositories::{GridRepo, StaffRepo};
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::query::DateParams;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeleteCellParams {
    pub row_number: Option<i32>,
    pub column_number: Option<i32>,
    pub resident_name: Option<String>,
    pub date: Option<Date>,
}

fn today() -> Date {
    Utc::now().date_naive()
}

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

/// GET /api/toewijzingen/staff[?date=]
pub async fn list_staff(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let staff = StaffRepo::list(&state.pool, params.date).await?;
    Ok(Json(staff))
}

/// POST|PUT /api/toewijzingen/staff
///
/// Sets the staff member at `position` for the day. A name already used by
/// another position that day is a conflict.
pub async fn upsert_staff(
    State(state): State<AppState>,
    Json(input): Json<StaffInput>,
) -> AppResult<impl IntoResponse> {
    let assignment = validate_staff(input, today())?;
    let staff = StaffRepo::upsert(&state.pool, &assignment).await?;
    tracing::debug!(
        date = %staff.assignment_date,
        position = staff.staff_index,
        "Staff assignment saved"
    );
    Ok(Json(staff))
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// GET /api/toewijzingen/grid[?date=]
pub async fn list_grid(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let cells = GridRepo::list(&state.pool, params.date).await?;
    Ok(Json(cells))
}

/// POST /api/toewijzingen/grid
pub async fn create_cell(
    State(state): State<AppState>,
    Json(input): Json<GridCellInput>,
) -> AppResult<impl IntoResponse> {
    let cell = sanitize_cell(input, today())?;
    let saved = GridRepo::upsert(&state.pool, &cell).await?;
    Ok(Json(saved))
}

/// PUT /api/toewijzingen/grid
///
/// Like POST, except that a cell without resident and colour is removed.
pub async fn update_cell(
    State(state): State<AppState>,
    Json(input): Json<GridCellInput>,
) -> AppResult<impl IntoResponse> {
    let cell = sanitize_cell(input, today())?;

    if cell.is_empty() {
        let deleted =
            GridRepo::delete_cell(&state.pool, cell.assignment_date, cell.row_number, cell.column_number)
                .await?;
        tracing::debug!(
            row = cell.row_number,
            column = cell.column_number,
            deleted,
            "Cleared grid cell"
        );
        return Ok(Json(json!({
            "message": "Record deleted",
            "row_number": cell.row_number,
            "column_number": cell.column_number,
        })));
    }

    let saved = GridRepo::upsert(&state.pool, &cell).await?;
    Ok(Json(serde_json::to_value(saved).map_err(|e| AppError::InternalError(e.to_string()))?))
}

/// DELETE /api/toewijzingen/grid?row_number=&column_number=[&date=]
/// DELETE /api/toewijzingen/grid?resident_name=[&date=]
///
/// By resident name, every matching cell goes (all days unless `date` is
/// given). By position, the cell of `date` (default today) goes.
pub async fn delete_cells(
    State(state): State<AppState>,
    Query(params): Query<DeleteCellParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = params
        .resident_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
    {
        let deleted = GridRepo::delete_by_resident(&state.pool, name, params.date).await?;
        tracing::info!(resident_name = %name, deleted, "Grid cells deleted for resident");
        return Ok(Json(json!({
            "message": "Records deleted successfully for resident",
            "resident_name": name,
            "deleted": deleted,
        })));
    }

    let (Some(row), Some(column)) = (params.row_number, params.column_number) else {
        return Err(AppError::BadRequest(
            "Either (row_number and column_number) or resident_name is required".into(),
        ));
    };
    let date = params.date.unwrap_or_else(today);
    let deleted = GridRepo::delete_cell(&state.pool, date, row, column).await?;
    Ok(Json(json!({
        "message": "Record deleted successfully",
        "deleted": deleted,
    })))
}
