//! Route definitions for the staff assignment grid.

use axum::routing::get;
use axum::Router;

use crate::handlers::toewijzingen;
use crate::state::AppState;

/// Routes mounted at `/toewijzingen`.
///
/// ```text
/// GET    /staff    -> list_staff (?date=)
/// POST   /staff    -> upsert_staff
/// PUT    /staff    -> upsert_staff
/// GET    /grid     -> list_grid (?date=)
/// POST   /grid     -> create_cell
/// PUT    /grid     -> update_cell
/// DELETE /grid     -> delete_cells
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/staff",
            get(toewijzingen::list_staff)
                .post(toewijzingen::upsert_staff)
                .put(toewijzingen::upsert_staff),
        )
        .route(
            "/grid",
            get(toewijzingen::list_grid)
                .post(toewijzingen::create_cell)
                .put(toewijzingen::update_cell)
                .delete(toewijzingen::delete_cells),
        )
}
