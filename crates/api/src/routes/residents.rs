//! Route definitions for residents.

use axum::routing::get;
use axum::Router;

use crate::handlers::residents;
use crate::state::AppState;

/// Routes mounted at `/residents`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete (?purge_documents=true)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(residents::list).post(residents::create))
        .route(
            "/{id}",
            get(residents::get_by_id)
                .patch(residents::update)
                .delete(residents::delete),
        )
}
