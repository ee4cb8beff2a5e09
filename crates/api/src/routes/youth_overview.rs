//! Route definitions for the youth-overview roster.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::youth_overview as roster;
use crate::state::AppState;

/// Routes mounted at `/youth-overview`.
///
/// Static segments are registered before `/{badge}` for readability; axum
/// prefers them either way.
///
/// ```text
/// GET    /                     -> list (?tab=IN|OUT)
/// POST   /                     -> upsert (object or array)
/// POST   /sync                 -> sync_from_residents
/// GET    /age-verification     -> age_verification
/// GET    /{badge}              -> get_by_badge
/// PATCH  /{badge}              -> update
/// DELETE /{badge}              -> delete
/// POST   /{badge}/move         -> move_record
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(roster::list).post(roster::upsert))
        .route("/sync", post(roster::sync_from_residents))
        .route("/age-verification", get(roster::age_verification))
        .route(
            "/{badge}",
            get(roster::get_by_badge)
                .patch(roster::update)
                .delete(roster::delete),
        )
        .route("/{badge}/move", post(roster::move_record))
}
