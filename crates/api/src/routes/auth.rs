//! Route definitions for staff invitations.

use axum::routing::post;
use axum::Router;

use crate::handlers::invitations;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /validate-invitation    -> validate
/// POST   /complete-invitation    -> complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate-invitation", post(invitations::validate))
        .route("/complete-invitation", post(invitations::complete))
}
