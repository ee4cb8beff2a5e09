//! Route definitions for moving dossiers between buckets.

use axum::routing::get;
use axum::Router;

use crate::handlers::document_transfer;
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// GET    /transfer   -> status (?residentId=)
/// POST   /transfer   -> transfer
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/transfer",
        get(document_transfer::status).post(document_transfer::transfer),
    )
}
