//! Route definitions for administrative documents and their maintenance
//! workflows.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::administrative_documents as docs;
use crate::state::AppState;

/// Upload size cap for scanned dossiers.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Routes mounted at `/administrative-documents`.
///
/// ```text
/// GET    /                      -> list (?resident_id=&type=)
/// POST   /                      -> create
/// POST   /upload                -> upload (multipart)
/// GET    /cleanup-duplicates    -> duplicate_report
/// POST   /cleanup-duplicates    -> cleanup_duplicates
/// POST   /smart-sync            -> smart_sync
/// GET    /smart-sync            -> recover_orphans (?type=)
/// GET    /debug-sync            -> debug_sync
/// POST   /organize              -> organize
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(docs::list).post(docs::create))
        .route(
            "/upload",
            post(docs::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/cleanup-duplicates",
            get(docs::duplicate_report).post(docs::cleanup_duplicates),
        )
        .route(
            "/smart-sync",
            get(docs::recover_orphans).post(docs::smart_sync),
        )
        .route("/debug-sync", get(docs::debug_sync))
        .route("/organize", post(docs::organize))
}
