//! Public URLs of locally stored blobs.

use axum::routing::get;
use axum::Router;

use crate::handlers::files;
use crate::state::AppState;

/// Mounted at the root so URLs built from `STORAGE_PUBLIC_URL`
/// (`{base}/object/public/{bucket}/{path}`) resolve when the base is
/// `http://host/files`.
///
/// ```text
/// GET /files/object/public/{bucket}/{*path}   -> download
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/files/object/public/{bucket}/{*path}", get(files::download))
}
