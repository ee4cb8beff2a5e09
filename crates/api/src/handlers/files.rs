//! Serves blobs of the local storage backend under their public URL.

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use opvang_core::document_kind::{BUCKET_IN, BUCKET_OUT};
use opvang_core::error::CoreError;

use crate::documents::mime_type_for;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /files/object/public/{bucket}/{*path}
pub async fn download(
    State(state): State<AppState>,
    Path((bucket, path)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    if bucket != BUCKET_IN && bucket != BUCKET_OUT {
        return Err(AppError::Core(CoreError::not_found("Bucket", bucket)));
    }
    let data = state.storage.download(&bucket, &path).await?;
    Ok(([(CONTENT_TYPE, mime_type_for(&path))], data))
}
