//! Handlers for the `/administrative-documents` resource and its
//! maintenance workflows (sync, duplicate cleanup, organize).

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use opvang_core::document_kind::DocumentType;
use opvang_core::error::CoreError;
use opvang_core::storage_layout::{organized_storage_path, standardized_file_name};
use opvang_core::types::DbId;
use opvang_db::models::administrative_document::{
    AdministrativeDocument, CreateAdministrativeDocument,
};
use opvang_db::models::resident::Resident;
use opvang_db::repositories::{AdministrativeDocumentRepo, ResidentRepo};
use serde::{Deserialize, Serialize};

use crate::documents::cleanup::{self, CleanupReport, DuplicateReport};
use crate::documents::{mime_type_for, organize, sync};
use crate::error::{AppError, AppResult};
use crate::query::{parse_document_type, DocumentTypeParams};
use crate::response::WorkflowResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListDocumentsParams {
    pub resident_id: Option<DbId>,
    #[serde(rename = "type")]
    pub document_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentBody {
    pub resident_id: Option<DbId>,
    pub document_type: Option<String>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub uploaded_by: Option<String>,
    pub resident_badge: Option<String>,
    pub resident_name: Option<String>,
    pub storage_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentCreated {
    pub success: bool,
    pub document: AdministrativeDocument,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartSyncBody {
    #[serde(default)]
    pub document_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DuplicateReportResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: DuplicateReport,
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub report: CleanupReport,
}

#[derive(Debug, Serialize)]
pub struct DebugSyncResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: sync::DebugReport,
    pub message: String,
}

async fn find_resident(state: &AppState, id: DbId) -> AppResult<Resident> {
    ResidentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Resident", id)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// GET /api/administrative-documents?resident_id=&type=
///
/// Documents of one resident, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListDocumentsParams>,
) -> AppResult<impl IntoResponse> {
    let resident_id = params
        .resident_id
        .ok_or_else(|| AppError::BadRequest("Missing resident_id parameter".into()))?;
    let kind = params
        .document_type
        .as_deref()
        .map(DocumentType::parse)
        .transpose()?;

    let documents = AdministrativeDocumentRepo::list_by_resident(&state.pool, resident_id, kind).await?;
    Ok(Json(documents))
}

/// POST /api/administrative-documents
///
/// Record a blob that is already stored. Badge and name default to the
/// resident's own.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateDocumentBody>,
) -> AppResult<impl IntoResponse> {
    let file_name = non_empty(body.file_name);
    let file_path = non_empty(body.file_path);
    let (Some(resident_id), Some(file_name), Some(file_path)) = (body.resident_id, file_name, file_path)
    else {
        return Err(AppError::BadRequest(
            "Missing required fields: resident_id, file_name, file_path".into(),
        ));
    };
    let kind = parse_document_type(body.document_type.as_deref(), DocumentType::In)?;
    let resident = find_resident(&state, resident_id).await?;

    let input = CreateAdministrativeDocument {
        resident_id: Some(resident_id),
        document_type: kind,
        file_name,
        file_path,
        file_size: body.file_size,
        mime_type: body.mime_type,
        description: body.description,
        uploaded_by: body.uploaded_by,
        resident_badge: body.resident_badge.or_else(|| Some(resident.badge.to_string())),
        resident_name: body.resident_name.or_else(|| Some(resident.full_name())),
        storage_path: body.storage_path,
    };
    let document = AdministrativeDocumentRepo::create(&state.pool, &input).await?;
    tracing::info!(document_id = document.id, resident_id, "Document recorded");

    Ok((
        StatusCode::CREATED,
        Json(DocumentCreated {
            success: true,
            document,
        }),
    ))
}

/// POST /api/administrative-documents/upload
///
/// Multipart fields: `resident_id` and `file` (required), `document_type`,
/// `description`, `uploaded_by`, `label`. The blob is stored in the
/// resident's folder; a `label` is prefixed onto the file name.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut resident_id: Option<DbId> = None;
    let mut document_type: Option<String> = None;
    let mut description: Option<String> = None;
    let mut uploaded_by: Option<String> = None;
    let mut label: Option<String> = None;
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or("document").to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some((file_name, content_type, data.to_vec()));
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        match name.as_str() {
            "resident_id" => {
                let id = text
                    .trim()
                    .parse()
                    .map_err(|_| AppError::BadRequest("resident_id must be a number".into()))?;
                resident_id = Some(id);
            }
            "document_type" => document_type = Some(text),
            "description" => description = non_empty(Some(text)),
            "uploaded_by" => uploaded_by = non_empty(Some(text)),
            "label" => label = non_empty(Some(text)),
            _ => {} // ignore unknown fields
        }
    }

    let resident_id =
        resident_id.ok_or_else(|| AppError::BadRequest("Missing required field: resident_id".into()))?;
    let (original_name, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    let kind = parse_document_type(document_type.as_deref(), DocumentType::In)?;
    let resident = find_resident(&state, resident_id).await?;

    let file_name = match &label {
        Some(label) => standardized_file_name(&original_name, label),
        None => original_name,
    };
    let badge = resident.badge.to_string();
    let full_name = resident.full_name();
    let path = organized_storage_path(&badge, &full_name, &file_name, kind);
    let mime_type = content_type.unwrap_or_else(|| mime_type_for(&file_name).to_string());
    let size = data.len();

    state
        .storage
        .upload(kind.bucket(), &path, data, &mime_type)
        .await?;

    let input = CreateAdministrativeDocument {
        resident_id: Some(resident_id),
        document_type: kind,
        file_name,
        file_path: state.storage.public_url(kind.bucket(), &path),
        file_size: i64::try_from(size).ok(),
        mime_type: Some(mime_type),
        description,
        uploaded_by,
        resident_badge: Some(badge),
        resident_name: Some(full_name),
        storage_path: Some(path),
    };
    let document = AdministrativeDocumentRepo::create(&state.pool, &input).await?;
    tracing::info!(
        document_id = document.id,
        resident_id,
        size,
        path = ?document.storage_path,
        "Document uploaded",
    );

    Ok((
        StatusCode::CREATED,
        Json(DocumentCreated {
            success: true,
            document,
        }),
    ))
}

// ---------------------------------------------------------------------------
// Duplicates
// ---------------------------------------------------------------------------

/// GET /api/administrative-documents/cleanup-duplicates
pub async fn duplicate_report(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let report = cleanup::report(&state.pool).await?;
    Ok(Json(DuplicateReportResponse {
        success: true,
        report,
    }))
}

/// POST /api/administrative-documents/cleanup-duplicates
///
/// Keeps the newest record of every duplicate group.
pub async fn cleanup_duplicates(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let report = cleanup::cleanup(&state.pool).await?;
    Ok(Json(CleanupResponse {
        success: true,
        message: format!(
            "Successfully cleaned up {} duplicate documents",
            report.deleted_count
        ),
        report,
    }))
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

/// POST /api/administrative-documents/smart-sync
///
/// Records unrecorded stored files of `documentType` (default IN), then
/// recovers orphans.
pub async fn smart_sync(
    State(state): State<AppState>,
    Json(body): Json<SmartSyncBody>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_document_type(body.document_type.as_deref(), DocumentType::In)?;
    let result = sync::smart_sync(&state.pool, state.storage.as_ref(), kind).await?;
    tracing::info!(
        kind = %kind,
        synced = result.synced,
        unmatched = result.unmatched.len(),
        "Smart sync finished",
    );
    Ok(Json(WorkflowResponse::new(
        result,
        format!("Smart sync completed for {kind} documents"),
    )))
}

/// GET /api/administrative-documents/smart-sync?type=
///
/// Orphan recovery only.
pub async fn recover_orphans(
    State(state): State<AppState>,
    Query(params): Query<DocumentTypeParams>,
) -> AppResult<impl IntoResponse> {
    let kind = params.parse_or(DocumentType::In)?;
    let result = sync::recover_orphans(&state.pool, kind).await?;
    Ok(Json(WorkflowResponse::new(
        result,
        format!("Orphan recovery completed for {kind} documents"),
    )))
}

/// GET /api/administrative-documents/debug-sync
///
/// Read-only comparison of storage, records and residents.
pub async fn debug_sync(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let report = sync::analyze(&state.pool, state.storage.as_ref()).await?;
    let to_sync = report.summary.sync_analysis.files_to_sync;
    Ok(Json(DebugSyncResponse {
        success: true,
        report,
        message: format!("Debug analysis complete: {to_sync} files ready to sync"),
    }))
}

// ---------------------------------------------------------------------------
// Organize
// ---------------------------------------------------------------------------

/// POST /api/administrative-documents/organize
pub async fn organize(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let result = organize::organize_in_documents(&state.pool, state.storage.as_ref()).await?;
    let message = format!(
        "Organized {} documents ({} skipped, {} failed)",
        result.migrated,
        result.skipped,
        result.failed.len()
    );
    Ok(Json(WorkflowResponse::new(result, message)))
}
