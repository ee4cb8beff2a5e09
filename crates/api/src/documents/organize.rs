//! Moving loose IN documents into resident folders.

use std::collections::HashMap;

use opvang_core::document_kind::DocumentType;
use opvang_core::storage_layout::{is_organized_path, organized_storage_path};
use opvang_core::types::DbId;
use opvang_db::models::administrative_document::AdministrativeDocument;
use opvang_db::models::resident::Resident;
use opvang_db::repositories::{AdministrativeDocumentRepo, ResidentRepo};
use opvang_db::DbPool;
use opvang_storage::ObjectStorage;
use serde::Serialize;

use crate::documents::mime_type_for;
use crate::error::AppResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeFailure {
    pub document_id: DbId,
    pub file_name: String,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeReport {
    pub total: usize,
    pub migrated: usize,
    pub skipped: usize,
    pub failed: Vec<OrganizeFailure>,
}

/// Move every IN document that is not inside a resident folder to
/// `IN/{badge}_{name}/{file}`.
///
/// Records without a resident and already organized paths are skipped.
/// The old blob is deleted only after the record points at the new one.
pub async fn organize_in_documents(
    pool: &DbPool,
    storage: &dyn ObjectStorage,
) -> AppResult<OrganizeReport> {
    let documents = AdministrativeDocumentRepo::list_by_type(pool, DocumentType::In).await?;
    let residents: HashMap<DbId, Resident> = ResidentRepo::list(pool)
        .await?
        .into_iter()
        .map(|r| (r.id, r))
        .collect();

    let mut report = OrganizeReport {
        total: documents.len(),
        ..Default::default()
    };

    for doc in &documents {
        let resident = doc.resident_id.and_then(|id| residents.get(&id));
        let current = doc.blob_path();
        let Some(resident) = resident.filter(|_| !is_organized_path(&current)) else {
            report.skipped += 1;
            continue;
        };

        match relocate(pool, storage, doc, resident, &current).await {
            Ok(true) => report.migrated += 1,
            Ok(false) => report.skipped += 1,
            Err(error) => {
                tracing::warn!(document_id = doc.id, error = %error, "Failed to organize document");
                report.failed.push(OrganizeFailure {
                    document_id: doc.id,
                    file_name: doc.file_name.clone(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        migrated = report.migrated,
        skipped = report.skipped,
        failed = report.failed.len(),
        "Organize finished",
    );
    Ok(report)
}

/// Returns `Ok(false)` when the document already sits at its target.
async fn relocate(
    pool: &DbPool,
    storage: &dyn ObjectStorage,
    doc: &AdministrativeDocument,
    resident: &Resident,
    current: &str,
) -> Result<bool, String> {
    let bucket = DocumentType::In.bucket();
    let target = organized_storage_path(
        &resident.badge.to_string(),
        &resident.full_name(),
        &doc.file_name,
        DocumentType::In,
    );
    if target == current {
        return Ok(false);
    }

    let data = storage
        .download(bucket, current)
        .await
        .map_err(|e| format!("download failed: {e}"))?;
    let mime_type = doc
        .mime_type
        .clone()
        .unwrap_or_else(|| mime_type_for(&doc.file_name).to_string());
    storage
        .upload(bucket, &target, data, &mime_type)
        .await
        .map_err(|e| format!("upload failed: {e}"))?;

    AdministrativeDocumentRepo::update_location(
        pool,
        doc.id,
        &storage.public_url(bucket, &target),
        &target,
    )
    .await
    .map_err(|e| format!("record update failed: {e}"))?;

    if let Err(e) = storage.remove(bucket, &[current.to_string()]).await {
        tracing::warn!(path = %current, error = %e, "Failed to remove old blob");
    }
    Ok(true)
}
