//! Moving a resident's dossier from the IN bucket to the OUT bucket.
//!
//! Each IN document is downloaded, uploaded to the resident's OUT folder
//! and recorded as an OUT document. A transfer then drops the IN records
//! and the resident's IN folder; a copy leaves them in place. Failures are
//! collected per document so one bad file does not block the rest.

use chrono::NaiveDate;
use opvang_core::document_kind::DocumentType;
use opvang_core::storage_layout::{
    document_description, organized_storage_path, resident_folder_name,
};
use opvang_core::types::DbId;
use opvang_db::models::administrative_document::{
    AdministrativeDocument, CreateAdministrativeDocument,
};
use opvang_db::repositories::AdministrativeDocumentRepo;
use opvang_db::DbPool;
use opvang_storage::ObjectStorage;
use serde::{Deserialize, Serialize};

use crate::documents::mime_type_for;
use crate::documents::purge::remove_resident_folder;
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMethod {
    /// Move: IN records and the IN folder are removed afterwards.
    #[default]
    Transfer,
    /// Copy: IN records and blobs stay.
    Copy,
}

impl TransferMethod {
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Transfer => "transferred",
            Self::Copy => "copied",
        }
    }
}

/// Whose dossier to move, and how.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub resident_id: DbId,
    pub badge: String,
    pub name: String,
    pub method: TransferMethod,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferredDocument {
    pub original_path: String,
    pub new_path: String,
    pub file_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderCleanup {
    pub removed_files: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReport {
    pub success: bool,
    pub transferred_count: usize,
    pub transferred_documents: Vec<TransferredDocument>,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_cleanup: Option<FolderCleanup>,
}

/// Copy or move every IN document of a resident into their OUT folder.
pub async fn transfer_documents(
    pool: &DbPool,
    storage: &dyn ObjectStorage,
    request: &TransferRequest,
    today: NaiveDate,
) -> AppResult<TransferReport> {
    let documents =
        AdministrativeDocumentRepo::list_by_resident(pool, request.resident_id, Some(DocumentType::In))
            .await?;
    tracing::info!(
        resident_id = request.resident_id,
        count = documents.len(),
        method = request.method.past_tense(),
        "Starting document transfer",
    );

    let mut transferred = Vec::new();
    let mut errors = Vec::new();
    for doc in &documents {
        match copy_to_out(pool, storage, request, doc, today).await {
            Ok(moved) => {
                if request.method == TransferMethod::Transfer {
                    if let Err(e) = AdministrativeDocumentRepo::delete(pool, doc.id).await {
                        tracing::warn!(document_id = doc.id, error = %e, "Failed to delete IN record");
                    }
                }
                transferred.push(moved);
            }
            Err(message) => {
                tracing::warn!(document_id = doc.id, error = %message, "Document transfer failed");
                errors.push(message);
            }
        }
    }

    let folder_cleanup = if request.method == TransferMethod::Transfer && !transferred.is_empty() {
        Some(clean_in_folder(storage, request, &transferred, errors.is_empty()).await)
    } else {
        None
    };

    Ok(TransferReport {
        success: !transferred.is_empty() || errors.is_empty(),
        transferred_count: transferred.len(),
        transferred_documents: transferred,
        errors,
        folder_cleanup,
    })
}

/// Remove moved IN blobs. The whole folder goes only when every document
/// moved; otherwise the blobs of failed documents must survive.
async fn clean_in_folder(
    storage: &dyn ObjectStorage,
    request: &TransferRequest,
    transferred: &[TransferredDocument],
    all_moved: bool,
) -> FolderCleanup {
    let result = if all_moved {
        remove_resident_folder(storage, DocumentType::In, &request.badge, &request.name).await
    } else {
        let originals: Vec<String> = transferred.iter().map(|t| t.original_path.clone()).collect();
        storage
            .remove(DocumentType::In.bucket(), &originals)
            .await
            .map(|removed| removed.len())
    };

    match result {
        Ok(removed_files) => FolderCleanup {
            removed_files,
            error: None,
        },
        Err(e) => {
            tracing::warn!(badge = %request.badge, error = %e, "IN folder cleanup failed");
            FolderCleanup {
                removed_files: 0,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Copy one document. Errors come back as the message reported to the client.
async fn copy_to_out(
    pool: &DbPool,
    storage: &dyn ObjectStorage,
    request: &TransferRequest,
    doc: &AdministrativeDocument,
    today: NaiveDate,
) -> Result<TransferredDocument, String> {
    let source = doc.blob_path();
    let data = storage
        .download(DocumentType::In.bucket(), &source)
        .await
        .map_err(|e| format!("Failed to download {}: {e}", doc.file_name))?;

    let out_bucket = DocumentType::Out.bucket();
    let target = organized_storage_path(&request.badge, &request.name, &doc.file_name, DocumentType::Out);
    let mime_type = doc
        .mime_type
        .clone()
        .unwrap_or_else(|| mime_type_for(&doc.file_name).to_string());
    let size = data.len();
    storage
        .upload(out_bucket, &target, data, &mime_type)
        .await
        .map_err(|e| format!("Failed to upload {}: {e}", doc.file_name))?;

    let folder = resident_folder_name(&request.badge, &request.name);
    let record = CreateAdministrativeDocument {
        resident_id: Some(request.resident_id),
        document_type: DocumentType::Out,
        file_name: doc.file_name.clone(),
        file_path: storage.public_url(out_bucket, &target),
        file_size: doc.file_size.or(i64::try_from(size).ok()),
        mime_type: Some(mime_type),
        description: Some(document_description(
            doc.description.as_deref().unwrap_or_default(),
            &folder,
            today,
        )),
        uploaded_by: doc.uploaded_by.clone(),
        resident_badge: Some(request.badge.clone()),
        resident_name: Some(request.name.clone()),
        storage_path: Some(target.clone()),
    };

    if let Err(e) = AdministrativeDocumentRepo::create(pool, &record).await {
        // Leave no unrecorded blob behind.
        if let Err(cleanup) = storage.remove(out_bucket, &[target.clone()]).await {
            tracing::warn!(path = %target, error = %cleanup, "Failed to remove uploaded copy");
        }
        return Err(format!("Failed to record {}: {e}", doc.file_name));
    }

    Ok(TransferredDocument {
        original_path: source,
        new_path: target,
        file_name: doc.file_name.clone(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStatus {
    pub in_documents: usize,
    pub out_documents: usize,
    pub has_transferred: bool,
}

/// Document counts per direction for a resident.
pub async fn transfer_status(pool: &DbPool, resident_id: DbId) -> AppResult<TransferStatus> {
    let documents = AdministrativeDocumentRepo::list_by_resident(pool, resident_id, None).await?;
    let in_documents = documents.iter().filter(|d| d.kind() == DocumentType::In).count();
    let out_documents = documents.len() - in_documents;
    Ok(TransferStatus {
        in_documents,
        out_documents,
        has_transferred: out_documents > 0,
    })
}
