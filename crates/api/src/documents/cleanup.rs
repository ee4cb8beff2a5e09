//! Duplicate record cleanup.

use opvang_core::duplicates::{duplicate_count, group_duplicates, plan_cleanup, DocumentKey};
use opvang_core::types::DbId;
use opvang_db::repositories::AdministrativeDocumentRepo;
use opvang_db::DbPool;
use serde::Serialize;

use crate::error::AppResult;

#[derive(Debug, Serialize)]
pub struct DuplicateGroupReport {
    pub key: String,
    pub count: usize,
    pub documents: Vec<DocumentKey>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    pub total_documents: usize,
    pub duplicate_count: usize,
    pub duplicate_groups: Vec<DuplicateGroupReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub deleted_count: usize,
    pub deleted_ids: Vec<DbId>,
}

async fn document_keys(pool: &DbPool) -> AppResult<Vec<DocumentKey>> {
    Ok(AdministrativeDocumentRepo::list_all(pool)
        .await?
        .iter()
        .map(|d| d.duplicate_key())
        .collect())
}

/// Group records sharing file name, type and resident.
pub async fn report(pool: &DbPool) -> AppResult<DuplicateReport> {
    let keys = document_keys(pool).await?;
    let groups = group_duplicates(&keys);

    Ok(DuplicateReport {
        total_documents: keys.len(),
        duplicate_count: duplicate_count(&groups),
        duplicate_groups: groups
            .into_iter()
            .map(|g| DuplicateGroupReport {
                key: g.key,
                count: g.documents.len(),
                documents: g.documents,
            })
            .collect(),
    })
}

/// Delete all but the newest record of every duplicate group.
///
/// Rows that fail to delete are logged and left in place. Blobs are not
/// touched: duplicates point at the same stored file.
pub async fn cleanup(pool: &DbPool) -> AppResult<CleanupReport> {
    let keys = document_keys(pool).await?;
    let doomed = plan_cleanup(&group_duplicates(&keys));

    let mut deleted_ids = Vec::with_capacity(doomed.len());
    for id in doomed {
        match AdministrativeDocumentRepo::delete(pool, id).await {
            Ok(true) => deleted_ids.push(id),
            Ok(false) => {}
            Err(e) => tracing::warn!(document_id = id, error = %e, "Failed to delete duplicate"),
        }
    }

    tracing::info!(deleted = deleted_ids.len(), "Duplicate cleanup finished");
    Ok(CleanupReport {
        deleted_count: deleted_ids.len(),
        deleted_ids,
    })
}
