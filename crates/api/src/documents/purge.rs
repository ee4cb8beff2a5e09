//! Removal of a resident's storage folders.

use opvang_core::document_kind::DocumentType;
use opvang_core::storage_layout::{
    is_valid_resident_folder_name, parse_resident_folder_name, resident_folder_name,
    resident_folder_prefix,
};
use opvang_storage::{ObjectStorage, StorageError};

/// Delete every file in the resident's folder of `kind`.
///
/// Refuses (returns `Ok(0)`) unless the folder name is well formed and
/// parses back to `badge`, so a malformed name can never widen the prefix
/// to another resident's files. Returns the number of files removed.
pub async fn remove_resident_folder(
    storage: &dyn ObjectStorage,
    kind: DocumentType,
    badge: &str,
    full_name: &str,
) -> Result<usize, StorageError> {
    let folder = resident_folder_name(badge, full_name);
    let parses_back = parse_resident_folder_name(&folder)
        .map(|(parsed, _)| parsed == badge.trim())
        .unwrap_or(false);
    if !is_valid_resident_folder_name(&folder) || !parses_back {
        tracing::warn!(folder = %folder, badge, "Refusing to remove folder with unexpected name");
        return Ok(0);
    }

    let bucket = kind.bucket();
    let prefix = resident_folder_prefix(badge, full_name, kind);
    let paths: Vec<String> = storage
        .list(bucket, &prefix)
        .await?
        .into_iter()
        .map(|o| o.full_path)
        .collect();
    if paths.is_empty() {
        return Ok(0);
    }

    let removed = storage.remove(bucket, &paths).await?;
    tracing::info!(bucket, prefix = %prefix, removed = removed.len(), "Removed resident folder");
    Ok(removed.len())
}

/// Remove the resident's folders in both buckets, logging failures.
pub async fn purge_resident_folders(storage: &dyn ObjectStorage, badge: &str, full_name: &str) -> usize {
    let mut removed = 0;
    for kind in [DocumentType::In, DocumentType::Out] {
        match remove_resident_folder(storage, kind, badge, full_name).await {
            Ok(n) => removed += n,
            Err(e) => {
                tracing::warn!(badge, kind = %kind, error = %e, "Failed to purge resident folder")
            }
        }
    }
    removed
}
