//! Storage-to-database synchronization.
//!
//! A bucket can hold files no record points at (uploaded by other tools,
//! or left behind when a record was deleted). Smart sync records each such
//! file for the one resident its name or path identifies. Orphan recovery
//! does the same for records that lost their resident.

use std::collections::HashSet;

use opvang_core::document_kind::DocumentType;
use opvang_core::matching::{
    best_match, find_matches, FileRef, MatchOutcome, ResidentMatch, ResidentRef,
};
use opvang_core::types::DbId;
use opvang_db::models::administrative_document::{
    AdministrativeDocument, CreateAdministrativeDocument,
};
use opvang_db::models::resident::Resident;
use opvang_db::repositories::{AdministrativeDocumentRepo, ResidentRepo};
use opvang_db::DbPool;
use opvang_storage::{ObjectStorage, StoredObject};
use serde::Serialize;

use crate::documents::{mime_type_for, resident_refs};
use crate::error::AppResult;

/// Recorded as `uploaded_by` on records created by a sync.
const SYNC_UPLOADER: &str = "smart-sync";

/// A stored file that was not recorded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedFile {
    pub name: String,
    pub full_path: String,
    /// `"no_match"` or `"ambiguous"`.
    pub reason: &'static str,
    pub candidates: Vec<ResidentMatch>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanRecoveryReport {
    pub checked: usize,
    pub recovered: usize,
    pub still_orphaned: Vec<DbId>,
    pub failed: Vec<OrphanFailure>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanFailure {
    pub document_id: DbId,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub document_type: DocumentType,
    pub total_files: usize,
    pub already_synced: usize,
    pub synced: usize,
    pub unmatched: Vec<UnmatchedFile>,
    pub failed: Vec<SyncFailure>,
    pub orphans: OrphanRecoveryReport,
}

/// Record every unrecorded file of `kind` that matches exactly one
/// resident, then run [`recover_orphans`].
///
/// A file counts as recorded when a record of the same type already has
/// its file name. Failing inserts are reported, not fatal.
pub async fn smart_sync(
    pool: &DbPool,
    storage: &dyn ObjectStorage,
    kind: DocumentType,
) -> AppResult<SyncReport> {
    let bucket = kind.bucket();
    let residents = ResidentRepo::list(pool).await?;
    let refs = resident_refs(&residents);
    let files = storage.list_all(bucket).await?;
    let mut recorded: HashSet<String> = AdministrativeDocumentRepo::file_names_by_type(pool, kind)
        .await?
        .into_iter()
        .collect();

    let mut report = SyncReport {
        document_type: kind,
        total_files: files.len(),
        already_synced: 0,
        synced: 0,
        unmatched: Vec::new(),
        failed: Vec::new(),
        orphans: OrphanRecoveryReport::default(),
    };

    for file in &files {
        if recorded.contains(&file.name) {
            report.already_synced += 1;
            continue;
        }

        let file_ref = FileRef {
            name: &file.name,
            full_path: &file.full_path,
        };
        let found = match best_match(&file_ref, &refs) {
            MatchOutcome::Unique(found) => found,
            MatchOutcome::Ambiguous(candidates) => {
                tracing::debug!(file = %file.full_path, count = candidates.len(), "Ambiguous match");
                report.unmatched.push(UnmatchedFile {
                    name: file.name.clone(),
                    full_path: file.full_path.clone(),
                    reason: "ambiguous",
                    candidates,
                });
                continue;
            }
            MatchOutcome::NoMatch => {
                report.unmatched.push(UnmatchedFile {
                    name: file.name.clone(),
                    full_path: file.full_path.clone(),
                    reason: "no_match",
                    candidates: Vec::new(),
                });
                continue;
            }
        };

        let Some(resident) = residents.iter().find(|r| r.id == found.resident_id) else {
            continue;
        };
        let input = sync_record(storage, kind, file, resident);
        match AdministrativeDocumentRepo::create(pool, &input).await {
            Ok(doc) => {
                tracing::info!(
                    document_id = doc.id,
                    resident_id = resident.id,
                    reason = %found.reason,
                    file = %file.full_path,
                    "Synced stored file",
                );
                recorded.insert(file.name.clone());
                report.synced += 1;
            }
            Err(e) => {
                tracing::warn!(file = %file.full_path, error = %e, "Failed to record stored file");
                report.failed.push(SyncFailure {
                    name: file.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    report.orphans = recover_orphans(pool, kind).await?;
    Ok(report)
}

fn sync_record(
    storage: &dyn ObjectStorage,
    kind: DocumentType,
    file: &StoredObject,
    resident: &Resident,
) -> CreateAdministrativeDocument {
    CreateAdministrativeDocument {
        resident_id: Some(resident.id),
        document_type: kind,
        file_name: file.name.clone(),
        file_path: storage.public_url(kind.bucket(), &file.full_path),
        file_size: file.size.and_then(|s| i64::try_from(s).ok()),
        mime_type: Some(mime_type_for(&file.name).to_string()),
        description: None,
        uploaded_by: Some(SYNC_UPLOADER.to_string()),
        resident_badge: Some(resident.badge.to_string()),
        resident_name: Some(resident.full_name()),
        storage_path: Some(file.full_path.clone()),
    }
}

/// Reattach records of `kind` without a resident to the one resident their
/// stored path identifies. A record that cannot be updated is reported in
/// `failed` and the run goes on.
pub async fn recover_orphans(pool: &DbPool, kind: DocumentType) -> AppResult<OrphanRecoveryReport> {
    let orphans = AdministrativeDocumentRepo::list_orphans(pool, kind).await?;
    let residents = ResidentRepo::list(pool).await?;
    let refs = resident_refs(&residents);

    let mut report = OrphanRecoveryReport {
        checked: orphans.len(),
        ..Default::default()
    };

    for doc in &orphans {
        let path = doc.blob_path();
        let file_ref = FileRef {
            name: &doc.file_name,
            full_path: &path,
        };
        let MatchOutcome::Unique(found) = best_match(&file_ref, &refs) else {
            report.still_orphaned.push(doc.id);
            continue;
        };
        let Some(resident) = residents.iter().find(|r| r.id == found.resident_id) else {
            report.still_orphaned.push(doc.id);
            continue;
        };

        let assigned = AdministrativeDocumentRepo::assign_resident(
            pool,
            doc.id,
            resident.id,
            &resident.badge.to_string(),
            &resident.full_name(),
        )
        .await;
        match assigned {
            Ok(Some(_)) => {
                tracing::info!(document_id = doc.id, resident_id = resident.id, "Recovered orphaned document");
                report.recovered += 1;
            }
            // Deleted since the orphan listing.
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(document_id = doc.id, error = %e, "Failed to reattach orphaned document");
                report.failed.push(OrphanFailure {
                    document_id: doc.id,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Read-only analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSummary {
    pub in_files: usize,
    pub out_files: usize,
    pub total_files: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSummary {
    pub total_documents: usize,
    pub in_documents: usize,
    pub out_documents: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentSummary {
    pub total: usize,
    pub with_badges: usize,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncAnalysis {
    pub files_with_matches: usize,
    pub files_without_matches: usize,
    pub files_already_in_db: usize,
    pub files_to_sync: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSummary {
    pub storage: StorageSummary,
    pub database: DatabaseSummary,
    pub residents: ResidentSummary,
    pub sync_analysis: SyncAnalysis,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    pub file: String,
    pub full_path: String,
    pub matches: Vec<ResidentMatch>,
    pub match_count: usize,
    pub exists_in_database: bool,
    pub should_sync: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketAnalysis {
    pub total_files: usize,
    pub files: Vec<StoredObject>,
    pub match_analysis: Vec<FileAnalysis>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugReport {
    pub summary: DebugSummary,
    pub in_analysis: BucketAnalysis,
    pub out_analysis: BucketAnalysis,
}

/// Compare both buckets against the records and residents without writing.
pub async fn analyze(pool: &DbPool, storage: &dyn ObjectStorage) -> AppResult<DebugReport> {
    let residents = ResidentRepo::list(pool).await?;
    let refs = resident_refs(&residents);
    let documents = AdministrativeDocumentRepo::list_all(pool).await?;

    let in_recorded = recorded_names(&documents, DocumentType::In);
    let out_recorded = recorded_names(&documents, DocumentType::Out);

    let in_files = storage.list_all(DocumentType::In.bucket()).await?;
    let out_files = storage.list_all(DocumentType::Out.bucket()).await?;

    let mut sync_analysis = SyncAnalysis::default();
    let in_analysis = analyze_bucket(in_files, &in_recorded, &refs, &mut sync_analysis);
    let out_analysis = analyze_bucket(out_files, &out_recorded, &refs, &mut sync_analysis);

    let in_documents = documents.iter().filter(|d| d.kind() == DocumentType::In).count();
    let summary = DebugSummary {
        storage: StorageSummary {
            in_files: in_analysis.total_files,
            out_files: out_analysis.total_files,
            total_files: in_analysis.total_files + out_analysis.total_files,
        },
        database: DatabaseSummary {
            total_documents: documents.len(),
            in_documents,
            out_documents: documents.len() - in_documents,
        },
        residents: ResidentSummary {
            total: residents.len(),
            with_badges: residents.iter().filter(|r| r.badge > 0).count(),
        },
        sync_analysis,
    };

    Ok(DebugReport {
        summary,
        in_analysis,
        out_analysis,
    })
}

fn recorded_names(documents: &[AdministrativeDocument], kind: DocumentType) -> HashSet<&str> {
    documents
        .iter()
        .filter(|d| d.kind() == kind)
        .map(|d| d.file_name.as_str())
        .collect()
}

fn analyze_bucket(
    files: Vec<StoredObject>,
    recorded: &HashSet<&str>,
    refs: &[ResidentRef<'_>],
    totals: &mut SyncAnalysis,
) -> BucketAnalysis {
    let match_analysis: Vec<FileAnalysis> = files
        .iter()
        .map(|file| {
            let file_ref = FileRef {
                name: &file.name,
                full_path: &file.full_path,
            };
            let matches = find_matches(&file_ref, refs);
            let exists_in_database = recorded.contains(file.name.as_str());
            let unique = matches!(best_match(&file_ref, refs), MatchOutcome::Unique(_));
            let should_sync = unique && !exists_in_database;

            if matches.is_empty() {
                totals.files_without_matches += 1;
            } else {
                totals.files_with_matches += 1;
            }
            if exists_in_database {
                totals.files_already_in_db += 1;
            }
            if should_sync {
                totals.files_to_sync += 1;
            }

            FileAnalysis {
                file: file.name.clone(),
                full_path: file.full_path.clone(),
                match_count: matches.len(),
                matches,
                exists_in_database,
                should_sync,
            }
        })
        .collect();

    BucketAnalysis {
        total_files: files.len(),
        files,
        match_analysis,
    }
}
