//! Document workflows spanning the database and object storage.
//!
//! Handlers stay thin; the multi-step operations live here:
//! - [`sync`]: attach stored files to residents by fuzzy filename matching
//! - [`cleanup`]: report and remove duplicate records
//! - [`organize`]: move loose IN files into resident folders
//! - [`transfer`]: copy or move a resident's IN dossier to OUT
//! - [`purge`]: remove a resident's folders from storage

pub mod cleanup;
pub mod organize;
pub mod purge;
pub mod sync;
pub mod transfer;

use opvang_core::matching::ResidentRef;
use opvang_core::storage_layout::file_extension;
use opvang_db::models::resident::Resident;

/// Matching view of every resident.
pub fn resident_refs(residents: &[Resident]) -> Vec<ResidentRef<'_>> {
    residents
        .iter()
        .map(|r| ResidentRef {
            id: r.id,
            badge: r.badge.to_string(),
            first_name: &r.first_name,
            last_name: &r.last_name,
        })
        .collect()
}

/// MIME type recorded for a file, from its extension.
pub fn mime_type_for(file_name: &str) -> &'static str {
    match file_extension(file_name).as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}
