//! Administrative document records.
//!
//! A record points at a blob in the bucket of its `document_type`. Records
//! whose resident was deleted keep `resident_id = NULL` until a sync
//! reattaches them.

use opvang_core::document_kind::DocumentType;
use opvang_core::duplicates::DocumentKey;
use opvang_core::storage_layout::extract_storage_path;
use opvang_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `administrative_documents` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdministrativeDocument {
    pub id: DbId,
    pub resident_id: Option<DbId>,
    pub document_type: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub uploaded_by: Option<String>,
    pub resident_badge: Option<String>,
    pub resident_name: Option<String>,
    pub storage_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AdministrativeDocument {
    /// Direction of this document; unknown values read as IN.
    pub fn kind(&self) -> DocumentType {
        DocumentType::parse(&self.document_type).unwrap_or_default()
    }

    /// Path of the blob inside its bucket.
    ///
    /// Prefers the recorded `storage_path`; older rows only carry a public
    /// URL in `file_path`.
    pub fn blob_path(&self) -> String {
        match self.storage_path.as_deref() {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => extract_storage_path(&self.file_path, self.kind().bucket()),
        }
    }

    pub fn duplicate_key(&self) -> DocumentKey {
        DocumentKey {
            id: self.id,
            file_name: self.file_name.clone(),
            document_type: self.document_type.clone(),
            resident_id: self.resident_id,
            created_at: self.created_at,
        }
    }
}

/// DTO for inserting a document record.
#[derive(Debug, Clone)]
pub struct CreateAdministrativeDocument {
    pub resident_id: Option<DbId>,
    pub document_type: DocumentType,
    pub file_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub uploaded_by: Option<String>,
    pub resident_badge: Option<String>,
    pub resident_name: Option<String>,
    pub storage_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn doc(file_path: &str, storage_path: Option<&str>, kind: &str) -> AdministrativeDocument {
        AdministrativeDocument {
            id: 1,
            resident_id: Some(2),
            document_type: kind.into(),
            file_name: "scan.pdf".into(),
            file_path: file_path.into(),
            file_size: None,
            mime_type: None,
            description: None,
            uploaded_by: None,
            resident_badge: None,
            resident_name: None,
            storage_path: storage_path.map(Into::into),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn blob_path_prefers_storage_path() {
        let d = doc("https://x/whatever.pdf", Some("IN/1_A_B/scan.pdf"), "IN");
        assert_eq!(d.blob_path(), "IN/1_A_B/scan.pdf");
    }

    #[test]
    fn blob_path_falls_back_to_public_url() {
        let d = doc(
            "https://x.example.co/storage/v1/object/public/administrative-documents-out/OUT/1_A_B/scan.pdf",
            None,
            "OUT",
        );
        assert_eq!(d.kind(), DocumentType::Out);
        assert_eq!(d.blob_path(), "OUT/1_A_B/scan.pdf");
    }
}
