//! Administrative document direction (IN / OUT) and bucket mapping.
//!
//! IN documents are collected while a resident lives at the center; OUT
//! documents form the dossier handed over when the resident leaves. Each
//! direction has its own storage bucket.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Bucket holding IN documents.
pub const BUCKET_IN: &str = "administrative-documents";

/// Bucket holding OUT documents.
pub const BUCKET_OUT: &str = "administrative-documents-out";

/// Direction of an administrative document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    #[default]
    In,
    Out,
}

impl DocumentType {
    /// Parse from the database / wire value. Case-insensitive.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(Self::In),
            "OUT" => Ok(Self::Out),
            _ => Err(CoreError::Validation(
                "Invalid document type. Must be IN or OUT.".into(),
            )),
        }
    }

    /// Database / wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }

    /// Storage bucket for this direction.
    pub fn bucket(self) -> &'static str {
        match self {
            Self::In => BUCKET_IN,
            Self::Out => BUCKET_OUT,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
