//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use opvang_core::document_kind::DocumentType;
use opvang_core::types::Date;
use serde::Deserialize;

use crate::error::AppResult;

/// Optional day filter (`?date=YYYY-MM-DD`).
#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Option<Date>,
}

/// Optional document type (`?type=IN|OUT`).
#[derive(Debug, Deserialize)]
pub struct DocumentTypeParams {
    #[serde(rename = "type")]
    pub document_type: Option<String>,
}

impl DocumentTypeParams {
    /// Parse the type, falling back to `default` when absent.
    pub fn parse_or(&self, default: DocumentType) -> AppResult<DocumentType> {
        parse_document_type(self.document_type.as_deref(), default)
    }
}

/// Parse an optional `IN`/`OUT` value; absent or empty means `default`.
pub fn parse_document_type(value: Option<&str>, default: DocumentType) -> AppResult<DocumentType> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Ok(DocumentType::parse(v)?),
        None => Ok(default),
    }
}
