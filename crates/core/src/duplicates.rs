//! Duplicate detection for administrative document records.
//!
//! Two records are duplicates when they share file name, document type
//! and resident. Cleanup keeps the most recently created record of each
//! group.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// The record fields duplicate detection needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentKey {
    pub id: DbId,
    pub file_name: String,
    pub document_type: String,
    pub resident_id: Option<DbId>,
    pub created_at: Timestamp,
}

impl DocumentKey {
    /// `"{file_name}::{document_type}::{resident_id|NULL}"`.
    pub fn duplicate_key(&self) -> String {
        let resident = self
            .resident_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "NULL".to_string());
        format!("{}::{}::{}", self.file_name, self.document_type, resident)
    }
}

/// Records sharing one duplicate key, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub key: String,
    pub documents: Vec<DocumentKey>,
}

/// Groups with more than one member, ordered by key.
pub fn group_duplicates(documents: &[DocumentKey]) -> Vec<DuplicateGroup> {
    let mut by_key: HashMap<String, Vec<DocumentKey>> = HashMap::new();
    for doc in documents {
        by_key.entry(doc.duplicate_key()).or_default().push(doc.clone());
    }

    let mut groups: Vec<DuplicateGroup> = by_key
        .into_iter()
        .filter(|(_, docs)| docs.len() > 1)
        .map(|(key, mut documents)| {
            // Ties on created_at fall back to the higher id.
            documents.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            DuplicateGroup { key, documents }
        })
        .collect();
    groups.sort_by(|a, b| a.key.cmp(&b.key));
    groups
}

/// Ids to delete so that only the newest record of each group remains.
pub fn plan_cleanup(groups: &[DuplicateGroup]) -> Vec<DbId> {
    groups
        .iter()
        .flat_map(|g| g.documents.iter().skip(1).map(|d| d.id))
        .collect()
}

/// Number of redundant records across all groups.
pub fn duplicate_count(groups: &[DuplicateGroup]) -> usize {
    groups.iter().map(|g| g.documents.len().saturating_sub(1)).sum()
}
