//! Object storage for administrative document blobs.
//!
//! Buckets hold files addressed by `/`-separated paths. Two backends
//! implement [`ObjectStorage`]: [`LocalStorage`] keeps buckets as
//! directories on disk, [`HostedStorage`] talks to a hosted REST object
//! store and throttles itself through a request queue.

pub mod error;
pub mod hosted;
pub mod local;

use async_trait::async_trait;
use serde::Serialize;

pub use error::StorageError;
pub use hosted::HostedStorage;
pub use local::LocalStorage;

/// A file inside a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    /// Last path segment.
    pub name: String,
    /// Path inside the bucket.
    pub full_path: String,
    /// Size in bytes, when the backend reports it.
    pub size: Option<u64>,
}

impl StoredObject {
    pub fn new(full_path: impl Into<String>, size: Option<u64>) -> Self {
        let full_path = full_path.into();
        let name = full_path
            .rsplit('/')
            .next()
            .unwrap_or(full_path.as_str())
            .to_string();
        Self {
            name,
            full_path,
            size,
        }
    }
}

/// Join a prefix and a name without doubling or leading slashes.
pub fn join_path(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Blob store used by the document workflows.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Short backend name for status reporting.
    fn backend(&self) -> &'static str;

    /// Store `data` at `path`, replacing any existing object.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Files directly under `prefix` (no recursion, folders omitted).
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<StoredObject>, StorageError>;

    /// Every file in the bucket, at any depth, ordered by path.
    async fn list_all(&self, bucket: &str) -> Result<Vec<StoredObject>, StorageError>;

    /// Delete `paths`. Returns the paths that existed and were removed.
    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<Vec<String>, StorageError>;

    /// URL under which `path` is publicly readable.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_object_name_is_last_segment() {
        let obj = StoredObject::new("IN/1_A_B/scan.pdf", Some(3));
        assert_eq!(obj.name, "scan.pdf");
        assert_eq!(StoredObject::new("flat.pdf", None).name, "flat.pdf");
    }

    #[test]
    fn join_handles_empty_prefix() {
        assert_eq!(join_path("", "a.pdf"), "a.pdf");
        assert_eq!(join_path("IN/", "a.pdf"), "IN/a.pdf");
        assert_eq!(join_path("/IN/x", "a.pdf"), "IN/x/a.pdf");
    }
}
