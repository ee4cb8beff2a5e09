//! REST client for a hosted object storage service.
//!
//! Speaks the `storage/v1` object API: objects are read and written at
//! `/storage/v1/object/{bucket}/{path}`, listed per folder through
//! `/storage/v1/object/list/{bucket}` and deleted in bulk by prefix list.
//! Every call goes through a shared [`RequestQueue`] so a burst of workflow
//! steps cannot overwhelm the service.

use std::sync::Arc;

use async_trait::async_trait;
use opvang_core::request_queue::RequestQueue;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;

use crate::{join_path, ObjectStorage, StorageError, StoredObject};

/// Page size for folder listings.
const LIST_PAGE_SIZE: usize = 1000;

/// Priority for reads; writes and deletes go first.
const READ_PRIORITY: i32 = 1;
const WRITE_PRIORITY: i32 = 2;

pub struct HostedStorage {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    queue: Arc<RequestQueue>,
}

/// One entry of a folder listing. Folders carry no `id`.
#[derive(Debug, Deserialize)]
struct ListEntry {
    name: String,
    id: Option<String>,
    metadata: Option<EntryMetadata>,
}

#[derive(Debug, Deserialize)]
struct EntryMetadata {
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RemovedEntry {
    name: String,
}

impl HostedStorage {
    /// * `api_url` - service base URL, e.g. `https://project.example.co`.
    pub fn new(api_url: String, api_key: String, queue: Arc<RequestQueue>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            queue,
        }
    }

    /// `{api_url}/storage/v1/object/{segments...}` with each segment encoded.
    fn object_url(&self, segments: &[&str], path: &str) -> Result<Url, StorageError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| StorageError::InvalidPath(format!("{}: {e}", self.api_url)))?;
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| StorageError::InvalidPath(self.api_url.clone()))?;
            parts.pop_if_empty().extend(["storage", "v1", "object"]);
            parts.extend(segments);
            parts.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
    }

    /// Turn a non-2xx response into [`StorageError::Api`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn upload_once(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = self.object_url(&[bucket], path)?;
        let response = self
            .authorized(self.client.post(url))
            .header("content-type", content_type)
            .header("x-upsert", "true")
            .body(data)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn download_once(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        let url = self.object_url(&[bucket], path)?;
        let response = self.authorized(self.client.get(url)).send().await?;
        match Self::ensure_success(response).await {
            Ok(r) => Ok(r.bytes().await?.to_vec()),
            Err(e) if is_missing_object(&e) => Err(StorageError::not_found(bucket, path)),
            Err(e) => Err(e),
        }
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        offset: usize,
    ) -> Result<Vec<ListEntry>, StorageError> {
        let url = self.object_url(&["list", bucket], "")?;
        let body = json!({
            "prefix": prefix.trim_matches('/'),
            "limit": LIST_PAGE_SIZE,
            "offset": offset,
            "sortBy": { "column": "name", "order": "asc" },
        });
        let response = self
            .authorized(self.client.post(url))
            .json(&body)
            .send()
            .await?;
        Ok(Self::ensure_success(response).await?.json().await?)
    }

    /// Every entry (files and folders) directly under `prefix`.
    async fn list_entries(&self, bucket: &str, prefix: &str) -> Result<Vec<ListEntry>, StorageError> {
        let mut entries = Vec::new();
        loop {
            let offset = entries.len();
            let page = self
                .queue
                .run(READ_PRIORITY, move || self.list_page(bucket, prefix, offset))
                .await?;
            let done = page.len() < LIST_PAGE_SIZE;
            entries.extend(page);
            if done {
                return Ok(entries);
            }
        }
    }

    async fn remove_once(&self, bucket: &str, paths: &[String]) -> Result<Vec<String>, StorageError> {
        let url = self.object_url(&[bucket], "")?;
        let response = self
            .authorized(self.client.delete(url))
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;
        let removed: Vec<RemovedEntry> = Self::ensure_success(response).await?.json().await?;
        Ok(removed.into_iter().map(|r| r.name).collect())
    }
}

/// The service reports missing objects as 404, or as 400 with a
/// "not found" body.
fn is_missing_object(err: &StorageError) -> bool {
    match err {
        StorageError::Api { status: 404, .. } => true,
        StorageError::Api { status: 400, body } => body.to_lowercase().contains("not found"),
        _ => false,
    }
}

fn entry_to_object(prefix: &str, entry: ListEntry) -> Option<StoredObject> {
    entry.id.as_ref()?;
    let size = entry.metadata.and_then(|m| m.size);
    Some(StoredObject::new(join_path(prefix, &entry.name), size))
}

#[async_trait]
impl ObjectStorage for HostedStorage {
    fn backend(&self) -> &'static str {
        "hosted"
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.queue
            .run(WRITE_PRIORITY, move || {
                self.upload_once(bucket, path, data.clone(), content_type)
            })
            .await?;
        tracing::debug!(bucket, path, "Uploaded object");
        Ok(())
    }

    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        self.queue
            .run(READ_PRIORITY, move || self.download_once(bucket, path))
            .await
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        let entries = self.list_entries(bucket, prefix).await?;
        Ok(entries
            .into_iter()
            .filter_map(|e| entry_to_object(prefix, e))
            .collect())
    }

    async fn list_all(&self, bucket: &str) -> Result<Vec<StoredObject>, StorageError> {
        let mut pending = vec![String::new()];
        let mut objects = Vec::new();

        while let Some(prefix) = pending.pop() {
            for entry in self.list_entries(bucket, &prefix).await? {
                if entry.id.is_none() {
                    pending.push(join_path(&prefix, &entry.name));
                } else if let Some(obj) = entry_to_object(&prefix, entry) {
                    objects.push(obj);
                }
            }
        }

        objects.sort_by(|a, b| a.full_path.cmp(&b.full_path));
        Ok(objects)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<Vec<String>, StorageError> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }
        self.queue
            .run(WRITE_PRIORITY, move || self.remove_once(bucket, paths))
            .await
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{path}", self.api_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> HostedStorage {
        HostedStorage::new(url.into(), "key".into(), Arc::new(RequestQueue::default()))
    }

    #[test]
    fn object_urls_encode_segments() {
        let s = client("https://project.example.co/");
        let url = s
            .object_url(&["administrative-documents"], "IN/1_A B/scan 1.pdf")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://project.example.co/storage/v1/object/administrative-documents/IN/1_A%20B/scan%201.pdf"
        );

        let list = s.object_url(&["list", "administrative-documents-out"], "").unwrap();
        assert_eq!(
            list.as_str(),
            "https://project.example.co/storage/v1/object/list/administrative-documents-out"
        );
    }

    #[test]
    fn public_url_layout() {
        let s = client("https://project.example.co");
        assert_eq!(
            s.public_url("administrative-documents", "IN/1_A_B/a.pdf"),
            "https://project.example.co/storage/v1/object/public/administrative-documents/IN/1_A_B/a.pdf"
        );
    }

    #[test]
    fn listing_entries_skip_folders() {
        let raw = r#"[
            {"name": "24191_John_Doe", "id": null, "metadata": null},
            {"name": "scan.pdf", "id": "0b1c", "metadata": {"size": 2048, "mimetype": "application/pdf"}}
        ]"#;
        let entries: Vec<ListEntry> = serde_json::from_str(raw).unwrap();
        let objects: Vec<_> = entries
            .into_iter()
            .filter_map(|e| entry_to_object("IN", e))
            .collect();
        assert_eq!(objects, vec![StoredObject::new("IN/scan.pdf", Some(2048))]);
    }

    #[test]
    fn missing_object_detection() {
        assert!(is_missing_object(&StorageError::Api {
            status: 404,
            body: String::new()
        }));
        assert!(is_missing_object(&StorageError::Api {
            status: 400,
            body: r#"{"statusCode":"404","error":"not_found","message":"Object not found"}"#.into()
        }));
        assert!(!is_missing_object(&StorageError::Api {
            status: 400,
            body: "bad request".into()
        }));
    }
}
