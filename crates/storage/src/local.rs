//! Filesystem-backed object storage.
//!
//! Each bucket is a directory under `root`; object paths map onto nested
//! directories. Used for development and tests.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::{join_path, ObjectStorage, StorageError, StoredObject};

pub struct LocalStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    /// * `public_base_url` - where the API serves stored files, e.g.
    ///   `http://localhost:3000/files`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Map `bucket` + `path` onto the filesystem, refusing anything that
    /// could escape the bucket directory.
    fn resolve(&self, bucket: &str, path: &str) -> Result<PathBuf, StorageError> {
        let bucket_dir = self.bucket_dir(bucket)?;
        let relative = Path::new(path.trim_start_matches('/'));
        if path.starts_with('/') || !is_plain_relative(relative) {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(bucket_dir.join(relative))
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, StorageError> {
        let as_path = Path::new(bucket);
        if bucket.is_empty() || bucket.contains('/') || !is_plain_relative(as_path) {
            return Err(StorageError::InvalidPath(bucket.to_string()));
        }
        Ok(self.root.join(bucket))
    }
}

fn is_plain_relative(path: &Path) -> bool {
    let mut components = path.components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}

async fn read_dir_or_empty(dir: &Path) -> Result<Option<tokio::fs::ReadDir>, StorageError> {
    match tokio::fs::read_dir(dir).await {
        Ok(rd) => Ok(Some(rd)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let target = self.resolve(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, data).await?;
        tracing::debug!(bucket, path, "Stored object on disk");
        Ok(())
    }

    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        let target = self.resolve(bucket, path)?;
        match tokio::fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(bucket, path)),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        let dir = if prefix.trim_matches('/').is_empty() {
            self.bucket_dir(bucket)?
        } else {
            self.resolve(bucket, prefix.trim_matches('/'))?
        };

        let Some(mut entries) = read_dir_or_empty(&dir).await? else {
            return Ok(Vec::new());
        };

        let mut objects = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            objects.push(StoredObject::new(join_path(prefix, &name), Some(meta.len())));
        }
        objects.sort_by(|a, b| a.full_path.cmp(&b.full_path));
        Ok(objects)
    }

    async fn list_all(&self, bucket: &str) -> Result<Vec<StoredObject>, StorageError> {
        let root = self.bucket_dir(bucket)?;
        let mut pending = vec![(root, String::new())];
        let mut objects = Vec::new();

        while let Some((dir, prefix)) = pending.pop() {
            let Some(mut entries) = read_dir_or_empty(&dir).await? else {
                continue;
            };
            while let Some(entry) = entries.next_entry().await? {
                let meta = entry.metadata().await?;
                let name = entry.file_name().to_string_lossy().into_owned();
                let path = join_path(&prefix, &name);
                if meta.is_dir() {
                    pending.push((entry.path(), path));
                } else if meta.is_file() {
                    objects.push(StoredObject::new(path, Some(meta.len())));
                }
            }
        }

        objects.sort_by(|a, b| a.full_path.cmp(&b.full_path));
        Ok(objects)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<Vec<String>, StorageError> {
        let mut removed = Vec::with_capacity(paths.len());
        for path in paths {
            let target = self.resolve(bucket, path)?;
            match tokio::fs::remove_file(&target).await {
                Ok(()) => removed.push(path.clone()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removed)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/object/public/{bucket}/{path}",
            self.public_base_url.trim_end_matches('/')
        )
    }
}
