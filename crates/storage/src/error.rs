use opvang_core::request_queue::Exhaustible;

/// Errors from an object storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{path}")]
    NotFound { bucket: String, path: String },

    /// The path escapes the bucket or is otherwise unusable.
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage service returned a non-2xx status code.
    #[error("Storage API error ({status}): {body}")]
    Api { status: u16, body: String },
}

impl StorageError {
    pub fn not_found(bucket: &str, path: &str) -> Self {
        Self::NotFound {
            bucket: bucket.to_string(),
            path: path.to_string(),
        }
    }
}

impl Exhaustible for StorageError {
    fn is_resource_exhausted(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            Self::Api { status, .. } => matches!(status, 429 | 503),
            _ => false,
        }
    }
}
