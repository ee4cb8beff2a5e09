use std::path::PathBuf;
use std::time::Duration;

use opvang_core::request_queue::{DEFAULT_MAX_CONCURRENT, DEFAULT_MIN_INTERVAL};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Where document blobs live.
    pub storage: StorageConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3001`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// Storage variables are documented on [`StorageConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            storage: StorageConfig::from_env(),
        }
    }
}

/// Which object store backs the document buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Buckets are directories under [`StorageConfig::root`].
    Local,
    /// Buckets live in the hosted object-storage service.
    Hosted,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Hosted => "hosted",
        }
    }
}

/// Object storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory of the local backend.
    pub root: PathBuf,
    /// Base URL local public URLs are built on.
    pub public_url: String,
    /// Base URL of the hosted service.
    pub api_url: Option<String>,
    /// Service key of the hosted service.
    pub api_key: Option<String>,
    /// Concurrent hosted requests before queueing.
    pub max_concurrent: usize,
    /// Minimum spacing between hosted request starts.
    pub request_delay: Duration,
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var                    | Default                       |
    /// |----------------------------|-------------------------------|
    /// | `STORAGE_BACKEND`          | `local` (`local` or `hosted`) |
    /// | `STORAGE_ROOT`             | `./storage`                   |
    /// | `STORAGE_PUBLIC_URL`       | `http://localhost:3000/files` |
    /// | `STORAGE_API_URL`          | required when hosted          |
    /// | `STORAGE_API_KEY`          | required when hosted          |
    /// | `STORAGE_MAX_CONCURRENT`   | `2`                           |
    /// | `STORAGE_REQUEST_DELAY_MS` | `200`                         |
    pub fn from_env() -> Self {
        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .to_lowercase()
            .as_str()
        {
            "local" => StorageBackend::Local,
            "hosted" => StorageBackend::Hosted,
            other => panic!("STORAGE_BACKEND must be 'local' or 'hosted', got '{other}'"),
        };

        let root = PathBuf::from(std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "./storage".into()));
        let public_url = std::env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3000/files".into());

        let api_url = std::env::var("STORAGE_API_URL").ok().filter(|s| !s.is_empty());
        let api_key = std::env::var("STORAGE_API_KEY").ok().filter(|s| !s.is_empty());
        if backend == StorageBackend::Hosted && (api_url.is_none() || api_key.is_none()) {
            panic!("STORAGE_API_URL and STORAGE_API_KEY must be set for the hosted backend");
        }

        let max_concurrent: usize = std::env::var("STORAGE_MAX_CONCURRENT")
            .map(|v| v.parse().expect("STORAGE_MAX_CONCURRENT must be a valid usize"))
            .unwrap_or(DEFAULT_MAX_CONCURRENT);

        let request_delay = std::env::var("STORAGE_REQUEST_DELAY_MS")
            .map(|v| {
                Duration::from_millis(
                    v.parse()
                        .expect("STORAGE_REQUEST_DELAY_MS must be a valid u64"),
                )
            })
            .unwrap_or(DEFAULT_MIN_INTERVAL);

        Self {
            backend,
            root,
            public_url,
            api_url,
            api_key,
            max_concurrent,
            request_delay,
        }
    }

    /// Local backend rooted at `root`, as used by tests and development.
    pub fn local(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            backend: StorageBackend::Local,
            root: root.into(),
            public_url: public_url.into(),
            api_url: None,
            api_key: None,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            request_delay: DEFAULT_MIN_INTERVAL,
        }
    }
}
