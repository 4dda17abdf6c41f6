use std::path::PathBuf;

/// Which [`crate::ObjectStore`] implementation the server builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Local {
        root: PathBuf,
    },
    S3 {
        endpoint_url: Option<String>,
        region: String,
        access_key_id: String,
        secret_access_key: String,
    },
}

impl StorageBackend {
    /// Short name for logs; never includes credentials.
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Local { .. } => "local",
            StorageBackend::S3 { .. } => "s3",
        }
    }
}

/// Object storage configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Base of public object URLs; objects resolve to `{public_url}/{bucket}/{key}`.
    pub public_url: String,
    pub photos_bucket: String,
    pub documents_bucket: String,
}

impl StorageConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                          |
    /// |-------------------------|----------------------------------|
    /// | `STORAGE_BACKEND`       | `local` (`local` or `s3`)        |
    /// | `STORAGE_LOCAL_ROOT`    | `./storage`                      |
    /// | `STORAGE_PUBLIC_URL`    | `http://localhost:3000/storage`  |
    /// | `STORAGE_PHOTOS_BUCKET` | `event-photos`                   |
    /// | `STORAGE_DOCS_BUCKET`   | `event-documents`                |
    /// | `S3_ENDPOINT_URL`       | unset (AWS endpoint)             |
    /// | `S3_REGION`             | `us-east-1`                      |
    /// | `S3_ACCESS_KEY_ID`      | required for `s3`                |
    /// | `S3_SECRET_ACCESS_KEY`  | required for `s3`                |
    pub fn from_env() -> Self {
        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .as_str()
        {
            "s3" => StorageBackend::S3 {
                endpoint_url: std::env::var("S3_ENDPOINT_URL").ok().filter(|s| !s.is_empty()),
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
                access_key_id: std::env::var("S3_ACCESS_KEY_ID")
                    .expect("S3_ACCESS_KEY_ID must be set when STORAGE_BACKEND=s3"),
                secret_access_key: std::env::var("S3_SECRET_ACCESS_KEY")
                    .expect("S3_SECRET_ACCESS_KEY must be set when STORAGE_BACKEND=s3"),
            },
            "local" => StorageBackend::Local {
                root: std::env::var("STORAGE_LOCAL_ROOT")
                    .unwrap_or_else(|_| "./storage".into())
                    .into(),
            },
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        let public_url = std::env::var("STORAGE_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3000/storage".into())
            .trim_end_matches('/')
            .to_string();

        Self {
            backend,
            public_url,
            photos_bucket: std::env::var("STORAGE_PHOTOS_BUCKET")
                .unwrap_or_else(|_| "event-photos".into()),
            documents_bucket: std::env::var("STORAGE_DOCS_BUCKET")
                .unwrap_or_else(|_| "event-documents".into()),
        }
    }

    /// Configuration for a local store rooted at `root`, used by tests.
    pub fn local(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            backend: StorageBackend::Local { root: root.into() },
            public_url: public_url.into(),
            photos_bucket: "event-photos".into(),
            documents_bucket: "event-documents".into(),
        }
    }
}
