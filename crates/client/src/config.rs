use std::time::Duration;

/// Where the API lives and how long a request may take.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the version prefix, e.g. `http://localhost:3000/api/v1`.
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                        |
    /// |------------------------------|--------------------------------|
    /// | `EVIDENCIAS_API_URL`         | `http://localhost:3000/api/v1` |
    /// | `EVIDENCIAS_API_TIMEOUT_SECS`| `30`                           |
    pub fn from_env() -> Self {
        let base_url = std::env::var("EVIDENCIAS_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000/api/v1".into());

        let timeout_secs: u64 = std::env::var("EVIDENCIAS_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("EVIDENCIAS_API_TIMEOUT_SECS must be a valid u64");

        Self {
            request_timeout: Duration::from_secs(timeout_secs),
            ..Self::new(base_url)
        }
    }
}
