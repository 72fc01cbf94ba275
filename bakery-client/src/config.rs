//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client configuration for connecting to the bakery server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Admin token, when already signed in
    pub token: Option<String>,

    /// Request timeout
    pub timeout: Duration,

    /// File holding writes waiting to be replayed
    pub queue_path: PathBuf,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, queue_path: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            queue_path: queue_path.into(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
