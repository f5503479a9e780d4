use shared_types::AppError;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the hosted backend, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Service base URL, without a trailing slash.
    pub url: String,
    /// Public (anon) API key. Row-level security on the backend is the
    /// authority for what this key can see; it is not a secret.
    pub anon_key: String,
    /// Per-request deadline. A request that never resolves is cut off here
    /// rather than leaving the UI loading forever.
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `SUPABASE_URL` and `SUPABASE_ANON_KEY`, plus an optional
    /// `BACKEND_TIMEOUT_SECS` override.
    pub fn from_env() -> Result<Self, AppError> {
        let url = require_env("SUPABASE_URL")?;
        let anon_key = require_env("SUPABASE_ANON_KEY")?;
        let mut config = Self::new(url, anon_key);
        if let Some(secs) = std::env::var("BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

fn require_env(name: &str) -> Result<String, AppError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::internal(format!("{} is not configured", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = BackendConfig::new("https://proj.supabase.co/", "key");
        assert_eq!(config.url, "https://proj.supabase.co");
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        let config = BackendConfig::new("http://localhost", "key");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn with_timeout_overrides_default() {
        let config =
            BackendConfig::new("http://localhost", "key").with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
