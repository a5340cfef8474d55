//! Session controller configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the capture session controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Failed attempts allowed before retry is refused
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay before a retry starts (no backoff)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Ceiling on a single device capture call
    #[serde(default = "default_capture_timeout_secs")]
    pub capture_timeout_secs: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

fn default_capture_timeout_secs() -> u64 {
    180 // 3 minutes
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            capture_timeout_secs: default_capture_timeout_secs(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Get retry delay as Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Get capture timeout as Duration
    pub fn capture_timeout(&self) -> Duration {
        Duration::from_secs(self.capture_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();

        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert_eq!(config.capture_timeout(), Duration::from_secs(180));
    }

    #[test]
    fn test_config_partial_json() {
        let json = r#"{ "capture_timeout_secs": 60 }"#;
        let config: SessionConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.capture_timeout_secs, 60);
        assert_eq!(config.max_retries, 3); // default
        assert_eq!(config.retry_delay_ms, 1_000); // default
    }
}
