//! Application context - loads configuration and builds the engine

use ekyc_session::SessionConfig;
use ekyc_validation::{ValidationConfig, ValidationEngine};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Aggregate configuration file
///
/// ```json
/// {
///   "validation": { "min_face_similarity": 92.0 },
///   "session": { "max_retries": 5 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EkycConfig {
    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl EkycConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validation.check()?;
        Ok(config)
    }
}

/// Application context - wires configuration to the validation engine
pub struct AppContext {
    pub config: EkycConfig,
    pub engine: ValidationEngine,
}

impl AppContext {
    pub fn new(config: EkycConfig) -> Result<Self, anyhow::Error> {
        let engine = ValidationEngine::new(config.validation.clone())?;
        Ok(Self { config, engine })
    }

    /// Context from an optional config file, defaults otherwise
    pub fn load(config_path: Option<&Path>) -> Result<Self, anyhow::Error> {
        let config = match config_path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading configuration");
                EkycConfig::from_file(path)?
            }
            None => EkycConfig::default(),
        };
        Self::new(config)
    }
}
