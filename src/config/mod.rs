/// Provider configuration for the kind resource
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{KindError, Result};

/// Settings shared by every lifecycle operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// kind executable (can also be set via KIND_PATH env var)
    #[serde(default = "default_kind_path")]
    pub kind_path: PathBuf,

    /// Upper bound for a single kind invocation (KIND_TIMEOUT_SECS).
    /// Unset means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_kind_path() -> PathBuf {
    PathBuf::from("kind")
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind_path: default_kind_path(),
            timeout_secs: None,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ProviderConfig =
            serde_yaml::from_str(&content).map_err(|e| KindError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Load from `path` when it exists, apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                return Err(KindError::Config(format!(
                    "configuration file not found: {}",
                    path.display()
                )))
            }
            None => Self::default(),
        };

        let config = config.with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("KIND_PATH") {
            self.kind_path = PathBuf::from(path);
        }
        if let Some(secs) = lookup("KIND_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                KindError::Config(format!("KIND_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            self.timeout_secs = Some(secs);
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.kind_path.as_os_str().is_empty() {
            return Err(KindError::Config("kind_path cannot be empty".to_string()));
        }
        if self.timeout_secs == Some(0) {
            return Err(KindError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Generate an example configuration file
    pub fn example() -> Self {
        Self {
            kind_path: default_kind_path(),
            timeout_secs: Some(600),
        }
    }
}
