/// Persisted state of a `kind` resource instance
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::kubeconfig::Credentials;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterState {
    /// Set once the cluster exists, cleared when it is deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,

    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub client_certificate: String,
    #[serde(default)]
    pub client_key: String,
    #[serde(default)]
    pub cluster_ca_certificate: String,
}

impl ClusterState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = Some(config.into());
        self
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn apply_credentials(&mut self, creds: Credentials) {
        self.host = creds.host;
        self.client_certificate = creds.client_certificate;
        self.client_key = creds.client_key;
        self.cluster_ca_certificate = creds.cluster_ca_certificate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_json_shape() {
        let state = ClusterState::new("dev").with_config("kind.yaml");
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["name"], "dev");
        assert_eq!(json["config"], "kind.yaml");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_minimal_state_parses() {
        let state: ClusterState = serde_json::from_str(r#"{"name": "dev"}"#).unwrap();
        assert_eq!(state, ClusterState::new("dev"));
        assert!(!state.is_present());
    }
}
