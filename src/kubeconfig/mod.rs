/// Kubeconfig documents printed by `kind get kubeconfig`
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KindError, Result};

/// Top level kubeconfig document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KubeConfig {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(rename = "current-context", default)]
    pub current_context: String,

    /// Ignored, kept so documents round-trip
    #[serde(default)]
    pub preferences: serde_yaml::Value,

    #[serde(default)]
    pub clusters: Vec<NamedCluster>,

    #[serde(default)]
    pub users: Vec<NamedUser>,

    #[serde(default)]
    pub contexts: Vec<NamedContext>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedCluster {
    #[serde(default)]
    pub name: String,
    pub cluster: Cluster,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(default)]
    pub server: String,

    /// Base64 encoded PEM of the cluster CA
    #[serde(rename = "certificate-authority-data", default)]
    pub certificate_authority_data: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedUser {
    #[serde(default)]
    pub name: String,
    pub user: User,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "client-certificate-data", default)]
    pub client_certificate_data: String,

    #[serde(rename = "client-key-data", default)]
    pub client_key_data: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedContext {
    #[serde(default)]
    pub name: String,
    pub context: Context,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub user: String,
}

/// Endpoint and decoded authentication material of one cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub host: String,
    pub cluster_ca_certificate: String,
    pub client_certificate: String,
    pub client_key: String,
}

impl KubeConfig {
    /// Parse raw YAML bytes as printed by the external tool
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        let config: KubeConfig = serde_yaml::from_slice(raw)?;
        Ok(config)
    }

    /// Resolve the active cluster and user entries.
    ///
    /// A non-empty `current-context` must point at a context whose cluster and
    /// user both exist. Without one, the first cluster and first user win.
    pub fn active_entries(&self) -> Result<(&NamedCluster, &NamedUser)> {
        if self.clusters.is_empty() {
            return Err(KindError::MalformedDocument(
                "document has no cluster entries".to_string(),
            ));
        }
        if self.users.is_empty() {
            return Err(KindError::MalformedDocument(
                "document has no user entries".to_string(),
            ));
        }

        if self.current_context.is_empty() {
            return Ok((&self.clusters[0], &self.users[0]));
        }

        let context = self
            .contexts
            .iter()
            .find(|c| c.name == self.current_context)
            .ok_or_else(|| {
                KindError::MalformedDocument(format!(
                    "current-context {:?} has no matching context entry",
                    self.current_context
                ))
            })?;

        let cluster = self
            .clusters
            .iter()
            .find(|c| c.name == context.context.cluster)
            .ok_or_else(|| {
                KindError::MalformedDocument(format!(
                    "context {:?} refers to unknown cluster {:?}",
                    context.name, context.context.cluster
                ))
            })?;

        let user = self
            .users
            .iter()
            .find(|u| u.name == context.context.user)
            .ok_or_else(|| {
                KindError::MalformedDocument(format!(
                    "context {:?} refers to unknown user {:?}",
                    context.name, context.context.user
                ))
            })?;

        debug!(
            "Resolved context {} to cluster {} and user {}",
            context.name, cluster.name, user.name
        );

        Ok((cluster, user))
    }

    /// Extract the endpoint and decode the certificate material
    pub fn credentials(&self) -> Result<Credentials> {
        let (cluster, user) = self.active_entries()?;

        let ca = decode_field(
            "certificate-authority-data",
            &cluster.cluster.certificate_authority_data,
        )?;
        let cert = decode_field(
            "client-certificate-data",
            &user.user.client_certificate_data,
        )?;
        let key = decode_field("client-key-data", &user.user.client_key_data)?;

        Ok(Credentials {
            host: cluster.cluster.server.clone(),
            cluster_ca_certificate: into_text(ca),
            client_certificate: into_text(cert),
            client_key: into_text(key),
        })
    }
}

/// Decode a standard-alphabet base64 field
pub fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value.trim())
        .map_err(|source| KindError::Encoding { field, source })
}

fn into_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
