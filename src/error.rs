/// Error types shared by the kind adapter, kubeconfig parser and resource façade
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KindError>;

#[derive(Debug, Error)]
pub enum KindError {
    /// The external tool could not be started or exited non-zero.
    /// `output` holds its captured standard output.
    #[error("could not {action}: {output}")]
    ExternalCommand { action: String, output: String },

    #[error("`{command}` did not finish within {after:?}")]
    Timeout {
        command: String,
        after: std::time::Duration,
    },

    #[error("`{command}` was cancelled")]
    Cancelled { command: String },

    #[error("malformed kubeconfig: {0}")]
    MalformedDocument(String),

    #[error("{field} is not valid base64")]
    Encoding {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("invalid provider configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for KindError {
    fn from(err: serde_yaml::Error) -> Self {
        KindError::MalformedDocument(err.to_string())
    }
}
