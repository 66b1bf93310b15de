use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("cluster request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cluster returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected cluster response: {0}")]
    Decode(String),

    #[error("invalid cluster configuration: {0}")]
    Config(String),
}

impl ClusterError {
    /// HTTP status reported by the cluster, when there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClusterError::Http(error) => error.status().map(|status| status.as_u16()),
            ClusterError::Api { status, .. } => Some(*status),
            ClusterError::Decode(_) | ClusterError::Config(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid client configuration: {0}")]
    Config(String),
}
