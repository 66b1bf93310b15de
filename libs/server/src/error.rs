use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// The catalog listing failed; no partial result is produced.
    #[error("{message}")]
    UpstreamUnavailable {
        status: Option<u16>,
        message: String,
    },
}

impl AggregateError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AggregateError::UpstreamUnavailable { status, .. } => *status,
        }
    }
}
