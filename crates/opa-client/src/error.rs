//! Error types for the OPA client

use reqwest::StatusCode;

/// Errors that can occur while talking to an OPA server
#[derive(Debug, thiserror::Error)]
pub enum OpaError {
    #[error("could not reach OPA server at {url}: {source}")]
    ServerConnection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("document undefined at path: {0}")]
    UndefinedDocument(String),

    #[error("invalid OPA url: {0}")]
    InvalidUrl(String),

    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("build() called without opa configuration provided")]
    MissingConfiguration,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OpaError {
    /// HTTP status returned by the server, if the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            OpaError::RequestFailed { status, .. } => Some(*status),
            OpaError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

pub type Result<T> = std::result::Result<T, OpaError>;
