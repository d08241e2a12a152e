// src/error.rs
use thiserror::Error;

use crate::regru::types::RemoteError;

pub type Result<T, E = RegruError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum RegruError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to load client certificate from {path}: {detail}")]
    CredentialLoad { path: String, detail: String },

    #[error("failed to parse API endpoint '{endpoint}': {detail}")]
    EndpointParse { endpoint: String, detail: String },

    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid record type '{0}'")]
    UnsupportedRecordType(String),

    #[error("invalid MX record format '{0}', expected 'priority mailserver'")]
    InvalidMxFormat(String),

    #[error("failed to create input data: {0}")]
    Encoding(String),

    #[error("request failed")]
    Transport(#[source] reqwest::Error),

    #[error("failed to decode response (status code: {status}): {detail}")]
    ResponseDecode {
        status: u16,
        detail: String,
        body: String,
    },

    #[error("status code: {status}, {error}")]
    Api { status: u16, error: RemoteError },
}

impl RegruError {
    pub fn config(msg: impl Into<String>) -> Self {
        RegruError::Config(msg.into())
    }

    pub fn credential_load(path: impl Into<String>, detail: impl ToString) -> Self {
        RegruError::CredentialLoad {
            path: path.into(),
            detail: detail.to_string(),
        }
    }

    /// Input problems that are reported before any request is sent.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            RegruError::Config(_)
                | RegruError::UnsupportedRecordType(_)
                | RegruError::InvalidMxFormat(_)
        )
    }

    /// The error reported by the registrar itself, if this is one.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            RegruError::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}
