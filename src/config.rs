use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{RegruError, Result};

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Login pair sent as form fields with every call.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub endpoint: String, // e.g. "https://api.reg.ru/api/regru2"
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    /// Off by default: the registrar's API hosts are trusted through the
    /// client certificate, not through a public CA chain.
    pub verify_server_cert: bool,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        endpoint: impl Into<String>,
        cert_file: impl Into<PathBuf>,
        key_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            credentials: Credentials {
                username: username.into(),
                password: password.into(),
            },
            endpoint: endpoint.into(),
            cert_file: cert_file.into(),
            key_file: key_file.into(),
            verify_server_cert: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_server_verification(mut self, verify: bool) -> Self {
        self.verify_server_cert = verify;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Presence checks done before anything touches the filesystem or network.
    pub fn validate(&self) -> Result<()> {
        if self.credentials.username.is_empty() || self.credentials.password.is_empty() {
            return Err(RegruError::config("api_username and api_password are required"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(RegruError::config("api_endpoint is required"));
        }
        Ok(())
    }
}
