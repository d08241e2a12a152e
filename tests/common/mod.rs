//! Shared fixtures: a throwaway client certificate and a client pointed at a
//! wiremock registrar.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use rcgen::{CertificateParams, KeyPair};
use regru_dns::{ClientConfig, RegruClient};
use tempfile::TempDir;
use wiremock::MockServer;

pub const API_PREFIX: &str = "/api/regru2";

pub const SUCCESS_BODY: &str = r#"{"result":"success","answer":{"domains":[{"dname":"example.com","result":"success"}]}}"#;

/// PEM files of a freshly generated self-signed client certificate.
pub struct ClientIdentity {
    _dir: TempDir,
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl ClientIdentity {
    pub fn generate() -> Self {
        let key_pair = KeyPair::generate().expect("generate key");
        let cert = CertificateParams::new(vec!["localhost".to_string()])
            .expect("certificate params")
            .self_signed(&key_pair)
            .expect("self-signed certificate");

        let dir = tempfile::tempdir().expect("temp dir");
        let cert_path = dir.path().join("client.crt");
        let key_path = dir.path().join("client.key");
        fs::write(&cert_path, cert.pem()).expect("write cert");
        fs::write(&key_path, key_pair.serialize_pem()).expect("write key");

        Self {
            _dir: dir,
            cert: cert_path,
            key: key_path,
        }
    }

    pub fn config(&self, endpoint: impl Into<String>) -> ClientConfig {
        ClientConfig::new("test", "test", endpoint, &self.cert, &self.key)
    }
}

/// Client for `server`, with the API mounted under [`API_PREFIX`].
pub fn client_for(server: &MockServer, identity: &ClientIdentity) -> RegruClient {
    let endpoint = format!("{}{}", server.uri(), API_PREFIX);
    RegruClient::new(&identity.config(endpoint)).expect("client")
}

pub fn api_path(suffix: &str) -> String {
    format!("{API_PREFIX}/{suffix}")
}
