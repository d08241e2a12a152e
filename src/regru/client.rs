use std::fs;
use std::path::Path;

use reqwest::{Client, Identity, Url, header};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{ClientConfig, Credentials};
use crate::error::{RegruError, Result};
use crate::regru::form::{FormBody, encode_form};
use crate::regru::types::{ApiResponse, parse_error};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Maximum number of bytes of a response body written to the logs.
const LOG_BODY_LIMIT: usize = 256;

/// mTLS client for the regru2 API. Immutable once built; clone or share by
/// reference across concurrent calls.
#[derive(Clone, Debug)]
pub struct RegruClient {
    http: Client,
    base_url: Url, // e.g. "https://api.reg.ru/api/regru2"
    credentials: Credentials,
}

impl RegruClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = parse_endpoint(&config.endpoint)?;
        let identity = load_identity(&config.cert_file, &config.key_file)?;

        if !config.verify_server_cert {
            warn!(endpoint = %base_url, "server certificate verification is disabled");
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .identity(identity)
            .danger_accept_invalid_certs(!config.verify_server_cert)
            .build()
            .map_err(RegruError::ClientBuild)?;

        Ok(Self {
            http,
            base_url,
            credentials: config.credentials.clone(),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `path` appended, one segment per non-empty piece.
    pub fn url(&self, path: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // parse_endpoint rejects URLs that cannot carry a path.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            for fragment in path {
                segments.extend(fragment.split('/').filter(|s| !s.is_empty()));
            }
        }
        url
    }

    /// Encode `request` and POST it to `path`.
    pub async fn send<T: Serialize>(&self, request: &T, path: &[&str]) -> Result<ApiResponse> {
        let body = encode_form(request)?;
        self.send_form(&body, path).await
    }

    /// POST an already flattened body to `path` and decode the envelope.
    ///
    /// Non-2xx statuses never produce an envelope. The envelope's own `result`
    /// is left for the caller to check via [`ApiResponse::into_result`].
    pub async fn send_form(&self, body: &FormBody, path: &[&str]) -> Result<ApiResponse> {
        let url = self.url(path);
        debug!(method = "POST", %url, body = %body.to_log_string(), "regru request");

        let res = self
            .http
            .post(url)
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body.to_urlencoded())
            .send()
            .await
            .map_err(RegruError::Transport)?;

        let status = res.status().as_u16();
        let raw = res.text().await.map_err(RegruError::Transport)?;
        debug!(status, body = %truncate_for_log(&raw), "regru response");

        if !is_success_status(status) {
            return Err(parse_error(status, &raw));
        }

        let mut envelope: ApiResponse =
            serde_json::from_str(&raw).map_err(|e| RegruError::ResponseDecode {
                status,
                detail: e.to_string(),
                body: raw.clone(),
            })?;
        envelope.status = status;
        Ok(envelope)
    }
}

fn is_success_status(status: u16) -> bool {
    status / 100 == 2
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint.trim()).map_err(|e| RegruError::EndpointParse {
        endpoint: endpoint.to_string(),
        detail: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(RegruError::EndpointParse {
            endpoint: endpoint.to_string(),
            detail: "URL cannot carry a path".into(),
        });
    }
    Ok(url)
}

/// Read the certificate chain and private key into a single PEM identity.
fn load_identity(cert_file: &Path, key_file: &Path) -> Result<Identity> {
    let mut pem = read_pem(cert_file)?;
    pem.push(b'\n');
    pem.extend(read_pem(key_file)?);

    Identity::from_pem(&pem).map_err(|e| {
        RegruError::credential_load(
            format!("{} + {}", cert_file.display(), key_file.display()),
            e,
        )
    })
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| RegruError::credential_load(path.display().to_string(), e))
}

fn truncate_for_log(s: &str) -> String {
    if s.len() <= LOG_BODY_LIMIT {
        return s.to_string();
    }
    let mut end = LOG_BODY_LIMIT;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..end], s.len())
}
