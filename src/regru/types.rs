use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Credentials;
use crate::error::{RegruError, Result};
use crate::records::RecordKind;

/// Value the API expects in `output_content_type`.
pub const OUTPUT_CONTENT_TYPE: &str = "plain";

/// Value of `result` in a successful envelope.
pub const RESULT_SUCCESS: &str = "success";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub dname: String, // "example.com"
}

/// Fields shared by every zone call.
#[derive(Debug, Clone, Serialize)]
pub struct CommonParams {
    pub username: String,
    pub password: String,
    pub domains: Vec<Domain>,
    pub subdomain: String,           // "www", "@"
    pub output_content_type: String, // always "plain"
}

impl CommonParams {
    pub fn new(credentials: &Credentials, zone: &str, subdomain: &str) -> Self {
        Self {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            domains: vec![Domain {
                dname: zone.to_string(),
            }],
            subdomain: subdomain.to_string(),
            output_content_type: OUTPUT_CONTENT_TYPE.to_string(),
        }
    }
}

/// Kind-specific part of an add request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordPayload {
    A { ipaddr: String },
    Aaaa { ipaddr: String },
    Cname { canonical_name: String },
    Mx { mail_server: String, priority: String },
    Txt { text: String },
}

impl RecordPayload {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordPayload::A { .. } => RecordKind::A,
            RecordPayload::Aaaa { .. } => RecordKind::Aaaa,
            RecordPayload::Cname { .. } => RecordKind::Cname,
            RecordPayload::Mx { .. } => RecordKind::Mx,
            RecordPayload::Txt { .. } => RecordKind::Txt,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRecordRequest {
    #[serde(flatten)]
    common: CommonParams,
    #[serde(flatten)]
    payload: RecordPayload,
}

impl CreateRecordRequest {
    pub fn new(common: CommonParams, payload: RecordPayload) -> Self {
        Self { common, payload }
    }

    pub fn kind(&self) -> RecordKind {
        self.payload.kind()
    }

    pub fn common(&self) -> &CommonParams {
        &self.common
    }

    pub fn payload(&self) -> &RecordPayload {
        &self.payload
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteRecordRequest {
    #[serde(flatten)]
    pub common: CommonParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>, // "A", "MX", ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Envelope returned by every regru2 call.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    /// HTTP status the envelope arrived with; filled in by the client.
    #[serde(skip)]
    pub status: u16,
    pub result: String, // "success" / "error"
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_text: Option<String>,
    #[serde(default)]
    pub error_params: Option<serde_json::Value>,
    #[serde(default)]
    pub answer: Option<serde_json::Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.result == RESULT_SUCCESS
    }

    /// The embedded error whenever `result` is anything but success.
    pub fn has_error(&self) -> Option<RemoteError> {
        if self.is_success() {
            return None;
        }
        Some(RemoteError {
            code: self.error_code.clone(),
            text: self.error_text.clone(),
        })
    }

    /// Success value, or the embedded error as `Api` with the HTTP status.
    pub fn into_result(self) -> Result<ApiResponse> {
        match self.has_error() {
            Some(error) => Err(RegruError::Api {
                status: self.status,
                error,
            }),
            None => Ok(self),
        }
    }
}

/// Error description carried inside a response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteError {
    pub code: Option<String>, // "INVALID_DOMAIN_NAME_FORMAT", ...
    pub text: Option<String>,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.text, &self.code) {
            (Some(text), _) => f.write_str(text),
            (None, Some(code)) => f.write_str(code),
            (None, None) => f.write_str("unknown error"),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Interpret the body of a non-2xx response.
///
/// A body that is not a valid envelope is reported as `ResponseDecode` with the
/// raw text kept. An envelope is always an `Api` error, even if it claims
/// success.
pub fn parse_error(status: u16, raw: &str) -> RegruError {
    match serde_json::from_str::<ApiResponse>(raw) {
        Ok(envelope) => RegruError::Api {
            status,
            error: envelope.has_error().unwrap_or_default(),
        },
        Err(e) => RegruError::ResponseDecode {
            status,
            detail: e.to_string(),
            body: raw.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_has_no_error() {
        let resp: ApiResponse =
            serde_json::from_str(r#"{"result":"success","answer":{"domains":[]}}"#).unwrap();
        assert!(resp.has_error().is_none());
        assert!(resp.into_result().is_ok());
    }

    #[test]
    fn error_envelope_exposes_remote_text() {
        let mut resp: ApiResponse = serde_json::from_str(
            r#"{"result":"error","error_code":"NO_SUCH_DOMAIN","error_text":"Domain not found"}"#,
        )
        .unwrap();
        let remote = resp.has_error().unwrap();
        assert_eq!(remote.to_string(), "Domain not found");
        assert_eq!(remote.code.as_deref(), Some("NO_SUCH_DOMAIN"));

        resp.status = 200;
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.to_string(), "status code: 200, Domain not found");
    }

    #[test]
    fn remote_error_falls_back_to_code() {
        let remote = RemoteError {
            code: Some("ACCESS_DENIED".into()),
            text: None,
        };
        assert_eq!(remote.to_string(), "ACCESS_DENIED");
        assert_eq!(RemoteError::default().to_string(), "unknown error");
    }

    #[test]
    fn parse_error_keeps_status_and_text() {
        let err = parse_error(
            500,
            r#"{"result":"error","error_code":"INTERNAL","error_text":"Internal error"}"#,
        );
        match err {
            RegruError::Api { status, error } => {
                assert_eq!(status, 500);
                assert_eq!(error.text.as_deref(), Some("Internal error"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_error_never_reports_success() {
        let err = parse_error(503, r#"{"result":"success"}"#);
        assert!(matches!(err, RegruError::Api { status: 503, .. }));
    }

    #[test]
    fn parse_error_preserves_undecodable_body() {
        let err = parse_error(502, "<html>Bad Gateway</html>");
        match err {
            RegruError::ResponseDecode { status, body, .. } => {
                assert_eq!(status, 502);
                assert_eq!(body, "<html>Bad Gateway</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn delete_request_omits_absent_disambiguators() {
        let creds = Credentials {
            username: "u".into(),
            password: "p".into(),
        };
        let req = DeleteRecordRequest {
            common: CommonParams::new(&creds, "example.com", "www"),
            record_type: None,
            content: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("record_type").is_none());
        assert!(value.get("content").is_none());
        assert_eq!(value["subdomain"], "www");
    }
}
