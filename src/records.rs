//! Create/read/delete lifecycle of a single DNS record.
//!
//! Each operation is one round trip against the regru2 zone API. Record type
//! and MX value problems are reported before anything is sent.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::error::{RegruError, Result};
use crate::regru::client::RegruClient;
use crate::regru::paths;
use crate::regru::types::{CommonParams, CreateRecordRequest, DeleteRecordRequest, RecordPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::A,
        RecordKind::Aaaa,
        RecordKind::Cname,
        RecordKind::Mx,
        RecordKind::Txt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::A => "A",
            RecordKind::Aaaa => "AAAA",
            RecordKind::Cname => "CNAME",
            RecordKind::Mx => "MX",
            RecordKind::Txt => "TXT",
        }
    }

    /// Path fragments of the add call for this kind.
    pub fn endpoint(&self) -> &'static [&'static str] {
        match self {
            RecordKind::A => paths::ADD_ALIAS,
            RecordKind::Aaaa => paths::ADD_AAAA,
            RecordKind::Cname => paths::ADD_CNAME,
            RecordKind::Mx => paths::ADD_MX,
            RecordKind::Txt => paths::ADD_TXT,
        }
    }
}

impl FromStr for RecordKind {
    type Err = RegruError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(RecordKind::A),
            "AAAA" => Ok(RecordKind::Aaaa),
            "CNAME" => Ok(RecordKind::Cname),
            "MX" => Ok(RecordKind::Mx),
            "TXT" => Ok(RecordKind::Txt),
            _ => Err(RegruError::UnsupportedRecordType(s.to_string())),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record to create.
#[derive(Debug, Clone)]
pub struct RecordSpec {
    pub record_type: String, // "A", "mx", ...
    pub name: String,        // subdomain, "@" for the apex
    pub record: String,      // "192.0.2.1", "10 mail.example.com", ...
    pub zone: String,        // "example.com"
}

/// A record to remove. Type and content narrow the match when several records
/// share the same name.
#[derive(Debug, Clone)]
pub struct DeleteSpec {
    pub name: String,
    pub zone: String,
    pub record_type: Option<String>,
    pub record: Option<String>,
}

/// Outcome of a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// The remote record was looked up and matches.
    Verified,
    /// Nothing was looked up; stored state is returned as is.
    NotChecked,
}

impl ReadStatus {
    pub fn is_verified(self) -> bool {
        matches!(self, ReadStatus::Verified)
    }
}

/// Identity the host tracks a record under.
pub fn resource_id(name: &str, zone: &str) -> String {
    format!("{name}.{zone}")
}

/// Split an MX value into `(priority, mail_server)`.
pub fn parse_mx(value: &str) -> Result<(String, String)> {
    let fields: Vec<&str> = value.split_whitespace().collect();
    match fields.as_slice() {
        [priority, mail_server] => Ok((priority.to_string(), mail_server.to_string())),
        _ => Err(RegruError::InvalidMxFormat(value.to_string())),
    }
}

pub fn build_payload(kind: RecordKind, value: &str) -> Result<RecordPayload> {
    let payload = match kind {
        RecordKind::A => RecordPayload::A {
            ipaddr: value.to_string(),
        },
        RecordKind::Aaaa => RecordPayload::Aaaa {
            ipaddr: value.to_string(),
        },
        RecordKind::Cname => RecordPayload::Cname {
            canonical_name: value.to_string(),
        },
        RecordKind::Mx => {
            let (priority, mail_server) = parse_mx(value)?;
            RecordPayload::Mx {
                mail_server,
                priority,
            }
        }
        RecordKind::Txt => RecordPayload::Txt {
            text: value.to_string(),
        },
    };
    Ok(payload)
}

pub fn build_create_request(
    credentials: &Credentials,
    spec: &RecordSpec,
) -> Result<CreateRecordRequest> {
    let kind: RecordKind = spec.record_type.parse()?;
    let payload = build_payload(kind, &spec.record)?;
    Ok(CreateRecordRequest::new(
        CommonParams::new(credentials, &spec.zone, &spec.name),
        payload,
    ))
}

pub fn build_delete_request(credentials: &Credentials, spec: &DeleteSpec) -> DeleteRecordRequest {
    DeleteRecordRequest {
        common: CommonParams::new(credentials, &spec.zone, &spec.name),
        record_type: spec
            .record_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_ascii_uppercase),
        content: spec.record.clone().filter(|c| !c.is_empty()),
    }
}

/// Add the record and return its resource identity.
pub async fn create_record(client: &RegruClient, spec: &RecordSpec) -> Result<String> {
    let request = build_create_request(client.credentials(), spec)?;
    let kind = request.kind();

    client
        .send(&request, kind.endpoint())
        .await?
        .into_result()
        .inspect_err(|e| warn!(%kind, name = %spec.name, zone = %spec.zone, "create failed: {e}"))?;

    let id = resource_id(&spec.name, &spec.zone);
    info!(%kind, %id, "record created");
    Ok(id)
}

pub async fn delete_record(client: &RegruClient, spec: &DeleteSpec) -> Result<()> {
    let request = build_delete_request(client.credentials(), spec);

    client
        .send(&request, paths::REMOVE_RECORD)
        .await?
        .into_result()
        .inspect_err(|e| warn!(name = %spec.name, zone = %spec.zone, "delete failed: {e}"))?;

    info!(id = %resource_id(&spec.name, &spec.zone), "record removed");
    Ok(())
}

/// Reading back records is not supported by this client; the stored state is
/// trusted and reported as unchecked.
pub fn read_record(id: &str) -> ReadStatus {
    debug!(%id, "read skipped, remote state not checked");
    ReadStatus::NotChecked
}

/// Host-side state of one managed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordResource {
    pub record_type: String,
    pub name: String,
    pub record: String,
    pub zone: String,
    pub id: Option<String>,
}

impl RecordResource {
    pub fn new(
        record_type: impl Into<String>,
        name: impl Into<String>,
        record: impl Into<String>,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            record_type: record_type.into(),
            name: name.into(),
            record: record.into(),
            zone: zone.into(),
            id: None,
        }
    }

    pub fn spec(&self) -> RecordSpec {
        RecordSpec {
            record_type: self.record_type.clone(),
            name: self.name.clone(),
            record: self.record.clone(),
            zone: self.zone.clone(),
        }
    }

    pub fn delete_spec(&self) -> DeleteSpec {
        DeleteSpec {
            name: self.name.clone(),
            zone: self.zone.clone(),
            record_type: Some(self.record_type.clone()),
            record: Some(self.record.clone()),
        }
    }

    pub async fn create(&mut self, client: &RegruClient) -> Result<()> {
        let id = create_record(client, &self.spec()).await?;
        self.id = Some(id);
        Ok(())
    }

    pub fn read(&self) -> ReadStatus {
        read_record(self.id.as_deref().unwrap_or_default())
    }

    /// Remove the record; the identity is cleared only once the API confirms.
    pub async fn delete(&mut self, client: &RegruClient) -> Result<()> {
        delete_record(client, &self.delete_spec()).await?;
        self.id = None;
        Ok(())
    }
}
