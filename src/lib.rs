//! Crate entrypoint wiring together configuration, the regru2 client, and the
//! record lifecycle.

pub mod config;
pub mod error;
pub mod records;
pub mod regru;

pub use config::{ClientConfig, Credentials};
pub use error::{RegruError, Result};
pub use records::{
    DeleteSpec, ReadStatus, RecordKind, RecordResource, RecordSpec, create_record, delete_record,
    read_record,
};
pub use regru::client::RegruClient;

/// Build a client from host-supplied settings.
///
/// Server certificate verification stays off; use [`RegruClient::new`] with
/// [`ClientConfig::with_server_verification`] to turn it on.
pub fn configure(
    username: &str,
    password: &str,
    endpoint: &str,
    cert_file: &str,
    key_file: &str,
) -> Result<RegruClient> {
    let client = RegruClient::new(&ClientConfig::new(
        username, password, endpoint, cert_file, key_file,
    ))?;
    tracing::info!(%username, "regru client created");
    Ok(client)
}
