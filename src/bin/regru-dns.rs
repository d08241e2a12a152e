use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use regru_dns::{
    ClientConfig, DeleteSpec, RecordSpec, RegruClient, config::DEFAULT_TIMEOUT, create_record,
    delete_record, read_record,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    #[command(flatten)]
    api: ApiArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
#[command(rename_all = "kebab-case")]
struct ApiArgs {
    /// API username for reg.ru
    #[arg(long, env = "REGRU_API_USERNAME", value_name = "USER")]
    api_username: String,
    /// API password for reg.ru
    #[arg(long, env = "REGRU_API_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
    api_password: String,
    /// reg.ru API endpoint (e.g. https://api.reg.ru/api/regru2)
    #[arg(long, env = "REGRU_API_ENDPOINT", value_name = "URL")]
    api_endpoint: String,
    /// Path to the client SSL certificate file
    #[arg(long, env = "REGRU_CERT_FILE", value_name = "PATH")]
    cert_file: PathBuf,
    /// Path to the client SSL key file
    #[arg(long, env = "REGRU_KEY_FILE", value_name = "PATH")]
    key_file: PathBuf,
    /// Verify the API server's certificate (off by default)
    #[arg(long, env = "REGRU_VERIFY_SERVER_CERT")]
    verify_server_cert: bool,
    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// Add a record and print its resource ID
    Create {
        /// Record type: A, AAAA, CNAME, MX or TXT
        #[arg(long = "type", value_name = "TYPE")]
        record_type: String,
        /// Record name (subdomain, "@" for the zone apex)
        #[arg(long, value_name = "NAME")]
        name: String,
        /// Record value; for MX use "<priority> <mail server>"
        #[arg(long, value_name = "VALUE")]
        record: String,
        /// Zone the record belongs to
        #[arg(long, value_name = "DOMAIN")]
        zone: String,
    },
    /// Report the stored state of a record (remote state is not checked)
    Read {
        /// Resource ID printed by `create`
        #[arg(long, value_name = "ID")]
        id: String,
    },
    /// Remove a record
    Delete {
        #[arg(long, value_name = "NAME")]
        name: String,
        #[arg(long, value_name = "DOMAIN")]
        zone: String,
        /// Narrow the match to this record type
        #[arg(long = "type", value_name = "TYPE")]
        record_type: Option<String>,
        /// Narrow the match to this record content
        #[arg(long, value_name = "VALUE")]
        record: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Read { id } => {
            let status = read_record(&id);
            println!("{id}: {status:?}");
        }
        Command::Create {
            record_type,
            name,
            record,
            zone,
        } => {
            let client = build_client(&cli.api)?;
            let spec = RecordSpec {
                record_type,
                name,
                record,
                zone,
            };
            let id = create_record(&client, &spec)
                .await
                .with_context(|| format!("failed to create DNS record {}.{}", spec.name, spec.zone))?;
            println!("{id}");
        }
        Command::Delete {
            name,
            zone,
            record_type,
            record,
        } => {
            let client = build_client(&cli.api)?;
            let spec = DeleteSpec {
                name,
                zone,
                record_type,
                record,
            };
            delete_record(&client, &spec)
                .await
                .with_context(|| format!("failed to delete DNS record {}.{}", spec.name, spec.zone))?;
        }
    }

    Ok(())
}

fn build_client(api: &ApiArgs) -> Result<RegruClient> {
    let config = ClientConfig::new(
        api.api_username.trim(),
        &api.api_password,
        api.api_endpoint.trim(),
        &api.cert_file,
        &api.key_file,
    )
    .with_server_verification(api.verify_server_cert)
    .with_timeout(Duration::from_secs(api.timeout_secs));

    let client = RegruClient::new(&config).context("failed to create client")?;
    info!(username = %config.credentials.username, "regru client created");
    Ok(client)
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
