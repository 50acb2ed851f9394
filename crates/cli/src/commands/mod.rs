mod auth;
mod batch;
mod codes;
mod config;

use std::time::Duration;

use wcmeta_infra::{Endpoints, MetadataClient, MetadataClientConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Run the selected command and return the lines to print on stdout.
pub async fn run(cli: &Cli) -> Result<Vec<String>, CliError> {
    if let Some((operation, input)) = cli.command.batch() {
        return batch::run(cli, operation, &input).await;
    }

    match &cli.command {
        Command::Codes => codes::run(cli).await,
        Command::Config(command) => config::run(command),
        Command::Auth(command) => auth::run(cli, command).await,
        _ => Err(CliError::Command(format!("{:?} is not a batch command", cli.command))),
    }
}

/// Metadata client for the stored credentials and global flags.
fn metadata_client(cli: &Cli) -> Result<MetadataClient, CliError> {
    let credentials = wcmeta_infra::config::load()?;
    let endpoints = cli.base_url.as_deref().map(Endpoints::with_base).unwrap_or_default();

    let config = MetadataClientConfig {
        endpoints,
        timeout: Duration::from_secs(cli.timeout_secs),
        validation_mode: cli.command.validation_mode(),
        ..MetadataClientConfig::default()
    };
    Ok(MetadataClient::from_credentials(&credentials, config)?)
}
