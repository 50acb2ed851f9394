use std::sync::Arc;

use tracing::info;
use wcmeta_core::{collect_items, BatchExecutor};
use wcmeta_domain::BatchOperation;
use wcmeta_infra::output::console_summary;
use wcmeta_infra::{LogFormat, ReportWriter};

use crate::cli::Cli;
use crate::error::CliError;

pub async fn run(cli: &Cli, operation: BatchOperation, input: &str) -> Result<Vec<String>, CliError> {
    let items = collect_items(operation, input)?;
    let client = super::metadata_client(cli)?;
    info!(%operation, items = items.len(), "starting batch");

    let outcome = BatchExecutor::new(Arc::new(client)).with_debug(cli.debug).run(operation, items).await?;

    let format = if cli.csv { LogFormat::Csv } else { LogFormat::Text };
    let files = ReportWriter::new(&cli.output_dir)
        .with_prefix(cli.prefix.clone())
        .with_format(format)
        .with_debug(cli.debug)
        .write(&outcome)?;

    let mut lines = Vec::new();
    if cli.verbose {
        lines.extend(outcome.status_log.iter().map(|entry| entry.headline()));
    }
    lines.extend(console_summary(&outcome, &files));
    Ok(lines)
}
