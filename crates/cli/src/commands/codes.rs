use crate::cli::Cli;
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Vec<String>, CliError> {
    let client = super::metadata_client(cli)?;
    let exchange = client.holding_codes().await?;

    if exchange.response.is_success() {
        Ok(vec![exchange.response.body])
    } else {
        Err(CliError::Command(format!(
            "holding codes request failed with status {}: {}",
            exchange.response.status, exchange.response.body
        )))
    }
}
