mod cli;
mod commands;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::error::CliError;
use crate::logging::{init_logging, LoggingConfig};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&LoggingConfig::from_flags(cli.verbose, cli.log_json));

    for line in commands::run(&cli).await? {
        println!("{line}");
    }
    Ok(())
}
