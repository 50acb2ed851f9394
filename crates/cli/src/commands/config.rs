use std::collections::BTreeMap;
use std::path::Path;

use wcmeta_infra::config;

use crate::cli::ConfigCommand;
use crate::error::CliError;

pub fn run(command: &ConfigCommand) -> Result<Vec<String>, CliError> {
    let path = config::store_path();
    match command {
        ConfigCommand::Set { pairs } => set(&path, pairs),
        ConfigCommand::Show => show(&path),
    }
}

fn set(path: &Path, args: &[String]) -> Result<Vec<String>, CliError> {
    let pairs = config::parse_pairs(args)?;
    config::set_credentials(path, pairs)?;
    Ok(vec!["Credentials set.".to_string()])
}

fn show(path: &Path) -> Result<Vec<String>, CliError> {
    let store = config::read_store(path)?;
    if store.is_empty() {
        return Err(CliError::Config("No credentials are set. Use the config command".to_string()));
    }
    Ok(render(&store))
}

/// `name=value` lines with the secret masked.
fn render(store: &BTreeMap<String, String>) -> Vec<String> {
    store
        .iter()
        .map(|(name, value)| {
            if name == "secret" {
                format!("{name}={}", mask(value))
            } else {
                format!("{name}={value}")
            }
        })
        .collect()
}

fn mask(secret: &str) -> String {
    let shown: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{shown}****")
    }
}
