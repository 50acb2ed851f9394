//! Credential loader
//!
//! Loads API credentials from environment variables or the credential store.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If any is missing, falls back to the credential store file
//! 3. Probes a few locations for the store when no directory is configured
//!
//! ## Environment Variables
//! - `WCMETA_KEY`: WSKey client id
//! - `WCMETA_SECRET`: WSKey secret
//! - `WCMETA_PRINCIPAL_ID`: principal identifier
//! - `WCMETA_PRINCIPAL_IDNS`: principal namespace
//! - `WCMETA_SCHEMA`: classification scheme
//! - `WCMETA_HOLDING_LIBRARY_CODE`: holding library code
//! - `WCMETA_INST_SYMBOL`: institution symbol
//! - `WCMETA_CONFIG_DIR`: directory holding `credentials.toml`
//!
//! ## Store Format
//! ```toml
//! [credentials]
//! key = "..."
//! secret = "..."
//! principalID = "..."
//! principalDNS = "urn:oclc:wms:da"
//! schema = "LibraryOfCongress"
//! holdingLibraryCode = "MAIN"
//! instSymbol = "OCWMS"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wcmeta_domain::{Credentials, Result, WcMetaError};

use crate::errors::InfraError;

/// File name of the credential store
pub const STORE_FILE: &str = "credentials.toml";

/// Environment variable naming the store directory
pub const CONFIG_DIR_VAR: &str = "WCMETA_CONFIG_DIR";

/// Store key and the environment variable that overrides it
const ENV_KEYS: [(&str, &str); 7] = [
    ("key", "WCMETA_KEY"),
    ("secret", "WCMETA_SECRET"),
    ("principalID", "WCMETA_PRINCIPAL_ID"),
    ("principalDNS", "WCMETA_PRINCIPAL_IDNS"),
    ("schema", "WCMETA_SCHEMA"),
    ("holdingLibraryCode", "WCMETA_HOLDING_LIBRARY_CODE"),
    ("instSymbol", "WCMETA_INST_SYMBOL"),
];

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    credentials: BTreeMap<String, String>,
}

/// Load credentials with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variable is missing, falls back to the credential store.
///
/// # Errors
/// Returns `WcMetaError::Config` naming every credential that is missing or
/// still a placeholder, or when the store cannot be parsed.
pub fn load() -> Result<Credentials> {
    match load_from_env() {
        Ok(credentials) => {
            tracing::info!("Credentials loaded from environment variables");
            Ok(credentials)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Credentials not in environment, trying store");
            load_from_file(None)
        }
    }
}

/// Load credentials from environment variables
///
/// All seven variables must be present.
///
/// # Errors
/// Returns `WcMetaError::Config` if a variable is missing or a value is a
/// placeholder.
pub fn load_from_env() -> Result<Credentials> {
    let mut map = BTreeMap::new();
    for (key, var) in ENV_KEYS {
        map.insert(key.to_string(), env_var(var)?);
    }
    Credentials::from_map(&map)
}

/// Load credentials from the store
///
/// # Arguments
/// * `path` - Optional store path. If `None`, uses [`store_path`].
///
/// # Errors
/// Returns `WcMetaError::Config` if an explicit path does not exist, the
/// store is not valid TOML, or credentials are missing.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Credentials> {
    let store = match path {
        Some(p) => {
            if !p.exists() {
                return Err(WcMetaError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => store_path(),
    };

    tracing::info!(path = %store.display(), "Loading credentials from store");
    Credentials::from_map(&read_store(&store)?)
}

/// Raw key/value pairs of a store. A store that does not exist yet is empty.
///
/// # Errors
/// Returns `WcMetaError::Io` if the file cannot be read and
/// `WcMetaError::Config` if it is not valid TOML.
pub fn read_store(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let contents = std::fs::read_to_string(path).map_err(InfraError::from)?;
    let file: StoreFile = toml::from_str(&contents).map_err(InfraError::from)?;
    Ok(file.credentials)
}

/// Merge `pairs` into the store at `path`, creating it when needed, and
/// return the merged contents.
///
/// # Errors
/// Returns `WcMetaError::Io` if the store cannot be written.
pub fn set_credentials(path: &Path, pairs: Vec<(String, String)>) -> Result<BTreeMap<String, String>> {
    let mut credentials = read_store(path)?;
    credentials.extend(pairs);

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(InfraError::from)?;
    }

    let file = StoreFile { credentials };
    let rendered = toml::to_string_pretty(&file).map_err(InfraError::from)?;
    std::fs::write(path, rendered).map_err(InfraError::from)?;
    tracing::info!(path = %path.display(), keys = file.credentials.len(), "Credentials written");

    Ok(file.credentials)
}

/// Split `name=value` arguments on the first `=`; arguments without one are
/// ignored.
///
/// # Errors
/// Returns `WcMetaError::InvalidInput` when no argument holds a pair.
pub fn parse_pairs<S: AsRef<str>>(args: &[S]) -> Result<Vec<(String, String)>> {
    let pairs: Vec<(String, String)> = args
        .iter()
        .filter_map(|arg| arg.as_ref().split_once('='))
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .collect();

    if pairs.is_empty() {
        return Err(WcMetaError::InvalidInput("No <name>=<value> pairs found in input".to_string()));
    }
    Ok(pairs)
}

/// Location of the credential store
///
/// `$WCMETA_CONFIG_DIR/credentials.toml` when the variable is set. Otherwise
/// the first existing candidate of:
/// 1. `./config/credentials.toml`
/// 2. `./credentials.toml`
/// 3. `config/credentials.toml` next to the executable
///
/// and `./config/credentials.toml` when none exists yet.
#[must_use]
pub fn store_path() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_VAR) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir).join(STORE_FILE);
        }
    }

    let default = PathBuf::from("config").join(STORE_FILE);
    let mut candidates = vec![default.clone(), PathBuf::from(STORE_FILE)];

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config").join(STORE_FILE));
        }
    }

    candidates.into_iter().find(|path| path.exists()).unwrap_or(default)
}

/// Get required environment variable
///
/// # Errors
/// Returns `WcMetaError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| WcMetaError::Config(format!("Missing required environment variable: {key}")))
}
