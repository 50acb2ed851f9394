//! Credential loading and management
//!
//! This module provides utilities for loading API credentials from
//! environment variables and the TOML credential store, and for updating
//! that store.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    load, load_from_env, load_from_file, parse_pairs, read_store, set_credentials, store_path,
    CONFIG_DIR_VAR, STORE_FILE,
};
