//! # wcmeta Domain
//!
//! Domain types shared by every wcmeta crate.
//!
//! This crate contains:
//! - Library credentials and access tokens
//! - Batch items, per-item results and the batch outcome
//! - The batch operation kinds and their display verbs
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other wcmeta crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
