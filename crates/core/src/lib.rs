//! # wcmeta Core
//!
//! Batch execution logic - no HTTP or configuration code.
//!
//! This crate contains:
//! - The [`MetadataApi`] port the batch engine talks through
//! - Input collection (numbers or MARCXML records)
//! - The per-item batch state machine and result classification
//!
//! ## Architecture Principles
//! - Depends on `wcmeta-domain` and `wcmeta-common` only
//! - All remote calls go through the port trait
//! - Pure, testable business logic

pub mod batch;

pub use batch::check::{classify_check, CheckOutcome};
pub use batch::executor::{holdings_targets, BatchExecutor};
pub use batch::input::{collect_items, collect_numbers, collect_records, scan_numbers};
pub use batch::ports::MetadataApi;
