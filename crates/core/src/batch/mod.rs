//! Batch processing
//!
//! `collect-inputs -> dispatch-next -> classify-result -> finalize`, one item
//! at a time in input order.

pub mod check;
pub mod executor;
pub mod input;
pub mod ports;
