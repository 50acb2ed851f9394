//! Shared building blocks for the wcmeta crates.
//!
//! # Feature Tiers
//!
//! - `foundation`: request signing and MARCXML helpers, no I/O
//! - `runtime`: token flows against the authorization server (default)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

#[cfg(feature = "foundation")]
pub mod auth;
#[cfg(feature = "foundation")]
pub mod marcxml;
