//! HTTP transport with bounded timeout and retry

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
