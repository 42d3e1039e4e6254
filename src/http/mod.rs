//! HTTP client module
//!
//! Provides the configured HTTP client and the single-page requester used by
//! the pagination orchestrator.
//!
//! # Features
//!
//! - **Single-page requests**: one GET per page with an optional bearer token
//! - **Status classification**: any status >= 400 becomes `Error::Remote`
//! - **Proxy and pooling**: configured once on the underlying reqwest client

mod client;
mod requester;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use requester::PageRequester;
