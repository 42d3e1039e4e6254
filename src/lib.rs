//! # corp-esi
//!
//! Concurrent paginated client for the EVE Swagger Interface (ESI) and the
//! other game-data APIs a corporation management backend talks to.
//!
//! ## Features
//!
//! - **Paginated fetch**: page 1 reports the page count (`X-Pages`), pages
//!   2..N are fetched concurrently under a fixed concurrency budget
//! - **All or nothing**: results are merged in page order, or one error is
//!   returned; partial results are never surfaced
//! - **Optional bearer auth**: one code path for public and authorized calls
//! - **Lookups**: server status, killmails, id-to-name, Janice appraisals
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use corp_esi::{config::AppConfig, esi::EsiClient, FetchRequest, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let esi = EsiClient::from_config(&AppConfig::default())?;
//!
//!     let orders = esi
//!         .all_pages(
//!             FetchRequest::new("/markets/10000002/orders/")
//!                 .query("datasource", "tranquility")
//!                 .query("order_type", "all"),
//!         )
//!         .await?;
//!
//!     println!("{} orders", orders.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! caller ──► PageFetcher::fetch_all
//!               │
//!               ├─ page 1 (awaited) ──► X-Pages = N
//!               │
//!               ├─ pages 2..N ──► ConcurrencyGate ──► PageRequester (HttpClient)
//!               │
//!               └─ join all ──► merge in page order │ first failing page
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and constants
pub mod types;

/// HTTP client and single-page requester
pub mod http;

/// Concurrent paginated fetch
pub mod pagination;

/// Application configuration
pub mod config;

/// ESI and Janice lookups
pub mod esi;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use http::{HttpClient, HttpClientConfig, PageRequester};
pub use pagination::{FetchConfig, PageFetcher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
