//! Pagination module
//!
//! Concurrent fetch of header-paginated resources (`X-Pages` style).
//!
//! # Overview
//!
//! The first page is requested on its own and reports how many pages exist.
//! Remaining pages are requested concurrently, bounded by a concurrency gate,
//! and merged back in page order. Partial results are never returned.

mod fetcher;
mod gate;

pub use fetcher::{parse_page_count, FetchConfig, PageFetcher};
pub use gate::{ConcurrencyGate, GateScope};
