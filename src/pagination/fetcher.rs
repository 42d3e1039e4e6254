//! Paginated fetch orchestrator
//!
//! Page 1 is requested first and carries the total page count. Pages 2..N
//! are then fetched by one task each, gated by a [`ConcurrencyGate`], and
//! merged back in page order. Either every page is returned or one error is.

use super::gate::{ConcurrencyGate, GateScope};
use crate::error::{Error, Result};
use crate::http::PageRequester;
use crate::types::{
    FetchOutcome, FetchRequest, JsonValue, DEFAULT_CONCURRENCY, DEFAULT_MAX_PAGES,
    DEFAULT_PAGE_COUNT_HEADER,
};
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Tuning for a [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum simultaneous in-flight page requests
    pub concurrency: usize,
    /// Per-call or shared concurrency gate
    pub gate_scope: GateScope,
    /// Skip not-yet-started pages once any page has failed
    pub fail_fast: bool,
    /// Header name reported in pagination errors
    pub page_count_header: String,
    /// Largest page count accepted from the page-count header
    pub max_pages: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            gate_scope: GateScope::PerCall,
            fail_fast: false,
            page_count_header: DEFAULT_PAGE_COUNT_HEADER.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl FetchConfig {
    /// Set the concurrency budget
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the gate scope
    #[must_use]
    pub fn gate_scope(mut self, scope: GateScope) -> Self {
        self.gate_scope = scope;
        self
    }

    /// Enable or disable fail-fast skipping
    #[must_use]
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Set the page count header name
    #[must_use]
    pub fn page_count_header(mut self, name: impl Into<String>) -> Self {
        self.page_count_header = name.into();
        self
    }

    /// Set the largest accepted page count
    #[must_use]
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// What one fan-out task produced
enum PageOutcome {
    Fetched(Vec<JsonValue>),
    Failed(Error),
    Skipped,
}

/// Fetches every page of a resource through a [`PageRequester`]
pub struct PageFetcher<R> {
    requester: Arc<R>,
    config: FetchConfig,
    shared_gate: Option<ConcurrencyGate>,
}

impl<R> PageFetcher<R>
where
    R: PageRequester + 'static,
{
    /// Create a fetcher with default settings
    pub fn new(requester: R) -> Self {
        Self::with_config(Arc::new(requester), FetchConfig::default())
    }

    /// Create a fetcher with custom settings
    pub fn with_config(requester: Arc<R>, config: FetchConfig) -> Self {
        let shared_gate = match config.gate_scope {
            GateScope::Shared => Some(ConcurrencyGate::new(config.concurrency)),
            GateScope::PerCall => None,
        };

        Self {
            requester,
            config,
            shared_gate,
        }
    }

    /// The underlying requester
    pub fn requester(&self) -> &Arc<R> {
        &self.requester
    }

    /// Fetcher settings
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// The gate shared across calls, when the scope is `Shared`
    pub fn shared_gate(&self) -> Option<&ConcurrencyGate> {
        self.shared_gate.as_ref()
    }

    /// Fetch every page of `request` and merge them in page order.
    ///
    /// Page-1 failures and a missing, invalid or oversized page count abort
    /// before any other request is issued. The page-count header is checked
    /// before page 1's body is decoded. When several later pages fail, the
    /// error of the lowest page number is returned, wrapped in
    /// `Error::PageFetch`.
    #[instrument(skip(self, request), fields(path = %request.path()))]
    pub async fn fetch_all(&self, request: FetchRequest) -> FetchOutcome {
        if request.path().is_empty() {
            return Err(Error::invalid_input("resource path cannot be empty"));
        }

        let first = self.requester.fetch_raw(&request, 1).await?;
        let header = self.config.page_count_header.as_str();
        let total_pages = parse_page_count(header, first.page_count.as_deref())?;
        if total_pages > self.config.max_pages {
            warn!(
                total_pages,
                max_pages = self.config.max_pages,
                "page count above limit"
            );
            return Err(Error::pagination_header(header, first.page_count.as_deref()));
        }
        let first = first.decode()?;

        if total_pages == 1 {
            debug!(items = first.items.len(), "single page resource");
            return Ok(first.items);
        }

        let gate = match &self.shared_gate {
            Some(gate) => gate.clone(),
            None => ConcurrencyGate::new(self.config.concurrency),
        };
        debug!(
            total_pages,
            concurrency = gate.capacity(),
            "fanning out remaining pages"
        );

        let request = Arc::new(request);
        let failed = Arc::new(AtomicBool::new(false));
        let fail_fast = self.config.fail_fast;

        let (pages, handles): (Vec<u32>, Vec<_>) = (2..=total_pages)
            .map(|page| {
                let task = fetch_one(
                    Arc::clone(&self.requester),
                    Arc::clone(&request),
                    gate.clone(),
                    Arc::clone(&failed),
                    fail_fast,
                    page,
                );
                (page, tokio::spawn(task))
            })
            .unzip();

        // Join barrier: every task finishes and drops its permit before merging.
        let joined = join_all(handles).await;

        let mut slots: Vec<Option<Vec<JsonValue>>> = vec![None; total_pages as usize];
        slots[0] = Some(first.items);
        let mut first_error: Option<(u32, Error)> = None;

        // Pages are visited in ascending order, so the first error kept is the lowest page.
        for (page, result) in pages.into_iter().zip(joined) {
            let outcome = result.unwrap_or_else(|e| {
                PageOutcome::Failed(Error::Other(format!("page task aborted: {e}")))
            });

            match outcome {
                PageOutcome::Fetched(items) => slots[(page - 1) as usize] = Some(items),
                PageOutcome::Failed(err) => {
                    warn!(page, error = %err, "page fetch failed");
                    if first_error.is_none() {
                        first_error = Some((page, err));
                    }
                }
                PageOutcome::Skipped => debug!(page, "page skipped after earlier failure"),
            }
        }

        if let Some((page, err)) = first_error {
            return Err(Error::page_fetch(page, err));
        }

        let merged = merge_slots(slots)?;
        info!(total_pages, items = merged.len(), "fetched all pages");
        Ok(merged)
    }
}

impl<R> std::fmt::Debug for PageFetcher<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("config", &self.config)
            .field("shared_gate", &self.shared_gate)
            .finish_non_exhaustive()
    }
}

/// Body of one fan-out task
async fn fetch_one<R: PageRequester>(
    requester: Arc<R>,
    request: Arc<FetchRequest>,
    gate: ConcurrencyGate,
    failed: Arc<AtomicBool>,
    fail_fast: bool,
    page: u32,
) -> PageOutcome {
    let _permit = match gate.acquire().await {
        Ok(permit) => permit,
        Err(e) => return PageOutcome::Failed(e),
    };

    if fail_fast && failed.load(Ordering::Acquire) {
        return PageOutcome::Skipped;
    }

    match requester.fetch_page(&request, page).await {
        Ok(result) => PageOutcome::Fetched(result.items),
        Err(e) => {
            failed.store(true, Ordering::Release);
            PageOutcome::Failed(e)
        }
    }
}

/// Parse the page-count header; it must be a positive integer
pub fn parse_page_count(header: &str, value: Option<&str>) -> Result<u32> {
    value
        .map(str::trim)
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|&n| n >= 1)
        .ok_or_else(|| Error::pagination_header(header, value))
}

/// Concatenate page slots in order; every slot must be filled
fn merge_slots(slots: Vec<Option<Vec<JsonValue>>>) -> Result<Vec<JsonValue>> {
    let mut merged = Vec::new();
    for (index, slot) in slots.into_iter().enumerate() {
        let items = slot.ok_or_else(|| Error::Other(format!("page {} missing", index + 1)))?;
        merged.extend(items);
    }
    Ok(merged)
}
