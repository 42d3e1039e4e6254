//! Single-page requester
//!
//! One GET per call, no retry and no concurrency. The pagination
//! orchestrator drives this through the [`PageRequester`] trait so tests can
//! substitute instrumented fakes.

use super::client::{check_status, HttpClient};
use crate::error::Result;
use crate::types::{FetchRequest, PageResult, RawPage};
use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

/// Fetches one page of a paginated resource
#[async_trait]
pub trait PageRequester: Send + Sync {
    /// Fetch `page` (1-based) of `request` without decoding the body.
    ///
    /// Fails with `Error::Transport` or `Error::Remote`.
    async fn fetch_raw(&self, request: &FetchRequest, page: u32) -> Result<RawPage>;

    /// Fetch `page` (1-based) of `request` and decode it as a JSON array.
    ///
    /// Fails with `Error::Transport`, `Error::Remote` or `Error::Decode`;
    /// every failure is terminal for that page.
    async fn fetch_page(&self, request: &FetchRequest, page: u32) -> Result<PageResult> {
        self.fetch_raw(request, page).await?.decode()
    }
}

#[async_trait]
impl PageRequester for HttpClient {
    async fn fetch_raw(&self, request: &FetchRequest, page: u32) -> Result<RawPage> {
        let mut req = self
            .request(Method::GET, request.path())
            .query(&request.page_query(page));

        if let Some(token) = request.credential() {
            req = req.bearer_auth(token);
        }

        debug!(path = request.path(), page, "requesting page");
        let response = check_status(req.send().await?).await?;

        let page_count = response
            .headers()
            .get(self.config().page_count_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await?.to_vec();

        Ok(RawPage {
            page,
            body,
            page_count,
        })
    }
}
