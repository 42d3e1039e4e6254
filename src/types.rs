//! Common types used throughout corp-esi
//!
//! This module contains the request and page value types shared by the
//! HTTP requester and the pagination orchestrator.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases and Constants
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Merged result of a paginated fetch
pub type FetchOutcome = Result<Vec<JsonValue>>;

/// Query parameter carrying the 1-based page number
pub const PAGE_PARAM: &str = "page";

/// Response header carrying the total number of pages
pub const DEFAULT_PAGE_COUNT_HEADER: &str = "X-Pages";

/// Default ceiling on simultaneous in-flight page requests
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Default upper bound on the page count a server may announce
pub const DEFAULT_MAX_PAGES: u32 = 10_000;

// ============================================================================
// Fetch Request
// ============================================================================

/// A request for every page of a remote resource.
///
/// Query parameters keep insertion order and may repeat a key. The
/// credential is optional; an empty token means unauthenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    path: String,
    #[serde(default)]
    query: Vec<(String, String)>,
    #[serde(default, skip_serializing)]
    credential: Option<String>,
}

impl FetchRequest {
    /// Create a request for the given resource path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append several query parameters
    #[must_use]
    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Attach a bearer credential (empty token leaves the request unauthenticated)
    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.credential = if token.is_empty() { None } else { Some(token) };
        self
    }

    /// Resource path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Caller-supplied query parameters, in order
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// Bearer credential, if any
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Query parameters for a given page: caller pairs minus any `page`
    /// entries, followed by the page override.
    pub fn page_query(&self, page: u32) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .query
            .iter()
            .filter(|(k, _)| k != PAGE_PARAM)
            .cloned()
            .collect();
        params.push((PAGE_PARAM.to_string(), page.to_string()));
        params
    }
}

// ============================================================================
// Page Result
// ============================================================================

/// One decoded page of a paginated resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    /// Page number this payload belongs to (1-based)
    pub page: u32,
    /// Decoded items, in response order
    pub items: Vec<JsonValue>,
    /// Raw page-count header value, only meaningful on page 1
    pub page_count: Option<String>,
}

impl PageResult {
    /// Create a page result
    pub fn new(page: u32, items: Vec<JsonValue>) -> Self {
        Self {
            page,
            items,
            page_count: None,
        }
    }

    /// Set the raw page-count header value
    #[must_use]
    pub fn with_page_count(mut self, value: impl Into<String>) -> Self {
        self.page_count = Some(value.into());
        self
    }
}

/// One page as received, before its body is decoded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPage {
    /// Page number this body belongs to (1-based)
    pub page: u32,
    /// Undecoded response body
    pub body: Vec<u8>,
    /// Raw page-count header value, only meaningful on page 1
    pub page_count: Option<String>,
}

impl RawPage {
    /// Create a raw page
    pub fn new(page: u32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            page,
            body: body.into(),
            page_count: None,
        }
    }

    /// Set the raw page-count header value
    #[must_use]
    pub fn with_page_count(mut self, value: impl Into<String>) -> Self {
        self.page_count = Some(value.into());
        self
    }

    /// Decode the body as a JSON array
    pub fn decode(self) -> Result<PageResult> {
        let items: Vec<JsonValue> =
            serde_json::from_slice(&self.body).map_err(|e| Error::decode(e.to_string()))?;
        Ok(PageResult {
            page: self.page,
            items,
            page_count: self.page_count,
        })
    }
}
