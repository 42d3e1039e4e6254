//! ESI client
//!
//! Typed helpers over the HTTP client and the paginated fetcher.

use super::details::{EsiKillmail, KillmailDetails};
use super::janice::JaniceClient;
use super::killmail::{parse_killmail_input, KillmailRef};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{FetchConfig, PageFetcher};
use crate::types::{FetchOutcome, FetchRequest, JsonValue};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One entry of a `/universe/names/` response
#[derive(Debug, Clone, Deserialize)]
struct NameEntry {
    id: i64,
    name: String,
}

/// One entry of a zKillboard `killID` lookup
#[derive(Debug, Clone, Deserialize)]
struct ZkillboardEntry {
    zkb: ZkillboardMeta,
}

#[derive(Debug, Clone, Deserialize)]
struct ZkillboardMeta {
    hash: String,
}

/// Client for the EVE Swagger Interface
#[derive(Debug)]
pub struct EsiClient {
    http: Arc<HttpClient>,
    pages: PageFetcher<HttpClient>,
    datasource: String,
    zkillboard_url: String,
}

impl EsiClient {
    /// Create a client from an HTTP client and fetch settings
    pub fn new(http: HttpClient, fetch: FetchConfig) -> Self {
        let http = Arc::new(http);
        Self {
            pages: PageFetcher::with_config(Arc::clone(&http), fetch),
            http,
            datasource: "tranquility".to_string(),
            zkillboard_url: crate::config::DEFAULT_ZKILLBOARD_URL.to_string(),
        }
    }

    /// Build the client described by the application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = config.esi_http_client()?;
        Ok(Self::new(http, config.fetch_config())
            .with_datasource(&config.esi.datasource)
            .with_zkillboard_url(&config.esi.zkillboard_url))
    }

    /// Set the `datasource` sent with public calls
    #[must_use]
    pub fn with_datasource(mut self, datasource: impl Into<String>) -> Self {
        self.datasource = datasource.into();
        self
    }

    /// Set the zKillboard API root
    #[must_use]
    pub fn with_zkillboard_url(mut self, url: impl Into<String>) -> Self {
        self.zkillboard_url = url.into();
        self
    }

    /// The underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// The paginated fetcher
    pub fn pages(&self) -> &PageFetcher<HttpClient> {
        &self.pages
    }

    fn datasource_query(&self) -> Vec<(String, String)> {
        vec![("datasource".to_string(), self.datasource.clone())]
    }

    /// Fetch and merge every page of a resource
    pub async fn all_pages(&self, request: FetchRequest) -> FetchOutcome {
        self.pages.fetch_all(request).await
    }

    /// Fetch every page and decode the merged items into `T`
    pub async fn all_pages_as<T: DeserializeOwned>(&self, request: FetchRequest) -> Result<Vec<T>> {
        let items = self.all_pages(request).await?;
        serde_json::from_value(JsonValue::Array(items)).map_err(|e| Error::decode(e.to_string()))
    }

    /// Server status (`/status/`)
    pub async fn server_status(&self) -> Result<JsonValue> {
        self.http.get_json("/status/", &self.datasource_query()).await
    }

    /// Killmail details
    #[instrument(skip(self, hash))]
    pub async fn killmail(&self, id: i64, hash: &str) -> Result<JsonValue> {
        let path = format!("/killmails/{id}/{hash}/");
        self.http.get_json(&path, &self.datasource_query()).await
    }

    /// Resolve ids to names; zero ids are dropped
    pub async fn ids_to_names(&self, ids: &[i64]) -> Result<HashMap<String, String>> {
        let ids: Vec<i64> = ids.iter().copied().filter(|&id| id != 0).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        debug!(count = ids.len(), "resolving names");
        let entries: Vec<NameEntry> = self.http.post_json("/universe/names/", &ids).await?;

        Ok(entries
            .into_iter()
            .map(|entry| (entry.id.to_string(), entry.name))
            .collect())
    }

    /// Look up a killmail hash on zKillboard
    pub async fn zkillboard_hash(&self, id: i64) -> Result<String> {
        let url = format!("{}/killID/{id}/", self.zkillboard_url.trim_end_matches('/'));
        let entries: Vec<ZkillboardEntry> = self.http.get_json(&url, &[]).await?;

        entries
            .into_iter()
            .next()
            .map(|entry| entry.zkb.hash)
            .ok_or_else(|| Error::decode(format!("no killmail hash for {id}")))
    }

    /// Resolve user input to a killmail id and hash.
    ///
    /// ESI links carry the hash; bare ids and zKillboard links look it up
    /// on zKillboard.
    pub async fn resolve_killmail(&self, input: &str) -> Result<(i64, String)> {
        match parse_killmail_input(input)? {
            KillmailRef::Id(id) | KillmailRef::Zkillboard(id) => {
                Ok((id, self.zkillboard_hash(id).await?))
            }
            KillmailRef::Esi { id, hash } => Ok((id, hash)),
        }
    }

    /// Killmail with victim names, items summed per slot and a Janice value
    #[instrument(skip(self, hash, janice))]
    pub async fn killmail_details(
        &self,
        id: i64,
        hash: &str,
        janice: &JaniceClient,
    ) -> Result<KillmailDetails> {
        let path = format!("/killmails/{id}/{hash}/");
        let killmail: EsiKillmail = self.http.get_json(&path, &self.datasource_query()).await?;

        let names = self.ids_to_names(&killmail.name_ids()).await?;
        let mut details = KillmailDetails::assemble(id, hash, killmail, &names);
        details.janice_amount = janice.appraisal(&details.appraisal_text()).await?;

        debug!(
            items = details.items.len(),
            value = details.janice_amount,
            "killmail details assembled"
        );
        Ok(details)
    }
}
