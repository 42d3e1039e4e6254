//! Janice appraisal client

use crate::config::AppConfig;
use crate::error::Result;
use crate::http::HttpClient;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct AppraisalResponse {
    appraisal: Appraisal,
}

#[derive(Debug, Deserialize)]
struct Appraisal {
    prices: Prices,
}

#[derive(Debug, Deserialize)]
struct Prices {
    sell: PriceRange,
}

#[derive(Debug, Deserialize)]
struct PriceRange {
    min: f64,
}

/// Client for the Janice appraisal API
#[derive(Debug)]
pub struct JaniceClient {
    http: HttpClient,
}

impl JaniceClient {
    /// Create a client over a configured HTTP client
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Build the client described by the application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(config.janice_http_client()?))
    }

    /// Jita immediate sell-min value of a pasted item list.
    ///
    /// Empty input is worth nothing and makes no request.
    pub async fn appraisal(&self, items: &str) -> Result<f64> {
        if items.is_empty() {
            return Ok(0.0);
        }

        let body = json!({
            "market_name": "jita",
            "pricelist_name": "default",
            "pricedata": {
                "pricing_type": "immediate",
                "pricing_modifier": 0,
                "evepraisal_url": "",
                "raw_textarea": items,
                "live_update": false,
            },
        });

        let response: AppraisalResponse = self.http.post_json("/appraisal", &body).await?;
        Ok(response.appraisal.prices.sell.min)
    }
}
