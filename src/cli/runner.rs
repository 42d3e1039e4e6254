//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::Result;
use crate::esi::{EsiClient, JaniceClient};
use crate::types::FetchRequest;
use serde::Serialize;
use serde_json::json;
use std::time::Instant;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Pages {
                path,
                query,
                token,
                concurrency,
                fail_fast,
            } => {
                let mut config = config;
                if let Some(concurrency) = concurrency {
                    config.pagination.concurrency = *concurrency;
                }
                if *fail_fast {
                    config.pagination.fail_fast = true;
                }
                config.validate()?;

                let mut request = FetchRequest::new(path.as_str()).query_pairs(query.clone());
                if let Some(token) = token {
                    request = request.bearer(token.as_str());
                }
                self.pages(&config, request).await
            }
            Commands::Status => {
                let esi = EsiClient::from_config(&config)?;
                self.emit(&esi.server_status().await?)
            }
            Commands::Killmail { input, raw } => {
                let esi = EsiClient::from_config(&config)?;
                let (id, hash) = esi.resolve_killmail(input).await?;
                if *raw {
                    self.emit(&esi.killmail(id, &hash).await?)
                } else {
                    let janice = JaniceClient::from_config(&config)?;
                    self.emit(&esi.killmail_details(id, &hash, &janice).await?)
                }
            }
            Commands::Names { ids } => {
                let esi = EsiClient::from_config(&config)?;
                self.emit(&esi.ids_to_names(ids).await?)
            }
            Commands::Appraise { items } => {
                let janice = JaniceClient::from_config(&config)?;
                let value = janice.appraisal(items).await?;
                self.emit(&json!({ "sell_min": value }))
            }
        }
    }

    /// Load the config file, or defaults when none was given
    fn load_config(&self) -> Result<AppConfig> {
        match &self.cli.config {
            Some(path) => AppConfig::load(path),
            None => Ok(AppConfig::default()),
        }
    }

    async fn pages(&self, config: &AppConfig, request: FetchRequest) -> Result<()> {
        let esi = EsiClient::from_config(config)?;
        let start = Instant::now();
        let items = esi.all_pages(request).await?;
        info!(
            items = items.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetch complete"
        );
        self.emit(&items)
    }

    /// Write a value to stdout as JSON
    fn emit<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let out = if self.cli.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{out}");
        Ok(())
    }
}
