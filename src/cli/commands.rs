//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ESI paginated fetch CLI
#[derive(Parser, Debug)]
#[command(name = "corp-esi")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pub pretty: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and merge every page of a resource
    Pages {
        /// Resource path (e.g. /markets/10000002/orders/)
        path: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,

        /// Bearer token for authenticated resources
        #[arg(long)]
        token: Option<String>,

        /// Override the concurrency budget
        #[arg(long)]
        concurrency: Option<usize>,

        /// Skip pages not yet started once one page fails
        #[arg(long)]
        fail_fast: bool,
    },

    /// Show ESI server status
    Status,

    /// Resolve a killmail id or link and report the loss
    Killmail {
        /// Killmail id, zKillboard link or ESI link
        input: String,

        /// Print the ESI killmail as-is instead of the loss report
        #[arg(long)]
        raw: bool,
    },

    /// Resolve ids to names
    Names {
        /// Ids to resolve
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Appraise an item list with Janice
    Appraise {
        /// Item list as pasted from the game client
        items: String,
    },
}

/// Parse a `key=value` query argument
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("datasource=tranquility").unwrap(),
            ("datasource".to_string(), "tranquility".to_string())
        );
        assert_eq!(
            parse_key_value("filter=a=b").unwrap(),
            ("filter".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_parse_pages_command() {
        let cli = Cli::try_parse_from([
            "corp-esi",
            "--pretty",
            "pages",
            "/markets/10000002/orders/",
            "-q",
            "order_type=all",
            "--query",
            "type_id=34",
            "--concurrency",
            "10",
        ])
        .unwrap();

        assert!(cli.pretty);
        match cli.command {
            Commands::Pages {
                path,
                query,
                concurrency,
                fail_fast,
                ..
            } => {
                assert_eq!(path, "/markets/10000002/orders/");
                assert_eq!(query.len(), 2);
                assert_eq!(concurrency, Some(10));
                assert!(!fail_fast);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_killmail_command() {
        let cli = Cli::try_parse_from(["corp-esi", "killmail", "128276154", "--raw"]).unwrap();

        match cli.command {
            Commands::Killmail { input, raw } => {
                assert_eq!(input, "128276154");
                assert!(raw);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_names_requires_ids() {
        assert!(Cli::try_parse_from(["corp-esi", "names"]).is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
