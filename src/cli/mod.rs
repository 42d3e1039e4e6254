//! CLI module
//!
//! Command-line interface over the ESI client.
//!
//! # Commands
//!
//! - `pages` - Fetch and merge every page of a resource
//! - `status` - Show ESI server status
//! - `killmail` - Resolve a killmail and report the loss
//! - `names` - Resolve ids to names
//! - `appraise` - Appraise an item list with Janice

mod commands;
mod runner;

pub use commands::{parse_key_value, Cli, Commands};
pub use runner::Runner;
