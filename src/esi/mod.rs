//! ESI module
//!
//! Game-data lookups built on the HTTP client and the paginated fetcher:
//! server status, killmails and loss reports, id-to-name resolution and
//! Janice appraisals.

mod client;
mod details;
mod janice;
mod killmail;

pub use client::EsiClient;
pub use details::{
    aggregate_items, group_by_slot, EsiItem, EsiKillmail, EsiVictim, KillmailDetails,
    KillmailItem, SlotGroup, SlotType, UNKNOWN_NAME,
};
pub use janice::JaniceClient;
pub use killmail::{
    extract_kill_id, extract_killmail_id_and_hash, parse_killmail_input, KillmailRef,
};

#[cfg(test)]
mod tests;
