//! Killmail reference parsing
//!
//! Users paste killmails as bare ids, zKillboard links or ESI links.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static ZKILLBOARD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://zkillboard\.com/kill/(\d+)/").unwrap());

static ESI_KILLMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://esi\.evetech\.net/\w+/killmails/(\d+)/([a-f0-9]+)").unwrap()
});

/// A killmail reference as typed by a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillmailRef {
    /// Bare numeric id; the hash must be looked up
    Id(i64),
    /// zKillboard link; the hash must be looked up
    Zkillboard(i64),
    /// ESI link carrying both id and hash
    Esi {
        /// Killmail id
        id: i64,
        /// Killmail hash
        hash: String,
    },
}

impl KillmailRef {
    /// Killmail id
    pub fn id(&self) -> i64 {
        match self {
            Self::Id(id) | Self::Zkillboard(id) => *id,
            Self::Esi { id, .. } => *id,
        }
    }
}

/// Extract the killmail id from a zKillboard kill URL
pub fn extract_kill_id(url: &str) -> Result<i64> {
    ZKILLBOARD_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| Error::invalid_input(format!("no killmail id in '{url}'")))
}

/// Extract killmail id and hash from an ESI killmail URL
pub fn extract_killmail_id_and_hash(url: &str) -> Result<(i64, String)> {
    let caps = ESI_KILLMAIL_REGEX
        .captures(url)
        .ok_or_else(|| Error::invalid_input(format!("no killmail id and hash in '{url}'")))?;

    let id = caps[1]
        .parse()
        .map_err(|_| Error::invalid_input(format!("killmail id out of range in '{url}'")))?;

    Ok((id, caps[2].to_string()))
}

/// Classify user input as a killmail reference
pub fn parse_killmail_input(input: &str) -> Result<KillmailRef> {
    let input = input.trim();

    if let Ok(id) = input.parse::<i64>() {
        if id != 0 {
            return Ok(KillmailRef::Id(id));
        }
    }

    if input.starts_with("https://zkillboard.com/kill/") {
        return match extract_kill_id(input) {
            Ok(id) if id != 0 => Ok(KillmailRef::Zkillboard(id)),
            _ => Err(Error::invalid_input("killmail does not exist")),
        };
    }

    if input.starts_with("https://esi.evetech.net") {
        let (id, hash) = extract_killmail_id_and_hash(input)?;
        return Ok(KillmailRef::Esi { id, hash });
    }

    Err(Error::invalid_input(format!(
        "unrecognized killmail reference '{input}'"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("123456" => KillmailRef::Id(123_456) ; "bare id")]
    #[test_case("  987  " => KillmailRef::Id(987) ; "padded id")]
    #[test_case("https://zkillboard.com/kill/128276154/" => KillmailRef::Zkillboard(128_276_154) ; "zkillboard link")]
    #[test_case(
        "https://esi.evetech.net/latest/killmails/128276154/0b3a6f1c2d/?datasource=tranquility"
        => KillmailRef::Esi { id: 128_276_154, hash: "0b3a6f1c2d".to_string() }
        ; "esi link"
    )]
    fn test_parse_killmail_input(input: &str) -> KillmailRef {
        parse_killmail_input(input).unwrap()
    }

    #[test_case("0" ; "zero id")]
    #[test_case("https://zkillboard.com/kill/abc/" ; "zkillboard without id")]
    #[test_case("https://zkillboard.com/kill/0/" ; "zkillboard zero id")]
    #[test_case("https://esi.evetech.net/latest/killmails/1/" ; "esi without hash")]
    #[test_case("https://example.com/kill/1/" ; "unknown host")]
    #[test_case("" ; "empty")]
    fn test_parse_killmail_input_rejects(input: &str) {
        assert!(matches!(
            parse_killmail_input(input),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_extract_kill_id() {
        assert_eq!(
            extract_kill_id("https://zkillboard.com/kill/42/").unwrap(),
            42
        );
        assert!(extract_kill_id("https://zkillboard.com/related/42/").is_err());
    }

    #[test]
    fn test_killmail_ref_id() {
        assert_eq!(KillmailRef::Id(5).id(), 5);
        assert_eq!(
            KillmailRef::Esi {
                id: 6,
                hash: "ab".to_string()
            }
            .id(),
            6
        );
    }
}
