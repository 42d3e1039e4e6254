//! Killmail details
//!
//! Turns a raw ESI killmail into a loss report: victim items summed per
//! (item, dropped, slot), names resolved, grouped by fitting slot.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;

/// Name used when `/universe/names/` has no entry for an id
pub const UNKNOWN_NAME: &str = "Unknown";

// ============================================================================
// Slots
// ============================================================================

/// Fitting slot an item was in when the ship died
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    High,
    Medium,
    Low,
    Rig,
    Drone,
    Cargo,
    Subsystem,
}

impl SlotType {
    /// Map an ESI inventory flag to its slot.
    ///
    /// Cargo holds (5, 89, 133..=138) and any unlisted flag count as cargo.
    pub fn from_flag(flag: i64) -> Self {
        match flag {
            27..=34 => Self::High,
            19..=26 => Self::Medium,
            11..=18 => Self::Low,
            92..=94 => Self::Rig,
            87 => Self::Drone,
            125..=128 => Self::Subsystem,
            _ => Self::Cargo,
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High Slots",
            Self::Medium => "Medium Slots",
            Self::Low => "Low Slots",
            Self::Rig => "Rigs",
            Self::Drone => "Drone Bay",
            Self::Cargo => "Cargo",
            Self::Subsystem => "Subsystems",
        }
    }
}

// ============================================================================
// ESI payload
// ============================================================================

/// `/killmails/{id}/{hash}/` response, reduced to the fields used here
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EsiKillmail {
    pub killmail_time: String,
    pub solar_system_id: i64,
    pub victim: EsiVictim,
}

/// Victim block of a killmail; NPC and structure losses omit some ids
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EsiVictim {
    #[serde(default)]
    pub alliance_id: i64,
    #[serde(default)]
    pub corporation_id: i64,
    #[serde(default)]
    pub character_id: i64,
    #[serde(default)]
    pub ship_type_id: i64,
    #[serde(default)]
    pub items: Vec<EsiItem>,
}

/// One victim item stack
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EsiItem {
    pub item_type_id: i64,
    pub flag: i64,
    pub quantity_dropped: Option<i64>,
    pub quantity_destroyed: Option<i64>,
}

impl EsiKillmail {
    /// Every id that needs a name, deduplicated and without zeros
    pub fn name_ids(&self) -> Vec<i64> {
        let victim = &self.victim;
        let ids: BTreeSet<i64> = [
            victim.character_id,
            victim.corporation_id,
            victim.alliance_id,
            victim.ship_type_id,
            self.solar_system_id,
        ]
        .into_iter()
        .chain(victim.items.iter().map(|item| item.item_type_id))
        .filter(|&id| id != 0)
        .collect();
        ids.into_iter().collect()
    }
}

// ============================================================================
// Details
// ============================================================================

/// Summed quantity of one item in one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KillmailItem {
    pub item_id: i64,
    pub item_name: String,
    pub quantity: i64,
    /// Stack was dropped rather than destroyed
    pub dropped: bool,
    pub slot: SlotType,
}

/// Items that were fitted in, or carried in, one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotGroup {
    pub slot: SlotType,
    pub label: String,
    pub items: Vec<KillmailItem>,
}

/// A killmail with names, aggregated items and a valuation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KillmailDetails {
    pub killmail_id: i64,
    pub killmail_hash: String,
    pub time: String,
    pub solar_system_id: i64,
    pub solar_system_name: String,
    pub alliance_id: i64,
    pub alliance_name: String,
    pub corporation_id: i64,
    pub corporation_name: String,
    pub character_id: i64,
    pub character_name: String,
    pub ship_type_id: i64,
    pub ship_type_name: String,
    pub items: Vec<KillmailItem>,
    pub slots: Vec<SlotGroup>,
    /// Janice sell value of the fit and hull
    pub janice_amount: f64,
}

impl KillmailDetails {
    /// Build details from a raw killmail and an id-to-name map.
    ///
    /// `janice_amount` starts at zero; the caller fills it in.
    pub fn assemble(
        id: i64,
        hash: impl Into<String>,
        killmail: EsiKillmail,
        names: &HashMap<String, String>,
    ) -> Self {
        let victim = killmail.victim;
        let items = aggregate_items(&victim.items, names);
        let slots = group_by_slot(&items);

        Self {
            killmail_id: id,
            killmail_hash: hash.into(),
            time: killmail.killmail_time,
            solar_system_id: killmail.solar_system_id,
            solar_system_name: name_of(names, killmail.solar_system_id),
            alliance_id: victim.alliance_id,
            alliance_name: name_of(names, victim.alliance_id),
            corporation_id: victim.corporation_id,
            corporation_name: name_of(names, victim.corporation_id),
            character_id: victim.character_id,
            character_name: name_of(names, victim.character_id),
            ship_type_id: victim.ship_type_id,
            ship_type_name: name_of(names, victim.ship_type_id),
            items,
            slots,
            janice_amount: 0.0,
        }
    }

    /// Item list in the pasted inventory format Janice accepts, hull last
    pub fn appraisal_text(&self) -> String {
        let mut text = String::new();
        for item in &self.items {
            let _ = writeln!(text, "{}\t{}", item.item_name, item.quantity);
        }
        text.push_str(&self.ship_type_name);
        text
    }
}

fn name_of(names: &HashMap<String, String>, id: i64) -> String {
    names
        .get(&id.to_string())
        .cloned()
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// Sum dropped plus destroyed quantities per (item, dropped, slot).
///
/// A stack counts as dropped when ESI reports `quantity_dropped` at all.
/// Output is ordered by slot, then item id, destroyed before dropped.
pub fn aggregate_items(items: &[EsiItem], names: &HashMap<String, String>) -> Vec<KillmailItem> {
    let mut totals: BTreeMap<(SlotType, i64, bool), i64> = BTreeMap::new();

    for item in items {
        let dropped = item.quantity_dropped.is_some();
        let slot = SlotType::from_flag(item.flag);
        let quantity =
            item.quantity_dropped.unwrap_or(0) + item.quantity_destroyed.unwrap_or(0);
        *totals.entry((slot, item.item_type_id, dropped)).or_insert(0) += quantity;
    }

    totals
        .into_iter()
        .map(|((slot, item_id, dropped), quantity)| KillmailItem {
            item_id,
            item_name: name_of(names, item_id),
            quantity,
            dropped,
            slot,
        })
        .collect()
}

/// Group items by slot in slot order, leaving out empty slots
pub fn group_by_slot(items: &[KillmailItem]) -> Vec<SlotGroup> {
    let mut groups: BTreeMap<SlotType, Vec<KillmailItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.slot).or_default().push(item.clone());
    }

    groups
        .into_iter()
        .map(|(slot, items)| SlotGroup {
            slot,
            label: slot.label().to_string(),
            items,
        })
        .collect()
}
