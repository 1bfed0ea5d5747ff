// 👤 Player ledger + registry
//
// One Player per player_id for the whole run. Balances and item counts are
// signed and unclamped: logs may start mid-history or disagree with each other.
// Arithmetic saturates at the i64 bounds instead of wrapping.

use crate::error::PipelineError;
use crate::events::{InventoryAction, ItemAmount, MoneyAction};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

pub const UNKNOWN_PLAYER_NAME: &str = "unknown";

// ============================================================================
// PLAYER
// ============================================================================

/// Per-item result of one inventory mutation, for statistics propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryChange {
    pub item_type_id: i64,
    pub delta: i64,
    pub previous: i64,
    pub updated: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub player_id: i64,
    pub name: String,
    pub level: Option<i64>,
    pub money: i64,
    pub inventory: HashMap<i64, i64>,
    pub first_event_ts: Option<i64>,
    pub last_event_ts: Option<i64>,
}

impl Player {
    /// Create a player with no activity yet
    ///
    /// A blank or missing name falls back to "unknown".
    pub fn new(player_id: i64, name: Option<String>, level: Option<i64>) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_PLAYER_NAME.to_string());

        Player {
            player_id,
            name,
            level,
            money: 0,
            inventory: HashMap::new(),
            first_event_ts: None,
            last_event_ts: None,
        }
    }

    /// First write wins for `first_event_ts`; every write moves `last_event_ts`
    fn touch(&mut self, timestamp: i64) {
        if self.first_event_ts.is_none() {
            self.first_event_ts = Some(timestamp);
        }
        self.last_event_ts = Some(timestamp);
    }

    /// Has any event been applied to this player?
    pub fn is_active(&self) -> bool {
        self.first_event_ts.is_some()
    }

    pub fn apply_money(&mut self, action: MoneyAction, amount: i64, timestamp: i64) {
        self.touch(timestamp);
        self.money = self.money.saturating_add(action.signed(amount));
    }

    /// Apply an inventory mutation and report what changed, per item
    ///
    /// When an item occurs several times in one event the occurrences are
    /// folded into one change (summed delta, count before and after the event),
    /// listed in order of first occurrence.
    pub fn apply_inventory(
        &mut self,
        action: InventoryAction,
        items: &[ItemAmount],
        timestamp: i64,
    ) -> Vec<InventoryChange> {
        self.touch(timestamp);

        let mut changes: Vec<InventoryChange> = Vec::with_capacity(items.len());
        for item in items {
            let delta = action.signed(item.amount);
            let count = self.inventory.entry(item.item_type_id).or_insert(0);
            let previous = *count;
            *count = count.saturating_add(delta);
            let updated = *count;

            match changes.iter_mut().find(|c| c.item_type_id == item.item_type_id) {
                Some(change) => {
                    change.delta = change.delta.saturating_add(delta);
                    change.updated = updated;
                }
                None => changes.push(InventoryChange {
                    item_type_id: item.item_type_id,
                    delta,
                    previous,
                    updated,
                }),
            }
        }
        changes
    }

    pub fn item_count(&self, item_type_id: i64) -> i64 {
        self.inventory.get(&item_type_id).copied().unwrap_or(0)
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlayerDb {
    #[serde(default)]
    players: Vec<PlayerRecord>,
}

#[derive(Debug, Deserialize)]
struct PlayerRecord {
    id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    level: Option<i64>,
}

/// PlayerRegistry - player_id → Player, seeded from reference data
///
/// `get_or_insert` is the only way a Player comes into existence after
/// seeding; players are never removed.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: BTreeMap<i64, Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `{"players": [{"id", "name", "level"}, ...]}`
    pub fn from_db_file(path: &Path) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|e| PipelineError::unavailable(path, e))?;
        let db: PlayerDb = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| PipelineError::reference(path, e.to_string()))?;

        let registry = Self::from_players(
            db.players
                .into_iter()
                .map(|r| Player::new(r.id, r.name, r.level)),
        );
        info!(path = %path.display(), players = registry.len(), "player reference loaded");
        Ok(registry)
    }

    /// Seed from already-built players; a later duplicate id replaces an earlier one
    pub fn from_players(players: impl IntoIterator<Item = Player>) -> Self {
        PlayerRegistry {
            players: players.into_iter().map(|p| (p.player_id, p)).collect(),
        }
    }

    /// Fetch the player, creating a default one on first reference
    pub fn get_or_insert(&mut self, player_id: i64) -> &mut Player {
        self.players
            .entry(player_id)
            .or_insert_with(|| Player::new(player_id, None, None))
    }

    pub fn get(&self, player_id: i64) -> Option<&Player> {
        self.players.get(&player_id)
    }

    /// All players, ordered by player_id
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
