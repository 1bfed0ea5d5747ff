// 🎮 GameState - the aggregation engine
//
// Owns the player registry and the item statistics for one run. The two
// `apply_*` methods are the only mutation entry points; everything else reads.

use super::item_stats::ItemStatistics;
use super::player::{Player, PlayerRegistry};
use crate::events::{InventoryEvent, LogEvent, MoneyEvent};

#[derive(Debug, Clone, Default)]
pub struct GameState {
    players: PlayerRegistry,
    item_stats: ItemStatistics,
}

impl GameState {
    pub fn new(players: PlayerRegistry) -> Self {
        GameState {
            players,
            item_stats: ItemStatistics::new(),
        }
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    pub fn apply_inventory_event(&mut self, event: &InventoryEvent) {
        let player = self.players.get_or_insert(event.player_id);
        let changes = player.apply_inventory(event.action, &event.items, event.timestamp);

        for change in changes {
            self.item_stats
                .register_appearance(change.item_type_id, event.timestamp);
            self.item_stats.record_mention(change.item_type_id);
            self.item_stats
                .record_delta(change.item_type_id, change.delta);
            self.item_stats
                .update_owner_count(change.item_type_id, change.previous, change.updated);
        }
    }

    pub fn apply_money_event(&mut self, event: &MoneyEvent) {
        self.players
            .get_or_insert(event.player_id)
            .apply_money(event.action, event.amount, event.timestamp);
    }

    /// Dispatch a merged event to the matching entry point
    pub fn apply(&mut self, event: &LogEvent) {
        match event {
            LogEvent::Inventory(e) => self.apply_inventory_event(e),
            LogEvent::Money(e) => self.apply_money_event(e),
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn item_stats(&self) -> &ItemStatistics {
        &self.item_stats
    }

    pub fn player(&self, player_id: i64) -> Option<&Player> {
        self.players.get(player_id)
    }

    /// Net quantity of an item in circulation
    pub fn item_total(&self, item_type_id: i64) -> i64 {
        self.item_stats.total(item_type_id)
    }

    pub fn owner_count(&self, item_type_id: i64) -> u64 {
        self.item_stats.owner_count(item_type_id)
    }

    /// Count held by one player (0 for unknown players/items)
    pub fn player_item_count(&self, player_id: i64, item_type_id: i64) -> i64 {
        self.players
            .get(player_id)
            .map(|p| p.item_count(item_type_id))
            .unwrap_or(0)
    }

    /// Players with at least one applied event, richest first, ties by id
    pub fn players_by_balance(&self, limit: usize) -> Vec<&Player> {
        let mut active: Vec<&Player> = self.players.iter().filter(|p| p.is_active()).collect();
        active.sort_by(|a, b| b.money.cmp(&a.money).then(a.player_id.cmp(&b.player_id)));
        active.truncate(limit);
        active
    }

    /// Players holding a positive count of the item, largest holding first
    pub fn top_holders(&self, item_type_id: i64, limit: usize) -> Vec<(&Player, i64)> {
        let mut holders: Vec<(&Player, i64)> = self
            .players
            .iter()
            .map(|p| (p, p.item_count(item_type_id)))
            .filter(|(_, count)| *count > 0)
            .collect();
        holders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.player_id.cmp(&b.0.player_id)));
        holders.truncate(limit);
        holders
    }

    pub fn first_items(&self, limit: usize) -> &[(i64, i64)] {
        self.item_stats.first_items(limit)
    }

    pub fn last_items(&self, limit: usize) -> &[(i64, i64)] {
        self.item_stats.last_items(limit)
    }

    pub fn top_items_by_mentions(&self, limit: usize) -> Vec<(i64, u64)> {
        self.item_stats.top_mentioned(limit)
    }
}
