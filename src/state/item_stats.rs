// 📊 Item statistics - global, cross-player counters
//
// Everything here is derived from InventoryChange records; nothing is set
// directly by callers outside the aggregation engine.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ItemStatistics {
    /// Net quantity added minus removed, across all players (may be negative)
    totals: HashMap<i64, i64>,

    /// Players currently holding > 0 units
    owner_counts: HashMap<i64, u64>,

    /// Inventory events that referenced the item
    mentions: HashMap<i64, u64>,

    first_seen_ts: HashMap<i64, i64>,

    /// (timestamp, item_type_id) in processing order, one entry per item
    first_seen: Vec<(i64, i64)>,
}

impl ItemStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // UPDATES
    // ========================================================================

    /// Record the first observation of an item; later calls are no-ops
    pub fn register_appearance(&mut self, item_type_id: i64, timestamp: i64) {
        if self.first_seen_ts.contains_key(&item_type_id) {
            return;
        }
        self.first_seen_ts.insert(item_type_id, timestamp);
        self.first_seen.push((timestamp, item_type_id));
    }

    pub fn record_mention(&mut self, item_type_id: i64) {
        *self.mentions.entry(item_type_id).or_insert(0) += 1;
    }

    pub fn record_delta(&mut self, item_type_id: i64, delta: i64) {
        let total = self.totals.entry(item_type_id).or_insert(0);
        *total = total.saturating_add(delta);
    }

    /// Track owner transitions driven by the sign of one player's running count
    ///
    /// ≤0 → >0 gains an owner, >0 → ≤0 loses one. The count is floored at 0.
    pub fn update_owner_count(&mut self, item_type_id: i64, previous: i64, updated: i64) {
        if previous <= 0 && updated > 0 {
            *self.owner_counts.entry(item_type_id).or_insert(0) += 1;
        } else if previous > 0 && updated <= 0 {
            let owners = self.owner_counts.entry(item_type_id).or_insert(0);
            *owners = owners.saturating_sub(1);
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn total(&self, item_type_id: i64) -> i64 {
        self.totals.get(&item_type_id).copied().unwrap_or(0)
    }

    pub fn owner_count(&self, item_type_id: i64) -> u64 {
        self.owner_counts.get(&item_type_id).copied().unwrap_or(0)
    }

    pub fn mention_count(&self, item_type_id: i64) -> u64 {
        self.mentions.get(&item_type_id).copied().unwrap_or(0)
    }

    pub fn first_seen_at(&self, item_type_id: i64) -> Option<i64> {
        self.first_seen_ts.get(&item_type_id).copied()
    }

    /// Full appearance sequence, in processing order
    pub fn first_seen(&self) -> &[(i64, i64)] {
        &self.first_seen
    }

    /// First `limit` items by appearance
    pub fn first_items(&self, limit: usize) -> &[(i64, i64)] {
        &self.first_seen[..limit.min(self.first_seen.len())]
    }

    /// Last `limit` items by appearance, still in appearance order
    pub fn last_items(&self, limit: usize) -> &[(i64, i64)] {
        let start = self.first_seen.len().saturating_sub(limit);
        &self.first_seen[start..]
    }

    /// (item_type_id, mentions), most mentioned first, ties by ascending id
    pub fn top_mentioned(&self, limit: usize) -> Vec<(i64, u64)> {
        let mut ranked: Vec<(i64, u64)> = self.mentions.iter().map(|(&id, &n)| (id, n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Number of distinct item types seen so far
    pub fn distinct_items(&self) -> usize {
        self.first_seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_appearance_once() {
        let mut stats = ItemStatistics::new();
        stats.register_appearance(5, 1000);
        stats.register_appearance(3, 900);
        stats.register_appearance(5, 10);

        assert_eq!(stats.first_seen(), &[(1000, 5), (900, 3)]);
        assert_eq!(stats.first_seen_at(5), Some(1000));
        assert_eq!(stats.distinct_items(), 2);
    }

    #[test]
    fn test_totals_saturate() {
        let mut stats = ItemStatistics::new();
        stats.record_delta(5, i64::MAX);
        stats.record_delta(5, i64::MAX);
        assert_eq!(stats.total(5), i64::MAX);

        stats.record_delta(6, i64::MIN);
        stats.record_delta(6, -1);
        assert_eq!(stats.total(6), i64::MIN);
    }

    #[test]
    fn test_owner_transitions() {
        let mut stats = ItemStatistics::new();

        stats.update_owner_count(5, 0, 3); // gain
        stats.update_owner_count(5, -1, 2); // gain (another player)
        stats.update_owner_count(5, 3, 4); // still owner
        assert_eq!(stats.owner_count(5), 2);

        stats.update_owner_count(5, 4, 0); // loss
        assert_eq!(stats.owner_count(5), 1);
    }

    #[test]
    fn test_owner_count_never_negative() {
        let mut stats = ItemStatistics::new();
        stats.update_owner_count(8, 5, 0);
        stats.update_owner_count(8, 2, -1);
        stats.update_owner_count(8, 0, -4);
        assert_eq!(stats.owner_count(8), 0);
    }

    #[test]
    fn test_totals_and_mentions() {
        let mut stats = ItemStatistics::new();
        stats.record_delta(1, 10);
        stats.record_delta(1, -15);
        stats.record_mention(1);
        stats.record_mention(1);

        assert_eq!(stats.total(1), -5);
        assert_eq!(stats.mention_count(1), 2);
        assert_eq!(stats.total(99), 0);
    }

    #[test]
    fn test_first_and_last_items() {
        let mut stats = ItemStatistics::new();
        for id in 0..15 {
            stats.register_appearance(id, id * 10);
        }

        let first = stats.first_items(10);
        assert_eq!(first.len(), 10);
        assert_eq!(first[0], (0, 0));

        let last = stats.last_items(10);
        assert_eq!(last.len(), 10);
        assert_eq!(last[0], (50, 5));
        assert_eq!(last[9], (140, 14));

        assert_eq!(stats.first_items(100).len(), 15);
        assert!(ItemStatistics::new().last_items(10).is_empty());
    }

    #[test]
    fn test_top_mentioned_ties_by_id() {
        let mut stats = ItemStatistics::new();
        for id in [4, 2, 2, 9, 9, 7] {
            stats.record_mention(id);
        }

        assert_eq!(stats.top_mentioned(3), vec![(2, 2), (9, 2), (4, 1)]);
    }
}
