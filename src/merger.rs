// 🔀 Event Merger - streaming ordered merge of the two logs
//
// Ordering key (total order):
//   1. timestamp ascending
//   2. source priority (inventory before money)
//   3. arrival order within the source
//
// The heap never holds more than one pending event per source, so memory is
// bounded by the number of sources, not by the size of the logs.

use crate::error::PipelineError;
use crate::events::{InventoryEvent, LogEvent, MoneyEvent, SourceKind};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

// ============================================================================
// ORDERING KEY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeKey {
    pub timestamp: i64,
    pub priority: u8,
    pub sequence: u64,
}

impl PartialOrd for MergeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MergeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.priority.cmp(&other.priority))
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Heap entry; ordering is reversed so `BinaryHeap` pops the smallest key.
#[derive(Debug)]
struct MergeEntry {
    key: MergeKey,
    event: LogEvent,
}

impl PartialEq for MergeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for MergeEntry {}

impl PartialOrd for MergeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MergeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key.cmp(&self.key)
    }
}

// ============================================================================
// STATISTICS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub inventory_events: u64,
    pub money_events: u64,
    /// Emitted events whose timestamp equalled the other source's pending head
    pub timestamp_ties: u64,
    /// Largest number of pending events observed in the heap
    pub max_pending: usize,
}

impl MergeStats {
    pub fn total(&self) -> u64 {
        self.inventory_events + self.money_events
    }
}

// ============================================================================
// MERGER
// ============================================================================

/// EventMerger - pull-based two-way merge
///
/// Each call to `next()` first refills the slot of the source emitted last
/// time, then pops the minimum. Nothing is read ahead of what the comparison
/// of the two current heads needs.
pub struct EventMerger<I, M> {
    inventory: I,
    money: M,
    heap: BinaryHeap<MergeEntry>,
    inventory_seq: u64,
    money_seq: u64,
    refill: Option<SourceKind>,
    seeded: bool,
    failed: bool,
    stats: MergeStats,
}

impl<I, M> EventMerger<I, M>
where
    I: Iterator<Item = Result<InventoryEvent, PipelineError>>,
    M: Iterator<Item = Result<MoneyEvent, PipelineError>>,
{
    pub fn new(inventory: I, money: M) -> Self {
        EventMerger {
            inventory,
            money,
            heap: BinaryHeap::with_capacity(2),
            inventory_seq: 0,
            money_seq: 0,
            refill: None,
            seeded: false,
            failed: false,
            stats: MergeStats::default(),
        }
    }

    pub fn stats(&self) -> MergeStats {
        self.stats
    }

    /// Number of events currently waiting in the heap (never more than 2)
    pub fn pending(&self) -> usize {
        self.heap.len()
    }

    /// Pull the next event of `source` into the heap, if it has one
    fn pull(&mut self, source: SourceKind) -> Result<(), PipelineError> {
        let next = match source {
            SourceKind::Inventory => self.inventory.next().transpose()?.map(|event| {
                let seq = self.inventory_seq;
                self.inventory_seq += 1;
                (seq, LogEvent::Inventory(event))
            }),
            SourceKind::Money => self.money.next().transpose()?.map(|event| {
                let seq = self.money_seq;
                self.money_seq += 1;
                (seq, LogEvent::Money(event))
            }),
        };

        if let Some((sequence, event)) = next {
            let key = MergeKey {
                timestamp: event.timestamp(),
                priority: source.priority(),
                sequence,
            };
            self.heap.push(MergeEntry { key, event });
            self.stats.max_pending = self.stats.max_pending.max(self.heap.len());
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<LogEvent>, PipelineError> {
        if !self.seeded {
            self.seeded = true;
            self.pull(SourceKind::Inventory)?;
            self.pull(SourceKind::Money)?;
        }

        if let Some(source) = self.refill.take() {
            self.pull(source)?;
        }

        let Some(entry) = self.heap.pop() else {
            return Ok(None);
        };

        if self
            .heap
            .peek()
            .is_some_and(|other| other.key.timestamp == entry.key.timestamp)
        {
            self.stats.timestamp_ties += 1;
        }

        let source = entry.event.source();
        match source {
            SourceKind::Inventory => self.stats.inventory_events += 1,
            SourceKind::Money => self.stats.money_events += 1,
        }
        self.refill = Some(source);

        Ok(Some(entry.event))
    }
}

impl<I, M> Iterator for EventMerger<I, M>
where
    I: Iterator<Item = Result<InventoryEvent, PipelineError>>,
    M: Iterator<Item = Result<MoneyEvent, PipelineError>>,
{
    type Item = Result<LogEvent, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.advance() {
            Ok(event) => event.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Merge two event streams into one chronologically ordered stream
pub fn merge_events<I, M>(inventory: I, money: M) -> EventMerger<I::IntoIter, M::IntoIter>
where
    I: IntoIterator<Item = Result<InventoryEvent, PipelineError>>,
    M: IntoIterator<Item = Result<MoneyEvent, PipelineError>>,
{
    EventMerger::new(inventory.into_iter(), money.into_iter())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{InventoryAction, ItemAmount, MoneyAction};
    use proptest::prelude::*;
    use std::io;

    fn inv(ts: i64, line: u64) -> InventoryEvent {
        InventoryEvent {
            timestamp: ts,
            player_id: 1,
            action: InventoryAction::Add,
            items: vec![ItemAmount { item_type_id: 5, amount: 1 }],
            source_line: line,
            raw_text: format!("[{}] ITEM_ADD | 1, (5, 1)", ts),
        }
    }

    fn money(ts: i64, line: u64) -> MoneyEvent {
        MoneyEvent {
            timestamp: ts,
            player_id: 1,
            action: MoneyAction::Add,
            amount: 10,
            reason: "quest".to_string(),
            source_line: line,
            raw_text: format!("{}|1|MONEY_ADD,10,quest", ts),
        }
    }

    fn ok_inv(ts: &[i64]) -> Vec<Result<InventoryEvent, PipelineError>> {
        ts.iter()
            .enumerate()
            .map(|(i, t)| Ok(inv(*t, i as u64 + 1)))
            .collect()
    }

    fn ok_money(ts: &[i64]) -> Vec<Result<MoneyEvent, PipelineError>> {
        ts.iter()
            .enumerate()
            .map(|(i, t)| Ok(money(*t, i as u64 + 1)))
            .collect()
    }

    fn tag(event: &LogEvent) -> (i64, SourceKind, u64) {
        (event.timestamp(), event.source(), event.source_line())
    }

    #[test]
    fn test_equal_timestamps_inventory_first() {
        let merged: Vec<LogEvent> = merge_events(ok_inv(&[100]), ok_money(&[100]))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].source(), SourceKind::Inventory);
        assert_eq!(merged[1].source(), SourceKind::Money);
    }

    #[test]
    fn test_interleaves_by_timestamp() {
        let merged: Vec<_> = merge_events(ok_inv(&[1, 4, 6]), ok_money(&[2, 3, 7]))
            .map(|e| tag(&e.unwrap()))
            .collect();

        let timestamps: Vec<i64> = merged.iter().map(|t| t.0).collect();
        assert_eq!(timestamps, vec![1, 2, 3, 4, 6, 7]);
    }

    #[test]
    fn test_arrival_order_within_source_on_ties() {
        let merged: Vec<_> = merge_events(ok_inv(&[5, 5, 5]), ok_money(&[5, 5]))
            .map(|e| tag(&e.unwrap()))
            .collect();

        assert_eq!(
            merged,
            vec![
                (5, SourceKind::Inventory, 1),
                (5, SourceKind::Inventory, 2),
                (5, SourceKind::Inventory, 3),
                (5, SourceKind::Money, 1),
                (5, SourceKind::Money, 2),
            ]
        );
    }

    #[test]
    fn test_empty_sources() {
        let mut merger = merge_events(ok_inv(&[]), ok_money(&[]));
        assert!(merger.next().is_none());
        assert_eq!(merger.stats().total(), 0);

        let only_money: Vec<_> = merge_events(ok_inv(&[]), ok_money(&[3, 9]))
            .map(|e| e.unwrap().timestamp())
            .collect();
        assert_eq!(only_money, vec![3, 9]);
    }

    #[test]
    fn test_pending_never_exceeds_two() {
        let mut merger = merge_events(ok_inv(&[1, 2, 3, 4, 5]), ok_money(&[1, 2, 3, 4, 5]));
        while let Some(event) = merger.next() {
            event.unwrap();
            assert!(merger.pending() <= 2);
        }
        let stats = merger.stats();
        assert_eq!(stats.max_pending, 2);
        assert_eq!(stats.inventory_events, 5);
        assert_eq!(stats.money_events, 5);
    }

    #[test]
    fn test_source_error_stops_merge() {
        let inventory = vec![
            Ok(inv(1, 1)),
            Err(PipelineError::Read {
                path: "inv.txt".into(),
                line: 2,
                source: io::Error::new(io::ErrorKind::InvalidData, "bad bytes"),
            }),
            Ok(inv(3, 3)),
        ];
        let mut merger = merge_events(inventory, ok_money(&[10]));

        assert_eq!(merger.next().unwrap().unwrap().timestamp(), 1);
        assert!(matches!(merger.next(), Some(Err(PipelineError::Read { .. }))));
        assert!(merger.next().is_none());
    }

    #[test]
    fn test_lazy_pull_does_not_read_ahead() {
        use std::cell::Cell;
        use std::rc::Rc;

        let pulled = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&pulled);
        let inventory = (1..=3).map(move |t| {
            counter.set(counter.get() + 1);
            Ok(inv(t, t as u64))
        });

        let mut merger = EventMerger::new(inventory, ok_money(&[]).into_iter());
        merger.next().unwrap().unwrap();
        // Seeding pulled the head; the refill waits for the next call
        assert_eq!(pulled.get(), 1);
        merger.next().unwrap().unwrap();
        assert_eq!(pulled.get(), 2);
    }

    proptest! {
        #[test]
        fn prop_merge_is_ordered_and_complete(
            mut inv_ts in prop::collection::vec(0i64..50, 0..30),
            mut money_ts in prop::collection::vec(0i64..50, 0..30),
        ) {
            inv_ts.sort();
            money_ts.sort();

            let merged: Vec<_> = merge_events(ok_inv(&inv_ts), ok_money(&money_ts))
                .map(|e| tag(&e.unwrap()))
                .collect();

            prop_assert_eq!(merged.len(), inv_ts.len() + money_ts.len());

            for pair in merged.windows(2) {
                prop_assert!(pair[0].0 <= pair[1].0);
                if pair[0].0 == pair[1].0 {
                    prop_assert!(!(pair[0].1 == SourceKind::Money && pair[1].1 == SourceKind::Inventory));
                }
            }

            // Each input appears exactly once, in arrival order
            let inv_lines: Vec<u64> = merged.iter().filter(|t| t.1 == SourceKind::Inventory).map(|t| t.2).collect();
            let money_lines: Vec<u64> = merged.iter().filter(|t| t.1 == SourceKind::Money).map(|t| t.2).collect();
            prop_assert_eq!(inv_lines, (1..=inv_ts.len() as u64).collect::<Vec<_>>());
            prop_assert_eq!(money_lines, (1..=money_ts.len() as u64).collect::<Vec<_>>());

            // Deterministic
            let again: Vec<_> = merge_events(ok_inv(&inv_ts), ok_money(&money_ts))
                .map(|e| tag(&e.unwrap()))
                .collect();
            prop_assert_eq!(merged, again);
        }
    }
}
