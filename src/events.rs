// 📦 Event model - one parsed line from either game log
//
// Events are immutable once constructed. Provenance (line number + raw text)
// travels with every event so diagnostics can always point back at the file.

use std::fmt;

// ============================================================================
// SOURCES
// ============================================================================

/// SourceKind - which log an event came from
///
/// The discriminant doubles as the merge priority: lower wins on equal
/// timestamps, so inventory events sort before money events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SourceKind {
    Inventory = 0,
    Money = 1,
}

impl SourceKind {
    pub fn name(&self) -> &str {
        match self {
            SourceKind::Inventory => "inventory",
            SourceKind::Money => "money",
        }
    }

    pub fn priority(&self) -> u8 {
        *self as u8
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryAction {
    Add,
    Remove,
}

impl InventoryAction {
    /// Parse the exact log token (`ITEM_ADD` / `ITEM_REMOVE`)
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ITEM_ADD" => Some(InventoryAction::Add),
            "ITEM_REMOVE" => Some(InventoryAction::Remove),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryAction::Add => "ITEM_ADD",
            InventoryAction::Remove => "ITEM_REMOVE",
        }
    }

    /// Signed quantity change for `amount` units, saturating at the i64 bounds
    pub fn signed(&self, amount: i64) -> i64 {
        match self {
            InventoryAction::Add => amount,
            InventoryAction::Remove => amount.saturating_neg(),
        }
    }
}

impl fmt::Display for InventoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoneyAction {
    Add,
    Remove,
}

impl MoneyAction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "MONEY_ADD" => Some(MoneyAction::Add),
            "MONEY_REMOVE" => Some(MoneyAction::Remove),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoneyAction::Add => "MONEY_ADD",
            MoneyAction::Remove => "MONEY_REMOVE",
        }
    }

    pub fn signed(&self, amount: i64) -> i64 {
        match self {
            MoneyAction::Add => amount,
            MoneyAction::Remove => amount.saturating_neg(),
        }
    }
}

impl fmt::Display for MoneyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// EVENTS
// ============================================================================

/// One (item_type_id, amount) pair of an inventory line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemAmount {
    pub item_type_id: i64,
    pub amount: i64,
}

/// InventoryEvent - `[ts] ITEM_ADD | player, (item, amount)...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEvent {
    pub timestamp: i64,
    pub player_id: i64,
    pub action: InventoryAction,
    pub items: Vec<ItemAmount>,

    // Provenance
    pub source_line: u64,
    pub raw_text: String,
}

/// MoneyEvent - `ts | player | MONEY_ADD, amount, reason`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyEvent {
    pub timestamp: i64,
    pub player_id: i64,
    pub action: MoneyAction,
    pub amount: i64,
    pub reason: String,

    // Provenance
    pub source_line: u64,
    pub raw_text: String,
}

/// LogEvent - either kind, as produced by the merger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Inventory(InventoryEvent),
    Money(MoneyEvent),
}

impl LogEvent {
    pub fn timestamp(&self) -> i64 {
        match self {
            LogEvent::Inventory(e) => e.timestamp,
            LogEvent::Money(e) => e.timestamp,
        }
    }

    pub fn player_id(&self) -> i64 {
        match self {
            LogEvent::Inventory(e) => e.player_id,
            LogEvent::Money(e) => e.player_id,
        }
    }

    pub fn source(&self) -> SourceKind {
        match self {
            LogEvent::Inventory(_) => SourceKind::Inventory,
            LogEvent::Money(_) => SourceKind::Money,
        }
    }

    pub fn source_line(&self) -> u64 {
        match self {
            LogEvent::Inventory(e) => e.source_line,
            LogEvent::Money(e) => e.source_line,
        }
    }
}

impl From<InventoryEvent> for LogEvent {
    fn from(event: InventoryEvent) -> Self {
        LogEvent::Inventory(event)
    }
}

impl From<MoneyEvent> for LogEvent {
    fn from(event: MoneyEvent) -> Self {
        LogEvent::Money(event)
    }
}
