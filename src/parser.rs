// 🏗️ Parser Framework - one parser per log kind
//
// A parser turns ONE raw line into a typed event, a silent skip (blank line),
// or a rejection. It never touches the filesystem; the stream reader owns I/O.

use crate::error::LineFormatError;
use crate::events::{
    InventoryAction, InventoryEvent, ItemAmount, MoneyAction, MoneyEvent, SourceKind,
};
use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// CORE TRAIT
// ============================================================================

/// LogParser - the only interface the stream reader needs
///
/// Parsing is a pure function of the line: same input, same output,
/// regardless of call order.
pub trait LogParser {
    type Event;

    /// Parse a single line
    ///
    /// # Returns
    /// * `Ok(Some(event))` - accepted line
    /// * `Ok(None)` - blank line, skipped without a diagnostic
    /// * `Err(LineFormatError)` - rejected line
    fn parse_line(&self, line: &str, line_no: u64) -> Result<Option<Self::Event>, LineFormatError>;

    /// Which log this parser handles
    fn source_kind(&self) -> SourceKind;
}

fn parse_int(field: &'static str, raw: &str) -> Result<i64, LineFormatError> {
    let value = raw.trim();
    value
        .parse::<i64>()
        .map_err(|_| LineFormatError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

// ============================================================================
// INVENTORY PARSER
// ============================================================================

// [<timestamp>] <ACTION> | <player_id>, (<item>, <amount>[, <item>, <amount>...])
static INVENTORY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([^\]]*)\]\s*(\S+?)\s*\|\s*([^,]*),\s*\((.*)\)\s*$")
        .expect("inventory line pattern is valid")
});

pub struct InventoryParser;

impl InventoryParser {
    pub fn new() -> Self {
        InventoryParser
    }
}

impl Default for InventoryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser for InventoryParser {
    type Event = InventoryEvent;

    fn parse_line(&self, line: &str, line_no: u64) -> Result<Option<InventoryEvent>, LineFormatError> {
        parse_inventory_line(line, line_no)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Inventory
    }
}

/// Parse one inventory log line
///
/// Example: `[1000] ITEM_ADD | 7, (5, 3)` → player 7 gains 3 units of item 5.
/// Any bad numeric token rejects the whole line; nothing is partially applied.
pub fn parse_inventory_line(line: &str, line_no: u64) -> Result<Option<InventoryEvent>, LineFormatError> {
    let text = line.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let caps = INVENTORY_LINE
        .captures(text)
        .ok_or(LineFormatError::Malformed)?;

    let action_token = &caps[2];
    let action = InventoryAction::from_token(action_token)
        .ok_or_else(|| LineFormatError::UnknownAction(action_token.to_string()))?;

    let timestamp = parse_int("timestamp", &caps[1])?;
    let player_id = parse_int("player_id", &caps[3])?;

    // Empty tokens (e.g. a trailing comma) are ignored, like the upstream writer does
    let tokens: Vec<&str> = caps[4]
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() % 2 != 0 {
        return Err(LineFormatError::OddItemTokens(tokens.len()));
    }

    let items = tokens
        .chunks(2)
        .map(|pair| {
            Ok(ItemAmount {
                item_type_id: parse_int("item_type_id", pair[0])?,
                amount: parse_int("amount", pair[1])?,
            })
        })
        .collect::<Result<Vec<_>, LineFormatError>>()?;

    Ok(Some(InventoryEvent {
        timestamp,
        player_id,
        action,
        items,
        source_line: line_no,
        raw_text: text.to_string(),
    }))
}

// ============================================================================
// MONEY PARSER
// ============================================================================

pub struct MoneyParser;

impl MoneyParser {
    pub fn new() -> Self {
        MoneyParser
    }
}

impl Default for MoneyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser for MoneyParser {
    type Event = MoneyEvent;

    fn parse_line(&self, line: &str, line_no: u64) -> Result<Option<MoneyEvent>, LineFormatError> {
        parse_money_line(line, line_no)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Money
    }
}

/// Parse one money log line
///
/// Format: `<timestamp> | <player_id> | <ACTION>, <amount>, <reason>`.
/// Only the first two `|` and the first two `,` of the payload are separators,
/// so the reason may itself contain commas.
pub fn parse_money_line(line: &str, line_no: u64) -> Result<Option<MoneyEvent>, LineFormatError> {
    let text = line.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = text.splitn(3, '|').collect();
    if fields.len() != 3 {
        return Err(LineFormatError::FieldCount {
            expected: 3,
            found: fields.len(),
        });
    }

    let payload: Vec<&str> = fields[2].splitn(3, ',').collect();
    if payload.len() != 3 {
        return Err(LineFormatError::FieldCount {
            expected: 3,
            found: payload.len(),
        });
    }

    let action_token = payload[0].trim();
    let action = MoneyAction::from_token(action_token)
        .ok_or_else(|| LineFormatError::UnknownAction(action_token.to_string()))?;

    let timestamp = parse_int("timestamp", fields[0])?;
    let player_id = parse_int("player_id", fields[1])?;
    let amount = parse_int("amount", payload[1])?;

    Ok(Some(MoneyEvent {
        timestamp,
        player_id,
        action,
        amount,
        reason: payload[2].trim().to_string(),
        source_line: line_no,
        raw_text: text.to_string(),
    }))
}

// ============================================================================
// TESTS
// ============================================================================
