// 🔎 Interactive item lookup
//
// One item_type_id per input line. Bad input is reported on the output
// stream and the loop keeps going until EOF.

use crate::catalog::ItemCatalog;
use crate::error::QueryInputError;
use crate::state::GameState;
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

pub const TOP_HOLDERS_LIMIT: usize = 10;

/// Answer to one lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLookup {
    pub item_type_id: i64,
    pub name: String,
    pub total: i64,
    pub owners: u64,
    /// (player name, count), largest holding first, ties by player_id
    pub top_holders: Vec<(String, i64)>,
}

impl ItemLookup {
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "Item name: {}", self.name)?;
        writeln!(out, "Total in game: {}", self.total)?;
        writeln!(out, "Number of owners: {}", self.owners)?;
        writeln!(out, "Top {} players for this item:", TOP_HOLDERS_LIMIT)?;
        for (name, count) in &self.top_holders {
            writeln!(out, "{}, {}", name, count)?;
        }
        Ok(())
    }
}

/// Parse one input line; blank lines yield `None`
pub fn parse_query(line: &str) -> Result<Option<i64>, QueryInputError> {
    let text = line.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<i64>()
        .map(Some)
        .map_err(|_| QueryInputError::NotAnInteger(text.to_string()))
}

pub fn lookup_item(state: &GameState, catalog: &ItemCatalog, item_type_id: i64) -> ItemLookup {
    debug!(item_type_id, "item lookup");
    ItemLookup {
        item_type_id,
        name: catalog.name(item_type_id),
        total: state.item_total(item_type_id),
        owners: state.owner_count(item_type_id),
        top_holders: state
            .top_holders(item_type_id, TOP_HOLDERS_LIMIT)
            .into_iter()
            .map(|(player, count)| (player.name.clone(), count))
            .collect(),
    }
}

/// Serve lookups from `input` until EOF
pub fn run_interactive<R: BufRead, W: Write>(
    state: &GameState,
    catalog: &ItemCatalog,
    input: R,
    mut output: W,
) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        match parse_query(&line) {
            Ok(None) => continue,
            Ok(Some(item_type_id)) => {
                lookup_item(state, catalog, item_type_id).write_to(&mut output)?;
            }
            Err(err) => {
                warn!(input = %line.trim(), "invalid item_type_id");
                writeln!(output, "{}", err)?;
            }
        }
        output.flush()?;
    }
    Ok(())
}
