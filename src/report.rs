// 📈 Statistics report - output.txt
//
// Four fixed sections, each a left-aligned table:
//   1. Top items by mentions (with unique owners)
//   2. Top players by final balance
//   3. First items by appearance
//   4. Last items by appearance

use crate::catalog::ItemCatalog;
use crate::combined_log::format_timestamp;
use crate::error::PipelineError;
use crate::state::GameState;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

pub const REPORT_LIMIT: usize = 10;

const COLUMN_PADDING: usize = 2;

// ============================================================================
// TABLE
// ============================================================================

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(&" ".repeat(COLUMN_PADDING))
}

/// Write a header, a dashed rule, the rows and a trailing blank line
///
/// Widths are measured in characters so non-ASCII names line up.
pub fn write_table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    writeln!(out, "{}", format_row(headers.iter().copied(), &widths))?;
    let rule = widths.iter().sum::<usize>() + COLUMN_PADDING * headers.len().saturating_sub(1);
    writeln!(out, "{}", "-".repeat(rule))?;
    for row in rows {
        writeln!(out, "{}", format_row(row.iter().map(String::as_str), &widths))?;
    }
    writeln!(out)
}

// ============================================================================
// SECTIONS
// ============================================================================

fn top_items_rows(state: &GameState, catalog: &ItemCatalog) -> Vec<Vec<String>> {
    state
        .top_items_by_mentions(REPORT_LIMIT)
        .into_iter()
        .enumerate()
        .map(|(idx, (item_type_id, mentions))| {
            vec![
                (idx + 1).to_string(),
                catalog.name(item_type_id),
                item_type_id.to_string(),
                mentions.to_string(),
                state.owner_count(item_type_id).to_string(),
            ]
        })
        .collect()
}

fn top_players_rows(state: &GameState) -> Result<Vec<Vec<String>>, PipelineError> {
    let render = |ts: Option<i64>| match ts {
        Some(ts) => format_timestamp(ts),
        None => Ok("N/A".to_string()),
    };

    state
        .players_by_balance(REPORT_LIMIT)
        .into_iter()
        .enumerate()
        .map(|(idx, player)| {
            Ok(vec![
                (idx + 1).to_string(),
                player.name.clone(),
                player.player_id.to_string(),
                player.money.to_string(),
                render(player.first_event_ts)?,
                render(player.last_event_ts)?,
            ])
        })
        .collect()
}

fn appearance_rows(
    entries: &[(i64, i64)],
    catalog: &ItemCatalog,
) -> Result<Vec<Vec<String>>, PipelineError> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, &(timestamp, item_type_id))| {
            Ok(vec![
                (idx + 1).to_string(),
                catalog.name(item_type_id),
                item_type_id.to_string(),
                format_timestamp(timestamp)?,
            ])
        })
        .collect()
}

/// Render the whole report into any writer
pub fn write_report<W: Write>(
    out: &mut W,
    state: &GameState,
    catalog: &ItemCatalog,
    output_path: &Path,
) -> Result<(), PipelineError> {
    let io_err = |e| PipelineError::write(output_path, e);

    writeln!(out, "Top {} items by mentions:", REPORT_LIMIT).map_err(io_err)?;
    write_table(
        out,
        &["#", "Name", "item_type_id", "Mentions", "Unique owners"],
        &top_items_rows(state, catalog),
    )
    .map_err(io_err)?;

    writeln!(out, "Top {} players by balance after all operations:", REPORT_LIMIT).map_err(io_err)?;
    write_table(
        out,
        &["#", "Player", "player_id", "Balance", "First event", "Last event"],
        &top_players_rows(state)?,
    )
    .map_err(io_err)?;

    writeln!(out, "First {} items by time of appearance:", REPORT_LIMIT).map_err(io_err)?;
    write_table(
        out,
        &["#", "Name", "item_type_id", "First appearance (UTC)"],
        &appearance_rows(state.first_items(REPORT_LIMIT), catalog)?,
    )
    .map_err(io_err)?;

    writeln!(out, "Last {} items by time of appearance:", REPORT_LIMIT).map_err(io_err)?;
    write_table(
        out,
        &["#", "Name", "item_type_id", "First appearance (UTC)"],
        &appearance_rows(state.last_items(REPORT_LIMIT), catalog)?,
    )
    .map_err(io_err)?;

    Ok(())
}

/// Write `output.txt`, creating its directory if needed
pub fn write_statistics(
    output_path: &Path,
    state: &GameState,
    catalog: &ItemCatalog,
) -> Result<(), PipelineError> {
    info!(
        players = state.players().len(),
        items = state.item_stats().distinct_items(),
        path = %output_path.display(),
        "writing statistics"
    );

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::write(parent, e))?;
    }
    let file = File::create(output_path).map_err(|e| PipelineError::write(output_path, e))?;
    let mut out = BufWriter::new(file);
    write_report(&mut out, state, catalog, output_path)?;
    out.flush().map_err(|e| PipelineError::write(output_path, e))?;

    info!(path = %output_path.display(), "statistics written");
    Ok(())
}
