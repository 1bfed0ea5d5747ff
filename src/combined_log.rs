// 📝 Combined log writer
//
// Streams the merger straight into the output file, one line per event:
//   inventory → [YY-MM-DD HH:MM:SS] <player> | <ACTION> (<item>, <amount>) ...
//   money     → [YY-MM-DD HH:MM:SS] <player> | <ACTION> | <amount> | <reason>

use crate::error::PipelineError;
use crate::events::{InventoryEvent, LogEvent, MoneyEvent};
use crate::merger::{merge_events, MergeStats};
use crate::reader::{read_inventory_events, read_money_events};
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Render a unix timestamp as UTC `YY-MM-DD HH:MM:SS`
pub fn format_timestamp(timestamp: i64) -> Result<String, PipelineError> {
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or(PipelineError::TimestampOutOfRange(timestamp))?;
    Ok(datetime.format("%y-%m-%d %H:%M:%S").to_string())
}

pub fn format_inventory_event(event: &InventoryEvent) -> Result<String, PipelineError> {
    let items: Vec<String> = event
        .items
        .iter()
        .map(|i| format!("({}, {})", i.item_type_id, i.amount))
        .collect();

    Ok(format!(
        "[{}] {} | {} {}",
        format_timestamp(event.timestamp)?,
        event.player_id,
        event.action,
        items.join(" ")
    ))
}

pub fn format_money_event(event: &MoneyEvent) -> Result<String, PipelineError> {
    Ok(format!(
        "[{}] {} | {} | {} | {}",
        format_timestamp(event.timestamp)?,
        event.player_id,
        event.action,
        event.amount,
        event.reason
    ))
}

pub fn format_event(event: &LogEvent) -> Result<String, PipelineError> {
    match event {
        LogEvent::Inventory(e) => format_inventory_event(e),
        LogEvent::Money(e) => format_money_event(e),
    }
}

/// Write every merged event from any ordered stream into `writer`
pub fn write_merged<W, E>(writer: &mut W, events: E, output_path: &Path) -> Result<u64, PipelineError>
where
    W: Write,
    E: IntoIterator<Item = Result<LogEvent, PipelineError>>,
{
    let mut written = 0u64;
    for event in events {
        let line = format_event(&event?)?;
        writeln!(writer, "{}", line).map_err(|e| PipelineError::write(output_path, e))?;
        written += 1;
    }
    Ok(written)
}

/// Merge both logs into `output_path` without holding either file in memory
pub fn merge_logs_to_file(
    inventory_path: &Path,
    money_path: &Path,
    output_path: &Path,
) -> Result<MergeStats, PipelineError> {
    info!(
        inventory = %inventory_path.display(),
        money = %money_path.display(),
        output = %output_path.display(),
        "merging logs"
    );

    let inventory = read_inventory_events(inventory_path)?;
    let money = read_money_events(money_path)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::write(parent, e))?;
    }
    let file = File::create(output_path).map_err(|e| PipelineError::write(output_path, e))?;
    let mut writer = BufWriter::new(file);

    let mut merger = merge_events(inventory, money);
    write_merged(&mut writer, merger.by_ref(), output_path)?;
    writer
        .flush()
        .map_err(|e| PipelineError::write(output_path, e))?;

    let stats = merger.stats();
    info!(
        inventory_events = stats.inventory_events,
        money_events = stats.money_events,
        total = stats.total(),
        ties = stats.timestamp_ties,
        "merge complete"
    );
    Ok(stats)
}
