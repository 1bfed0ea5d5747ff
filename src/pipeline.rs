// 🚚 Pipeline - merge, aggregate, report
//
// The merge pass and the aggregation pass read the logs independently.
// Any file-level error aborts the run.

use crate::catalog::ItemCatalog;
use crate::combined_log::merge_logs_to_file;
use crate::config::{AggregationOrder, PipelineConfig};
use crate::merger::{merge_events, MergeStats};
use crate::reader::{read_inventory_events, read_money_events};
use crate::report::write_statistics;
use crate::state::{GameState, PlayerRegistry};
use anyhow::{Context, Result};
use tracing::info;

pub struct PipelineOutcome {
    pub merge: MergeStats,
    pub state: GameState,
    pub catalog: ItemCatalog,
}

/// Fold both logs into a fresh GameState seeded with `registry`
pub fn build_state(config: &PipelineConfig, registry: PlayerRegistry) -> Result<GameState> {
    let mut state = GameState::new(registry);

    match config.aggregation_order {
        AggregationOrder::SeparatePasses => {
            for event in read_inventory_events(&config.inventory_log)? {
                state.apply_inventory_event(&event?);
            }
            for event in read_money_events(&config.money_log)? {
                state.apply_money_event(&event?);
            }
        }
        AggregationOrder::Merged => {
            let inventory = read_inventory_events(&config.inventory_log)?;
            let money = read_money_events(&config.money_log)?;
            for event in merge_events(inventory, money) {
                state.apply(&event?);
            }
        }
    }

    info!(
        players = state.players().len(),
        items = state.item_stats().distinct_items(),
        order = ?config.aggregation_order,
        "state built"
    );
    Ok(state)
}

/// Load the player reference and build state in one step
pub fn load_state(config: &PipelineConfig) -> Result<GameState> {
    let registry = PlayerRegistry::from_db_file(&config.player_db)
        .context("failed to load player reference")?;
    build_state(config, registry).context("failed to build player and item state")
}

/// Full batch run: combined log, state, catalog, statistics report
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutcome> {
    info!("starting log pipeline");

    let merge = merge_logs_to_file(&config.inventory_log, &config.money_log, &config.combined_log)
        .context("failed to write combined log")?;

    let state = load_state(config)?;

    let catalog = ItemCatalog::load(&config.items_catalog).context("failed to load item catalog")?;

    write_statistics(&config.stats_output, &state, &catalog)
        .context("failed to write statistics report")?;

    info!(events = merge.total(), "pipeline complete");
    Ok(PipelineOutcome {
        merge,
        state,
        catalog,
    })
}
