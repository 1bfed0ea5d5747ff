use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;
use tracing::info;

use game_log_analytics::{
    load_state, merge_logs_to_file, run_interactive, run_pipeline, write_statistics,
    AggregationOrder, ItemCatalog, PipelineConfig,
};

/// Merge game inventory/money logs and report player and item statistics
#[derive(Parser, Debug)]
#[command(name = "game-log-analytics")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base directory holding data/raw, data/reference and data/output
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Inventory log (default: <data-dir>/data/raw/inventory_logs.txt)
    #[arg(long)]
    inventory_log: Option<PathBuf>,

    /// Money log (default: <data-dir>/data/raw/money_logs.txt)
    #[arg(long)]
    money_log: Option<PathBuf>,

    /// Player reference JSON (default: <data-dir>/data/reference/db.json)
    #[arg(long)]
    player_db: Option<PathBuf>,

    /// Item catalog XML (default: <data-dir>/data/reference/items.xml)
    #[arg(long)]
    items_catalog: Option<PathBuf>,

    /// Combined log output (default: <data-dir>/data/output/combined_log.txt)
    #[arg(long)]
    combined_log: Option<PathBuf>,

    /// Statistics report output (default: <data-dir>/data/output/output.txt)
    #[arg(long)]
    stats_output: Option<PathBuf>,

    /// Log file (default: <data-dir>/app.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// How the aggregation pass walks the two logs
    #[arg(long, value_enum, default_value_t = OrderArg::SeparatePasses)]
    aggregation_order: OrderArg,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge, build statistics, then answer item lookups from stdin (default)
    Run {
        /// Skip the interactive lookup loop
        #[arg(long)]
        no_interactive: bool,
    },

    /// Only write the combined chronological log
    Merge,

    /// Only build state and write the statistics report
    Report,

    /// Build state and answer item lookups from stdin
    Query,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    SeparatePasses,
    Merged,
}

impl From<OrderArg> for AggregationOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::SeparatePasses => AggregationOrder::SeparatePasses,
            OrderArg::Merged => AggregationOrder::Merged,
        }
    }
}

impl Cli {
    fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::from_data_dir(&self.data_dir)
            .with_aggregation_order(self.aggregation_order.into());

        let overrides = [
            (&self.inventory_log, &mut config.inventory_log),
            (&self.money_log, &mut config.money_log),
            (&self.player_db, &mut config.player_db),
            (&self.items_catalog, &mut config.items_catalog),
            (&self.combined_log, &mut config.combined_log),
            (&self.stats_output, &mut config.stats_output),
            (&self.log_file, &mut config.log_file),
        ];
        for (value, slot) in overrides {
            if let Some(path) = value {
                *slot = path.clone();
            }
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    game_log_analytics::logging::init_logging(&cli.log_level, Some(&config.log_file))?;

    match cli.command.unwrap_or(Commands::Run { no_interactive: false }) {
        Commands::Run { no_interactive } => {
            let outcome = run_pipeline(&config)?;
            if !no_interactive {
                serve_queries(&outcome.state, &outcome.catalog)?;
            }
        }
        Commands::Merge => {
            merge_logs_to_file(&config.inventory_log, &config.money_log, &config.combined_log)
                .context("failed to write combined log")?;
        }
        Commands::Report => {
            let state = load_state(&config)?;
            let catalog = ItemCatalog::load(&config.items_catalog)?;
            write_statistics(&config.stats_output, &state, &catalog)?;
        }
        Commands::Query => {
            let state = load_state(&config)?;
            let catalog = ItemCatalog::load(&config.items_catalog)?;
            serve_queries(&state, &catalog)?;
        }
    }

    Ok(())
}

fn serve_queries(state: &game_log_analytics::GameState, catalog: &ItemCatalog) -> Result<()> {
    info!("interactive mode: waiting for item_type_id");
    println!("Enter item_type_id (Ctrl+D to exit):");
    run_interactive(state, catalog, io::stdin().lock(), io::stdout().lock())
}
