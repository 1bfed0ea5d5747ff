// Game Log Analytics - Core Library
// Exposes all modules for use in the CLI and tests

pub mod catalog;
pub mod combined_log;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod merger;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod reader;
pub mod report;
pub mod state;

// Re-export commonly used types
pub use catalog::ItemCatalog;
pub use combined_log::{
    format_event, format_inventory_event, format_money_event, format_timestamp,
    merge_logs_to_file,
};
pub use config::{AggregationOrder, PipelineConfig};
pub use error::{LineFormatError, PipelineError, QueryInputError};
pub use events::{
    InventoryAction, InventoryEvent, ItemAmount, LogEvent, MoneyAction, MoneyEvent, SourceKind,
};
pub use merger::{merge_events, EventMerger, MergeKey, MergeStats};
pub use parser::{
    parse_inventory_line, parse_money_line, InventoryParser, LogParser, MoneyParser,
};
pub use pipeline::{build_state, load_state, run_pipeline, PipelineOutcome};
pub use query::{lookup_item, parse_query, run_interactive, ItemLookup};
pub use reader::{read_inventory_events, read_money_events, EventReader, ReadStats};
pub use report::{write_report, write_statistics};
pub use state::{GameState, InventoryChange, ItemStatistics, Player, PlayerRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
