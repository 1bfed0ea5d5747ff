// ⚙️ Run configuration - where the logs, references and outputs live
//
// Default layout under a base directory:
//   data/raw/inventory_logs.txt, data/raw/money_logs.txt
//   data/reference/db.json, data/reference/items.xml
//   data/output/combined_log.txt, data/output/output.txt
//   app.log

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How the aggregation pass consumes the two logs
///
/// `SeparatePasses` folds the whole inventory log, then the whole money log,
/// so item appearance order is inventory processing order. `Merged` folds the
/// merged chronological stream instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationOrder {
    #[default]
    SeparatePasses,
    Merged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub inventory_log: PathBuf,
    pub money_log: PathBuf,
    pub player_db: PathBuf,
    pub items_catalog: PathBuf,
    pub combined_log: PathBuf,
    pub stats_output: PathBuf,
    pub log_file: PathBuf,
    pub aggregation_order: AggregationOrder,
}

impl PipelineConfig {
    pub fn from_data_dir(base: &Path) -> Self {
        let data = base.join("data");
        let raw = data.join("raw");
        let reference = data.join("reference");
        let output = data.join("output");

        PipelineConfig {
            inventory_log: raw.join("inventory_logs.txt"),
            money_log: raw.join("money_logs.txt"),
            player_db: reference.join("db.json"),
            items_catalog: reference.join("items.xml"),
            combined_log: output.join("combined_log.txt"),
            stats_output: output.join("output.txt"),
            log_file: base.join("app.log"),
            aggregation_order: AggregationOrder::default(),
        }
    }

    pub fn with_aggregation_order(mut self, order: AggregationOrder) -> Self {
        self.aggregation_order = order;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_data_dir(Path::new("."))
    }
}
