// State Models - players, item statistics and the engine that owns them
//
// Each piece has:
// - Explicit get-or-insert creation (no implicit defaults)
// - Mutation only through GameState::apply_*
// - Read-only queries for the report and the interactive lookup

pub mod game;
pub mod item_stats;
pub mod player;

pub use game::GameState;
pub use item_stats::ItemStatistics;
pub use player::{InventoryChange, Player, PlayerRegistry, UNKNOWN_PLAYER_NAME};
