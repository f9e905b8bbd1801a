pub mod frequency;
pub mod models;
pub mod optimizer;
pub mod position;
pub mod residuals;
pub mod stats;
pub mod validate;
pub mod verify;

pub use models::{Combination, ConfigError, DrawRecord, Game, GameConfig};
pub use stats::{compute_for_game, compute_statistics, StatisticsRecord};
pub use verify::{verify, ConsistencyError};
