pub mod rank_evaluator;
pub mod rank_model;

pub use rank_evaluator::{rank, rank_progress, total_team_size, RankProgress};
pub use rank_model::{Rank, RANK_THRESHOLDS};
