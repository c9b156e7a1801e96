use serde::{Deserialize, Serialize};

use crate::members::members_model::DownlineTree;
use crate::rank::rank_model::{Rank, RANK_THRESHOLDS};

/// Rank for a given total team size
pub fn rank(total_team_size: usize) -> Rank {
    RANK_THRESHOLDS
        .iter()
        .find(|(min, _)| total_team_size >= *min)
        .map(|(_, rank)| *rank)
        .unwrap_or(Rank::Bronze)
}

/// Members across all seven downline levels
pub fn total_team_size(downline: &DownlineTree) -> usize {
    downline.total_team_size()
}

/// How far a team is from the next rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankProgress {
    pub team_size: usize,
    pub rank: Rank,
    pub next_rank: Option<Rank>,
    /// Members still needed to reach `next_rank`; 0 at the top rank
    pub members_to_next: usize,
}

pub fn rank_progress(total_team_size: usize) -> RankProgress {
    let current = rank(total_team_size);
    let next_rank = current.next();
    let members_to_next = next_rank
        .map(|next| next.min_team_size().saturating_sub(total_team_size))
        .unwrap_or(0);

    RankProgress {
        team_size: total_team_size,
        rank: current,
        next_rank,
        members_to_next,
    }
}
