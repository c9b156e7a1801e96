use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

/// Minimum team size per rank, highest first. Evaluation walks this in order.
pub const RANK_THRESHOLDS: [(usize, Rank); 4] = [
    (100, Rank::Platinum),
    (50, Rank::Gold),
    (20, Rank::Silver),
    (0, Rank::Bronze),
];

impl Rank {
    pub fn label(&self) -> &'static str {
        match self {
            Rank::Bronze => "Bronze",
            Rank::Silver => "Silver",
            Rank::Gold => "Gold",
            Rank::Platinum => "Platinum",
        }
    }

    pub fn min_team_size(&self) -> usize {
        RANK_THRESHOLDS
            .iter()
            .find(|(_, rank)| rank == self)
            .map(|(size, _)| *size)
            .unwrap_or(0)
    }

    /// The rank above this one, if any
    pub fn next(&self) -> Option<Rank> {
        match self {
            Rank::Bronze => Some(Rank::Silver),
            Rank::Silver => Some(Rank::Gold),
            Rank::Gold => Some(Rank::Platinum),
            Rank::Platinum => None,
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
