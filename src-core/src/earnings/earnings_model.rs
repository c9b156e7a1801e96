use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{Error, ValidationError};
use crate::rank::Rank;

/// How accrual behaves once a plan has run past its term
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccrualPolicy {
    /// Earnings stop growing at the end of the term
    #[default]
    CapAtTerm,
    /// Earnings keep growing with elapsed days, term or not
    Uncapped,
}

impl FromStr for AccrualPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cap" | "capped" | "cap_at_term" => Ok(AccrualPolicy::CapAtTerm),
            "uncapped" | "none" => Ok(AccrualPolicy::Uncapped),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown accrual policy '{}'",
                other
            ))
            .into()),
        }
    }
}

/// Day counts and amounts accrued on a plan at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accrual {
    pub elapsed_days: i64,
    pub remaining_days: i64,
    pub total_earnings: Decimal,
    pub remaining_amount: Decimal,
    pub available_balance: Decimal,
}

/// Everything the dashboard derives from a snapshot, a downline and the clock.
/// Recomputed on every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedEarnings {
    pub elapsed_days: i64,
    pub remaining_days: i64,
    pub total_earnings: Decimal,
    pub remaining_amount: Decimal,
    pub available_balance: Decimal,
    pub total_team_size: usize,
    pub rank: Rank,
}

impl DerivedEarnings {
    pub fn from_parts(accrual: Accrual, total_team_size: usize, rank: Rank) -> Self {
        Self {
            elapsed_days: accrual.elapsed_days,
            remaining_days: accrual.remaining_days,
            total_earnings: accrual.total_earnings,
            remaining_amount: accrual.remaining_amount,
            available_balance: accrual.available_balance,
            total_team_size,
            rank,
        }
    }

    /// Portion of total earnings held back from withdrawal
    pub fn reserved_amount(&self) -> Decimal {
        self.total_earnings - self.available_balance
    }
}
