//! Admin console view-state. Rows come from the backend and are passed through
//! the functions in `admin_service`, which hand back updated copies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::members::members_model::KycStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRow {
    pub id: String,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub kyc_status: KycStatus,
    pub total_earnings: Decimal,
    pub available_balance: Decimal,
    pub joined_date: String,
    pub last_active: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_users: usize,
    pub total_earnings: Decimal,
    pub pending_kyc: usize,
    pub approved_users: usize,
}

/// Outcome of reviewing a pending KYC submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycDecision {
    Approve,
    Reject,
}

impl From<KycDecision> for KycStatus {
    fn from(decision: KycDecision) -> Self {
        match decision {
            KycDecision::Approve => KycStatus::Approved,
            KycDecision::Reject => KycStatus::Rejected,
        }
    }
}

/// Manual earnings credit entered by an administrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsAdjustment {
    pub user_id: String,
    pub amount: Decimal,
}
