use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::earnings::DerivedEarnings;
use crate::errors::Result;
use crate::members::members_model::{DownlineTree, KycStatus, MemberProfile};
use crate::members::withdrawal_model::WithdrawalRecord;
use crate::money::checked_sum;
use crate::rank::RankProgress;

/// Headcount and reported earnings on one downline level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummary {
    pub level: usize,
    pub members: usize,
    pub earnings: Decimal,
}

/// Banner shown while KYC is not yet approved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycNotice {
    pub status: KycStatus,
    pub title: String,
    pub message: String,
}

impl KycNotice {
    pub fn for_status(status: KycStatus) -> Option<Self> {
        let (title, message) = match status {
            KycStatus::Approved => return None,
            KycStatus::Pending => (
                "KYC Verification Pending",
                "Your documents are under review. You'll be notified once approved.",
            ),
            KycStatus::Rejected => (
                "KYC Verification Required",
                "Please complete your KYC verification to start earning.",
            ),
        };
        Some(Self {
            status,
            title: title.to_string(),
            message: message.to_string(),
        })
    }
}

/// Everything the member dashboard renders, computed as of `as_of`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDashboard {
    pub as_of: DateTime<Utc>,
    pub profile: MemberProfile,
    pub plan_amount: Decimal,
    pub joined_at: Option<DateTime<Utc>>,
    pub payment_completed: bool,
    pub earnings: DerivedEarnings,
    pub rank_progress: RankProgress,
    pub levels: Vec<LevelSummary>,
    pub downline: DownlineTree,
    pub withdrawals: Vec<WithdrawalRecord>,
    /// Available balance less every recorded withdrawal
    pub withdrawable_balance: Decimal,
    pub kyc_notice: Option<KycNotice>,
}

impl MemberDashboard {
    pub fn level_summaries(downline: &DownlineTree) -> Result<Vec<LevelSummary>> {
        downline
            .levels()
            .iter()
            .enumerate()
            .map(|(idx, members)| -> Result<LevelSummary> {
                Ok(LevelSummary {
                    level: idx + 1,
                    members: members.len(),
                    earnings: checked_sum(
                        members.iter().filter_map(|m| m.earnings),
                        "level earnings",
                    )?,
                })
            })
            .collect()
    }
}
