//! Member account, profile and downline models as delivered by the user-data service.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;
use std::str::FromStr;

use crate::constants::{DEFAULT_PLAN_AMOUNT, DOWNLINE_DEPTH};
use crate::errors::{Error, Result};
use crate::members::withdrawal_model::WithdrawalRecord;
use crate::money::checked_sum;

/// KYC review state of a member
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::Pending => "pending",
            KycStatus::Approved => "approved",
            KycStatus::Rejected => "rejected",
        }
    }
}

/// The part of a member's account the earnings model works from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub plan_amount: Decimal,
    /// `None` when the join date is unknown; evaluated as "now"
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_completed: bool,
}

impl AccountSnapshot {
    pub fn new(
        plan_amount: Decimal,
        joined_at: Option<DateTime<Utc>>,
        payment_completed: bool,
    ) -> Result<Self> {
        let snapshot = Self {
            plan_amount,
            joined_at,
            payment_completed,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Builds a snapshot from a floating point plan amount, rejecting NaN and infinities
    pub fn from_f64(
        plan_amount: f64,
        joined_at: Option<DateTime<Utc>>,
        payment_completed: bool,
    ) -> Result<Self> {
        let amount = Decimal::from_f64(plan_amount).ok_or_else(|| {
            Error::InvalidSnapshot(format!("plan amount {} is not a finite number", plan_amount))
        })?;
        Self::new(amount, joined_at, payment_completed)
    }

    pub fn validate(&self) -> Result<()> {
        if self.plan_amount.is_sign_negative() && !self.plan_amount.is_zero() {
            return Err(Error::InvalidSnapshot(format!(
                "plan amount {} is negative",
                self.plan_amount
            )));
        }
        Ok(())
    }
}

/// Everything the dashboard needs about one member, read in a single pass
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub snapshot: AccountSnapshot,
    pub downline: DownlineTree,
    pub profile: MemberProfile,
    pub withdrawals: Vec<WithdrawalRecord>,
}

/// A referred member sitting somewhere in a downline
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownlineMember {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub earnings: Option<Decimal>,
    #[serde(default)]
    pub joined_date: Option<String>,
}

/// Seven referral levels below a member, level 1 being direct referrals.
///
/// Levels are expected to be disjoint; the upstream service guarantees it and
/// nothing here checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownlineTree {
    pub level1: Vec<DownlineMember>,
    pub level2: Vec<DownlineMember>,
    pub level3: Vec<DownlineMember>,
    pub level4: Vec<DownlineMember>,
    pub level5: Vec<DownlineMember>,
    pub level6: Vec<DownlineMember>,
    pub level7: Vec<DownlineMember>,
}

impl DownlineTree {
    pub fn levels(&self) -> [&[DownlineMember]; DOWNLINE_DEPTH] {
        [
            self.level1.as_slice(),
            self.level2.as_slice(),
            self.level3.as_slice(),
            self.level4.as_slice(),
            self.level5.as_slice(),
            self.level6.as_slice(),
            self.level7.as_slice(),
        ]
    }

    /// Members on a 1-based level; `None` outside 1..=7
    pub fn level(&self, level: usize) -> Option<&[DownlineMember]> {
        if level == 0 || level > DOWNLINE_DEPTH {
            return None;
        }
        Some(self.levels()[level - 1])
    }

    pub fn level_sizes(&self) -> [usize; DOWNLINE_DEPTH] {
        self.levels().map(|members| members.len())
    }

    pub fn total_team_size(&self) -> usize {
        self.levels().iter().map(|members| members.len()).sum()
    }

    /// Sum of the earnings reported for every downline member (missing counts as 0)
    pub fn total_downline_earnings(&self) -> Result<Decimal> {
        checked_sum(
            self.levels()
                .iter()
                .flat_map(|members| members.iter())
                .filter_map(|m| m.earnings),
            "downline earnings",
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferredBy {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub branch_name: String,
}

/// Identity and KYC-facing details shown on the member dashboard
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub id: String,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub sex: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub pin_code: Option<String>,
    pub kyc_status: KycStatus,
    pub referral_code: Option<String>,
    pub referred_by: Option<ReferredBy>,
    pub bank_details: Option<BankDetails>,
}

/// Document returned by `GET /user_data/{id}`; every field may be missing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawUserData {
    pub id: Option<String>,
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub sex: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub pin_code: Option<String>,
    pub kyc_status: Option<KycStatus>,
    pub plan_amount: Option<Value>,
    #[serde(alias = "joinedAt")]
    pub joined_date: Option<String>,
    pub payment_status: Option<bool>,
    pub referral_code: Option<String>,
    pub referred_by: Option<ReferredBy>,
    pub bank_details: Option<BankDetails>,
    pub downline: Option<DownlineTree>,
    pub withdrawals: Vec<WithdrawalRecord>,
}

impl RawUserData {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn account_snapshot(&self) -> Result<AccountSnapshot> {
        let plan_amount = parse_plan_amount(self.plan_amount.as_ref())?;
        let joined_at = parse_joined_at(self.joined_date.as_deref())?;
        AccountSnapshot::new(
            plan_amount,
            joined_at,
            self.payment_status.unwrap_or(false),
        )
    }

    pub fn downline(&self) -> DownlineTree {
        self.downline.clone().unwrap_or_default()
    }

    /// Splits the document into the typed views, validating the snapshot
    pub fn into_record(self, fallback_id: &str) -> Result<MemberRecord> {
        let snapshot = self.account_snapshot()?;
        let profile = self.profile(fallback_id);
        Ok(MemberRecord {
            snapshot,
            downline: self.downline.unwrap_or_default(),
            profile,
            withdrawals: self.withdrawals,
        })
    }

    /// Profile view of the document; `fallback_id` is used when the body carries no id
    pub fn profile(&self, fallback_id: &str) -> MemberProfile {
        MemberProfile {
            id: self.id.clone().unwrap_or_else(|| fallback_id.to_string()),
            name: self.name.clone().unwrap_or_default(),
            mobile: self.mobile.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            sex: self.sex.clone(),
            state: self.state.clone(),
            district: self.district.clone(),
            pin_code: self.pin_code.clone(),
            kyc_status: self.kyc_status.unwrap_or_default(),
            referral_code: self.referral_code.clone(),
            referred_by: self.referred_by.clone(),
            bank_details: self.bank_details.clone(),
        }
    }
}

/// Missing or null plan amounts fall back to the default plan.
/// Numbers and numeric strings are accepted, anything else is rejected.
/// Sign checks happen when the amount is placed in an [`AccountSnapshot`].
pub fn parse_plan_amount(value: Option<&Value>) -> Result<Decimal> {
    let amount = match value {
        None | Some(Value::Null) => DEFAULT_PLAN_AMOUNT,
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else {
                n.as_f64().and_then(Decimal::from_f64).ok_or_else(|| {
                    Error::InvalidSnapshot(format!("plan amount {} is out of range", n))
                })?
            }
        }
        Some(Value::String(s)) => Decimal::from_str(s.trim()).map_err(|_| {
            Error::InvalidSnapshot(format!("plan amount '{}' is not numeric", s))
        })?,
        Some(other) => {
            return Err(Error::InvalidSnapshot(format!(
                "plan amount must be a number, got {}",
                other
            )))
        }
    };
    Ok(amount)
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS` (read as UTC) and plain
/// `YYYY-MM-DD` dates (midnight UTC). Missing or blank yields `None`.
pub fn parse_joined_at(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let raw = match value.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(raw) => raw,
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Some(naive.and_utc()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(midnight.and_utc()));
        }
    }

    Err(Error::InvalidSnapshot(format!(
        "join date '{}' is not a recognised date",
        raw
    )))
}
