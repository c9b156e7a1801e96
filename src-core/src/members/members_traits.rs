use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::earnings::DerivedEarnings;
use crate::errors::Result;
use crate::members::dashboard_model::MemberDashboard;
use crate::members::members_model::{AccountSnapshot, DownlineTree, MemberProfile, MemberRecord};
use crate::members::withdrawal_model::WithdrawalRecord;

/// Where member account data comes from. The backend that owns it is external.
#[async_trait]
pub trait MemberDataSource: Send + Sync {
    async fn fetch_account_snapshot(&self, member_id: &str) -> Result<AccountSnapshot>;
    async fn fetch_downline(&self, member_id: &str) -> Result<DownlineTree>;
    async fn fetch_profile(&self, member_id: &str) -> Result<MemberProfile>;

    /// Sources without a withdrawal ledger report an empty history
    async fn fetch_withdrawals(&self, _member_id: &str) -> Result<Vec<WithdrawalRecord>> {
        Ok(Vec::new())
    }

    /// All member views at once. Sources that serve them from one document
    /// should override this to read it a single time.
    async fn fetch_member(&self, member_id: &str) -> Result<MemberRecord> {
        let (snapshot, downline, profile, withdrawals) = futures::try_join!(
            self.fetch_account_snapshot(member_id),
            self.fetch_downline(member_id),
            self.fetch_profile(member_id),
            self.fetch_withdrawals(member_id),
        )?;
        Ok(MemberRecord {
            snapshot,
            downline,
            profile,
            withdrawals,
        })
    }
}

#[async_trait]
pub trait MemberServiceTrait: Send + Sync {
    async fn get_dashboard(&self, member_id: &str, now: DateTime<Utc>) -> Result<MemberDashboard>;
    async fn get_earnings(&self, member_id: &str, now: DateTime<Utc>) -> Result<DerivedEarnings>;
    /// Validates a withdrawal request against the member's balance as of `now`
    /// and returns what would remain withdrawable afterwards.
    async fn check_withdrawal(
        &self,
        member_id: &str,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Decimal>;
}
