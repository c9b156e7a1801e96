use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::earnings::{derive_earnings, AccrualPolicy, DerivedEarnings};
use crate::errors::Result;
use crate::members::dashboard_model::{KycNotice, MemberDashboard};
use crate::members::members_model::MemberRecord;
use crate::members::members_traits::{MemberDataSource, MemberServiceTrait};
use crate::members::withdrawal_model::{self, withdrawable_balance};
use crate::rank::rank_progress;

pub struct MemberService<T: MemberDataSource> {
    source: Arc<T>,
    policy: AccrualPolicy,
}

impl<T: MemberDataSource> MemberService<T> {
    pub fn new(source: Arc<T>) -> Self {
        Self::with_policy(source, AccrualPolicy::default())
    }

    pub fn with_policy(source: Arc<T>, policy: AccrualPolicy) -> Self {
        MemberService { source, policy }
    }

    pub fn policy(&self) -> AccrualPolicy {
        self.policy
    }
}

#[async_trait]
impl<T: MemberDataSource> MemberServiceTrait for MemberService<T> {
    async fn get_dashboard(&self, member_id: &str, now: DateTime<Utc>) -> Result<MemberDashboard> {
        let MemberRecord {
            snapshot,
            downline,
            profile,
            withdrawals,
        } = self.source.fetch_member(member_id).await?;

        let earnings = derive_earnings(&snapshot, &downline, now, self.policy)?;
        let withdrawable = withdrawable_balance(earnings.available_balance, &withdrawals)?;
        let progress = rank_progress(earnings.total_team_size);
        let kyc_notice = KycNotice::for_status(profile.kyc_status);
        let levels = MemberDashboard::level_summaries(&downline)?;

        log::debug!(
            "Dashboard for {}: team={} rank={} withdrawable={}",
            member_id,
            earnings.total_team_size,
            earnings.rank,
            withdrawable
        );

        Ok(MemberDashboard {
            as_of: now,
            profile,
            plan_amount: snapshot.plan_amount,
            joined_at: snapshot.joined_at,
            payment_completed: snapshot.payment_completed,
            earnings,
            rank_progress: progress,
            levels,
            downline,
            withdrawals,
            withdrawable_balance: withdrawable,
            kyc_notice,
        })
    }

    async fn get_earnings(&self, member_id: &str, now: DateTime<Utc>) -> Result<DerivedEarnings> {
        let record = self.source.fetch_member(member_id).await?;
        derive_earnings(&record.snapshot, &record.downline, now, self.policy)
    }

    async fn check_withdrawal(
        &self,
        member_id: &str,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Decimal> {
        let record = self.source.fetch_member(member_id).await?;
        let earnings = derive_earnings(&record.snapshot, &record.downline, now, self.policy)?;
        let withdrawable = withdrawable_balance(earnings.available_balance, &record.withdrawals)?;
        let left = withdrawal_model::check_withdrawal(amount, withdrawable)?;
        log::info!(
            "Withdrawal of {} for {} fits; {} left withdrawable",
            amount,
            member_id,
            left
        );
        Ok(left)
    }
}
