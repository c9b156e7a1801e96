use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::constants::{DAILY_RATE, PLAN_TERM_DAYS, RATE_BASIS, WITHDRAWABLE_SHARE};
use crate::earnings::earnings_model::{Accrual, AccrualPolicy, DerivedEarnings};
use crate::errors::{Error, Result};
use crate::members::members_model::{AccountSnapshot, DownlineTree};
use crate::rank;

/// Accrual under the default policy (earnings frozen at the end of the term)
pub fn compute(snapshot: &AccountSnapshot, now: DateTime<Utc>) -> Result<Accrual> {
    compute_with_policy(snapshot, now, AccrualPolicy::default())
}

pub fn compute_with_policy(
    snapshot: &AccountSnapshot,
    now: DateTime<Utc>,
    policy: AccrualPolicy,
) -> Result<Accrual> {
    snapshot.validate()?;

    if !snapshot.payment_completed {
        return Ok(Accrual::default());
    }

    let elapsed_days = elapsed_days(snapshot.joined_at, now);
    let remaining_days = (PLAN_TERM_DAYS - elapsed_days).max(0);
    let accrual_days = match policy {
        AccrualPolicy::CapAtTerm => elapsed_days.min(PLAN_TERM_DAYS),
        AccrualPolicy::Uncapped => elapsed_days,
    };

    let units = snapshot.plan_amount / RATE_BASIS;
    let total_earnings = accrue(units, accrual_days)?;
    let remaining_amount = accrue(units, remaining_days)?;
    let available_balance = total_earnings
        .checked_mul(WITHDRAWABLE_SHARE)
        .ok_or_else(plan_too_large)?;

    log::debug!(
        "Accrual: plan={} elapsed={} remaining={} total={}",
        snapshot.plan_amount,
        elapsed_days,
        remaining_days,
        total_earnings
    );

    Ok(Accrual {
        elapsed_days,
        remaining_days,
        total_earnings,
        remaining_amount,
        available_balance,
    })
}

/// Accrual plus the team figures derived from the downline
pub fn derive_earnings(
    snapshot: &AccountSnapshot,
    downline: &DownlineTree,
    now: DateTime<Utc>,
    policy: AccrualPolicy,
) -> Result<DerivedEarnings> {
    let accrual = compute_with_policy(snapshot, now, policy)?;
    let team_size = rank::total_team_size(downline);
    Ok(DerivedEarnings::from_parts(accrual, team_size, rank::rank(team_size)))
}

/// Plan units earn the daily rate for each day. Products that leave the
/// decimal range are reported instead of wrapping or panicking.
fn accrue(units: Decimal, days: i64) -> Result<Decimal> {
    units
        .checked_mul(Decimal::from(days))
        .and_then(|amount| amount.checked_mul(DAILY_RATE))
        .ok_or_else(plan_too_large)
}

fn plan_too_large() -> Error {
    Error::InvalidSnapshot("plan amount too large".to_string())
}

/// Whole days between join and `now`. Unknown join dates count as `now`;
/// join dates in the future clamp to zero.
fn elapsed_days(joined_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    let Some(joined_at) = joined_at else {
        return 0;
    };
    if joined_at > now {
        log::warn!("Join date {} is after evaluation time {}", joined_at, now);
        return 0;
    }
    (now - joined_at).num_days()
}
