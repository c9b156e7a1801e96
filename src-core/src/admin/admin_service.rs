use crate::admin::admin_model::{AdminUserRow, EarningsAdjustment, KycDecision, PlatformStats};
use rust_decimal::Decimal;

use crate::errors::{Error, Result, ValidationError};
use crate::members::members_model::KycStatus;
use crate::members::withdrawal_model::{WithdrawalRecord, WithdrawalStatus};
use crate::money::checked_sum;

pub fn platform_stats(users: &[AdminUserRow]) -> Result<PlatformStats> {
    Ok(PlatformStats {
        total_users: users.len(),
        total_earnings: checked_sum(users.iter().map(|u| u.total_earnings), "platform earnings")?,
        pending_kyc: count_with_status(users, KycStatus::Pending),
        approved_users: count_with_status(users, KycStatus::Approved),
    })
}

fn count_with_status(users: &[AdminUserRow], status: KycStatus) -> usize {
    users.iter().filter(|u| u.kyc_status == status).count()
}

/// Case-insensitive match on name or email, plain substring match on mobile.
/// A blank term matches everyone.
pub fn search_users(users: &[AdminUserRow], term: &str) -> Vec<AdminUserRow> {
    let term = term.trim();
    if term.is_empty() {
        return users.to_vec();
    }
    let needle = term.to_lowercase();

    users
        .iter()
        .filter(|u| {
            u.name.to_lowercase().contains(&needle)
                || u.mobile.contains(term)
                || u.email.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn pending_kyc(users: &[AdminUserRow]) -> Vec<AdminUserRow> {
    users
        .iter()
        .filter(|u| u.kyc_status == KycStatus::Pending)
        .cloned()
        .collect()
}

pub fn apply_kyc_decision(
    users: &[AdminUserRow],
    user_id: &str,
    decision: KycDecision,
) -> Result<Vec<AdminUserRow>> {
    let target = find_user(users, user_id)?;
    if target.kyc_status != KycStatus::Pending {
        return Err(ValidationError::InvalidInput(format!(
            "KYC for '{}' is already {}",
            user_id,
            target.kyc_status.as_str()
        ))
        .into());
    }

    let status = KycStatus::from(decision);
    log::info!("KYC for {} set to {}", user_id, status.as_str());

    Ok(users
        .iter()
        .map(|u| {
            if u.id == user_id {
                AdminUserRow {
                    kyc_status: status,
                    ..u.clone()
                }
            } else {
                u.clone()
            }
        })
        .collect())
}

/// Adds a positive amount to both total earnings and available balance of an
/// approved member.
pub fn credit_earnings(
    users: &[AdminUserRow],
    adjustment: &EarningsAdjustment,
) -> Result<Vec<AdminUserRow>> {
    if adjustment.amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "earnings credit must be positive, got {}",
            adjustment.amount
        ))
        .into());
    }

    let target = find_user(users, &adjustment.user_id)?;
    if target.kyc_status != KycStatus::Approved {
        return Err(ValidationError::InvalidInput(format!(
            "'{}' has no approved KYC",
            adjustment.user_id
        ))
        .into());
    }

    let credit = |current: Decimal| {
        current.checked_add(adjustment.amount).ok_or_else(|| {
            ValidationError::InvalidInput(format!(
                "credit of {} to '{}' is out of range",
                adjustment.amount, adjustment.user_id
            ))
        })
    };
    let total_earnings = credit(target.total_earnings)?;
    let available_balance = credit(target.available_balance)?;

    log::info!("Crediting {} to {}", adjustment.amount, adjustment.user_id);

    Ok(users
        .iter()
        .map(|u| {
            if u.id == adjustment.user_id {
                AdminUserRow {
                    total_earnings,
                    available_balance,
                    ..u.clone()
                }
            } else {
                u.clone()
            }
        })
        .collect())
}

/// Moves one withdrawal request forward (pending, processing, completed).
pub fn update_withdrawal_status(
    history: &[WithdrawalRecord],
    withdrawal_id: &str,
    status: WithdrawalStatus,
) -> Result<Vec<WithdrawalRecord>> {
    let target = history
        .iter()
        .find(|w| w.id == withdrawal_id)
        .ok_or_else(|| {
            ValidationError::InvalidInput(format!("no withdrawal with id '{}'", withdrawal_id))
        })?;
    if !target.status.can_advance_to(status) {
        return Err(ValidationError::InvalidInput(format!(
            "withdrawal '{}' cannot move from {} to {}",
            withdrawal_id,
            target.status.as_str(),
            status.as_str()
        ))
        .into());
    }

    log::info!("Withdrawal {} set to {}", withdrawal_id, status.as_str());

    Ok(history
        .iter()
        .map(|w| {
            if w.id == withdrawal_id {
                WithdrawalRecord {
                    status,
                    ..w.clone()
                }
            } else {
                w.clone()
            }
        })
        .collect())
}

fn find_user<'a>(users: &'a [AdminUserRow], user_id: &str) -> Result<&'a AdminUserRow> {
    users
        .iter()
        .find(|u| u.id == user_id)
        .ok_or_else(|| Error::MemberNotFound(user_id.to_string()))
}
