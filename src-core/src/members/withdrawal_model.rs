//! Withdrawal history and the balance checks made before a new request.

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

use crate::errors::{Result, ValidationError};
use crate::money::checked_sum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Processing,
    Completed,
}

impl WithdrawalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Processing => "processing",
            WithdrawalStatus::Completed => "completed",
        }
    }

    /// Requests only move forward: pending, then processing, then completed.
    /// Skipping processing is allowed.
    pub fn can_advance_to(&self, next: WithdrawalStatus) -> bool {
        matches!(
            (self, next),
            (WithdrawalStatus::Pending, WithdrawalStatus::Processing)
                | (WithdrawalStatus::Pending, WithdrawalStatus::Completed)
                | (WithdrawalStatus::Processing, WithdrawalStatus::Completed)
        )
    }
}

/// One entry of a member's withdrawal history
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRecord {
    /// The backend sends numeric ids; they are kept as text
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub amount: Decimal,
    pub status: WithdrawalStatus,
    pub date: String,
    #[serde(default)]
    pub txn_id: Option<String>,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "withdrawal id must be a string or number, got {}",
            other
        ))),
    }
}

/// Amount already taken out of the balance. Every recorded request counts,
/// whether it has been paid out yet or not.
pub fn committed_amount(history: &[WithdrawalRecord]) -> Result<Decimal> {
    checked_sum(history.iter().map(|w| w.amount), "withdrawal history")
}

/// Available balance minus everything already requested, never below zero
pub fn withdrawable_balance(
    available_balance: Decimal,
    history: &[WithdrawalRecord],
) -> Result<Decimal> {
    let committed = committed_amount(history)?;
    let left = available_balance.checked_sub(committed).ok_or_else(|| {
        ValidationError::InvalidInput("withdrawal history total is out of range".to_string())
    })?;
    Ok(left.max(Decimal::ZERO))
}

/// A new request must be positive and must fit inside `available_balance`.
/// Returns what is left afterwards.
pub fn check_withdrawal(amount: Decimal, available_balance: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "withdrawal amount must be positive, got {}",
            amount
        ))
        .into());
    }
    if amount > available_balance {
        return Err(ValidationError::InvalidInput(format!(
            "withdrawal of {} exceeds the available balance of {}",
            amount, available_balance
        ))
        .into());
    }
    Ok(available_balance - amount)
}
