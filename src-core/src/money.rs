//! Decimal helpers for amounts that arrive from outside and may be arbitrarily large.

use rust_decimal::Decimal;

use crate::errors::{Result, ValidationError};

/// Adds up `values`, failing instead of panicking when the total leaves the decimal range.
/// `what` names the total in the error message.
pub fn checked_sum<I>(values: I, what: &str) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(value))
        .ok_or_else(|| ValidationError::InvalidInput(format!("{} total is out of range", what)).into())
}
