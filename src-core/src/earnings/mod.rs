pub mod earnings_calculator;
pub mod earnings_model;

pub use earnings_calculator::{compute, compute_with_policy, derive_earnings};
pub use earnings_model::{Accrual, AccrualPolicy, DerivedEarnings};
