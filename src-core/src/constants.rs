use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Length of a plan term in days, measured from the join date
pub const PLAN_TERM_DAYS: i64 = 730;

/// Plan units the daily rate is expressed against
pub const RATE_BASIS: Decimal = dec!(10000);

/// Amount accrued per day for every `RATE_BASIS` plan units
pub const DAILY_RATE: Decimal = dec!(40);

/// Share of accrued earnings that can be withdrawn; the rest is held back
pub const WITHDRAWABLE_SHARE: Decimal = dec!(0.8);

/// Plan amount assumed when the user-data service omits it
pub const DEFAULT_PLAN_AMOUNT: Decimal = dec!(50000);

/// Number of referral levels tracked in a downline
pub const DOWNLINE_DEPTH: usize = 7;
