pub mod admin_model;
pub mod admin_service;

pub use admin_model::{AdminUserRow, EarningsAdjustment, KycDecision, PlatformStats};
pub use admin_service::{
    apply_kyc_decision, credit_earnings, pending_kyc, platform_stats, search_users,
    update_withdrawal_status,
};
