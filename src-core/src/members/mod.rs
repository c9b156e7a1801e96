pub mod dashboard_model;
pub mod http_source;
pub mod kyc;
pub mod members_model;
pub mod members_service;
pub mod members_traits;
pub mod withdrawal_model;

pub use dashboard_model::{KycNotice, LevelSummary, MemberDashboard};
pub use http_source::HttpMemberSource;
pub use kyc::{KycDetails, KycFieldError, KycFieldRule, KycFieldValidation, KycSchema, KycSection};
pub use members_model::{
    parse_joined_at, parse_plan_amount, AccountSnapshot, BankDetails, DownlineMember,
    DownlineTree, KycStatus, MemberProfile, MemberRecord, RawUserData, ReferredBy,
};
pub use members_service::MemberService;
pub use members_traits::{MemberDataSource, MemberServiceTrait};
pub use withdrawal_model::{
    check_withdrawal, committed_amount, withdrawable_balance, WithdrawalRecord, WithdrawalStatus,
};
