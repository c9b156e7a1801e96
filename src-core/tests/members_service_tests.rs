/// Tests for the member dashboard service over an in-memory data source

#[cfg(test)]
mod member_service_tests {
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use teamfolio_core::earnings::AccrualPolicy;
    use teamfolio_core::members::{
        AccountSnapshot, DownlineTree, KycStatus, MemberDataSource, MemberProfile, MemberRecord,
        MemberService, MemberServiceTrait, RawUserData, WithdrawalRecord, WithdrawalStatus,
    };
    use teamfolio_core::rank::Rank;
    use teamfolio_core::{Error, Result, ValidationError};

    const USER_DATA: &str = r#"{
        "id": "user123",
        "name": "John Doe",
        "mobile": "+91 9876543210",
        "email": "john.doe@example.com",
        "kycStatus": "approved",
        "planAmount": 50000,
        "joinedDate": "2024-01-15",
        "paymentStatus": true,
        "referralCode": "MLM123ABC",
        "referredBy": { "code": "MLM456DEF", "name": "Jane Smith" },
        "downline": {
            "level1": [
                { "id": "1", "name": "Alice Smith", "earnings": 5200.00, "joinedDate": "2024-02-01" },
                { "id": "2", "name": "Bob Johnson", "earnings": 3150.25, "joinedDate": "2024-02-15" },
                { "id": "3", "name": "Carol Davis", "earnings": 4850.50, "joinedDate": "2024-03-01" }
            ],
            "level2": [
                { "id": "4", "name": "David Wilson", "earnings": 2100.00, "joinedDate": "2024-03-10" },
                { "id": "5", "name": "Eva Brown", "earnings": 1850.75, "joinedDate": "2024-03-15" },
                { "id": "6", "name": "Frank Miller", "earnings": 2750.25, "joinedDate": "2024-04-01" },
                { "id": "7", "name": "Grace Lee", "earnings": 1950.50, "joinedDate": "2024-04-10" }
            ],
            "level3": [
                { "id": "8", "name": "Henry Clark", "earnings": 1200.00, "joinedDate": "2024-04-15" }
            ],
            "level4": [], "level5": [], "level6": [], "level7": []
        },
        "withdrawals": [
            { "id": 1, "amount": 5000, "status": "completed", "date": "2024-07-15", "txnId": "TXN123456" },
            { "id": 2, "amount": 2500, "status": "pending", "date": "2024-07-20", "txnId": "TXN123457" },
            { "id": 3, "amount": 3000, "status": "processing", "date": "2024-07-22", "txnId": "TXN123458" }
        ]
    }"#;

    /// Serves whole user documents and counts how often one is read
    struct InMemorySource {
        users: HashMap<String, RawUserData>,
        reads: AtomicUsize,
    }

    impl InMemorySource {
        fn with(entries: Vec<(&str, &str)>) -> Self {
            let users = entries
                .into_iter()
                .map(|(id, body)| (id.to_string(), RawUserData::from_json(body).unwrap()))
                .collect();
            Self {
                users,
                reads: AtomicUsize::new(0),
            }
        }

        fn get(&self, member_id: &str) -> Result<&RawUserData> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.users
                .get(member_id)
                .ok_or_else(|| Error::MemberNotFound(member_id.to_string()))
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MemberDataSource for InMemorySource {
        async fn fetch_account_snapshot(&self, member_id: &str) -> Result<AccountSnapshot> {
            self.get(member_id)?.account_snapshot()
        }

        async fn fetch_downline(&self, member_id: &str) -> Result<DownlineTree> {
            Ok(self.get(member_id)?.downline())
        }

        async fn fetch_profile(&self, member_id: &str) -> Result<MemberProfile> {
            Ok(self.get(member_id)?.profile(member_id))
        }

        async fn fetch_withdrawals(&self, member_id: &str) -> Result<Vec<WithdrawalRecord>> {
            Ok(self.get(member_id)?.withdrawals.clone())
        }

        async fn fetch_member(&self, member_id: &str) -> Result<MemberRecord> {
            self.get(member_id)?.clone().into_record(member_id)
        }
    }

    /// Only the per-view fetches, so the service goes through the composed default
    struct ViewsOnly(Arc<InMemorySource>);

    #[async_trait]
    impl MemberDataSource for ViewsOnly {
        async fn fetch_account_snapshot(&self, member_id: &str) -> Result<AccountSnapshot> {
            self.0.fetch_account_snapshot(member_id).await
        }

        async fn fetch_downline(&self, member_id: &str) -> Result<DownlineTree> {
            self.0.fetch_downline(member_id).await
        }

        async fn fetch_profile(&self, member_id: &str) -> Result<MemberProfile> {
            self.0.fetch_profile(member_id).await
        }

        async fn fetch_withdrawals(&self, member_id: &str) -> Result<Vec<WithdrawalRecord>> {
            self.0.fetch_withdrawals(member_id).await
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 24, 12, 0, 0).unwrap()
    }

    fn service(entries: Vec<(&str, &str)>) -> MemberService<InMemorySource> {
        MemberService::new(Arc::new(InMemorySource::with(entries)))
    }

    #[tokio::test]
    async fn test_dashboard_from_user_data() {
        let service = service(vec![("user123", USER_DATA)]);
        let dashboard = service.get_dashboard("user123", now()).await.unwrap();

        assert_eq!(dashboard.profile.name, "John Doe");
        assert_eq!(dashboard.profile.kyc_status, KycStatus::Approved);
        assert!(dashboard.kyc_notice.is_none());
        assert_eq!(dashboard.plan_amount, dec!(50000));

        assert_eq!(dashboard.earnings.elapsed_days, 100);
        assert_eq!(dashboard.earnings.total_earnings, dec!(20000));
        assert_eq!(dashboard.earnings.available_balance, dec!(16000));
        assert_eq!(dashboard.earnings.total_team_size, 8);
        assert_eq!(dashboard.earnings.rank, Rank::Bronze);
        assert_eq!(dashboard.rank_progress.members_to_next, 12);

        let sizes: Vec<usize> = dashboard.levels.iter().map(|l| l.members).collect();
        assert_eq!(sizes, vec![3, 4, 1, 0, 0, 0, 0]);
        assert_eq!(dashboard.levels[0].earnings, dec!(13200.75));
        assert_eq!(dashboard.downline.total_downline_earnings().unwrap(), dec!(23052.25));
    }

    #[tokio::test]
    async fn test_dashboard_reads_user_document_once() {
        let source = Arc::new(InMemorySource::with(vec![("user123", USER_DATA)]));
        let service = MemberService::new(source.clone());

        service.get_dashboard("user123", now()).await.unwrap();
        assert_eq!(source.reads(), 1, "Dashboard should read the member once");

        service.get_earnings("user123", now()).await.unwrap();
        assert_eq!(source.reads(), 2, "Earnings should read the member once");
    }

    #[tokio::test]
    async fn test_per_view_sources_compose_the_same_dashboard() {
        let source = Arc::new(InMemorySource::with(vec![("user123", USER_DATA)]));
        let single = MemberService::new(source.clone());
        let composed = MemberService::new(Arc::new(ViewsOnly(source.clone())));

        let expected = single.get_dashboard("user123", now()).await.unwrap();
        let reads_before = source.reads();
        let dashboard = composed.get_dashboard("user123", now()).await.unwrap();

        assert_eq!(dashboard, expected);
        assert_eq!(source.reads() - reads_before, 4, "One read per view");
    }

    #[tokio::test]
    async fn test_dashboard_withdrawals_reduce_withdrawable_balance() {
        let service = service(vec![("user123", USER_DATA)]);
        let dashboard = service.get_dashboard("user123", now()).await.unwrap();

        assert_eq!(dashboard.withdrawals.len(), 3);
        assert_eq!(dashboard.withdrawals[0].txn_id.as_deref(), Some("TXN123456"));
        assert_eq!(dashboard.withdrawals[2].status, WithdrawalStatus::Processing);
        assert_eq!(dashboard.earnings.available_balance, dec!(16000));
        assert_eq!(dashboard.withdrawable_balance, dec!(5500));
    }

    #[tokio::test]
    async fn test_withdrawal_request_checked_against_balance() {
        let service = service(vec![("user123", USER_DATA)]);

        let left = service.check_withdrawal("user123", dec!(5000), now()).await.unwrap();
        assert_eq!(left, dec!(500));

        let err = service
            .check_withdrawal("user123", dec!(5500.01), now())
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::Validation(ValidationError::InvalidInput(_))),
            "Requests above the withdrawable balance are refused, got {:?}",
            err
        );

        let err = service.check_withdrawal("ghost", dec!(1), now()).await.unwrap_err();
        assert!(matches!(err, Error::MemberNotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_fields_use_defaults() {
        let service = service(vec![("bare", r#"{ "paymentStatus": true }"#)]);
        let dashboard = service.get_dashboard("bare", now()).await.unwrap();

        assert_eq!(dashboard.profile.id, "bare");
        assert_eq!(dashboard.plan_amount, dec!(50000));
        assert!(dashboard.joined_at.is_none());
        assert_eq!(dashboard.earnings.elapsed_days, 0);
        assert_eq!(dashboard.earnings.remaining_days, 730);
        assert_eq!(dashboard.earnings.total_team_size, 0);
        assert!(dashboard.withdrawals.is_empty());

        let notice = dashboard.kyc_notice.expect("pending KYC shows a notice");
        assert_eq!(notice.status, KycStatus::Pending);
        assert_eq!(notice.title, "KYC Verification Pending");
    }

    #[tokio::test]
    async fn test_payment_status_defaults_to_unpaid() {
        let service = service(vec![("u1", r#"{ "planAmount": 20000, "joinedDate": "2023-01-01" }"#)]);
        let earnings = service.get_earnings("u1", now()).await.unwrap();
        assert_eq!(earnings.total_earnings, dec!(0));
        assert_eq!(earnings.elapsed_days, 0);
    }

    #[tokio::test]
    async fn test_unknown_member_is_not_found() {
        let service = service(vec![("user123", USER_DATA)]);
        let err = service.get_dashboard("ghost", now()).await.unwrap_err();
        assert!(matches!(err, Error::MemberNotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_non_numeric_plan_fails_fast() {
        let service = service(vec![(
            "bad",
            r#"{ "planAmount": "lots", "paymentStatus": true }"#,
        )]);
        let err = service.get_earnings("bad", now()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));
    }

    #[tokio::test]
    async fn test_unparseable_join_date_fails_fast() {
        let service = service(vec![(
            "bad",
            r#"{ "joinedDate": "last tuesday", "paymentStatus": true }"#,
        )]);
        let err = service.get_dashboard("bad", now()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));
    }

    #[tokio::test]
    async fn test_policy_is_applied() {
        let body = r#"{ "planAmount": 10000, "joinedDate": "2021-01-01", "paymentStatus": true }"#;
        let source = Arc::new(InMemorySource::with(vec![("old", body)]));

        let capped = MemberService::new(source.clone());
        let uncapped = MemberService::with_policy(source, AccrualPolicy::Uncapped);

        let capped_earnings = capped.get_earnings("old", now()).await.unwrap();
        let uncapped_earnings = uncapped.get_earnings("old", now()).await.unwrap();

        assert_eq!(capped_earnings.total_earnings, dec!(29200));
        assert!(uncapped_earnings.total_earnings > capped_earnings.total_earnings);
        assert_eq!(
            uncapped_earnings.total_earnings,
            dec!(40) * rust_decimal::Decimal::from(uncapped_earnings.elapsed_days)
        );
    }
}
