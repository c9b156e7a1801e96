/// Tests for plan accrual: elapsed/remaining days, earnings, withdrawable balance
/// and the team/rank figures folded into the derived earnings.

#[cfg(test)]
mod accrual_tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use teamfolio_core::earnings::{compute, compute_with_policy, AccrualPolicy};
    use serde_json::json;
    use teamfolio_core::members::{parse_plan_amount, AccountSnapshot};
    use teamfolio_core::Error;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 24, 12, 0, 0).unwrap()
    }

    fn joined_days_ago(days: i64) -> DateTime<Utc> {
        now() - Duration::days(days)
    }

    #[test]
    fn test_unpaid_plan_earns_nothing() {
        let snapshot = AccountSnapshot::new(dec!(50000), Some(joined_days_ago(300)), false).unwrap();
        let accrual = compute(&snapshot, now()).unwrap();

        assert_eq!(accrual.elapsed_days, 0);
        assert_eq!(accrual.remaining_days, 0);
        assert_eq!(accrual.total_earnings, dec!(0));
        assert_eq!(accrual.remaining_amount, dec!(0));
        assert_eq!(accrual.available_balance, dec!(0));
    }

    #[test]
    fn test_joined_today() {
        let snapshot = AccountSnapshot::new(dec!(50000), Some(now()), true).unwrap();
        let accrual = compute(&snapshot, now()).unwrap();

        assert_eq!(accrual.elapsed_days, 0);
        assert_eq!(accrual.remaining_days, 730);
        assert_eq!(accrual.total_earnings, dec!(0));
        assert_eq!(accrual.remaining_amount, dec!(146000));
    }

    #[test]
    fn test_hundred_days_on_default_plan() {
        // 2024-01-15 00:00 to 2024-04-24 12:00 is 100.5 days
        let joined = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let snapshot = AccountSnapshot::new(dec!(50000), Some(joined), true).unwrap();
        let accrual = compute(&snapshot, now()).unwrap();

        assert_eq!(accrual.elapsed_days, 100, "partial days are floored");
        assert_eq!(accrual.remaining_days, 630);
        assert_eq!(accrual.total_earnings, dec!(20000));
        assert_eq!(accrual.remaining_amount, dec!(126000));
        assert_eq!(accrual.available_balance, dec!(16000));
    }

    #[test]
    fn test_days_add_up_to_term() {
        for days in [0, 1, 29, 365, 729, 730] {
            let snapshot = AccountSnapshot::new(dec!(10000), Some(joined_days_ago(days)), true).unwrap();
            let accrual = compute(&snapshot, now()).unwrap();
            assert_eq!(
                accrual.elapsed_days + accrual.remaining_days,
                730,
                "elapsed + remaining should cover the term at {} days",
                days
            );
        }
    }

    #[test]
    fn test_remaining_days_zero_after_term() {
        for days in [730, 731, 1000] {
            let snapshot = AccountSnapshot::new(dec!(10000), Some(joined_days_ago(days)), true).unwrap();
            let accrual = compute(&snapshot, now()).unwrap();
            assert_eq!(accrual.remaining_days, 0);
            assert_eq!(accrual.remaining_amount, dec!(0));
        }
    }

    #[test]
    fn test_earnings_freeze_at_term_by_default() {
        let snapshot = AccountSnapshot::new(dec!(10000), Some(joined_days_ago(1000)), true).unwrap();

        let capped = compute(&snapshot, now()).unwrap();
        assert_eq!(capped.elapsed_days, 1000);
        assert_eq!(capped.total_earnings, dec!(29200), "730 days x 40");

        let uncapped = compute_with_policy(&snapshot, now(), AccrualPolicy::Uncapped).unwrap();
        assert_eq!(uncapped.total_earnings, dec!(40000), "1000 days x 40");
        assert_eq!(uncapped.remaining_days, 0);
    }

    #[test]
    fn test_available_balance_is_eighty_percent() {
        let plans = [dec!(0), dec!(10000), dec!(12345.67), dec!(50000), dec!(250000)];
        for plan in plans {
            for days in [0, 1, 37, 400, 900] {
                let snapshot = AccountSnapshot::new(plan, Some(joined_days_ago(days)), true).unwrap();
                let accrual = compute(&snapshot, now()).unwrap();
                assert_eq!(accrual.available_balance, accrual.total_earnings * dec!(0.8));
            }
        }
    }

    #[test]
    fn test_fractional_plan_is_exact() {
        let snapshot = AccountSnapshot::new(dec!(12345.67), Some(joined_days_ago(37)), true).unwrap();
        let accrual = compute(&snapshot, now()).unwrap();
        // 1.234567 * 37 * 40
        assert_eq!(accrual.total_earnings, dec!(1827.15916));
    }

    #[test]
    fn test_future_join_date_clamps_to_zero() {
        let snapshot = AccountSnapshot::new(dec!(50000), Some(now() + Duration::days(5)), true).unwrap();
        let accrual = compute(&snapshot, now()).unwrap();

        assert_eq!(accrual.elapsed_days, 0);
        assert_eq!(accrual.remaining_days, 730);
        assert_eq!(accrual.total_earnings, dec!(0));
    }

    #[test]
    fn test_unknown_join_date_counts_as_now() {
        let snapshot = AccountSnapshot::new(dec!(50000), None, true).unwrap();
        let accrual = compute(&snapshot, now()).unwrap();
        assert_eq!(accrual.elapsed_days, 0);
        assert_eq!(accrual.remaining_days, 730);
    }

    #[test]
    fn test_invalid_plan_amounts_fail() {
        assert!(matches!(
            AccountSnapshot::new(dec!(-1), None, true),
            Err(Error::InvalidSnapshot(_))
        ));
        assert!(matches!(
            AccountSnapshot::from_f64(f64::NAN, None, true),
            Err(Error::InvalidSnapshot(_))
        ));

        // Snapshots built by hand bypass the constructor but not the calculator
        let forged = AccountSnapshot {
            plan_amount: dec!(-500),
            joined_at: None,
            payment_completed: true,
        };
        assert!(matches!(compute(&forged, now()), Err(Error::InvalidSnapshot(_))));
    }

    #[test]
    fn test_plan_amount_beyond_decimal_range_is_rejected() {
        let plan = parse_plan_amount(Some(&json!("70000000000000000000000000000"))).unwrap();
        let snapshot = AccountSnapshot::new(plan, Some(joined_days_ago(100)), true).unwrap();

        match compute(&snapshot, now()) {
            Err(Error::InvalidSnapshot(message)) => assert_eq!(message, "plan amount too large"),
            other => panic!("Expected an invalid snapshot, got {:?}", other),
        }
        assert!(
            compute_with_policy(&snapshot, now(), AccrualPolicy::Uncapped).is_err(),
            "Overflow must be reported under every policy"
        );
    }
}

#[cfg(test)]
mod derived_earnings_tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use teamfolio_core::earnings::{derive_earnings, AccrualPolicy};
    use teamfolio_core::members::{AccountSnapshot, DownlineMember, DownlineTree};
    use teamfolio_core::rank::Rank;

    fn members(prefix: &str, count: usize) -> Vec<DownlineMember> {
        (0..count)
            .map(|i| DownlineMember {
                id: format!("{}-{}", prefix, i),
                name: format!("Member {}", i),
                earnings: None,
                joined_date: None,
            })
            .collect()
    }

    #[test]
    fn test_team_size_and_rank_included() {
        let now = Utc.with_ymd_and_hms(2024, 4, 24, 12, 0, 0).unwrap();
        let joined = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let snapshot = AccountSnapshot::new(dec!(50000), Some(joined), true).unwrap();
        let downline = DownlineTree {
            level1: members("l1", 10),
            level3: members("l3", 7),
            level7: members("l7", 5),
            ..Default::default()
        };

        let derived = derive_earnings(&snapshot, &downline, now, AccrualPolicy::CapAtTerm).unwrap();
        assert_eq!(derived.total_team_size, 22);
        assert_eq!(derived.rank, Rank::Silver);
        assert_eq!(derived.total_earnings, dec!(20000));
        assert_eq!(derived.reserved_amount(), dec!(4000));
    }

    #[test]
    fn test_unpaid_member_still_gets_team_figures() {
        let now = Utc.with_ymd_and_hms(2024, 4, 24, 12, 0, 0).unwrap();
        let snapshot = AccountSnapshot::new(dec!(50000), None, false).unwrap();
        let downline = DownlineTree {
            level2: members("l2", 60),
            ..Default::default()
        };

        let derived = derive_earnings(&snapshot, &downline, now, AccrualPolicy::default()).unwrap();
        assert_eq!(derived.total_earnings, dec!(0));
        assert_eq!(derived.total_team_size, 60);
        assert_eq!(derived.rank, Rank::Gold);
    }
}
