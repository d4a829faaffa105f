extern crate std;

use soroban_sdk::Env;

use crate::accrual::{self, segment_duration};
use crate::schedule::{self, Segment};
use crate::{ContractError, DualRewardsPool, StreamAmounts};

fn within_pool<T>(f: impl FnOnce(&Env) -> T) -> T {
    let env = Env::default();
    let id = env.register(DualRewardsPool, ());
    env.as_contract(&id, || f(&env))
}

fn inflow(a: i128, b: i128) -> StreamAmounts {
    StreamAmounts { a, b }
}

// ── Duration rule, one branch at a time ──────────────────────────────────────

#[test]
fn duration_segment_ended_before_now() {
    // Segment [10, 20), settled at 14, now 25 → counts 14..20.
    assert_eq!(segment_duration(10, 20, 14, 25), 6);
    // Ends exactly at now.
    assert_eq!(segment_duration(10, 20, 14, 20), 6);
}

#[test]
fn duration_segment_ended_and_began_after_settlement() {
    // Segment [10, 20), settled at 4, now 25 → full width.
    assert_eq!(segment_duration(10, 20, 4, 25), 10);
}

#[test]
fn duration_running_segment_began_after_settlement() {
    // Segment [10, 20), settled at 4, now 13 → counts 10..13.
    assert_eq!(segment_duration(10, 20, 4, 13), 3);
    // Settled exactly on the boundary.
    assert_eq!(segment_duration(10, 20, 10, 13), 3);
}

#[test]
fn duration_running_segment_contains_settlement() {
    // Segment [10, 20), settled at 12, now 17 → counts 12..17.
    assert_eq!(segment_duration(10, 20, 12, 17), 5);
}

#[test]
fn duration_segment_fully_before_settlement() {
    assert_eq!(segment_duration(10, 20, 20, 30), 0);
    assert_eq!(segment_duration(10, 20, 25, 30), 0);
}

#[test]
fn duration_segment_not_started() {
    assert_eq!(segment_duration(10, 20, 2, 8), 0);
}

// ── Timeline mutation ────────────────────────────────────────────────────────

#[test]
fn first_report_writes_segment_and_sentinel() {
    within_pool(|env| {
        let report = schedule::reschedule(env, 100, &inflow(700, 70), 7).unwrap();
        assert_eq!(report.rates, inflow(100, 10));
        assert_eq!(report.outstanding, StreamAmounts::zero());
        assert_eq!((report.start, report.end), (100, 107));

        assert_eq!(schedule::segment_count(env), 2);
        assert_eq!(
            schedule::get_segment(env, 0),
            Some(Segment {
                start: 100,
                rate_a: 100,
                rate_b: 10
            })
        );
        assert_eq!(schedule::final_boundary(env), Some(107));
        assert_eq!(schedule::last_report(env), Some(100));
    });
}

#[test]
fn early_report_moves_sentinel_back() {
    within_pool(|env| {
        schedule::reschedule(env, 0, &inflow(7_000, 0), 7).unwrap();
        let report = schedule::reschedule(env, 5, &inflow(0, 0), 7).unwrap();

        assert_eq!(report.outstanding, inflow(2_000, 0));
        assert_eq!(schedule::segment_count(env), 3);
        assert_eq!(schedule::get_segment(env, 1).unwrap().start, 5);
        assert_eq!(schedule::final_boundary(env), Some(12));
    });
}

#[test]
fn late_report_keeps_gap_at_zero_rate() {
    within_pool(|env| {
        schedule::reschedule(env, 0, &inflow(70, 7), 7).unwrap();
        let report = schedule::reschedule(env, 9, &inflow(70, 7), 7).unwrap();

        assert_eq!(report.outstanding, StreamAmounts::zero());
        assert_eq!(schedule::segment_count(env), 4);
        assert_eq!(schedule::rate_at(env, 8), StreamAmounts::zero());
        assert_eq!(schedule::rate_at(env, 9), inflow(10, 1));
    });
}

#[test]
fn boundaries_stay_strictly_increasing() {
    within_pool(|env| {
        for now in [0u64, 3, 10, 11, 40, 41, 42] {
            schedule::reschedule(env, now, &inflow(1_000, 500), 10).unwrap();
        }
        let count = schedule::segment_count(env);
        for i in 1..count {
            let prev = schedule::get_segment(env, i - 1).unwrap().start;
            let next = schedule::get_segment(env, i).unwrap().start;
            assert!(prev < next, "boundary {} not after {}", next, prev);
        }
    });
}

#[test]
fn same_instant_report_is_too_soon() {
    within_pool(|env| {
        schedule::reschedule(env, 4, &inflow(1, 1), 7).unwrap();
        assert_eq!(
            schedule::reschedule(env, 4, &inflow(1, 1), 7),
            Err(ContractError::TooSoon)
        );
    });
}

#[test]
fn rate_is_zero_before_first_report() {
    within_pool(|env| {
        assert_eq!(schedule::rate_at(env, 0), StreamAmounts::zero());
        assert_eq!(schedule::final_boundary(env), None);
        assert_eq!(
            schedule::outstanding_remainder(env, 0),
            Ok(StreamAmounts::zero())
        );
    });
}

// ── Integration over several segments ────────────────────────────────────────

#[test]
fn elapsed_rewards_spans_multiple_segments() {
    within_pool(|env| {
        // [0,10) 100/s, [10,20) 0, [20,30) 10/s.
        schedule::reschedule(env, 0, &inflow(1_000, 0), 10).unwrap();
        schedule::reschedule(env, 20, &inflow(100, 50), 10).unwrap();

        assert_eq!(
            accrual::elapsed_rewards(env, 5, 25),
            Ok(inflow(500 + 50, 25))
        );
        assert_eq!(
            accrual::elapsed_rewards(env, 0, 40),
            Ok(inflow(1_000 + 100, 50))
        );
        assert_eq!(accrual::elapsed_rewards(env, 30, 40), Ok(StreamAmounts::zero()));
    });
}

#[test]
fn settle_with_no_stake_only_moves_clock() {
    within_pool(|env| {
        accrual::init(env, 0);
        schedule::reschedule(env, 0, &inflow(1_000, 0), 10).unwrap();

        let state = accrual::settle(env, 6).unwrap();
        assert_eq!(state.acc_per_share_a, 0);
        assert_eq!(state.last_settled, 6);
    });
}

#[test]
fn settle_after_lapse_is_a_no_op() {
    within_pool(|env| {
        accrual::init(env, 0);
        accrual::set_total_staked(env, 10);
        schedule::reschedule(env, 0, &inflow(1_000, 0), 10).unwrap();

        let lapsed = accrual::settle(env, 10).unwrap();
        assert_eq!(lapsed.acc_per_share_a, 100 * common::SCALE);

        let later = accrual::settle(env, 50).unwrap();
        assert_eq!(later, lapsed);
    });
}

#[test]
fn settle_is_idempotent_at_one_instant() {
    within_pool(|env| {
        accrual::init(env, 0);
        accrual::set_total_staked(env, 3);
        schedule::reschedule(env, 0, &inflow(1_000, 10), 10).unwrap();

        let first = accrual::settle(env, 7).unwrap();
        let second = accrual::settle(env, 7).unwrap();
        assert_eq!(first, second);
        assert_eq!(accrual::load_state(env), first);
    });
}
