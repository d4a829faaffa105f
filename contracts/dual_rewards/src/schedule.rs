//! Emission timeline for both reward streams.
//!
//! The timeline is an append-only sequence of [`Segment`]s indexed from 0.
//! Each segment emits its rates from its own `start` until the `start` of
//! the next one. The last entry is always a sentinel with zero rates marking
//! the point where the schedule runs dry until the next inflow report.

use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::{ContractError, StreamAmounts};

// ── Storage keys ─────────────────────────────────────────────────────────────

const SEG_COUNT: Symbol = symbol_short!("SEG_CNT");
const LAST_REPORT: Symbol = symbol_short!("LAST_RPT");

// Segments use tuple keys: (SEGMENT, index)
const SEGMENT: Symbol = symbol_short!("SEGMENT");

const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 3_110_400;

// ── Types ────────────────────────────────────────────────────────────────────

/// One boundary of the timeline and the rates that apply from it onward.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Segment {
    pub start: u64,
    /// StreamA units emitted per second.
    pub rate_a: i128,
    /// StreamB units emitted per second.
    pub rate_b: i128,
}

/// What a single inflow report did to the timeline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rescheduled {
    /// Scheduled-but-unelapsed reward folded into the new segment.
    pub outstanding: StreamAmounts,
    pub rates: StreamAmounts,
    pub start: u64,
    pub end: u64,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn segment_key(index: u32) -> (Symbol, u32) {
    (SEGMENT, index)
}

pub fn segment_count(env: &Env) -> u32 {
    env.storage().instance().get(&SEG_COUNT).unwrap_or(0)
}

pub fn get_segment(env: &Env, index: u32) -> Option<Segment> {
    env.storage().persistent().get(&segment_key(index))
}

fn put_segment(env: &Env, index: u32, segment: &Segment) {
    let key = segment_key(index);
    env.storage().persistent().set(&key, segment);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Timestamp of the sentinel boundary, or `None` for an empty schedule.
pub fn final_boundary(env: &Env) -> Option<u64> {
    let count = segment_count(env);
    if count == 0 {
        return None;
    }
    get_segment(env, count - 1).map(|s| s.start)
}

/// Timestamp of the most recent inflow report.
pub fn last_report(env: &Env) -> Option<u64> {
    env.storage().instance().get(&LAST_REPORT)
}

// ── Queries ──────────────────────────────────────────────────────────────────

/// Rates in force at `now`; zero before the first boundary and once the
/// schedule has lapsed.
pub fn rate_at(env: &Env, now: u64) -> StreamAmounts {
    let mut index = segment_count(env);
    while index > 0 {
        index -= 1;
        let Some(segment) = get_segment(env, index) else {
            break;
        };
        if segment.start <= now {
            return StreamAmounts {
                a: segment.rate_a,
                b: segment.rate_b,
            };
        }
    }
    StreamAmounts::zero()
}

/// Reward still scheduled to be emitted after `now`.
///
/// Walks back from the sentinel and stops at the first segment that has
/// already ended. Once `now` reaches the sentinel nothing is outstanding.
pub fn outstanding_remainder(env: &Env, now: u64) -> Result<StreamAmounts, ContractError> {
    let mut remainder = StreamAmounts::zero();
    let count = segment_count(env);
    if count < 2 {
        return Ok(remainder);
    }
    let Some(sentinel) = get_segment(env, count - 1) else {
        return Ok(remainder);
    };

    let mut end = sentinel.start;
    let mut index = count - 1;
    while index > 0 && end > now {
        index -= 1;
        let Some(segment) = get_segment(env, index) else {
            break;
        };
        let left = end - segment.start.max(now);
        remainder = remainder.checked_add(&StreamAmounts {
            a: scaled(segment.rate_a, left)?,
            b: scaled(segment.rate_b, left)?,
        })?;
        end = segment.start;
    }
    Ok(remainder)
}

pub(crate) fn scaled(rate: i128, seconds: u64) -> Result<i128, ContractError> {
    rate.checked_mul(i128::from(seconds))
        .ok_or(ContractError::InvalidAmount)
}

// ── Mutation ─────────────────────────────────────────────────────────────────

/// Schedules `inflow` over `[now, now + period)`.
///
/// Whatever the current schedule has not yet emitted is folded into the new
/// segment. If the sentinel still lies ahead (or exactly at `now`) it is
/// moved back to `now` and becomes the new segment's boundary; otherwise the
/// lapsed gap keeps its zero rate and the new boundary is appended. A fresh
/// sentinel closes the timeline at `now + period`.
///
/// The caller must settle the accumulators at `now` afterwards.
pub fn reschedule(
    env: &Env,
    now: u64,
    inflow: &StreamAmounts,
    period: u64,
) -> Result<Rescheduled, ContractError> {
    if last_report(env).is_some_and(|previous| now <= previous) {
        return Err(ContractError::TooSoon);
    }
    if period == 0 {
        return Err(ContractError::InvalidPeriod);
    }
    if inflow.a < 0 || inflow.b < 0 {
        return Err(ContractError::InvalidAmount);
    }
    let end = now.checked_add(period).ok_or(ContractError::InvalidPeriod)?;

    let outstanding = outstanding_remainder(env, now)?;
    let supply = inflow.checked_add(&outstanding)?;
    let divisor = i128::from(period);
    let rates = StreamAmounts {
        a: supply.a / divisor,
        b: supply.b / divisor,
    };

    let count = segment_count(env);
    let mut index = count;
    if count > 0 && final_boundary(env).is_some_and(|boundary| now <= boundary) {
        index = count - 1;
    }

    put_segment(
        env,
        index,
        &Segment {
            start: now,
            rate_a: rates.a,
            rate_b: rates.b,
        },
    );
    put_segment(
        env,
        index + 1,
        &Segment {
            start: end,
            rate_a: 0,
            rate_b: 0,
        },
    );
    env.storage().instance().set(&SEG_COUNT, &(index + 2));
    env.storage().instance().set(&LAST_REPORT, &now);

    Ok(Rescheduled {
        outstanding,
        rates,
        start: now,
        end,
    })
}
