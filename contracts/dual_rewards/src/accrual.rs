//! Global per-share accumulators for both reward streams.
//!
//! `acc_per_share_*` is the reward earned by one unit of stake since the
//! pool started, scaled by [`common::SCALE`]. Both accumulators and
//! `last_settled` only ever move forward.

use common::fixed_point;
use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::schedule::{self, scaled};
use crate::{ContractError, StreamAmounts};

// ── Storage keys ─────────────────────────────────────────────────────────────

const ACCRUAL: Symbol = symbol_short!("ACCRUAL");
const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");

// ── Types ────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccrualState {
    pub acc_per_share_a: i128,
    pub acc_per_share_b: i128,
    pub last_settled: u64,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

pub fn init(env: &Env, now: u64) {
    save_state(
        env,
        &AccrualState {
            acc_per_share_a: 0,
            acc_per_share_b: 0,
            last_settled: now,
        },
    );
}

pub fn load_state(env: &Env) -> AccrualState {
    env.storage()
        .instance()
        .get(&ACCRUAL)
        .unwrap_or(AccrualState {
            acc_per_share_a: 0,
            acc_per_share_b: 0,
            last_settled: 0,
        })
}

fn save_state(env: &Env, state: &AccrualState) {
    env.storage().instance().set(&ACCRUAL, state);
}

pub fn total_staked(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
}

pub fn set_total_staked(env: &Env, total: i128) {
    env.storage().instance().set(&TOTAL_STAKED, &total);
}

// ── Integration over the timeline ────────────────────────────────────────────

/// Seconds of `[start, end)` that fall inside `(last_settled, now]`.
///
/// Three cases:
/// - the segment has ended by `now`: it counts up to its end, from
///   `last_settled` or from its start if it began later;
/// - it is still running and began after the previous settlement: it counts
///   from its start;
/// - it is still running and already contained the previous settlement: it
///   counts from `last_settled`.
pub fn segment_duration(start: u64, end: u64, last_settled: u64, now: u64) -> u64 {
    if end <= now {
        end.saturating_sub(last_settled.max(start))
    } else if last_settled <= start {
        now.saturating_sub(start)
    } else {
        now.saturating_sub(last_settled)
    }
}

/// Total emission of each stream between `last_settled` and `now`.
///
/// Walks back from the sentinel and stops at the first segment that ended
/// at or before `last_settled`, so only the recent tail is ever read.
pub fn elapsed_rewards(
    env: &Env,
    last_settled: u64,
    now: u64,
) -> Result<StreamAmounts, ContractError> {
    let mut total = StreamAmounts::zero();
    let count = schedule::segment_count(env);
    if count < 2 || now <= last_settled {
        return Ok(total);
    }
    let Some(sentinel) = schedule::get_segment(env, count - 1) else {
        return Ok(total);
    };

    let mut end = sentinel.start;
    let mut index = count - 1;
    while index > 0 && end > last_settled {
        index -= 1;
        let Some(segment) = schedule::get_segment(env, index) else {
            break;
        };
        let seconds = segment_duration(segment.start, end, last_settled, now);
        if seconds > 0 {
            total = total.checked_add(&StreamAmounts {
                a: scaled(segment.rate_a, seconds)?,
                b: scaled(segment.rate_b, seconds)?,
            })?;
        }
        end = segment.start;
    }
    Ok(total)
}

// ── Settlement ───────────────────────────────────────────────────────────────

/// Accumulator values as they would be after settling at `now`.
///
/// Leaves storage untouched so views can price pending rewards.
pub fn project(env: &Env, now: u64) -> Result<AccrualState, ContractError> {
    let mut state = load_state(env);
    if now <= state.last_settled {
        return Ok(state);
    }
    match schedule::final_boundary(env) {
        Some(boundary) if state.last_settled < boundary => {}
        // Empty or lapsed schedule: nothing left to hand out.
        _ => return Ok(state),
    }

    let total = total_staked(env);
    if total == 0 {
        // Nobody earns the emission of an empty pool.
        state.last_settled = now;
        return Ok(state);
    }

    let elapsed = elapsed_rewards(env, state.last_settled, now)?;
    state.acc_per_share_a = advance(state.acc_per_share_a, elapsed.a, total)?;
    state.acc_per_share_b = advance(state.acc_per_share_b, elapsed.b, total)?;
    state.last_settled = now;
    Ok(state)
}

fn advance(acc_per_share: i128, emitted: i128, total: i128) -> Result<i128, ContractError> {
    fixed_point::per_share(emitted, total)
        .and_then(|increment| acc_per_share.checked_add(increment))
        .ok_or(ContractError::InvalidAmount)
}

/// Advances the stored accumulators to `now` and returns them.
pub fn settle(env: &Env, now: u64) -> Result<AccrualState, ContractError> {
    let state = project(env, now)?;
    save_state(env, &state);
    Ok(state)
}
