//! Checked fixed-point arithmetic for per-share reward accumulators.
//!
//! Accumulators are stored as `reward_per_unit_stake * SCALE` so that small
//! emissions spread over a large stake do not truncate to zero.

/// Fixed-point scale applied to every per-share accumulator.
pub const SCALE: i128 = 1_000_000_000_000;

/// `a * b / denominator`, rounded toward zero for non-negative operands.
///
/// `b` is split into `q * denominator + r` so the full product `a * b` is
/// never formed; only a result that does not fit in `i128` overflows.
/// Returns `None` on overflow or when `denominator` is zero.
pub fn mul_div(a: i128, b: i128, denominator: i128) -> Option<i128> {
    if denominator == 0 {
        return None;
    }
    let whole = a.checked_mul(b / denominator)?;
    let part = a.checked_mul(b % denominator)? / denominator;
    whole.checked_add(part)
}

/// Converts an `amount` shared across `total_stake` into a per-share increment.
pub fn per_share(amount: i128, total_stake: i128) -> Option<i128> {
    mul_div(amount, SCALE, total_stake)
}

/// Converts a per-share accumulator back into the amount owed to `stake`.
pub fn share_of(stake: i128, acc_per_share: i128) -> Option<i128> {
    mul_div(stake, acc_per_share, SCALE)
}
