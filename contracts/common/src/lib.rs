//! Shared building blocks for the reward-pool contracts.
//!
//! This crate provides:
//! - [`access`]: the privileged role, the designated updater role and a
//!   two-step handover of the privileged role.
//! - [`fixed_point`]: checked `i128` helpers for per-share accumulators.

#![no_std]

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod access;
pub mod fixed_point;

pub use access::*;
pub use fixed_point::*;
