#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::Stream;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the pool is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub updater: Address,
    pub stake_token: Address,
    pub reward_token_a: Address,
    pub reward_token_b: Address,
    pub update_period: u64,
    pub timestamp: u64,
}

/// Fired when a participant adds stake (or harvests with a zero deposit).
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub participant: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub timestamp: u64,
}

/// Fired when a participant takes stake back out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub participant: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub timestamp: u64,
}

/// Fired for each stream that pays a positive amount to a participant.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPaidEvent {
    pub participant: Address,
    pub stream: Stream,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when new inflow is folded into the emission timeline.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InflowReportedEvent {
    pub inflow_a: i128,
    pub inflow_b: i128,
    pub outstanding_a: i128,
    pub outstanding_b: i128,
    pub rate_a: i128,
    pub rate_b: i128,
    pub segment_start: u64,
    pub segment_end: u64,
    pub timestamp: u64,
}

/// Fired when the designated updater changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdaterSetEvent {
    pub updater: Address,
    pub timestamp: u64,
}

/// Fired when the harvest period length changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdatePeriodSetEvent {
    pub new_period: u64,
    pub timestamp: u64,
}

/// Fired when the upstream harvester changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvesterSetEvent {
    pub harvester: Address,
    pub timestamp: u64,
}

/// Fired when the admin pulls reward tokens out past the ledger.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyRewardWithdrawnEvent {
    pub admin: Address,
    pub stream: Stream,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when an admin transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferProposedEvent {
    pub current_admin: Address,
    pub proposed_admin: Address,
    pub timestamp: u64,
}

/// Fired when an admin transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferAcceptedEvent {
    pub old_admin: Address,
    pub new_admin: Address,
    pub timestamp: u64,
}

/// Fired when a pending admin transfer is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminTransferCancelledEvent {
    pub admin: Address,
    pub cancelled_proposed: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    updater: Address,
    stake_token: Address,
    reward_token_a: Address,
    reward_token_b: Address,
    update_period: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            updater,
            stake_token,
            reward_token_a,
            reward_token_b,
            update_period,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(env: &Env, participant: Address, amount: i128, new_total_staked: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), participant.clone()),
        DepositedEvent {
            participant,
            amount,
            new_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, participant: Address, amount: i128, new_total_staked: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), participant.clone()),
        WithdrawnEvent {
            participant,
            amount,
            new_total_staked,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_paid(env: &Env, participant: Address, stream: Stream, amount: i128) {
    env.events().publish(
        (symbol_short!("RWD_PAID"), participant.clone()),
        RewardPaidEvent {
            participant,
            stream,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

#[allow(clippy::too_many_arguments)]
pub fn publish_inflow_reported(
    env: &Env,
    inflow_a: i128,
    inflow_b: i128,
    outstanding_a: i128,
    outstanding_b: i128,
    rate_a: i128,
    rate_b: i128,
    segment_start: u64,
    segment_end: u64,
) {
    env.events().publish(
        (symbol_short!("INFLOW"),),
        InflowReportedEvent {
            inflow_a,
            inflow_b,
            outstanding_a,
            outstanding_b,
            rate_a,
            rate_b,
            segment_start,
            segment_end,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_updater_set(env: &Env, updater: Address) {
    env.events().publish(
        (symbol_short!("UPDTR_SET"),),
        UpdaterSetEvent {
            updater,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_update_period_set(env: &Env, new_period: u64) {
    env.events().publish(
        (symbol_short!("PERIOD"),),
        UpdatePeriodSetEvent {
            new_period,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_harvester_set(env: &Env, harvester: Address) {
    env.events().publish(
        (symbol_short!("HRVST_SET"),),
        HarvesterSetEvent {
            harvester,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_reward_withdrawn(env: &Env, admin: Address, stream: Stream, amount: i128) {
    env.events().publish(
        (symbol_short!("EMRG_WD"), admin.clone()),
        EmergencyRewardWithdrawnEvent {
            admin,
            stream,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transfer_proposed(env: &Env, current_admin: Address, proposed_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"), current_admin.clone()),
        AdminTransferProposedEvent {
            current_admin,
            proposed_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transfer_accepted(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADM_ACPT"), new_admin.clone()),
        AdminTransferAcceptedEvent {
            old_admin,
            new_admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_admin_transfer_cancelled(env: &Env, admin: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("ADM_CNCL"), admin.clone()),
        AdminTransferCancelledEvent {
            admin,
            cancelled_proposed,
            timestamp: env.ledger().timestamp(),
        },
    );
}
