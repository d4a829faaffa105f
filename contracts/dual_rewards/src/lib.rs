#![no_std]

pub mod accrual;
pub mod events;
pub mod ledger;
pub mod schedule;

use common::access::{self, AccessControl, InstanceRoles};
use soroban_sdk::{
    contract, contractclient, contractimpl, contracttype, symbol_short, token, Address, Env,
    Symbol,
};

pub use accrual::AccrualState;
pub use ledger::ParticipantStake;
pub use schedule::Segment;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");
const HARVESTER: Symbol = symbol_short!("HARVESTER");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientStake = 5,
    InsufficientBalance = 6,
    TooSoon = 7,
    TokensIdentical = 8,
    InvalidPeriod = 9,
    HarvesterNotSet = 10,
    NoPendingAdmin = 11,
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// One of the two independently funded reward streams.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Stream {
    A = 0,
    B = 1,
}

/// A pair of quantities, one per reward stream.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StreamAmounts {
    pub a: i128,
    pub b: i128,
}

impl StreamAmounts {
    pub fn zero() -> Self {
        Self { a: 0, b: 0 }
    }

    pub fn checked_add(&self, other: &StreamAmounts) -> Result<StreamAmounts, ContractError> {
        Ok(StreamAmounts {
            a: self.a.checked_add(other.a).ok_or(ContractError::InvalidAmount)?,
            b: self.b.checked_add(other.b).ok_or(ContractError::InvalidAmount)?,
        })
    }
}

/// Token wiring and the period used by `harvest_and_report`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub stake_token: Address,
    pub reward_token_a: Address,
    pub reward_token_b: Address,
    pub update_period: u64,
}

/// Snapshot of a participant's position returned by `get_staker_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerInfo {
    pub staked: i128,
    pub pending_a: i128,
    pub pending_b: i128,
}

// ── Upstream harvester ───────────────────────────────────────────────────────

/// Interface of the contract that feeds StreamB.
///
/// `harvest` may send more than the new StreamB inflow to `recipient`, or
/// nothing at all; the pool only trusts its own balance delta.
#[contractclient(name = "HarvesterClient")]
pub trait Harvester {
    fn harvest(env: Env, recipient: Address);
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct DualRewardsPool;

#[contractimpl]
impl DualRewardsPool {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `admin`          – privileged role.
    /// * `updater`        – designated caller of `report_inflow`.
    /// * `stake_token`    – SAC address of the token participants stake.
    /// * `reward_token_a` – SAC address paying StreamA.
    /// * `reward_token_b` – SAC address paying StreamB.
    /// * `update_period`  – seconds each harvested inflow is spread over.
    pub fn initialize(
        env: Env,
        admin: Address,
        updater: Address,
        stake_token: Address,
        reward_token_a: Address,
        reward_token_b: Address,
        update_period: u64,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if update_period == 0 {
            return Err(ContractError::InvalidPeriod);
        }
        if stake_token == reward_token_a
            || stake_token == reward_token_b
            || reward_token_a == reward_token_b
        {
            return Err(ContractError::TokensIdentical);
        }

        let config = PoolConfig {
            stake_token: stake_token.clone(),
            reward_token_a: reward_token_a.clone(),
            reward_token_b: reward_token_b.clone(),
            update_period,
        };

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&CONFIG, &config);
        access::set_admin(&env, &admin);
        access::set_updater(&env, &updater);
        accrual::init(&env, env.ledger().timestamp());

        events::publish_initialized(
            &env,
            admin,
            updater,
            stake_token,
            reward_token_a,
            reward_token_b,
            update_period,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens and collect pending rewards.
    ///
    /// A zero `amount` only collects. Accumulators are settled and the
    /// pending rewards priced before the stake changes; all ledger writes
    /// land before any token moves.
    pub fn deposit(
        env: Env,
        participant: Address,
        amount: i128,
    ) -> Result<StreamAmounts, ContractError> {
        Self::require_initialized(&env)?;
        participant.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }
        let config = Self::load_config(&env)?;

        // 1. Flush the global accumulators.
        let state = accrual::settle(&env, env.ledger().timestamp())?;

        // 2. Price what the old stake has earned.
        let mut position = ledger::load(&env, &participant);
        let paid = position.pending(&state)?;

        // 3. Grow the stake and re-anchor the debt.
        position.staked = position
            .staked
            .checked_add(amount)
            .ok_or(ContractError::InvalidAmount)?;
        position.checkpoint(&state)?;
        ledger::store(&env, &participant, &position);

        let new_total = accrual::total_staked(&env)
            .checked_add(amount)
            .ok_or(ContractError::InvalidAmount)?;
        accrual::set_total_staked(&env, new_total);

        // 4. Move tokens.
        Self::pay_rewards(&env, &config, &participant, &paid);
        if amount > 0 {
            token::Client::new(&env, &config.stake_token).transfer(
                &participant,
                &env.current_contract_address(),
                &amount,
            );
        }

        events::publish_deposited(&env, participant, amount, new_total);

        Ok(paid)
    }

    /// Withdraw `amount` stake tokens and collect pending rewards.
    ///
    /// Fails with `InsufficientStake` if `amount` exceeds the participant's
    /// stake. A zero `amount` only collects.
    pub fn withdraw(
        env: Env,
        participant: Address,
        amount: i128,
    ) -> Result<StreamAmounts, ContractError> {
        Self::require_initialized(&env)?;
        participant.require_auth();

        if amount < 0 {
            return Err(ContractError::InvalidAmount);
        }
        let mut position = ledger::load(&env, &participant);
        if amount > position.staked {
            return Err(ContractError::InsufficientStake);
        }
        let config = Self::load_config(&env)?;

        let state = accrual::settle(&env, env.ledger().timestamp())?;
        let paid = position.pending(&state)?;

        position.staked -= amount;
        position.checkpoint(&state)?;
        ledger::store(&env, &participant, &position);

        let new_total = accrual::total_staked(&env)
            .checked_sub(amount)
            .ok_or(ContractError::InvalidAmount)?;
        accrual::set_total_staked(&env, new_total);

        Self::pay_rewards(&env, &config, &participant, &paid);
        if amount > 0 {
            token::Client::new(&env, &config.stake_token).transfer(
                &env.current_contract_address(),
                &participant,
                &amount,
            );
        }

        events::publish_withdrawn(&env, participant, amount, new_total);

        Ok(paid)
    }

    // ── Inflow scheduling ───────────────────────────────────────────────────

    /// Spread `inflow_a` / `inflow_b` over the next `period_length` seconds.
    ///
    /// Reward already scheduled but not yet emitted is folded into the new
    /// segment, so a late or early report never drops or duplicates reward.
    /// Returns the new per-second rates.
    ///
    /// Requires the updater or the admin. Fails with `TooSoon` when called
    /// twice at the same timestamp.
    pub fn report_inflow(
        env: Env,
        caller: Address,
        inflow_a: i128,
        inflow_b: i128,
        period_length: u64,
    ) -> Result<StreamAmounts, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_updater(&env, &caller, &InstanceRoles)?;

        Self::schedule_inflow(&env, inflow_a, inflow_b, period_length)
    }

    /// Poll the upstream harvester and report the StreamB it delivered
    /// together with `inflow_a`, over the configured update period.
    ///
    /// StreamB inflow is the pool's StreamB balance after the poll minus the
    /// balance before it.
    pub fn harvest_and_report(
        env: Env,
        caller: Address,
        inflow_a: i128,
    ) -> Result<StreamAmounts, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_updater(&env, &caller, &InstanceRoles)?;

        let harvester: Address = env
            .storage()
            .instance()
            .get(&HARVESTER)
            .ok_or(ContractError::HarvesterNotSet)?;
        let config = Self::load_config(&env)?;

        let this = env.current_contract_address();
        let reward_b = token::Client::new(&env, &config.reward_token_b);
        let before = reward_b.balance(&this);
        HarvesterClient::new(&env, &harvester).harvest(&this);
        let after = reward_b.balance(&this);

        let inflow_b = after
            .checked_sub(before)
            .filter(|delta| *delta >= 0)
            .ok_or(ContractError::InvalidAmount)?;

        Self::schedule_inflow(&env, inflow_a, inflow_b, config.update_period)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// StreamA the participant would collect right now.
    pub fn pending_a(env: Env, participant: Address) -> Result<i128, ContractError> {
        Ok(Self::pending(&env, &participant)?.a)
    }

    /// StreamB the participant would collect right now.
    pub fn pending_b(env: Env, participant: Address) -> Result<i128, ContractError> {
        Ok(Self::pending(&env, &participant)?.b)
    }

    /// Return the combined position for a participant.
    pub fn get_staker_info(env: Env, participant: Address) -> Result<StakerInfo, ContractError> {
        let staked = ledger::load(&env, &participant).staked;
        let pending = Self::pending(&env, &participant)?;
        Ok(StakerInfo {
            staked,
            pending_a: pending.a,
            pending_b: pending.b,
        })
    }

    /// Per-second rates in force at `now`.
    pub fn rate_at(env: Env, now: u64) -> StreamAmounts {
        schedule::rate_at(&env, now)
    }

    /// Reward scheduled but not yet emitted as of the current ledger time.
    pub fn outstanding_remainder(env: Env) -> Result<StreamAmounts, ContractError> {
        schedule::outstanding_remainder(&env, env.ledger().timestamp())
    }

    pub fn get_stake(env: Env, participant: Address) -> ParticipantStake {
        ledger::load(&env, &participant)
    }

    pub fn get_total_staked(env: Env) -> i128 {
        accrual::total_staked(&env)
    }

    /// Stored accumulators; they lag behind the ledger until the next settle.
    pub fn get_accrual_state(env: Env) -> AccrualState {
        accrual::load_state(&env)
    }

    pub fn get_segment_count(env: Env) -> u32 {
        schedule::segment_count(&env)
    }

    pub fn get_segment(env: Env, index: u32) -> Option<Segment> {
        schedule::get_segment(&env, index)
    }

    pub fn get_last_report(env: Env) -> Option<u64> {
        schedule::last_report(&env)
    }

    pub fn get_config(env: Env) -> Result<PoolConfig, ContractError> {
        Self::load_config(&env)
    }

    pub fn get_harvester(env: Env) -> Option<Address> {
        env.storage().instance().get(&HARVESTER)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        access::get_admin(&env).ok_or(ContractError::NotInitialized)
    }

    pub fn get_updater(env: Env) -> Result<Address, ContractError> {
        access::get_updater(&env).ok_or(ContractError::NotInitialized)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Pay `amount` of a reward token from the pool to the admin.
    ///
    /// Bypasses the ledger entirely: pending rewards are not reduced, so
    /// later collections may fail until the pool is refunded.
    pub fn emergency_withdraw_reward(
        env: Env,
        caller: Address,
        stream: Stream,
        amount: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller, &InstanceRoles)?;

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }
        let config = Self::load_config(&env)?;
        let reward = token::Client::new(&env, Self::reward_token(&config, stream));
        let this = env.current_contract_address();
        if reward.balance(&this) < amount {
            return Err(ContractError::InsufficientBalance);
        }
        reward.transfer(&this, &caller, &amount);

        events::publish_emergency_reward_withdrawn(&env, caller, stream, amount);

        Ok(())
    }

    /// Replace the designated updater.
    pub fn set_updater(env: Env, caller: Address, updater: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller, &InstanceRoles)?;

        access::set_updater(&env, &updater);

        events::publish_updater_set(&env, updater);

        Ok(())
    }

    /// Change the period used by `harvest_and_report` (affects only future
    /// reports).
    pub fn set_update_period(env: Env, caller: Address, length: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller, &InstanceRoles)?;

        if length == 0 {
            return Err(ContractError::InvalidPeriod);
        }
        let mut config = Self::load_config(&env)?;
        config.update_period = length;
        env.storage().instance().set(&CONFIG, &config);

        events::publish_update_period_set(&env, length);

        Ok(())
    }

    /// Point `harvest_and_report` at a new upstream harvester.
    pub fn set_harvester(env: Env, caller: Address, harvester: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller, &InstanceRoles)?;

        env.storage().instance().set(&HARVESTER, &harvester);

        events::publish_harvester_set(&env, harvester);

        Ok(())
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Propose a new admin address. Only the current admin can call this.
    /// The new admin must call `accept_admin` to complete the transfer.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin, &InstanceRoles)?;

        access::propose_admin(&env, &new_admin);

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    /// Accept the pending admin transfer. Only the proposed new admin can call this.
    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_admin.require_auth();

        if access::get_pending_admin(&env).is_none() {
            return Err(ContractError::NoPendingAdmin);
        }
        let old_admin =
            access::accept_admin(&env, &new_admin).ok_or(ContractError::Unauthorized)?;

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    /// Cancel a pending admin transfer. Only the current admin can call this.
    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin, &InstanceRoles)?;

        let pending = access::cancel_pending_admin(&env).ok_or(ContractError::NoPendingAdmin)?;

        events::publish_admin_transfer_cancelled(&env, current_admin, pending);

        Ok(())
    }

    /// Get the pending admin address, if any.
    pub fn get_pending_admin(env: Env) -> Option<Address> {
        access::get_pending_admin(&env)
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────────

impl DualRewardsPool {
    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_admin(
        env: &Env,
        caller: &Address,
        roles: &impl AccessControl,
    ) -> Result<(), ContractError> {
        if !roles.is_privileged(env, caller) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Guard: the updater, or the admin standing in for it.
    fn require_updater(
        env: &Env,
        caller: &Address,
        roles: &impl AccessControl,
    ) -> Result<(), ContractError> {
        if !roles.is_updater(env, caller) && !roles.is_privileged(env, caller) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn load_config(env: &Env) -> Result<PoolConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    fn reward_token(config: &PoolConfig, stream: Stream) -> &Address {
        match stream {
            Stream::A => &config.reward_token_a,
            Stream::B => &config.reward_token_b,
        }
    }

    /// Reschedule, then settle at the same instant so no elapsed time is
    /// priced at the new rates.
    fn schedule_inflow(
        env: &Env,
        inflow_a: i128,
        inflow_b: i128,
        period_length: u64,
    ) -> Result<StreamAmounts, ContractError> {
        let now = env.ledger().timestamp();
        let inflow = StreamAmounts {
            a: inflow_a,
            b: inflow_b,
        };
        let report = schedule::reschedule(env, now, &inflow, period_length)?;
        accrual::settle(env, now)?;

        events::publish_inflow_reported(
            env,
            inflow_a,
            inflow_b,
            report.outstanding.a,
            report.outstanding.b,
            report.rates.a,
            report.rates.b,
            report.start,
            report.end,
        );

        Ok(report.rates)
    }

    fn pending(env: &Env, participant: &Address) -> Result<StreamAmounts, ContractError> {
        let state = accrual::project(env, env.ledger().timestamp())?;
        ledger::load(env, participant).pending(&state)
    }

    /// Transfer each positive stream amount to `participant`.
    fn pay_rewards(env: &Env, config: &PoolConfig, participant: &Address, paid: &StreamAmounts) {
        let this = env.current_contract_address();
        for (stream, amount) in [(Stream::A, paid.a), (Stream::B, paid.b)] {
            if amount <= 0 {
                continue;
            }
            token::Client::new(env, Self::reward_token(config, stream)).transfer(
                &this,
                participant,
                &amount,
            );
            events::publish_reward_paid(env, participant.clone(), stream, amount);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_roles;

#[cfg(test)]
mod test_schedule;
