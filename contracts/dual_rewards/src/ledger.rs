use common::fixed_point;
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::accrual::AccrualState;
use crate::{ContractError, StreamAmounts};

// Per-participant persistent storage uses tuple keys: (STAKE, participant)
const STAKE: Symbol = symbol_short!("STAKE");

const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 3_110_400;

/// A participant's stake and the part of each accumulator already credited
/// to it.
///
/// Right after every settlement that touches the participant,
/// `reward_debt_x == staked * acc_per_share_x / SCALE`.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParticipantStake {
    pub staked: i128,
    pub reward_debt_a: i128,
    pub reward_debt_b: i128,
}

impl ParticipantStake {
    /// Rewards accrued since the last checkpoint, priced at `state`.
    pub fn pending(&self, state: &AccrualState) -> Result<StreamAmounts, ContractError> {
        let accrued_a = fixed_point::share_of(self.staked, state.acc_per_share_a)
            .ok_or(ContractError::InvalidAmount)?;
        let accrued_b = fixed_point::share_of(self.staked, state.acc_per_share_b)
            .ok_or(ContractError::InvalidAmount)?;
        Ok(StreamAmounts {
            a: owed(accrued_a, self.reward_debt_a)?,
            b: owed(accrued_b, self.reward_debt_b)?,
        })
    }

    /// Marks everything accrued up to `state` as credited.
    pub fn checkpoint(&mut self, state: &AccrualState) -> Result<(), ContractError> {
        self.reward_debt_a = fixed_point::share_of(self.staked, state.acc_per_share_a)
            .ok_or(ContractError::InvalidAmount)?;
        self.reward_debt_b = fixed_point::share_of(self.staked, state.acc_per_share_b)
            .ok_or(ContractError::InvalidAmount)?;
        Ok(())
    }
}

/// Accumulators never decrease, so accrued is never below the debt.
fn owed(accrued: i128, debt: i128) -> Result<i128, ContractError> {
    let pending = accrued
        .checked_sub(debt)
        .ok_or(ContractError::InvalidAmount)?;
    debug_assert!(pending >= 0, "reward debt exceeds accrued rewards");
    if pending < 0 {
        return Err(ContractError::InvalidAmount);
    }
    Ok(pending)
}

fn stake_key(participant: &Address) -> (Symbol, Address) {
    (STAKE, participant.clone())
}

/// Returns the participant's record, or an empty one if it never deposited.
pub fn load(env: &Env, participant: &Address) -> ParticipantStake {
    env.storage()
        .persistent()
        .get(&stake_key(participant))
        .unwrap_or_default()
}

pub fn store(env: &Env, participant: &Address, position: &ParticipantStake) {
    let key = stake_key(participant);
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
