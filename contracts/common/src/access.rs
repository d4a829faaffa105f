use soroban_sdk::{symbol_short, Address, Env, Symbol};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");
const UPDATER: Symbol = symbol_short!("UPDATER");

// ── Capability ───────────────────────────────────────────────────────────────

/// Role lookups consumed by a contract before it performs a gated action.
///
/// - *privileged* – may reconfigure the contract, move funds out through
///                  escape hatches and hand the role over.
/// - *updater*    – may report new inflow; holds no other power.
pub trait AccessControl {
    fn is_privileged(&self, env: &Env, who: &Address) -> bool;
    fn is_updater(&self, env: &Env, who: &Address) -> bool;
}

/// Role registry kept in the calling contract's instance storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstanceRoles;

impl AccessControl for InstanceRoles {
    fn is_privileged(&self, env: &Env, who: &Address) -> bool {
        get_admin(env).is_some_and(|admin| admin == *who)
    }

    fn is_updater(&self, env: &Env, who: &Address) -> bool {
        get_updater(env).is_some_and(|updater| updater == *who)
    }
}

// ── Privileged role ──────────────────────────────────────────────────────────

/// Stores `admin` as the privileged address.
/// Only callable internally; callers must verify authorization beforehand.
pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&ADMIN, admin);
}

/// Returns the privileged address, if one has been set.
pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&ADMIN)
}

// ── Updater role ─────────────────────────────────────────────────────────────

/// Replaces the designated updater.
pub fn set_updater(env: &Env, updater: &Address) {
    env.storage().instance().set(&UPDATER, updater);
}

/// Returns the designated updater, if one has been set.
pub fn get_updater(env: &Env) -> Option<Address> {
    env.storage().instance().get(&UPDATER)
}

// ── Two-step handover ────────────────────────────────────────────────────────

/// Records `candidate` as the pending privileged address.
pub fn propose_admin(env: &Env, candidate: &Address) {
    env.storage().instance().set(&PENDING_ADMIN, candidate);
}

/// Returns the pending privileged address, if a handover is in progress.
pub fn get_pending_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_ADMIN)
}

/// Completes the handover if `candidate` is the pending address.
///
/// Returns the previous privileged address on success, `None` if there is
/// no pending handover or `candidate` does not match it.
pub fn accept_admin(env: &Env, candidate: &Address) -> Option<Address> {
    let pending = get_pending_admin(env)?;
    if pending != *candidate {
        return None;
    }
    let previous = get_admin(env)?;
    set_admin(env, candidate);
    env.storage().instance().remove(&PENDING_ADMIN);
    Some(previous)
}

/// Drops the pending handover and returns the address it named.
pub fn cancel_pending_admin(env: &Env) -> Option<Address> {
    let pending = get_pending_admin(env)?;
    env.storage().instance().remove(&PENDING_ADMIN);
    Some(pending)
}
