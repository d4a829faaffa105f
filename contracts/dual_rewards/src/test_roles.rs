extern crate std;

use soroban_sdk::{testutils::Address as _, Address, Env};

use crate::{ContractError, DualRewardsPool, DualRewardsPoolClient};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (Env, DualRewardsPoolClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let stake_token = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let reward_a = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let reward_b = env.register_stellar_asset_contract_v2(Address::generate(&env));

    let contract_id = env.register(DualRewardsPool, ());
    let client = DualRewardsPoolClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    let updater = Address::generate(&env);
    client.initialize(
        &admin,
        &updater,
        &stake_token.address(),
        &reward_a.address(),
        &reward_b.address(),
        &86_400,
    );

    (env, client, admin, updater)
}

// ── Updater role ─────────────────────────────────────────────────────────────

#[test]
fn test_admin_replaces_updater() {
    let (env, client, admin, old_updater) = setup();
    let new_updater = Address::generate(&env);

    client.set_updater(&admin, &new_updater);
    assert_eq!(client.get_updater(), new_updater);

    client.report_inflow(&new_updater, &86_400, &0, &86_400);

    match client.try_report_inflow(&old_updater, &0, &0, &86_400) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_updater_cannot_replace_itself() {
    let (env, client, _admin, updater) = setup();
    let other = Address::generate(&env);

    match client.try_set_updater(&updater, &other) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

// ── Update period ────────────────────────────────────────────────────────────

#[test]
fn test_admin_sets_update_period() {
    let (_env, client, admin, _updater) = setup();

    client.set_update_period(&admin, &3_600);
    assert_eq!(client.get_config().update_period, 3_600);
}

#[test]
fn test_update_period_zero_fails() {
    let (_env, client, admin, _updater) = setup();

    match client.try_set_update_period(&admin, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidPeriod),
        _ => unreachable!("Expected InvalidPeriod error"),
    }
}

#[test]
fn test_updater_cannot_set_update_period() {
    let (_env, client, _admin, updater) = setup();

    match client.try_set_update_period(&updater, &3_600) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_updater_cannot_set_harvester() {
    let (env, client, _admin, updater) = setup();
    let harvester = Address::generate(&env);

    match client.try_set_harvester(&updater, &harvester) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.get_harvester(), None);
}

// ── Admin transfer (two-step) ────────────────────────────────────────────────

#[test]
fn test_admin_transfer_completes_on_accept() {
    let (env, client, admin, _updater) = setup();
    let successor = Address::generate(&env);

    client.propose_admin(&admin, &successor);
    assert_eq!(client.get_pending_admin(), Some(successor.clone()));
    // Still the old admin until accepted.
    assert_eq!(client.get_admin(), admin);

    client.accept_admin(&successor);
    assert_eq!(client.get_admin(), successor);
    assert_eq!(client.get_pending_admin(), None);

    match client.try_set_update_period(&admin, &3_600) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    client.set_update_period(&successor, &3_600);
}

#[test]
fn test_accept_by_wrong_address_fails() {
    let (env, client, admin, _updater) = setup();
    let successor = Address::generate(&env);
    let intruder = Address::generate(&env);

    client.propose_admin(&admin, &successor);

    match client.try_accept_admin(&intruder) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_accept_without_proposal_fails() {
    let (env, client, _admin, _updater) = setup();
    let someone = Address::generate(&env);

    match client.try_accept_admin(&someone) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingAdmin),
        _ => unreachable!("Expected NoPendingAdmin error"),
    }
}

#[test]
fn test_cancel_admin_transfer() {
    let (env, client, admin, _updater) = setup();
    let successor = Address::generate(&env);

    client.propose_admin(&admin, &successor);
    client.cancel_admin_transfer(&admin);
    assert_eq!(client.get_pending_admin(), None);

    match client.try_accept_admin(&successor) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingAdmin),
        _ => unreachable!("Expected NoPendingAdmin error"),
    }
}

#[test]
fn test_non_admin_cannot_propose() {
    let (env, client, _admin, updater) = setup();
    let successor = Address::generate(&env);

    match client.try_propose_admin(&updater, &successor) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}
