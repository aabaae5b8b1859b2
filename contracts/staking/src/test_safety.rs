extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    Address, Env,
};

use crate::{
    assets::AssetClient,
    rewards::{SECONDS_PER_DAY, STAKING_PERIOD},
    test_asset::{TestAsset, TestAssetClient},
    ContractError, StakingContract, StakingContractClient,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

struct TestContext {
    env: Env,
    client: StakingContractClient<'static>,
    owner: Address,
    stake_asset: TestAssetClient<'static>,
    reward_asset: TestAssetClient<'static>,
}

/// Engine wired to two programmable fake assets, reward side pre-funded.
fn setup() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(0);

    let stake_asset = TestAssetClient::new(&env, &env.register(TestAsset, ()));
    let reward_asset = TestAssetClient::new(&env, &env.register(TestAsset, ()));

    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(&owner, &stake_asset.address, &reward_asset.address);

    reward_asset.mint(&contract_id, &1_000_000);

    TestContext {
        env,
        client,
        owner,
        stake_asset,
        reward_asset,
    }
}

impl TestContext {
    fn staker_with_stake(&self, amount: i128) -> Address {
        let staker = Address::generate(&self.env);
        self.stake_asset.mint(&staker, &amount);
        self.client.stake(&staker, &amount);
        staker
    }

    fn balance(&self, asset: &Address, who: &Address) -> i128 {
        AssetClient::new(&self.env, asset).balance(who)
    }
}

fn expect_err<T: core::fmt::Debug>(
    result: Result<
        Result<T, impl core::fmt::Debug>,
        Result<ContractError, soroban_sdk::InvokeError>,
    >,
    expected: ContractError,
) {
    match result {
        Err(Ok(e)) => assert_eq!(e, expected),
        other => unreachable!("Expected {:?}, got {:?}", expected, other),
    }
}

// ── Pause / unpause ──────────────────────────────────────────────────────────

#[test]
fn test_pause_blocks_stake() {
    let ctx = setup();
    let staker = Address::generate(&ctx.env);
    ctx.stake_asset.mint(&staker, &1_000);

    ctx.client.pause(&ctx.owner);
    assert!(ctx.client.is_paused());

    expect_err(ctx.client.try_stake(&staker, &1_000), ContractError::Paused);

    ctx.client.unpause(&ctx.owner);
    assert!(!ctx.client.is_paused());
    assert_eq!(ctx.client.stake(&staker, &1_000), 0);
}

#[test]
fn test_pause_blocks_withdraw() {
    let ctx = setup();
    let staker = ctx.staker_with_stake(1_000);

    ctx.env.ledger().set_timestamp(STAKING_PERIOD);
    ctx.client.pause(&ctx.owner);

    expect_err(ctx.client.try_withdraw(&staker, &0), ContractError::Paused);
    assert_eq!(ctx.client.get_stake_count(&staker), 1);
}

#[test]
fn test_pause_and_unpause_are_idempotent() {
    let ctx = setup();

    ctx.client.pause(&ctx.owner);
    ctx.client.pause(&ctx.owner);
    assert!(ctx.client.is_paused());

    ctx.client.unpause(&ctx.owner);
    ctx.client.unpause(&ctx.owner);
    assert!(!ctx.client.is_paused());
}

#[test]
fn test_non_owner_cannot_pause() {
    let ctx = setup();
    let intruder = Address::generate(&ctx.env);

    expect_err(ctx.client.try_pause(&intruder), ContractError::Unauthorized);
    assert!(!ctx.client.is_paused());

    ctx.client.pause(&ctx.owner);
    expect_err(ctx.client.try_unpause(&intruder), ContractError::Unauthorized);
    assert!(ctx.client.is_paused());
}

// ── Emergency withdraw ───────────────────────────────────────────────────────

#[test]
fn test_emergency_withdraw_requires_pause() {
    let ctx = setup();
    let staker = ctx.staker_with_stake(500);

    expect_err(
        ctx.client.try_emergency_withdraw(&staker, &0),
        ContractError::NotPaused,
    );
    assert_eq!(ctx.client.get_stake_count(&staker), 1);
}

#[test]
fn test_emergency_withdraw_returns_principal_only() {
    let ctx = setup();
    let staker = ctx.staker_with_stake(500);

    ctx.env.ledger().set_timestamp(10 * SECONDS_PER_DAY);
    ctx.client.pause(&ctx.owner);

    let settlement = ctx.client.emergency_withdraw(&staker, &0);
    assert_eq!(settlement.principal, 500);
    assert_eq!(settlement.reward, 0);

    assert_eq!(ctx.balance(&ctx.stake_asset.address, &staker), 500);
    assert_eq!(ctx.balance(&ctx.reward_asset.address, &staker), 0);
    assert_eq!(ctx.client.get_stake_count(&staker), 0);
    assert_eq!(ctx.client.get_total_staked(), 0);
}

#[test]
fn test_emergency_withdraw_matured_position_still_pays_no_reward() {
    let ctx = setup();
    let staker = ctx.staker_with_stake(1_000);

    ctx.env.ledger().set_timestamp(STAKING_PERIOD * 2);
    ctx.client.pause(&ctx.owner);

    let settlement = ctx.client.emergency_withdraw(&staker, &0);
    assert_eq!(settlement.reward, 0);
    assert_eq!(ctx.balance(&ctx.reward_asset.address, &staker), 0);
}

#[test]
fn test_emergency_withdraw_out_of_range() {
    let ctx = setup();
    let staker = ctx.staker_with_stake(500);
    ctx.client.pause(&ctx.owner);

    expect_err(
        ctx.client.try_emergency_withdraw(&staker, &1),
        ContractError::IndexOutOfRange,
    );
}

// ── External transfer failures ───────────────────────────────────────────────

#[test]
fn test_rejected_pull_leaves_no_position() {
    let ctx = setup();
    let staker = Address::generate(&ctx.env);
    ctx.stake_asset.mint(&staker, &1_000);
    ctx.stake_asset.set_fail_transfers(&true);

    expect_err(ctx.client.try_stake(&staker, &1_000), ContractError::TransferFailed);
    assert_eq!(ctx.client.get_stake_count(&staker), 0);
    assert_eq!(ctx.balance(&ctx.stake_asset.address, &staker), 1_000);
}

#[test]
fn test_rejected_reward_push_keeps_position_open() {
    let ctx = setup();
    let staker = ctx.staker_with_stake(1_000);

    ctx.env.ledger().set_timestamp(STAKING_PERIOD);
    ctx.reward_asset.set_fail_transfers(&true);

    expect_err(ctx.client.try_withdraw(&staker, &0), ContractError::TransferFailed);

    // Principal push had already succeeded inside the failed call; it is rolled back.
    assert_eq!(ctx.balance(&ctx.stake_asset.address, &staker), 0);
    assert_eq!(ctx.client.get_stake_count(&staker), 1);
    assert_eq!(ctx.client.get_total_staked(), 1_000);

    // Once the asset recovers the same position settles exactly once.
    ctx.reward_asset.set_fail_transfers(&false);
    let settlement = ctx.client.withdraw(&staker, &0);
    assert_eq!(settlement.reward, 147);
    assert_eq!(ctx.balance(&ctx.reward_asset.address, &staker), 147);
    assert_eq!(ctx.balance(&ctx.stake_asset.address, &staker), 1_000);
}

#[test]
fn test_rejected_principal_push_pays_no_reward() {
    let ctx = setup();
    let staker = ctx.staker_with_stake(1_000);

    ctx.env.ledger().set_timestamp(STAKING_PERIOD);
    ctx.stake_asset.set_fail_transfers(&true);

    expect_err(ctx.client.try_withdraw(&staker, &0), ContractError::TransferFailed);
    assert_eq!(ctx.balance(&ctx.reward_asset.address, &staker), 0);
    assert_eq!(ctx.client.get_stake_count(&staker), 1);
}

#[test]
fn test_rejected_emergency_push_keeps_position() {
    let ctx = setup();
    let staker = ctx.staker_with_stake(500);

    ctx.client.pause(&ctx.owner);
    ctx.stake_asset.set_fail_transfers(&true);

    expect_err(
        ctx.client.try_emergency_withdraw(&staker, &0),
        ContractError::TransferFailed,
    );
    assert_eq!(ctx.client.get_stake_count(&staker), 1);

    ctx.stake_asset.set_fail_transfers(&false);
    assert_eq!(ctx.client.emergency_withdraw(&staker, &0).principal, 500);
}

#[test]
fn test_failed_call_releases_reentrancy_lock() {
    let ctx = setup();
    let staker = Address::generate(&ctx.env);
    ctx.stake_asset.mint(&staker, &2_000);

    ctx.stake_asset.set_fail_transfers(&true);
    expect_err(ctx.client.try_stake(&staker, &1_000), ContractError::TransferFailed);

    ctx.stake_asset.set_fail_transfers(&false);
    assert_eq!(ctx.client.stake(&staker, &1_000), 0);
}

// ── Owner operations ─────────────────────────────────────────────────────────

#[test]
fn test_update_reward_token() {
    let ctx = setup();
    let staker = ctx.staker_with_stake(1_000);

    let new_reward = TestAssetClient::new(&ctx.env, &ctx.env.register(TestAsset, ()));
    new_reward.mint(&ctx.client.address, &1_000);

    ctx.client.update_reward_token(&ctx.owner, &new_reward.address);
    assert_eq!(ctx.client.get_reward_token(), new_reward.address);
    assert_eq!(ctx.client.get_reward_reserve(), 1_000);

    // Rewards are paid in whichever asset is configured at withdrawal time.
    ctx.env.ledger().set_timestamp(STAKING_PERIOD);
    ctx.client.withdraw(&staker, &0);
    assert_eq!(ctx.balance(&new_reward.address, &staker), 147);
    assert_eq!(ctx.balance(&ctx.reward_asset.address, &staker), 0);
}

#[test]
fn test_update_reward_token_rejections() {
    let ctx = setup();
    let intruder = Address::generate(&ctx.env);
    let token = Address::generate(&ctx.env);

    expect_err(
        ctx.client.try_update_reward_token(&intruder, &token),
        ContractError::Unauthorized,
    );
    expect_err(
        ctx.client.try_update_reward_token(&ctx.owner, &ctx.client.address),
        ContractError::InvalidAddress,
    );
    assert_eq!(ctx.client.get_reward_token(), ctx.reward_asset.address);
}

#[test]
fn test_transfer_ownership() {
    let ctx = setup();
    let new_owner = Address::generate(&ctx.env);

    ctx.client.transfer_ownership(&ctx.owner, &new_owner);
    assert_eq!(ctx.client.get_owner(), new_owner);

    // Old owner lost every privilege immediately.
    expect_err(ctx.client.try_pause(&ctx.owner), ContractError::Unauthorized);
    ctx.client.pause(&new_owner);
    assert!(ctx.client.is_paused());
}

#[test]
fn test_transfer_ownership_rejections() {
    let ctx = setup();
    let intruder = Address::generate(&ctx.env);

    expect_err(
        ctx.client.try_transfer_ownership(&intruder, &intruder),
        ContractError::Unauthorized,
    );
    expect_err(
        ctx.client.try_transfer_ownership(&ctx.owner, &ctx.client.address),
        ContractError::InvalidAddress,
    );
    assert_eq!(ctx.client.get_owner(), ctx.owner);
}
