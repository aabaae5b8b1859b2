#![no_main]

use arbitrary::Arbitrary;
use fixed_term_staking::{rewards::STAKING_PERIOD, StakingContract, StakingContractClient};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::StellarAssetClient,
    Address, Env,
};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { amount: u32 },
    Withdraw { index: u8 },
    EmergencyWithdraw { index: u8 },
    CalculateReward { index: u8 },
    Advance { seconds: u32 },
    Pause,
    Unpause,
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let stake_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(&owner, &stake_token, &reward_token);
    StellarAssetClient::new(&env, &reward_token).mint(&contract_id, &(i64::MAX as i128));

    let mut users = Vec::new();
    for _ in 0..4 {
        let user = Address::generate(&env);
        StellarAssetClient::new(&env, &stake_token).mint(&user, &(u32::MAX as i128 * 64));
        users.push(user);
    }

    // Open principal must equal the running total after every step.
    for (i, action) in actions.into_iter().enumerate() {
        let caller = &users[i % users.len()];
        match action {
            FuzzAction::Stake { amount } => {
                let _ = client.try_stake(caller, &(amount as i128));
            }
            FuzzAction::Withdraw { index } => {
                let _ = client.try_withdraw(caller, &(index as u32));
            }
            FuzzAction::EmergencyWithdraw { index } => {
                if let Ok(Ok(settlement)) = client.try_emergency_withdraw(caller, &(index as u32)) {
                    assert_eq!(settlement.reward, 0);
                }
            }
            FuzzAction::CalculateReward { index } => {
                if let Ok(Ok(reward)) = client.try_calculate_reward(caller, &(index as u32)) {
                    let position = client.get_stake_info(caller, &(index as u32));
                    assert!(reward >= 0);
                    assert!(reward <= position.amount * 3 * STAKING_PERIOD as i128 / (10 * 365 * 86_400));
                }
            }
            FuzzAction::Advance { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now.saturating_add(seconds as u64));
            }
            FuzzAction::Pause => {
                client.pause(&owner);
            }
            FuzzAction::Unpause => {
                client.unpause(&owner);
            }
        }

        let open: i128 = users
            .iter()
            .flat_map(|u| client.get_stakes(u).iter().collect::<Vec<_>>())
            .map(|p| {
                assert!(p.active);
                p.amount
            })
            .sum();
        assert_eq!(open, client.get_total_staked());
    }
});
