#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the engine is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub timestamp: u64,
}

/// Fired when a staker opens a position.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub position_id: u64,
    pub index: u32,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when a matured position is redeemed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub staker: Address,
    pub position_id: u64,
    pub amount: i128,
    pub reward: i128,
    pub timestamp: u64,
}

/// Fired when a position is exited through the emergency path.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmergencyWithdrawnEvent {
    pub staker: Address,
    pub position_id: u64,
    pub amount: i128,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardTokenUpdatedEvent {
    pub old_token: Address,
    pub new_token: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferredEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

/// Fired on `pause` and `unpause`.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseToggledEvent {
    pub owner: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, owner: Address, stake_token: Address, reward_token: Address) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            stake_token,
            reward_token,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, staker: Address, position_id: u64, index: u32, amount: i128) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            position_id,
            index,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, staker: Address, position_id: u64, amount: i128, reward: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), staker.clone()),
        WithdrawnEvent {
            staker,
            position_id,
            amount,
            reward,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_emergency_withdrawn(env: &Env, staker: Address, position_id: u64, amount: i128) {
    env.events().publish(
        (symbol_short!("EMRG_WDR"), staker.clone()),
        EmergencyWithdrawnEvent {
            staker,
            position_id,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_token_updated(env: &Env, old_token: Address, new_token: Address) {
    env.events().publish(
        (symbol_short!("RWD_TOK"),),
        RewardTokenUpdatedEvent {
            old_token,
            new_token,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_ownership_transferred(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWNER"), new_owner.clone()),
        OwnershipTransferredEvent {
            old_owner,
            new_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_paused(env: &Env, owner: Address) {
    env.events().publish(
        (symbol_short!("PAUSED"),),
        PauseToggledEvent {
            owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_unpaused(env: &Env, owner: Address) {
    env.events().publish(
        (symbol_short!("UNPAUSED"),),
        PauseToggledEvent {
            owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}
