#![no_std]

pub mod assets;
pub mod config;
pub mod events;
pub mod guard;
pub mod ledger;
pub mod rewards;

use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, Symbol, Vec};

use assets::AssetGateway;
use config::EngineConfig;
pub use ledger::StakePosition;

// ── Storage key constants ────────────────────────────────────────────────────

const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");

/// Keep config, pause state and counters alive at least as long as any
/// position vector.
fn extend_ttl_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(ledger::TTL_THRESHOLD, ledger::TTL_EXTEND_TO);
}

// ── Contract errors ──────────────────────────────────────────────────────────

/// Error codes are grouped by range:
///
/// | Range   | Purpose                        |
/// |---------|--------------------------------|
/// | 1 – 9   | Lifecycle                      |
/// | 10 – 19 | Authorization and pause state  |
/// | 20 – 29 | Input validation               |
/// | 30 – 39 | Position and engine state      |
/// | 40 – 49 | External asset calls, math     |
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 10,
    Paused = 11,
    NotPaused = 12,
    InvalidAmount = 20,
    InvalidAddress = 21,
    IndexOutOfRange = 22,
    NoActiveStake = 30,
    StakingPeriodIncomplete = 31,
    ReentrantCall = 32,
    TransferFailed = 40,
    ArithmeticOverflow = 41,
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// What a closing call paid out.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub position_id: u64,
    pub principal: i128,
    pub reward: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingContract;

#[contractimpl]
impl StakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the engine. Callable exactly once.
    ///
    /// * `owner`        – account allowed to pause, rotate the reward asset,
    ///                    and hand over ownership.
    /// * `stake_token`  – asset locked by stakers; fixed for the engine's life.
    /// * `reward_token` – asset interest is paid in. The owner funds it by
    ///                    transferring to the engine address.
    pub fn initialize(
        env: Env,
        owner: Address,
        stake_token: Address,
        reward_token: Address,
    ) -> Result<(), ContractError> {
        if EngineConfig::exists(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        owner.require_auth();

        let config = EngineConfig::new(&env, owner, stake_token, reward_token)?;
        config.save(&env);
        extend_ttl_instance(&env);

        events::publish_initialized(
            &env,
            config.owner,
            config.stake_token,
            config.reward_token,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Lock `amount` stake tokens in a new position and return its index.
    ///
    /// Tokens are pulled before the position is recorded, so a rejected pull
    /// leaves the ledger untouched.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<u32, ContractError> {
        let config = EngineConfig::load(&env)?;
        staker.require_auth();
        guard::require_not_paused(&env)?;

        guard::non_reentrant(&env, || {
            if amount <= 0 {
                return Err(ContractError::InvalidAmount);
            }

            if !AssetGateway::new(&env, &config.stake_token).pull(&staker, amount) {
                return Err(ContractError::TransferFailed);
            }

            let now = env.ledger().timestamp();
            let (index, position) = ledger::append(&env, &staker, amount, now)?;
            Self::adjust_total_staked(&env, amount)?;
            extend_ttl_instance(&env);

            events::publish_staked(&env, staker.clone(), position.id, index, amount);

            Ok(index)
        })
    }

    /// Redeem a matured position: principal back in the stake token plus the
    /// full-term reward in the current reward token.
    ///
    /// The position leaves the ledger before any transfer goes out. Principal
    /// is paid first, then reward; if either transfer is rejected the call
    /// fails with `TransferFailed` and every effect, including a completed
    /// transfer, is rolled back with it.
    pub fn withdraw(env: Env, staker: Address, index: u32) -> Result<Settlement, ContractError> {
        let config = EngineConfig::load(&env)?;
        staker.require_auth();
        guard::require_not_paused(&env)?;

        guard::non_reentrant(&env, || {
            let position = Self::active_position(&env, &staker, index)?;

            let now = env.ledger().timestamp();
            if now < rewards::maturity_time(position.start_time) {
                return Err(ContractError::StakingPeriodIncomplete);
            }
            let reward = rewards::matured_reward(&env, position.amount)?;

            // Mark as closed before transfer (checks-effects-interactions).
            ledger::close(&env, &staker, index)?;
            Self::adjust_total_staked(&env, -position.amount)?;
            extend_ttl_instance(&env);

            if !AssetGateway::new(&env, &config.stake_token).push(&staker, position.amount) {
                return Err(ContractError::TransferFailed);
            }
            if reward > 0 && !AssetGateway::new(&env, &config.reward_token).push(&staker, reward)
            {
                return Err(ContractError::TransferFailed);
            }

            events::publish_withdrawn(&env, staker.clone(), position.id, position.amount, reward);

            Ok(Settlement {
                position_id: position.id,
                principal: position.amount,
                reward,
            })
        })
    }

    /// Return the principal of any open position, matured or not, with no
    /// reward. Only available while the engine is paused.
    pub fn emergency_withdraw(
        env: Env,
        staker: Address,
        index: u32,
    ) -> Result<Settlement, ContractError> {
        let config = EngineConfig::load(&env)?;
        staker.require_auth();
        guard::require_paused(&env)?;

        guard::non_reentrant(&env, || {
            let position = Self::active_position(&env, &staker, index)?;

            ledger::close(&env, &staker, index)?;
            Self::adjust_total_staked(&env, -position.amount)?;
            extend_ttl_instance(&env);

            if !AssetGateway::new(&env, &config.stake_token).push(&staker, position.amount) {
                return Err(ContractError::TransferFailed);
            }

            events::publish_emergency_withdrawn(&env, staker.clone(), position.id, position.amount);

            Ok(Settlement {
                position_id: position.id,
                principal: position.amount,
                reward: 0,
            })
        })
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Return the position at `index` for `staker`.
    ///
    /// Indices are only meaningful until the staker's next withdrawal, which
    /// may move the last position into the closed slot. Use `find_stake` with
    /// the position's `id` to re-resolve.
    pub fn get_stake_info(
        env: Env,
        staker: Address,
        index: u32,
    ) -> Result<StakePosition, ContractError> {
        ledger::get(&env, &staker, index)
    }

    /// Reward the position at `index` has accrued so far. Does not require
    /// maturity; stops growing once the staking period has elapsed.
    pub fn calculate_reward(env: Env, staker: Address, index: u32) -> Result<i128, ContractError> {
        let position = Self::active_position(&env, &staker, index)?;
        rewards::accrued_reward(
            &env,
            position.amount,
            position.start_time,
            env.ledger().timestamp(),
        )
    }

    pub fn get_stake_count(env: Env, staker: Address) -> u32 {
        ledger::count(&env, &staker)
    }

    /// Return every open position of `staker`, in index order.
    pub fn get_stakes(env: Env, staker: Address) -> Vec<StakePosition> {
        ledger::load(&env, &staker)
    }

    /// Resolve a stable position id to its current index.
    pub fn find_stake(env: Env, staker: Address, position_id: u64) -> Option<u32> {
        ledger::find(&env, &staker, position_id)
    }

    /// Returns `true` once the position at `index` can be withdrawn.
    pub fn is_matured(env: Env, staker: Address, index: u32) -> Result<bool, ContractError> {
        let position = ledger::get(&env, &staker, index)?;
        Ok(env.ledger().timestamp() >= rewards::maturity_time(position.start_time))
    }

    /// Seconds until the position at `index` matures; 0 if already matured.
    pub fn get_time_remaining(env: Env, staker: Address, index: u32) -> Result<u64, ContractError> {
        let position = ledger::get(&env, &staker, index)?;
        Ok(rewards::maturity_time(position.start_time).saturating_sub(env.ledger().timestamp()))
    }

    /// Return the sum of all currently locked principal.
    pub fn get_total_staked(env: Env) -> i128 {
        env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
    }

    /// Reward tokens currently held by the engine and available for payouts.
    pub fn get_reward_reserve(env: Env) -> Result<i128, ContractError> {
        let config = EngineConfig::load(&env)?;
        Ok(AssetGateway::new(&env, &config.reward_token)
            .balance_of(&env.current_contract_address()))
    }

    /// Annual rate with 18 decimals of precision.
    pub fn get_apr(_env: Env) -> i128 {
        rewards::APR
    }

    /// Lock term in seconds.
    pub fn get_staking_period(_env: Env) -> u64 {
        rewards::STAKING_PERIOD
    }

    pub fn is_initialized(env: Env) -> bool {
        EngineConfig::exists(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        guard::is_paused(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        Ok(EngineConfig::load(&env)?.owner)
    }

    pub fn get_stake_token(env: Env) -> Result<Address, ContractError> {
        Ok(EngineConfig::load(&env)?.stake_token)
    }

    pub fn get_reward_token(env: Env) -> Result<Address, ContractError> {
        Ok(EngineConfig::load(&env)?.reward_token)
    }

    // ── Owner functions ──────────────────────────────────────────────────────

    /// Point the engine at a different reward asset.
    ///
    /// Rewards are always paid in whichever asset is configured at withdrawal
    /// time; nothing already accrued is converted or moved.
    pub fn update_reward_token(
        env: Env,
        caller: Address,
        new_token: Address,
    ) -> Result<(), ContractError> {
        let mut config = Self::authorized_owner(&env, &caller)?;

        let old_token = config.replace_reward_token(&env, new_token.clone())?;
        config.save(&env);
        extend_ttl_instance(&env);

        events::publish_reward_token_updated(&env, old_token, new_token);

        Ok(())
    }

    /// Hand ownership to `new_owner`. Takes effect immediately.
    pub fn transfer_ownership(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        let mut config = Self::authorized_owner(&env, &caller)?;

        let old_owner = config.replace_owner(&env, new_owner.clone())?;
        config.save(&env);
        extend_ttl_instance(&env);

        events::publish_ownership_transferred(&env, old_owner, new_owner);

        Ok(())
    }

    /// Suspend staking and withdrawals and open the emergency exit.
    /// Pausing an already paused engine succeeds without changing anything.
    pub fn pause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::authorized_owner(&env, &caller)?;
        guard::set_paused(&env, true);
        extend_ttl_instance(&env);
        events::publish_paused(&env, caller);
        Ok(())
    }

    /// Resume normal operation. Unpausing an active engine is a no-op.
    pub fn unpause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::authorized_owner(&env, &caller)?;
        guard::set_paused(&env, false);
        extend_ttl_instance(&env);
        events::publish_unpaused(&env, caller);
        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: authenticate `caller` and require it to be the owner.
    fn authorized_owner(env: &Env, caller: &Address) -> Result<EngineConfig, ContractError> {
        let config = EngineConfig::load(env)?;
        caller.require_auth();
        config.require_owner(caller)?;
        Ok(config)
    }

    /// Closed positions are compacted away before the closing call returns,
    /// so the `active` check never fires on a well-formed ledger.
    fn active_position(
        env: &Env,
        staker: &Address,
        index: u32,
    ) -> Result<StakePosition, ContractError> {
        let position = ledger::get(env, staker, index)?;
        if !position.active {
            return Err(ContractError::NoActiveStake);
        }
        Ok(position)
    }

    fn adjust_total_staked(env: &Env, delta: i128) -> Result<(), ContractError> {
        let prev: i128 = env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0);
        let next = prev
            .checked_add(delta)
            .ok_or(ContractError::ArithmeticOverflow)?;
        env.storage().instance().set(&TOTAL_STAKED, &next);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────



#[cfg(test)]
mod test_safety;
