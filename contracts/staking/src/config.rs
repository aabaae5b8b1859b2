use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ContractError;

const CONFIG: Symbol = symbol_short!("CONFIG");

/// Engine-wide configuration, written once by `initialize`.
///
/// `stake_token` is fixed for the lifetime of the engine. `reward_token` and
/// `owner` only change through the owner-gated transitions below.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    pub stake_token: Address,
    pub reward_token: Address,
    pub owner: Address,
}

impl EngineConfig {
    pub fn new(
        env: &Env,
        owner: Address,
        stake_token: Address,
        reward_token: Address,
    ) -> Result<Self, ContractError> {
        require_valid_address(env, &owner)?;
        require_valid_address(env, &stake_token)?;
        require_valid_address(env, &reward_token)?;
        Ok(Self {
            stake_token,
            reward_token,
            owner,
        })
    }

    pub fn exists(env: &Env) -> bool {
        env.storage().instance().has(&CONFIG)
    }

    pub fn load(env: &Env) -> Result<Self, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn save(&self, env: &Env) {
        env.storage().instance().set(&CONFIG, self);
    }

    /// Guard: revert if `caller` is not the stored owner.
    pub fn require_owner(&self, caller: &Address) -> Result<(), ContractError> {
        if *caller != self.owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Swap the reward asset, returning the handle it replaced.
    pub fn replace_reward_token(
        &mut self,
        env: &Env,
        new_token: Address,
    ) -> Result<Address, ContractError> {
        require_valid_address(env, &new_token)?;
        Ok(core::mem::replace(&mut self.reward_token, new_token))
    }

    /// Hand ownership to `new_owner`, returning the previous owner.
    pub fn replace_owner(&mut self, env: &Env, new_owner: Address) -> Result<Address, ContractError> {
        require_valid_address(env, &new_owner)?;
        Ok(core::mem::replace(&mut self.owner, new_owner))
    }
}

/// Soroban addresses cannot be null; the engine's own address is the one
/// identity that can never act as an owner or an external asset.
fn require_valid_address(env: &Env, address: &Address) -> Result<(), ContractError> {
    if *address == env.current_contract_address() {
        return Err(ContractError::InvalidAddress);
    }
    Ok(())
}
