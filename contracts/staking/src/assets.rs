//! Glue to the two external asset contracts.
//!
//! The engine only ever talks to assets through [`AssetInterface`], the subset
//! of the SEP-41 token interface it needs. Stellar asset contracts satisfy it
//! directly; tests register a programmable fake in their place.
//!
//! Transfers are invoked with `try_` calls so that a rejecting asset surfaces
//! as `false` instead of trapping the engine, and the caller decides how to
//! fail.

use soroban_sdk::{contractclient, log, Address, Env};

/// Asset operations consumed by the engine.
#[contractclient(name = "AssetClient")]
pub trait AssetInterface {
    /// Move `amount` from `from` to `to`; `from` must have authorized it.
    fn transfer(env: Env, from: Address, to: Address, amount: i128);

    /// Balance held by `id`.
    fn balance(env: Env, id: Address) -> i128;
}

/// Bool-returning wrapper around one asset contract.
pub struct AssetGateway<'a> {
    env: &'a Env,
    client: AssetClient<'a>,
}

impl<'a> AssetGateway<'a> {
    pub fn new(env: &'a Env, asset: &Address) -> Self {
        Self {
            env,
            client: AssetClient::new(env, asset),
        }
    }

    /// Pull `amount` from `from` into engine custody.
    pub fn pull(&self, from: &Address, amount: i128) -> bool {
        let engine = self.env.current_contract_address();
        self.try_transfer(from, &engine, amount)
    }

    /// Push `amount` out of engine custody to `to`.
    pub fn push(&self, to: &Address, amount: i128) -> bool {
        let engine = self.env.current_contract_address();
        self.try_transfer(&engine, to, amount)
    }

    pub fn balance_of(&self, who: &Address) -> i128 {
        self.client.balance(who)
    }

    fn try_transfer(&self, from: &Address, to: &Address, amount: i128) -> bool {
        let ok = matches!(self.client.try_transfer(from, to, &amount), Ok(Ok(())));
        if !ok {
            log!(
                self.env,
                "asset transfer rejected",
                self.client.address,
                from.clone(),
                to.clone(),
                amount
            );
        }
        ok
    }
}
