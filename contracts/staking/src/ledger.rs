use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::ContractError;

// ── Storage key constants ───────────────────────────────────────────────────

/// Counter for generating monotonic position IDs.
const POSITION_CTR: Symbol = symbol_short!("POS_CTR");

/// Per-staker position vectors use tuple keys: `(prefix, staker)`.
const POSITIONS: Symbol = symbol_short!("POSITNS");

// Ledger counts at ~5s per ledger: refresh below 30 days, extend to a full term.
pub(crate) const TTL_THRESHOLD: u32 = 518_400;
pub(crate) const TTL_EXTEND_TO: u32 = 3_110_400;

// ── Types ───────────────────────────────────────────────────────────────────

/// One locked deposit.
///
/// `amount` and `start_time` never change after the position is opened.
/// `active` only ever flips to `false` on close, and an inactive position is
/// removed from the staker's vector before the closing call returns.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakePosition {
    /// Engine-wide identifier, 1-based. Unlike the vector index it survives
    /// compaction, so it can be held across calls and resolved with `find`.
    pub id: u64,
    /// Principal locked in the stake token.
    pub amount: i128,
    /// Ledger timestamp at which the position was opened.
    pub start_time: u64,
    pub active: bool,
}

// ── Storage helpers ─────────────────────────────────────────────────────────

pub(crate) fn positions_key(staker: &Address) -> (Symbol, Address) {
    (POSITIONS, staker.clone())
}

fn extend_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Load every open position of `staker`, in index order.
pub fn load(env: &Env, staker: &Address) -> Vec<StakePosition> {
    let key = positions_key(staker);
    match env.storage().persistent().get(&key) {
        Some(positions) => {
            extend_ttl(env, &key);
            positions
        }
        None => Vec::new(env),
    }
}

fn store(env: &Env, staker: &Address, positions: &Vec<StakePosition>) {
    let key = positions_key(staker);
    if positions.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, positions);
        extend_ttl(env, &key);
    }
}

/// Allocate and return the next position ID (1-based, monotonically increasing).
fn next_position_id(env: &Env) -> Result<u64, ContractError> {
    let current: u64 = env.storage().instance().get(&POSITION_CTR).unwrap_or(0u64);
    let next = current
        .checked_add(1)
        .ok_or(ContractError::ArithmeticOverflow)?;
    env.storage().instance().set(&POSITION_CTR, &next);
    Ok(next)
}

// ── Ledger operations ───────────────────────────────────────────────────────

/// Open a new position for `staker` and return its index.
pub fn append(
    env: &Env,
    staker: &Address,
    amount: i128,
    now: u64,
) -> Result<(u32, StakePosition), ContractError> {
    let mut positions = load(env, staker);
    let position = StakePosition {
        id: next_position_id(env)?,
        amount,
        start_time: now,
        active: true,
    };
    positions.push_back(position.clone());
    store(env, staker, &positions);
    Ok((positions.len() - 1, position))
}

/// Position at `index`, or `IndexOutOfRange`.
pub fn get(env: &Env, staker: &Address, index: u32) -> Result<StakePosition, ContractError> {
    load(env, staker)
        .get(index)
        .ok_or(ContractError::IndexOutOfRange)
}

/// Number of open positions held by `staker`.
pub fn count(env: &Env, staker: &Address) -> u32 {
    load(env, staker).len()
}

/// Current index of the position with the given stable `id`.
pub fn find(env: &Env, staker: &Address, id: u64) -> Option<u32> {
    load(env, staker).iter().position(|p| p.id == id).map(|i| i as u32)
}

/// Close the position at `index` and return it as it was before closing.
///
/// The slot is flagged inactive and immediately compacted away: the last
/// position moves into `index` and the vector shrinks by one. Indices of the
/// staker's other positions may change; their contents never do.
pub fn close(env: &Env, staker: &Address, index: u32) -> Result<StakePosition, ContractError> {
    let mut positions = load(env, staker);
    let position = positions.get(index).ok_or(ContractError::IndexOutOfRange)?;
    let mut closing = position.clone();
    closing.active = false;
    positions.set(index, closing);

    compact(&mut positions, index);
    store(env, staker, &positions);

    Ok(position)
}

/// Swap-delete `index`: overwrite it with the last slot, then drop the tail.
fn compact(positions: &mut Vec<StakePosition>, index: u32) {
    let last = positions.len() - 1;
    if index != last {
        if let Some(tail) = positions.get(last) {
            positions.set(index, tail);
        }
    }
    positions.pop_back();
}

// ── Unit tests ──────────────────────────────────────────────────────────────
