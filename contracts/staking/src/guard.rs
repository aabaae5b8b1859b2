use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::ContractError;

const SAFETY: Symbol = symbol_short!("SAFETY");

/// Pause flag plus the per-invocation reentrancy lock.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SafetyState {
    pub paused: bool,
    /// Held only while a non-reentrant entry point is executing.
    pub locked: bool,
}

impl SafetyState {
    pub fn load(env: &Env) -> Self {
        env.storage().instance().get(&SAFETY).unwrap_or_default()
    }

    fn save(&self, env: &Env) {
        env.storage().instance().set(&SAFETY, self);
    }
}

// ── Pause ───────────────────────────────────────────────────────────────────

pub fn is_paused(env: &Env) -> bool {
    SafetyState::load(env).paused
}

/// Set the pause flag. Setting it to its current value is a no-op.
pub fn set_paused(env: &Env, paused: bool) {
    let mut state = SafetyState::load(env);
    if state.paused != paused {
        state.paused = paused;
        state.save(env);
    }
}

pub fn require_not_paused(env: &Env) -> Result<(), ContractError> {
    if is_paused(env) {
        return Err(ContractError::Paused);
    }
    Ok(())
}

pub fn require_paused(env: &Env) -> Result<(), ContractError> {
    if !is_paused(env) {
        return Err(ContractError::NotPaused);
    }
    Ok(())
}

// ── Reentrancy ──────────────────────────────────────────────────────────────

fn acquire_lock(env: &Env) -> Result<(), ContractError> {
    let mut state = SafetyState::load(env);
    if state.locked {
        return Err(ContractError::ReentrantCall);
    }
    state.locked = true;
    state.save(env);
    Ok(())
}

fn release_lock(env: &Env) {
    let mut state = SafetyState::load(env);
    state.locked = false;
    state.save(env);
}

/// Run `f` while holding the reentrancy lock.
///
/// The lock is released whether `f` succeeds or fails, so it is never
/// observable once the entry point returns.
///
/// The host already refuses to re-enter a running contract, so a re-entrant
/// asset callback fails inside the transfer and surfaces as `TransferFailed`
/// rather than `ReentrantCall`.
pub fn non_reentrant<T, F>(env: &Env, f: F) -> Result<T, ContractError>
where
    F: FnOnce() -> Result<T, ContractError>,
{
    acquire_lock(env)?;
    let result = f();
    release_lock(env);
    result
}
