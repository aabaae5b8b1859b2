use soroban_sdk::{Env, I256};

use crate::ContractError;

/// Fixed-point scale shared by `APR`.
///
/// Rates are stored with 18 decimal places so that fractional percentages
/// survive integer arithmetic; the scale is folded back into the divisor of
/// the reward formula, never applied on its own.
pub const PRECISION: i128 = 1_000_000_000_000_000_000;

/// Annual percentage rate: 30% expressed with 18 decimals.
pub const APR: i128 = 300_000_000_000_000_000;

pub const SECONDS_PER_DAY: u64 = 86_400;
pub const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// Lock term of every position. Accrual stops once it is reached.
pub const STAKING_PERIOD: u64 = 180 * SECONDS_PER_DAY;

// ── Core reward engine ──────────────────────────────────────────────────────

/// Seconds of accrual credited to a position at `now`.
///
/// Capped at `STAKING_PERIOD`, and zero when the ledger clock reads earlier
/// than `start_time`.
pub fn accrual_duration(start_time: u64, now: u64) -> u64 {
    now.saturating_sub(start_time).min(STAKING_PERIOD)
}

/// Interest owed on `amount` after `duration` seconds.
///
/// ```text
/// reward = floor(amount × APR × duration / (SECONDS_PER_YEAR × PRECISION))
/// ```
///
/// The numerator is formed in 256-bit space so the only precision loss is the
/// final truncating division. `duration` is clamped to `STAKING_PERIOD`.
pub fn reward_for_duration(
    env: &Env,
    amount: i128,
    duration: u64,
) -> Result<i128, ContractError> {
    if amount <= 0 || duration == 0 {
        return Ok(0);
    }
    let duration = duration.min(STAKING_PERIOD);

    let numerator = I256::from_i128(env, amount)
        .mul(&I256::from_i128(env, APR))
        .mul(&I256::from_i128(env, duration as i128));
    let denominator = I256::from_i128(env, SECONDS_PER_YEAR as i128)
        .mul(&I256::from_i128(env, PRECISION));

    numerator
        .div(&denominator)
        .to_i128()
        .ok_or(ContractError::ArithmeticOverflow)
}

/// Reward a position has accrued at `now`. Pure and repeatable.
pub fn accrued_reward(
    env: &Env,
    amount: i128,
    start_time: u64,
    now: u64,
) -> Result<i128, ContractError> {
    reward_for_duration(env, amount, accrual_duration(start_time, now))
}

/// Reward paid on a matured position: accrual over exactly one full term.
pub fn matured_reward(env: &Env, amount: i128) -> Result<i128, ContractError> {
    reward_for_duration(env, amount, STAKING_PERIOD)
}

/// Timestamp at which a position opened at `start_time` matures.
pub fn maturity_time(start_time: u64) -> u64 {
    start_time.saturating_add(STAKING_PERIOD)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
