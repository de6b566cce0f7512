//! Reward accrual engine.
//!
//! Rewards accrue linearly on principal at an annual rate:
//!
//! `delta = floor(principal * numerator * elapsed / (denominator * SECONDS_PER_YEAR))`
//!
//! Every mutating instruction on a stake account checkpoints first, so a
//! principal change only affects time that passes after it. Rate changes are
//! recorded as epochs on the pool and applied piecewise at the next
//! checkpoint. Truncation always rounds in the pool's favour.

use crate::constants::SECONDS_PER_YEAR;
use crate::error::StakingError;
use crate::state::{RewardRate, StakePool, UserStake};

/// Reward owed on `principal` for `elapsed` seconds at `rate`.
pub fn reward_delta(
    principal: u64,
    rate: RewardRate,
    elapsed: u64,
) -> Result<u64, StakingError> {
    if rate.denominator == 0 {
        return Err(StakingError::InvalidRate);
    }
    if principal == 0 || elapsed == 0 || rate.numerator == 0 {
        return Ok(0);
    }

    let numerator = (principal as u128)
        .checked_mul(rate.numerator as u128)
        .ok_or(StakingError::ArithmeticOverflow)?
        .checked_mul(elapsed as u128)
        .ok_or(StakingError::ArithmeticOverflow)?;
    let denominator = (rate.denominator as u128)
        .checked_mul(SECONDS_PER_YEAR as u128)
        .ok_or(StakingError::ArithmeticOverflow)?;

    u64::try_from(numerator / denominator).map_err(|_| StakingError::ArithmeticOverflow)
}

/// Reward owed to `stake` from its checkpoint up to `until`, summed epoch by
/// epoch with each epoch's share floored on its own.
fn accrued_until(
    stake: &UserStake,
    pool: &StakePool,
    until: i64,
) -> Result<u64, StakingError> {
    let mut total: u64 = 0;
    let mut from = stake.last_accrual_checkpoint;
    for epoch in stake.rate_epoch..=pool.rate_epoch {
        let segment = pool.segment(epoch)?;
        let end = if epoch == pool.rate_epoch {
            until
        } else {
            pool.segment(epoch + 1)?.effective_from
        };
        if end < from {
            return Err(StakingError::ClockSkew);
        }
        let elapsed = end
            .checked_sub(from)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let delta = reward_delta(stake.principal, segment.rate(), elapsed as u64)?;
        total = total
            .checked_add(delta)
            .ok_or(StakingError::ArithmeticOverflow)?;
        from = end;
    }
    Ok(total)
}

fn advance(
    stake: &mut UserStake,
    pool: &mut StakePool,
    until: i64,
) -> Result<u64, StakingError> {
    let delta = accrued_until(stake, pool, until)?;
    let unclaimed = stake
        .unclaimed_rewards
        .checked_add(delta)
        .ok_or(StakingError::ArithmeticOverflow)?;
    pool.move_staker(stake.rate_epoch)?;

    stake.unclaimed_rewards = unclaimed;
    stake.last_accrual_checkpoint = until;
    stake.rate_epoch = pool.rate_epoch;
    Ok(delta)
}

/// Moves the stake's checkpoint to `now`, folding the reward for the elapsed
/// interval into `unclaimed_rewards`. Returns the newly accrued amount.
///
/// Rate changes since the last checkpoint are applied piecewise, which gives
/// the same result as checkpointing every stake at each change.
/// Nothing is written unless every step succeeds.
pub fn checkpoint(
    stake: &mut UserStake,
    pool: &mut StakePool,
    now: i64,
) -> Result<u64, StakingError> {
    if now < stake.last_accrual_checkpoint {
        return Err(StakingError::ClockSkew);
    }
    advance(stake, pool, now)
}

/// Brings a stake left behind by rate changes up to the start of the current
/// epoch. A stake already in the current epoch is left as it is.
pub fn catch_up(stake: &mut UserStake, pool: &mut StakePool) -> Result<u64, StakingError> {
    if stake.rate_epoch == pool.rate_epoch {
        return Ok(0);
    }
    let start = pool.current_segment().effective_from;
    advance(stake, pool, start)
}
