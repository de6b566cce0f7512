/// Admin instruction handlers.
///
/// Handles authority-only operations on the stake pool.
///
/// ## Security Guarantees
/// - All admin functions require signer == pool.authority
/// - PDA validation ensures the deployment's single pool
/// - A rate change opens a new rate epoch; time before it keeps the old rate

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;
use crate::event::{AuthorityTransferred, PauseUpdated, RateUpdated};
use crate::state::{RewardRate, StakePool};

/// Accounts required for admin operations.
#[derive(Accounts)]
pub struct AdminControl<'info> {
    /// The pool authority.
    #[account(
        mut,
        constraint = authority.key() == stake_pool.authority @ StakingError::Unauthorized
    )]
    pub authority: Signer<'info>,

    /// The stake pool to modify.
    #[account(
        mut,
        seeds = [POOL_SEED],
        bump = stake_pool.bump,
        has_one = authority @ StakingError::Unauthorized
    )]
    pub stake_pool: Account<'info, StakePool>,
}

/// Applies `set_rate`: starts a new rate epoch at `rate` from `now`.
/// Returns the previous rate.
///
/// Stake accounts are not touched; each one accrues the old rate up to the
/// epoch boundary at its next checkpoint.
pub fn process_set_rate(
    stake_pool: &mut StakePool,
    authority: Pubkey,
    rate: RewardRate,
    now: i64,
) -> std::result::Result<RewardRate, StakingError> {
    stake_pool.require_authority(&authority)?;
    rate.validate()?;
    stake_pool.require_clock(now)?;

    let previous = stake_pool.push_rate(rate, now)?;
    stake_pool.last_updated = now;
    Ok(previous)
}

/// Applies `set_paused`. Returns the previous flag.
pub fn process_set_paused(
    stake_pool: &mut StakePool,
    authority: Pubkey,
    paused: bool,
    now: i64,
) -> std::result::Result<bool, StakingError> {
    stake_pool.require_authority(&authority)?;
    stake_pool.require_clock(now)?;

    let previous = stake_pool.paused;
    stake_pool.paused = paused;
    stake_pool.last_updated = now;
    Ok(previous)
}

/// Applies `transfer_authority`. Returns the previous authority.
pub fn process_transfer_authority(
    stake_pool: &mut StakePool,
    authority: Pubkey,
    new_authority: Pubkey,
    now: i64,
) -> std::result::Result<Pubkey, StakingError> {
    stake_pool.require_authority(&authority)?;
    stake_pool.require_clock(now)?;
    if new_authority == Pubkey::default() {
        return Err(StakingError::InvalidAccount);
    }

    let previous = stake_pool.authority;
    stake_pool.authority = new_authority;
    stake_pool.last_updated = now;
    Ok(previous)
}

/// Set the annual reward rate.
///
/// # Security
/// - Only pool.authority can call this
/// - The new rate applies from now on; accrual before now keeps the old rate
///
/// # Arguments
/// * `ctx` - AdminControl accounts context
/// * `rate` - New annual rate
pub fn set_rate_handler(ctx: Context<AdminControl>, rate: RewardRate) -> Result<()> {
    let clock = Clock::get()?;
    let authority = ctx.accounts.authority.key();
    let stake_pool = &mut ctx.accounts.stake_pool;

    let previous = process_set_rate(stake_pool, authority, rate, clock.unix_timestamp)?;

    msg!(
        "Reward rate updated: {}/{} -> {}/{}",
        previous.numerator,
        previous.denominator,
        rate.numerator,
        rate.denominator
    );
    msg!("Rate epoch: {}", stake_pool.rate_epoch);
    msg!("Admin: {}", authority);

    emit!(RateUpdated {
        previous_numerator: previous.numerator,
        previous_denominator: previous.denominator,
        numerator: rate.numerator,
        denominator: rate.denominator,
        rate_epoch: stake_pool.rate_epoch,
        ts: clock.unix_timestamp,
    });

    Ok(())
}

/// Set the paused state of the stake pool.
///
/// # Security
/// - Only pool.authority can call this
/// - When paused, new stakes are blocked
/// - Unstaking and claiming remain available (user funds not locked)
///
/// # Arguments
/// * `ctx` - AdminControl accounts context
/// * `paused` - True to pause, false to unpause
pub fn set_paused_handler(ctx: Context<AdminControl>, paused: bool) -> Result<()> {
    let clock = Clock::get()?;
    let authority = ctx.accounts.authority.key();

    let previous = process_set_paused(
        &mut ctx.accounts.stake_pool,
        authority,
        paused,
        clock.unix_timestamp,
    )?;

    msg!(
        "Staking {} (was {})",
        if paused { "PAUSED" } else { "RESUMED" },
        if previous { "paused" } else { "active" }
    );
    msg!("Admin: {}", authority);

    emit!(PauseUpdated {
        paused,
        ts: clock.unix_timestamp,
    });

    Ok(())
}

/// Transfer pool authority to a new address.
///
/// # Arguments
/// * `ctx` - AdminControl accounts context
/// * `new_authority` - New authority pubkey
pub fn transfer_authority_handler(
    ctx: Context<AdminControl>,
    new_authority: Pubkey,
) -> Result<()> {
    let clock = Clock::get()?;
    let authority = ctx.accounts.authority.key();

    let previous = process_transfer_authority(
        &mut ctx.accounts.stake_pool,
        authority,
        new_authority,
        clock.unix_timestamp,
    )?;

    msg!("Authority transferred: {} -> {}", previous, new_authority);

    emit!(AuthorityTransferred {
        previous_authority: previous,
        new_authority,
        ts: clock.unix_timestamp,
    });

    Ok(())
}
