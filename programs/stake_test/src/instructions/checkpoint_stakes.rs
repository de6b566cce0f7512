//! Checkpoint stakes instruction handler.
//!
//! Brings stake accounts left behind by rate changes up to the current rate
//! epoch, freeing the oldest epoch for the next `set_rate`. Permissionless:
//! catching up only settles accrual already owed at the old rates.

use std::collections::BTreeSet;

use anchor_lang::prelude::*;

use crate::accrual;
use crate::constants::*;
use crate::error::StakingError;
use crate::event::StakesCheckpointed;
use crate::state::{StakePool, UserStake};

/// Accounts required for checkpointing stakes.
///
/// The stake accounts themselves are passed as writable remaining accounts.
#[derive(Accounts)]
pub struct CheckpointStakes<'info> {
    /// The stake pool.
    #[account(
        mut,
        seeds = [POOL_SEED],
        bump = stake_pool.bump
    )]
    pub stake_pool: Account<'info, StakePool>,
}

/// Applies `checkpoint_stakes`. Returns how many stakes changed epoch.
///
/// Each listed stake must be open, belong to the pool and appear once.
pub fn process_checkpoint_stakes(
    stake_pool: &mut StakePool,
    pool_key: Pubkey,
    stakes: &mut [(Pubkey, &mut UserStake)],
) -> std::result::Result<u64, StakingError> {
    if !stake_pool.is_initialized() {
        return Err(StakingError::InvalidAccount);
    }
    let mut seen = BTreeSet::new();
    for (address, stake) in stakes.iter() {
        if !seen.insert(*address) || !stake.is_open() || stake.pool != pool_key {
            return Err(StakingError::InvalidAccount);
        }
    }

    let mut caught_up = 0u64;
    for (_, stake) in stakes.iter_mut() {
        if stake.rate_epoch != stake_pool.rate_epoch {
            accrual::catch_up(stake, stake_pool)?;
            caught_up += 1;
        }
    }
    Ok(caught_up)
}

/// Checkpoint the given stake accounts into the current rate epoch.
///
/// # Arguments
/// * `ctx` - CheckpointStakes accounts context, stake accounts as remaining accounts
pub fn handler<'info>(ctx: Context<'_, '_, 'info, 'info, CheckpointStakes<'info>>) -> Result<()> {
    let clock = Clock::get()?;
    let pool_key = ctx.accounts.stake_pool.key();

    let mut stake_accounts: Vec<Account<'info, UserStake>> =
        Vec::with_capacity(ctx.remaining_accounts.len());
    for info in ctx.remaining_accounts.iter() {
        require!(info.is_writable, StakingError::InvalidAccount);
        let stake: Account<'info, UserStake> = Account::try_from(info)?;
        let expected = UserStake::address(&pool_key, &stake.owner, stake.bump)
            .ok_or(StakingError::InvalidAccount)?;
        require_keys_eq!(expected, info.key(), StakingError::InvalidAccount);
        stake_accounts.push(stake);
    }

    let caught_up = {
        let mut stakes: Vec<(Pubkey, &mut UserStake)> = stake_accounts
            .iter_mut()
            .map(|account| {
                let address = account.key();
                (address, &mut **account)
            })
            .collect();
        process_checkpoint_stakes(&mut ctx.accounts.stake_pool, pool_key, &mut stakes)?
    };

    for stake in stake_accounts.iter() {
        stake.exit(ctx.program_id)?;
    }

    let rate_epoch = ctx.accounts.stake_pool.rate_epoch;
    msg!("Checkpointed {} of {} stake accounts", caught_up, stake_accounts.len());
    msg!("Rate epoch: {}", rate_epoch);

    emit!(StakesCheckpointed {
        caught_up,
        rate_epoch,
        ts: clock.unix_timestamp,
    });

    Ok(())
}
