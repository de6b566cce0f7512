//! Stake instruction handler.
//!
//! Handles depositing tokens into the pool vault.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::accrual;
use crate::constants::*;
use crate::error::StakingError;
use crate::event::Staked;
use crate::state::{StakePool, UserStake};

/// Accounts required for staking.
#[derive(Accounts)]
pub struct Stake<'info> {
    /// The owner staking tokens.
    #[account(mut)]
    pub owner: Signer<'info>,

    /// The stake pool.
    #[account(
        mut,
        seeds = [POOL_SEED],
        bump = stake_pool.bump,
        has_one = vault @ StakingError::InvalidAccount,
        has_one = staking_mint @ StakingError::MintMismatch
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// Owner's stake account (created on first stake).
    #[account(
        init_if_needed,
        payer = owner,
        space = UserStake::LEN,
        seeds = [STAKE_SEED, stake_pool.key().as_ref(), owner.key().as_ref()],
        bump
    )]
    pub user_stake: Account<'info, UserStake>,

    pub staking_mint: Account<'info, Mint>,

    /// Owner's token account funding the deposit.
    #[account(
        mut,
        constraint = owner_token_account.mint == staking_mint.key() @ StakingError::MintMismatch,
        constraint = owner_token_account.owner == owner.key() @ StakingError::Unauthorized
    )]
    pub owner_token_account: Account<'info, TokenAccount>,

    /// Pool's vault.
    #[account(mut)]
    pub vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,

    pub token_program: Program<'info, Token>,
}

/// Outcome of a successful stake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeReceipt {
    /// True when this stake created the account.
    pub opened: bool,
    /// Reward checkpointed before the deposit was added.
    pub accrued: u64,
    pub principal: u64,
    pub lockup_end_timestamp: i64,
}

/// Applies `stake` to the pool and stake records.
///
/// Opens the stake account on first use; otherwise checkpoints accrual at the
/// current rate, adds the deposit and restarts the lockup.
pub fn process_stake(
    stake_pool: &mut StakePool,
    pool_key: Pubkey,
    user_stake: &mut UserStake,
    owner: Pubkey,
    owner_balance: u64,
    amount: u64,
    now: i64,
) -> std::result::Result<StakeReceipt, StakingError> {
    if !stake_pool.is_initialized() {
        return Err(StakingError::InvalidAccount);
    }
    if stake_pool.paused {
        return Err(StakingError::PoolPaused);
    }
    if amount == 0 {
        return Err(StakingError::ZeroAmount);
    }
    if owner_balance < amount {
        return Err(StakingError::InsufficientFunds);
    }
    stake_pool.require_clock(now)?;

    let total_staked = stake_pool
        .total_staked
        .checked_add(amount)
        .ok_or(StakingError::ArithmeticOverflow)?;
    let lockup_end = stake_pool.lockup_end(now)?;

    let opened = !user_stake.is_open();
    let accrued = if opened {
        user_stake.open(owner, pool_key, amount, lockup_end, now, stake_pool.rate_epoch)?;
        stake_pool.add_staker()?;
        0
    } else {
        user_stake.require_owner(&owner, &pool_key)?;
        let accrued = accrual::checkpoint(user_stake, stake_pool, now)?;
        user_stake.add_principal(amount, lockup_end, now)?;
        accrued
    };

    stake_pool.total_staked = total_staked;
    stake_pool.last_updated = now;

    Ok(StakeReceipt {
        opened,
        accrued,
        principal: user_stake.principal,
        lockup_end_timestamp: user_stake.lockup_end_timestamp,
    })
}

/// Stake tokens into the pool.
///
/// # Arguments
/// * `ctx` - Stake accounts context
/// * `amount` - Amount of tokens to stake
pub fn handler(ctx: Context<Stake>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let accounts = &mut *ctx.accounts;

    let pool_key = accounts.stake_pool.key();
    let owner = accounts.owner.key();
    let owner_balance = accounts.owner_token_account.amount;

    // State first; the token transfer is the last thing that can fail.
    let receipt = process_stake(
        &mut accounts.stake_pool,
        pool_key,
        &mut accounts.user_stake,
        owner,
        owner_balance,
        amount,
        clock.unix_timestamp,
    )?;
    if receipt.opened {
        accounts.user_stake.bump = ctx.bumps.user_stake;
    }

    let cpi_accounts = Transfer {
        from: accounts.owner_token_account.to_account_info(),
        to: accounts.vault.to_account_info(),
        authority: accounts.owner.to_account_info(),
    };
    let cpi_program = accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);
    token::transfer(cpi_ctx, amount)?;

    msg!("Staked {} tokens", amount);
    msg!("Principal: {}, rewards checkpointed: {}", receipt.principal, receipt.accrued);
    msg!("Locked until: {}", receipt.lockup_end_timestamp);
    msg!("Total staked in pool: {}", accounts.stake_pool.total_staked);

    emit!(Staked {
        owner,
        amount,
        accrued: receipt.accrued,
        principal: receipt.principal,
        lockup_end_timestamp: receipt.lockup_end_timestamp,
        total_staked: accounts.stake_pool.total_staked,
        ts: clock.unix_timestamp,
    });

    Ok(())
}
