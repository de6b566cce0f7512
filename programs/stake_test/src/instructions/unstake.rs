//! Unstake instruction handler.
//!
//! Withdraws the full principal plus accrued rewards and closes the stake
//! account once its lockup has expired.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::accrual;
use crate::constants::*;
use crate::error::StakingError;
use crate::event::Unstaked;
use crate::state::{StakePool, UserStake};

/// Accounts required for unstaking.
#[derive(Accounts)]
pub struct Unstake<'info> {
    /// The owner unstaking; receives the closed account's rent.
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

    /// Owner's stake account, closed by this instruction. Must sit at the
    /// signer's derived address.
    #[account(
        mut,
        close = owner,
        constraint = UserStake::address(&stake_pool.key(), &owner.key(), user_stake.bump)
            == Some(user_stake.key()) @ StakingError::InvalidAccount,
        constraint = user_stake.pool == stake_pool.key() @ StakingError::InvalidAccount,
        constraint = user_stake.owner == owner.key() @ StakingError::Unauthorized
    )]
    pub user_stake: Account<'info, UserStake>,

    pub staking_mint: Account<'info, Mint>,

    /// Owner's token account receiving principal and rewards.
    #[account(
        mut,
        constraint = owner_token_account.mint == staking_mint.key() @ StakingError::MintMismatch,
        constraint = owner_token_account.owner == owner.key() @ StakingError::Unauthorized
    )]
    pub owner_token_account: Account<'info, TokenAccount>,

    /// Pool's vault.
    #[account(mut)]
    pub vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Outcome of a successful unstake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnstakeReceipt {
    pub principal: u64,
    pub rewards: u64,
}

impl UnstakeReceipt {
    pub fn payout(&self) -> std::result::Result<u64, StakingError> {
        self.principal
            .checked_add(self.rewards)
            .ok_or(StakingError::ArithmeticOverflow)
    }
}

/// Applies `unstake` to the pool and stake records.
///
/// After this returns the stake record is zeroed; the caller closes it.
pub fn process_unstake(
    stake_pool: &mut StakePool,
    pool_key: Pubkey,
    user_stake: &mut UserStake,
    owner: Pubkey,
    now: i64,
) -> std::result::Result<UnstakeReceipt, StakingError> {
    user_stake.require_owner(&owner, &pool_key)?;
    stake_pool.require_clock(now)?;
    if !user_stake.is_lock_ended(now) {
        return Err(StakingError::LockupNotExpired);
    }

    accrual::checkpoint(user_stake, stake_pool, now)?;

    let principal = user_stake.principal;
    let rewards = user_stake.unclaimed_rewards;
    let reward_reserve = stake_pool.reserve_after(rewards)?;
    let total_staked = stake_pool
        .total_staked
        .checked_sub(principal)
        .ok_or(StakingError::ArithmeticOverflow)?;
    let total_distributed = stake_pool
        .total_distributed
        .checked_add(rewards)
        .ok_or(StakingError::ArithmeticOverflow)?;

    stake_pool.remove_staker()?;
    let receipt = user_stake.close_out().map(|(principal, rewards)| UnstakeReceipt {
        principal,
        rewards,
    })?;
    receipt.payout()?;

    stake_pool.total_staked = total_staked;
    stake_pool.reward_reserve = reward_reserve;
    stake_pool.total_distributed = total_distributed;
    stake_pool.last_updated = now;

    Ok(receipt)
}

/// Unstake all tokens and rewards, closing the stake account.
///
/// # Arguments
/// * `ctx` - Unstake accounts context
pub fn handler(ctx: Context<Unstake>) -> Result<()> {
    let clock = Clock::get()?;
    let accounts = &mut *ctx.accounts;

    let pool_key = accounts.stake_pool.key();
    let owner = accounts.owner.key();

    let receipt = process_unstake(
        &mut accounts.stake_pool,
        pool_key,
        &mut accounts.user_stake,
        owner,
        clock.unix_timestamp,
    )?;
    let payout = receipt.payout()?;

    let seeds = &[POOL_SEED, &[accounts.stake_pool.bump]];
    let signer_seeds = &[&seeds[..]];

    let cpi_accounts = Transfer {
        from: accounts.vault.to_account_info(),
        to: accounts.owner_token_account.to_account_info(),
        authority: accounts.stake_pool.to_account_info(),
    };
    let cpi_program = accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
    token::transfer(cpi_ctx, payout)?;

    msg!("Unstaked {} tokens with {} rewards", receipt.principal, receipt.rewards);
    msg!("Total staked in pool: {}", accounts.stake_pool.total_staked);

    emit!(Unstaked {
        owner,
        principal: receipt.principal,
        rewards: receipt.rewards,
        total_staked: accounts.stake_pool.total_staked,
        ts: clock.unix_timestamp,
    });

    Ok(())
}
