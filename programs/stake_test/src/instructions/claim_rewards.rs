//! Claim rewards instruction handler.
//!
//! Handles claiming accumulated rewards without unstaking.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::accrual;
use crate::constants::*;
use crate::error::StakingError;
use crate::event::RewardsClaimed;
use crate::state::{StakePool, UserStake};

/// Accounts required for claiming rewards.
#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    /// The owner claiming rewards.
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

    /// Owner's stake account. Must sit at the signer's derived address.
    #[account(
        mut,
        constraint = UserStake::address(&stake_pool.key(), &owner.key(), user_stake.bump)
            == Some(user_stake.key()) @ StakingError::InvalidAccount,
        constraint = user_stake.pool == stake_pool.key() @ StakingError::InvalidAccount,
        constraint = user_stake.owner == owner.key() @ StakingError::Unauthorized
    )]
    pub user_stake: Account<'info, UserStake>,

    pub staking_mint: Account<'info, Mint>,

    /// Owner's token account for receiving rewards.
    #[account(
        mut,
        constraint = owner_token_account.mint == staking_mint.key() @ StakingError::MintMismatch,
        constraint = owner_token_account.owner == owner.key() @ StakingError::Unauthorized
    )]
    pub owner_token_account: Account<'info, TokenAccount>,

    /// Pool's vault holding the reward reserve.
    #[account(mut)]
    pub vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Applies `claim_rewards` to the pool and stake records.
///
/// Returns the amount to pay out, which may be zero.
pub fn process_claim_rewards(
    stake_pool: &mut StakePool,
    pool_key: Pubkey,
    user_stake: &mut UserStake,
    owner: Pubkey,
    now: i64,
) -> std::result::Result<u64, StakingError> {
    user_stake.require_owner(&owner, &pool_key)?;
    stake_pool.require_clock(now)?;

    accrual::checkpoint(user_stake, stake_pool, now)?;

    let reward_reserve = stake_pool.reserve_after(user_stake.unclaimed_rewards)?;
    let total_distributed = stake_pool
        .total_distributed
        .checked_add(user_stake.unclaimed_rewards)
        .ok_or(StakingError::ArithmeticOverflow)?;
    let rewards = user_stake.take_rewards()?;

    stake_pool.reward_reserve = reward_reserve;
    stake_pool.total_distributed = total_distributed;
    stake_pool.last_updated = now;

    Ok(rewards)
}

/// Claim accumulated rewards.
///
/// Principal and lockup are untouched. Rewards are paid from the vault's
/// reward reserve.
///
/// # Arguments
/// * `ctx` - ClaimRewards accounts context
pub fn handler(ctx: Context<ClaimRewards>) -> Result<()> {
    let clock = Clock::get()?;
    let accounts = &mut *ctx.accounts;

    let pool_key = accounts.stake_pool.key();
    let owner = accounts.owner.key();

    let rewards = process_claim_rewards(
        &mut accounts.stake_pool,
        pool_key,
        &mut accounts.user_stake,
        owner,
        clock.unix_timestamp,
    )?;

    if rewards > 0 {
        let seeds = &[POOL_SEED, &[accounts.stake_pool.bump]];
        let signer_seeds = &[&seeds[..]];

        let cpi_accounts = Transfer {
            from: accounts.vault.to_account_info(),
            to: accounts.owner_token_account.to_account_info(),
            authority: accounts.stake_pool.to_account_info(),
        };
        let cpi_program = accounts.token_program.to_account_info();
        let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);
        token::transfer(cpi_ctx, rewards)?;
    }

    msg!("Claimed {} reward tokens", rewards);
    msg!("Total rewards claimed by owner: {}", accounts.user_stake.total_rewards_claimed);
    msg!("Total distributed from pool: {}", accounts.stake_pool.total_distributed);

    emit!(RewardsClaimed {
        owner,
        rewards,
        total_distributed: accounts.stake_pool.total_distributed,
        ts: clock.unix_timestamp,
    });

    Ok(())
}
