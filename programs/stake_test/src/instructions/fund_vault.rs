/// Fund vault instruction handler.
///
/// Deposits reward tokens into the vault's reward reserve.
///
/// ## Security Guarantees
/// - Vault must be the pool's stored vault
/// - Funder token account must be for the pool's mint
/// - Anyone can fund (no authority restriction)

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::StakingError;
use crate::event::VaultFunded;
use crate::state::StakePool;

/// Accounts required for funding the reward reserve.
#[derive(Accounts)]
pub struct FundVault<'info> {
    /// The funder (permissionless).
    #[account(mut)]
    pub funder: Signer<'info>,

    /// The stake pool.
    #[account(
        mut,
        seeds = [POOL_SEED],
        bump = stake_pool.bump,
        has_one = vault @ StakingError::InvalidAccount,
        has_one = staking_mint @ StakingError::MintMismatch
    )]
    pub stake_pool: Account<'info, StakePool>,

    pub staking_mint: Account<'info, Mint>,

    /// Funder's token account.
    #[account(
        mut,
        constraint = funder_token_account.mint == staking_mint.key() @ StakingError::MintMismatch,
        constraint = funder_token_account.owner == funder.key() @ StakingError::Unauthorized
    )]
    pub funder_token_account: Account<'info, TokenAccount>,

    /// Pool's vault.
    #[account(mut)]
    pub vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Applies `fund_vault` to the pool record. Returns the new reward reserve.
pub fn process_fund_vault(
    stake_pool: &mut StakePool,
    funder_balance: u64,
    amount: u64,
    now: i64,
) -> std::result::Result<u64, StakingError> {
    if !stake_pool.is_initialized() {
        return Err(StakingError::InvalidAccount);
    }
    if amount == 0 {
        return Err(StakingError::ZeroAmount);
    }
    if funder_balance < amount {
        return Err(StakingError::InsufficientFunds);
    }
    stake_pool.require_clock(now)?;

    stake_pool.reward_reserve = stake_pool
        .reward_reserve
        .checked_add(amount)
        .ok_or(StakingError::ArithmeticOverflow)?;
    stake_pool.last_updated = now;
    Ok(stake_pool.reward_reserve)
}

/// Fund the vault's reward reserve.
///
/// # Arguments
/// * `ctx` - FundVault accounts context
/// * `amount` - Amount of tokens to deposit
pub fn handler(ctx: Context<FundVault>, amount: u64) -> Result<()> {
    let clock = Clock::get()?;
    let accounts = &mut *ctx.accounts;

    let reward_reserve = process_fund_vault(
        &mut accounts.stake_pool,
        accounts.funder_token_account.amount,
        amount,
        clock.unix_timestamp,
    )?;

    let cpi_accounts = Transfer {
        from: accounts.funder_token_account.to_account_info(),
        to: accounts.vault.to_account_info(),
        authority: accounts.funder.to_account_info(),
    };
    let cpi_program = accounts.token_program.to_account_info();
    let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);
    token::transfer(cpi_ctx, amount)?;

    msg!("Vault funded with {} tokens", amount);
    msg!("Reward reserve: {}", reward_reserve);
    msg!("Funder: {}", accounts.funder.key());

    emit!(VaultFunded {
        funder: accounts.funder.key(),
        amount,
        reward_reserve,
        ts: clock.unix_timestamp,
    });

    Ok(())
}
