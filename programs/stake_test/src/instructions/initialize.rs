/// Initialize instruction handler.
///
/// Creates the single stake pool of this deployment and its vault.
///
/// ## Security Guarantees
/// - Pool address is derived from the program id and a fixed seed, so only
///   one pool can ever exist
/// - Vault is a PDA token account whose authority is the pool
/// - Configuration is validated before anything is stored

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::StakingError;
use crate::event::PoolInitialized;
use crate::state::{PoolConfig, StakePool};

/// Accounts required for pool initialization.
///
/// ## Security Notes
/// - `stake_pool` and `vault` use `init_if_needed` so a second attempt reaches
///   the handler and fails with `AlreadyInitialized` instead of a system error
/// - Seeds ensure neither account can be swapped or replaced
#[derive(Accounts)]
pub struct InitializePool<'info> {
    /// The authority that will control pool configuration.
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The stake pool account. PDA derived from POOL_SEED only.
    #[account(
        init_if_needed,
        payer = authority,
        space = StakePool::LEN,
        seeds = [POOL_SEED],
        bump
    )]
    pub stake_pool: Account<'info, StakePool>,

    /// The mint of the staked and rewarded token.
    pub staking_mint: Account<'info, Mint>,

    /// Custodial vault holding principal and reward reserve.
    #[account(
        init_if_needed,
        payer = authority,
        seeds = [VAULT_SEED, stake_pool.key().as_ref()],
        bump,
        token::mint = staking_mint,
        token::authority = stake_pool
    )]
    pub vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,

    pub token_program: Program<'info, Token>,

    pub rent: Sysvar<'info, Rent>,
}

/// Applies `initialize_pool` to the pool record.
pub fn process_initialize(
    stake_pool: &mut StakePool,
    authority: Pubkey,
    staking_mint: Pubkey,
    vault: Pubkey,
    config: &PoolConfig,
    now: i64,
) -> std::result::Result<(), StakingError> {
    stake_pool.initialize(authority, staking_mint, vault, config, now)
}

/// Initialize the stake pool.
///
/// # Arguments
/// * `ctx` - InitializePool accounts context
/// * `config` - Reward rate and lockup duration
pub fn handler(ctx: Context<InitializePool>, config: PoolConfig) -> Result<()> {
    let clock = Clock::get()?;
    let accounts = &mut *ctx.accounts;

    let authority = accounts.authority.key();
    let staking_mint = accounts.staking_mint.key();
    let vault = accounts.vault.key();

    process_initialize(
        &mut accounts.stake_pool,
        authority,
        staking_mint,
        vault,
        &config,
        clock.unix_timestamp,
    )?;

    let stake_pool = &mut accounts.stake_pool;
    stake_pool.bump = ctx.bumps.stake_pool;
    stake_pool.vault_bump = ctx.bumps.vault;

    msg!("Stake pool initialized");
    msg!("Authority: {}", authority);
    msg!("Mint: {}", staking_mint);
    msg!(
        "Rate: {}/{} per year, lockup {}s",
        config.rate.numerator,
        config.rate.denominator,
        config.lockup_seconds
    );

    emit!(PoolInitialized {
        pool: stake_pool.key(),
        authority,
        staking_mint,
        reward_rate_numerator: config.rate.numerator,
        reward_rate_denominator: config.rate.denominator,
        lockup_seconds: config.lockup_seconds,
        ts: clock.unix_timestamp,
    });

    Ok(())
}
