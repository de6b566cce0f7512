//! # StakeTest Program
//!
//! A single-pool, time-locked staking program. Owners deposit tokens into the
//! pool vault, earn rewards at a configurable annual rate and withdraw
//! principal plus rewards once their lockup has expired.
//!
//! ## Features
//! - Linear reward accrual, checkpointed on every stake account mutation
//! - Claim rewards without unstaking
//! - Rate changes apply from the moment they are made, never retroactively,
//!   and cost the same however many stakers the pool has
//! - Admin controls for pausing, rate changes and authority transfer
//! - Checked integer math throughout; any failure aborts the instruction

use anchor_lang::prelude::*;

declare_id!("BYmuqm9eZLYGbUbsFNJvXZqaGi9AKGxYL73WDKic4taF");

pub mod accrual;
pub mod constants;
pub mod error;
pub mod event;
pub mod instructions;
pub mod sdk;
pub mod state;

use instructions::*;
use state::{PoolConfig, RewardRate};

#[program]
pub mod stake_test {
    use super::*;

    /// Initializes the deployment's stake pool and its vault.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The pool is already initialized
    /// - The rate denominator is zero or the rate exceeds 100% per year
    /// - The lockup is negative or too long
    pub fn initialize_pool(ctx: Context<InitializePool>, config: PoolConfig) -> Result<()> {
        instructions::initialize::handler(ctx, config)
    }

    /// Stakes tokens, opening the owner's stake account on first use.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Staking is paused
    /// - Amount is zero
    /// - Owner's token balance is below `amount`
    pub fn stake(ctx: Context<Stake>, amount: u64) -> Result<()> {
        instructions::stake::handler(ctx, amount)
    }

    /// Withdraws all principal and rewards and closes the stake account.
    ///
    /// Rewards are paid only from the funded reward reserve. While the reserve
    /// is short of the accrued rewards the unstake fails and the principal
    /// stays in the vault; it succeeds once `fund_vault` has topped the reserve
    /// up.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The lockup has not expired
    /// - The reward reserve cannot cover accrued rewards
    pub fn unstake(ctx: Context<Unstake>) -> Result<()> {
        instructions::unstake::handler(ctx)
    }

    /// Claims accrued rewards without unstaking.
    ///
    /// # Errors
    /// Returns an error if the reward reserve cannot cover accrued rewards.
    pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
        instructions::claim_rewards::handler(ctx)
    }

    /// Admin function to change the annual reward rate.
    ///
    /// Opens a new rate epoch; stake accounts pick it up at their next
    /// checkpoint.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the authority
    /// - The rate is invalid
    /// - The oldest rate epoch still holds stake accounts (`checkpoint_stakes`
    ///   them first)
    pub fn set_rate(ctx: Context<AdminControl>, rate: RewardRate) -> Result<()> {
        instructions::admin::set_rate_handler(ctx, rate)
    }

    /// Moves idle stake accounts into the current rate epoch. Permissionless.
    ///
    /// Stake accounts are passed as writable remaining accounts.
    ///
    /// # Errors
    /// Returns an error if a stake account is read-only, duplicated, closed or
    /// not at its derived address.
    pub fn checkpoint_stakes<'info>(
        ctx: Context<'_, '_, 'info, 'info, CheckpointStakes<'info>>,
    ) -> Result<()> {
        instructions::checkpoint_stakes::handler(ctx)
    }

    /// Admin function to pause or unpause staking.
    ///
    /// # Errors
    /// Returns an error if caller is not the authority.
    pub fn set_paused(ctx: Context<AdminControl>, paused: bool) -> Result<()> {
        instructions::admin::set_paused_handler(ctx, paused)
    }

    /// Funds the vault's reward reserve. Permissionless.
    ///
    /// # Errors
    /// Returns an error if amount is zero or exceeds the funder's balance.
    pub fn fund_vault(ctx: Context<FundVault>, amount: u64) -> Result<()> {
        instructions::fund_vault::handler(ctx, amount)
    }

    /// Admin function to transfer authority to a new address.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the current authority
    /// - New authority is the default pubkey
    pub fn transfer_authority(ctx: Context<AdminControl>, new_authority: Pubkey) -> Result<()> {
        instructions::admin::transfer_authority_handler(ctx, new_authority)
    }
}
