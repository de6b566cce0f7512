//! Events emitted by the StakeTest program.
//!
//! One event per successful instruction, logged with `emit!` so indexers can
//! follow pool accounting without replaying account data.

use anchor_lang::prelude::*;

#[event]
pub struct PoolInitialized {
    pub pool: Pubkey,
    pub authority: Pubkey,
    pub staking_mint: Pubkey,
    pub reward_rate_numerator: u64,
    pub reward_rate_denominator: u64,
    pub lockup_seconds: i64,
    pub ts: i64,
}

#[event]
pub struct Staked {
    pub owner: Pubkey,
    pub amount: u64,
    /// Reward checkpointed before the deposit was added.
    pub accrued: u64,
    pub principal: u64,
    pub lockup_end_timestamp: i64,
    pub total_staked: u64,
    pub ts: i64,
}

#[event]
pub struct Unstaked {
    pub owner: Pubkey,
    pub principal: u64,
    pub rewards: u64,
    pub total_staked: u64,
    pub ts: i64,
}

#[event]
pub struct RewardsClaimed {
    pub owner: Pubkey,
    pub rewards: u64,
    pub total_distributed: u64,
    pub ts: i64,
}

#[event]
pub struct RateUpdated {
    pub previous_numerator: u64,
    pub previous_denominator: u64,
    pub numerator: u64,
    pub denominator: u64,
    /// Epoch in which the new rate applies.
    pub rate_epoch: u64,
    pub ts: i64,
}

#[event]
pub struct StakesCheckpointed {
    /// Stake accounts moved into the current epoch.
    pub caught_up: u64,
    pub rate_epoch: u64,
    pub ts: i64,
}

#[event]
pub struct PauseUpdated {
    pub paused: bool,
    pub ts: i64,
}

#[event]
pub struct VaultFunded {
    pub funder: Pubkey,
    pub amount: u64,
    pub reward_reserve: u64,
    pub ts: i64,
}

#[event]
pub struct AuthorityTransferred {
    pub previous_authority: Pubkey,
    pub new_authority: Pubkey,
    pub ts: i64,
}
