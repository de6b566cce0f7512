use anchor_lang::prelude::*;

use crate::constants::STAKE_SEED;
use crate::error::StakingError;

/// Where a stake account sits in its lifecycle at a given clock reading.
///
/// A closed account no longer exists on chain, so it reads back exactly like
/// one that was never opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakeStatus {
    Uninitialized,
    Locked,
    Unlocked,
}

#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UserStake {
    pub owner: Pubkey,
    pub pool: Pubkey,

    pub principal: u64,
    pub unclaimed_rewards: u64,
    pub total_rewards_claimed: u64,

    pub deposit_timestamp: i64,
    pub last_accrual_checkpoint: i64,
    pub lockup_end_timestamp: i64,
    /// Rate epoch of the pool at `last_accrual_checkpoint`.
    pub rate_epoch: u64,

    pub bump: u8,
}

impl UserStake {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 8 + 8 + 8 + 8 + 8 + 8 + 1;

    /// Address of the stake account for `owner` in `pool`, derived with a
    /// stored bump. `None` if the seeds do not yield a valid PDA.
    pub fn address(pool: &Pubkey, owner: &Pubkey, bump: u8) -> Option<Pubkey> {
        Pubkey::create_program_address(
            &[STAKE_SEED, pool.as_ref(), owner.as_ref(), &[bump]],
            &crate::ID,
        )
        .ok()
    }

    pub fn is_open(&self) -> bool {
        self.owner != Pubkey::default()
    }

    pub fn is_lock_ended(&self, now: i64) -> bool {
        now >= self.lockup_end_timestamp
    }

    pub fn status(&self, now: i64) -> StakeStatus {
        if !self.is_open() {
            StakeStatus::Uninitialized
        } else if self.is_lock_ended(now) {
            StakeStatus::Unlocked
        } else {
            StakeStatus::Locked
        }
    }

    /// Checks that `signer` owns this open record and that it belongs to `pool`.
    pub fn require_owner(
        &self,
        signer: &Pubkey,
        pool: &Pubkey,
    ) -> std::result::Result<(), StakingError> {
        if !self.is_open() || self.pool != *pool {
            return Err(StakingError::InvalidAccount);
        }
        if self.owner != *signer {
            return Err(StakingError::Unauthorized);
        }
        Ok(())
    }

    /// Uninitialized -> Locked.
    pub fn open(
        &mut self,
        owner: Pubkey,
        pool: Pubkey,
        amount: u64,
        lockup_end: i64,
        now: i64,
        rate_epoch: u64,
    ) -> std::result::Result<(), StakingError> {
        if self.is_open() {
            return Err(StakingError::InvalidAccount);
        }
        if lockup_end < now {
            return Err(StakingError::ClockSkew);
        }
        self.owner = owner;
        self.pool = pool;
        self.principal = amount;
        self.unclaimed_rewards = 0;
        self.total_rewards_claimed = 0;
        self.deposit_timestamp = now;
        self.last_accrual_checkpoint = now;
        self.lockup_end_timestamp = lockup_end;
        self.rate_epoch = rate_epoch;
        Ok(())
    }

    /// Locked/Unlocked -> Locked. Accrual must already be checkpointed at `now`.
    pub fn add_principal(
        &mut self,
        amount: u64,
        lockup_end: i64,
        now: i64,
    ) -> std::result::Result<(), StakingError> {
        if self.last_accrual_checkpoint != now {
            return Err(StakingError::ClockSkew);
        }
        self.principal = self
            .principal
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.lockup_end_timestamp = lockup_end;
        Ok(())
    }

    /// Pays out the checkpointed rewards, leaving principal and lockup alone.
    pub fn take_rewards(&mut self) -> std::result::Result<u64, StakingError> {
        let rewards = self.unclaimed_rewards;
        self.total_rewards_claimed = self
            .total_rewards_claimed
            .checked_add(rewards)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.unclaimed_rewards = 0;
        Ok(rewards)
    }

    /// Unlocked -> Closed. Returns `(principal, rewards)` as they stood before
    /// the record was zeroed.
    pub fn close_out(&mut self) -> std::result::Result<(u64, u64), StakingError> {
        let principal = self.principal;
        let rewards = self.take_rewards()?;
        *self = UserStake::default();
        Ok((principal, rewards))
    }
}
