use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;

/// Annual reward rate expressed as `numerator / denominator`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardRate {
    pub numerator: u64,
    pub denominator: u64,
}

impl RewardRate {
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), StakingError> {
        if self.denominator == 0 {
            return Err(StakingError::InvalidRate);
        }
        let ceiling = self
            .denominator
            .checked_mul(MAX_RATE_MULTIPLE)
            .ok_or(StakingError::ArithmeticOverflow)?;
        if self.numerator > ceiling {
            return Err(StakingError::RateTooHigh);
        }
        Ok(())
    }
}

/// Pool parameters supplied once at initialization.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolConfig {
    pub rate: RewardRate,
    pub lockup_seconds: i64,
}

impl PoolConfig {
    pub fn validate(&self) -> std::result::Result<(), StakingError> {
        self.rate.validate()?;
        if !(0..=MAX_LOCKUP_SECONDS).contains(&self.lockup_seconds) {
            return Err(StakingError::InvalidLockup);
        }
        Ok(())
    }
}

/// One rate epoch: the rate in force from `effective_from` until the next
/// epoch starts.
///
/// `stakers` counts the open stake accounts whose last checkpoint falls in
/// this epoch. An epoch can only be overwritten once that count is zero.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RateSegment {
    pub numerator: u64,
    pub denominator: u64,
    pub effective_from: i64,
    pub stakers: u64,
}

impl RateSegment {
    pub fn rate(&self) -> RewardRate {
        RewardRate::new(self.numerator, self.denominator)
    }
}

#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StakePool {
    pub authority: Pubkey,
    pub staking_mint: Pubkey,
    pub vault: Pubkey,

    pub reward_rate_numerator: u64,
    pub reward_rate_denominator: u64,
    pub lockup_seconds: i64,

    pub total_staked: u64,
    pub reward_reserve: u64,
    pub total_distributed: u64,
    pub staker_count: u64,

    pub paused: bool,

    pub created_at: i64,
    pub last_updated: i64,

    /// Current rate epoch; starts at 0 and grows by one per rate change.
    pub rate_epoch: u64,
    /// Ring of the most recent epochs, indexed by `epoch % RATE_HISTORY_LEN`.
    pub rate_history: [RateSegment; RATE_HISTORY_LEN],

    pub bump: u8,
    pub vault_bump: u8,
}

impl StakePool {
    pub const LEN: usize = 8
        + (32 * 3)
        + (8 * 3)
        + (8 * 4)
        + 1
        + (8 * 2)
        + 8
        + (32 * RATE_HISTORY_LEN)
        + 2;

    /// A freshly allocated pool account is all zeroes, so an unset authority
    /// marks it as never initialized.
    pub fn is_initialized(&self) -> bool {
        self.authority != Pubkey::default()
    }

    pub fn reward_rate(&self) -> RewardRate {
        RewardRate::new(self.reward_rate_numerator, self.reward_rate_denominator)
    }

    pub fn initialize(
        &mut self,
        authority: Pubkey,
        staking_mint: Pubkey,
        vault: Pubkey,
        config: &PoolConfig,
        now: i64,
    ) -> std::result::Result<(), StakingError> {
        if self.is_initialized() {
            return Err(StakingError::AlreadyInitialized);
        }
        if authority == Pubkey::default() {
            return Err(StakingError::InvalidAccount);
        }
        config.validate()?;

        self.authority = authority;
        self.staking_mint = staking_mint;
        self.vault = vault;
        self.reward_rate_numerator = config.rate.numerator;
        self.reward_rate_denominator = config.rate.denominator;
        self.lockup_seconds = config.lockup_seconds;
        self.total_staked = 0;
        self.reward_reserve = 0;
        self.total_distributed = 0;
        self.staker_count = 0;
        self.paused = false;
        self.created_at = now;
        self.last_updated = now;
        self.rate_epoch = 0;
        self.rate_history = [RateSegment::default(); RATE_HISTORY_LEN];
        self.rate_history[0] = RateSegment {
            numerator: config.rate.numerator,
            denominator: config.rate.denominator,
            effective_from: now,
            stakers: 0,
        };
        Ok(())
    }

    pub fn require_authority(&self, signer: &Pubkey) -> std::result::Result<(), StakingError> {
        if !self.is_initialized() {
            return Err(StakingError::InvalidAccount);
        }
        if *signer != self.authority {
            return Err(StakingError::Unauthorized);
        }
        Ok(())
    }

    /// Rejects a clock that reads earlier than the last recorded pool update.
    pub fn require_clock(&self, now: i64) -> std::result::Result<(), StakingError> {
        if now < self.last_updated {
            return Err(StakingError::ClockSkew);
        }
        Ok(())
    }

    /// Lockup end for a deposit made at `now`.
    pub fn lockup_end(&self, now: i64) -> std::result::Result<i64, StakingError> {
        now.checked_add(self.lockup_seconds)
            .ok_or(StakingError::ArithmeticOverflow)
    }

    /// Amount of reward funding that `rewards` would leave in the reserve.
    pub fn reserve_after(&self, rewards: u64) -> std::result::Result<u64, StakingError> {
        self.reward_reserve
            .checked_sub(rewards)
            .ok_or(StakingError::InsufficientRewardReserve)
    }

    fn slot(epoch: u64) -> usize {
        (epoch % RATE_HISTORY_LEN as u64) as usize
    }

    /// Oldest epoch still held in the ring.
    pub fn oldest_epoch(&self) -> u64 {
        self.rate_epoch
            .saturating_sub(RATE_HISTORY_LEN as u64 - 1)
    }

    /// The segment for `epoch`, if it is still held in the ring.
    pub fn segment(&self, epoch: u64) -> std::result::Result<&RateSegment, StakingError> {
        if epoch > self.rate_epoch || epoch < self.oldest_epoch() {
            return Err(StakingError::InvalidAccount);
        }
        Ok(&self.rate_history[Self::slot(epoch)])
    }

    pub fn current_segment(&self) -> &RateSegment {
        &self.rate_history[Self::slot(self.rate_epoch)]
    }

    /// Starts a new epoch at `rate` from `now`. Returns the previous rate.
    ///
    /// Fails with `RateHistoryFull` while stake accounts still sit in the
    /// epoch the new one would overwrite.
    pub fn push_rate(
        &mut self,
        rate: RewardRate,
        now: i64,
    ) -> std::result::Result<RewardRate, StakingError> {
        let next = self
            .rate_epoch
            .checked_add(1)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let slot = Self::slot(next);
        if next >= RATE_HISTORY_LEN as u64 && self.rate_history[slot].stakers != 0 {
            return Err(StakingError::RateHistoryFull);
        }

        let previous = self.reward_rate();
        self.rate_history[slot] = RateSegment {
            numerator: rate.numerator,
            denominator: rate.denominator,
            effective_from: now,
            stakers: 0,
        };
        self.rate_epoch = next;
        self.reward_rate_numerator = rate.numerator;
        self.reward_rate_denominator = rate.denominator;
        Ok(previous)
    }

    /// Counts a newly opened stake account in the current epoch.
    pub fn add_staker(&mut self) -> std::result::Result<(), StakingError> {
        let staker_count = self
            .staker_count
            .checked_add(1)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let slot = Self::slot(self.rate_epoch);
        let stakers = self.rate_history[slot]
            .stakers
            .checked_add(1)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.staker_count = staker_count;
        self.rate_history[slot].stakers = stakers;
        Ok(())
    }

    /// Drops a stake account checkpointed in the current epoch.
    pub fn remove_staker(&mut self) -> std::result::Result<(), StakingError> {
        let staker_count = self
            .staker_count
            .checked_sub(1)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let slot = Self::slot(self.rate_epoch);
        let stakers = self.rate_history[slot]
            .stakers
            .checked_sub(1)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.staker_count = staker_count;
        self.rate_history[slot].stakers = stakers;
        Ok(())
    }

    /// Moves one stake account's count from `epoch` to the current epoch.
    pub fn move_staker(&mut self, epoch: u64) -> std::result::Result<(), StakingError> {
        if epoch == self.rate_epoch {
            return Ok(());
        }
        self.segment(epoch)?;
        let from = Self::slot(epoch);
        let to = Self::slot(self.rate_epoch);
        let left = self.rate_history[from]
            .stakers
            .checked_sub(1)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let arrived = self.rate_history[to]
            .stakers
            .checked_add(1)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.rate_history[from].stakers = left;
        self.rate_history[to].stakers = arrived;
        Ok(())
    }
}
