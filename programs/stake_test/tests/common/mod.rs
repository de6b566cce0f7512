//! In-memory ledger standing in for the runtime's account store.
//!
//! Records are keyed by their derived addresses. Each instruction runs
//! against the ledger and is rolled back wholesale if it fails, so tests see
//! the same all-or-nothing behaviour as a real transaction.

#![allow(dead_code)]

use std::collections::BTreeMap;

use anchor_lang::prelude::Pubkey;
use stake_test::error::StakingError;
use stake_test::instructions::{
    process_checkpoint_stakes, process_claim_rewards, process_fund_vault, process_initialize,
    process_set_paused, process_set_rate, process_stake, process_transfer_authority,
    process_unstake,
};
use stake_test::sdk::{pool_pda, stake_pda, vault_pda, StakeInstruction};
use stake_test::state::{PoolConfig, RewardRate, StakePool, UserStake};

pub const DAY: i64 = 86_400;
pub const YEAR: i64 = 365 * DAY;

pub fn config(numerator: u64, denominator: u64, lockup_seconds: i64) -> PoolConfig {
    PoolConfig {
        rate: RewardRate::new(numerator, denominator),
        lockup_seconds,
    }
}

#[derive(Clone, Debug)]
pub struct Ledger {
    pub staking_mint: Pubkey,
    pub clock: i64,
    pub pool: Option<StakePool>,
    pub stakes: BTreeMap<Pubkey, UserStake>,
    pub balances: BTreeMap<Pubkey, u64>,
    pub vault_balance: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            staking_mint: Pubkey::new_unique(),
            clock: 0,
            pool: None,
            stakes: BTreeMap::new(),
            balances: BTreeMap::new(),
            vault_balance: 0,
        }
    }

    /// A ledger with an initialized pool owned by the returned authority.
    pub fn with_pool(config: PoolConfig) -> (Self, Pubkey) {
        let mut ledger = Self::new();
        let authority = Pubkey::new_unique();
        ledger
            .execute(authority, StakeInstruction::InitializePool { config })
            .unwrap();
        (ledger, authority)
    }

    pub fn mint_to(&mut self, owner: Pubkey, amount: u64) {
        *self.balances.entry(owner).or_default() += amount;
    }

    /// A fresh owner holding `amount` tokens.
    pub fn funded_owner(&mut self, amount: u64) -> Pubkey {
        let owner = Pubkey::new_unique();
        self.mint_to(owner, amount);
        owner
    }

    pub fn warp_to(&mut self, unix_timestamp: i64) {
        self.clock = unix_timestamp;
    }

    pub fn balance(&self, owner: &Pubkey) -> u64 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    pub fn pool(&self) -> &StakePool {
        self.pool.as_ref().expect("pool not initialized")
    }

    pub fn stake_of(&self, owner: &Pubkey) -> Option<&UserStake> {
        self.stakes.get(&stake_pda(owner).0)
    }

    pub fn sum_of_principal(&self) -> u64 {
        self.stakes.values().map(|stake| stake.principal).sum()
    }

    /// Runs one instruction signed by `signer`; on error the ledger is left
    /// exactly as it was.
    pub fn execute(
        &mut self,
        signer: Pubkey,
        ix: StakeInstruction,
    ) -> Result<(), StakingError> {
        let snapshot = self.clone();
        let result = self.apply(signer, ix);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    fn apply(&mut self, signer: Pubkey, ix: StakeInstruction) -> Result<(), StakingError> {
        let now = self.clock;
        let pool_key = pool_pda().0;

        if let StakeInstruction::InitializePool { config } = ix {
            let pool = self.pool.get_or_insert_with(StakePool::default);
            process_initialize(pool, signer, self.staking_mint, vault_pda().0, &config, now)?;
            pool.bump = pool_pda().1;
            pool.vault_bump = vault_pda().1;
            return Ok(());
        }

        let pool = self.pool.as_mut().ok_or(StakingError::InvalidAccount)?;
        match ix {
            StakeInstruction::InitializePool { .. } => unreachable!(),
            StakeInstruction::Stake { amount } => {
                let (address, bump) = stake_pda(&signer);
                let balance = self.balances.get(&signer).copied().unwrap_or_default();
                let stake = self.stakes.entry(address).or_default();
                let receipt =
                    process_stake(pool, pool_key, stake, signer, balance, amount, now)?;
                if receipt.opened {
                    stake.bump = bump;
                }
                debit(&mut self.balances, &signer, amount)?;
                self.vault_balance = credit(self.vault_balance, amount)?;
            }
            StakeInstruction::Unstake => {
                let address = stake_pda(&signer).0;
                let stake = self
                    .stakes
                    .get_mut(&address)
                    .ok_or(StakingError::InvalidAccount)?;
                let receipt = process_unstake(pool, pool_key, stake, signer, now)?;
                self.stakes.remove(&address);
                self.pay_out(signer, receipt.payout()?)?;
            }
            StakeInstruction::ClaimRewards => {
                let address = stake_pda(&signer).0;
                let stake = self
                    .stakes
                    .get_mut(&address)
                    .ok_or(StakingError::InvalidAccount)?;
                let rewards = process_claim_rewards(pool, pool_key, stake, signer, now)?;
                self.pay_out(signer, rewards)?;
            }
            StakeInstruction::SetRate { rate } => {
                process_set_rate(pool, signer, rate, now)?;
            }
            StakeInstruction::CheckpointStakes => {
                let mut stakes: Vec<(Pubkey, &mut UserStake)> = self
                    .stakes
                    .iter_mut()
                    .map(|(address, stake)| (*address, stake))
                    .collect();
                process_checkpoint_stakes(pool, pool_key, &mut stakes)?;
            }
            StakeInstruction::SetPaused { paused } => {
                process_set_paused(pool, signer, paused, now)?;
            }
            StakeInstruction::FundVault { amount } => {
                let balance = self.balances.get(&signer).copied().unwrap_or_default();
                process_fund_vault(pool, balance, amount, now)?;
                debit(&mut self.balances, &signer, amount)?;
                self.vault_balance = credit(self.vault_balance, amount)?;
            }
            StakeInstruction::TransferAuthority { new_authority } => {
                process_transfer_authority(pool, signer, new_authority, now)?;
            }
        }
        Ok(())
    }

    /// Vault -> owner transfer; fails like the token program would on a
    /// short vault.
    fn pay_out(&mut self, owner: Pubkey, amount: u64) -> Result<(), StakingError> {
        self.vault_balance = self
            .vault_balance
            .checked_sub(amount)
            .ok_or(StakingError::InsufficientFunds)?;
        let balance = self.balances.entry(owner).or_default();
        *balance = credit(*balance, amount)?;
        Ok(())
    }

    /// Runs `checkpoint_stakes` over an explicit list of stake addresses, for
    /// tests that supply a partial or wrong set of accounts. Unknown
    /// addresses read as empty records.
    pub fn checkpoint_with(&mut self, addresses: &[Pubkey]) -> Result<u64, StakingError> {
        let snapshot = self.clone();
        let result = self.apply_checkpoint_with(addresses);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    fn apply_checkpoint_with(&mut self, addresses: &[Pubkey]) -> Result<u64, StakingError> {
        let mut copies: Vec<(Pubkey, UserStake)> = addresses
            .iter()
            .map(|address| {
                let stake = self.stakes.get(address).cloned().unwrap_or_default();
                (*address, stake)
            })
            .collect();

        let pool = self.pool.as_mut().ok_or(StakingError::InvalidAccount)?;
        let mut stakes: Vec<(Pubkey, &mut UserStake)> = copies
            .iter_mut()
            .map(|(address, stake)| (*address, stake))
            .collect();
        let caught_up = process_checkpoint_stakes(pool, pool_pda().0, &mut stakes)?;

        for (address, stake) in copies {
            self.stakes.insert(address, stake);
        }
        Ok(caught_up)
    }

    /// Open stake accounts counted across the pool's rate history.
    pub fn stakers_in_history(&self) -> u64 {
        self.pool().rate_history.iter().map(|segment| segment.stakers).sum()
    }
}

fn debit(
    balances: &mut BTreeMap<Pubkey, u64>,
    owner: &Pubkey,
    amount: u64,
) -> Result<(), StakingError> {
    let balance = balances.entry(*owner).or_default();
    *balance = balance
        .checked_sub(amount)
        .ok_or(StakingError::InsufficientFunds)?;
    Ok(())
}

fn credit(balance: u64, amount: u64) -> Result<u64, StakingError> {
    balance
        .checked_add(amount)
        .ok_or(StakingError::ArithmeticOverflow)
}
