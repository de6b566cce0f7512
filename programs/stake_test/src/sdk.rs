//! Client helpers: PDA derivation and instruction builders.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::{system_program, InstructionData};

use crate::constants::*;
use crate::state::{PoolConfig, RewardRate};
use crate::{accounts, instruction};

pub fn pool_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_SEED], &crate::ID)
}

pub fn vault_pda() -> (Pubkey, u8) {
    let pool = pool_pda().0;
    Pubkey::find_program_address(&[VAULT_SEED, pool.as_ref()], &crate::ID)
}

pub fn stake_pda(owner: &Pubkey) -> (Pubkey, u8) {
    let pool = pool_pda().0;
    Pubkey::find_program_address(&[STAKE_SEED, pool.as_ref(), owner.as_ref()], &crate::ID)
}

/// Every instruction the program accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakeInstruction {
    InitializePool { config: PoolConfig },
    Stake { amount: u64 },
    Unstake,
    ClaimRewards,
    SetRate { rate: RewardRate },
    CheckpointStakes,
    SetPaused { paused: bool },
    FundVault { amount: u64 },
    TransferAuthority { new_authority: Pubkey },
}

impl StakeInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitializePool { .. } => "initialize_pool",
            Self::Stake { .. } => "stake",
            Self::Unstake => "unstake",
            Self::ClaimRewards => "claim_rewards",
            Self::SetRate { .. } => "set_rate",
            Self::CheckpointStakes => "checkpoint_stakes",
            Self::SetPaused { .. } => "set_paused",
            Self::FundVault { .. } => "fund_vault",
            Self::TransferAuthority { .. } => "transfer_authority",
        }
    }

    /// Builds the wire instruction signed by `signer`.
    ///
    /// `signer_tokens` is the signer's token account for `staking_mint`; it is
    /// ignored by instructions that move no tokens for the signer.
    /// `stake_accounts` is only read by `CheckpointStakes`.
    pub fn to_instruction(
        &self,
        signer: Pubkey,
        staking_mint: Pubkey,
        signer_tokens: Pubkey,
        stake_accounts: &[Pubkey],
    ) -> Instruction {
        match *self {
            Self::InitializePool { config } => initialize_pool(signer, staking_mint, config),
            Self::Stake { amount } => stake(signer, staking_mint, signer_tokens, amount),
            Self::Unstake => unstake(signer, staking_mint, signer_tokens),
            Self::ClaimRewards => claim_rewards(signer, staking_mint, signer_tokens),
            Self::SetRate { rate } => set_rate(signer, rate),
            Self::CheckpointStakes => checkpoint_stakes(stake_accounts),
            Self::SetPaused { paused } => set_paused(signer, paused),
            Self::FundVault { amount } => {
                fund_vault(signer, staking_mint, signer_tokens, amount)
            }
            Self::TransferAuthority { new_authority } => {
                transfer_authority(signer, new_authority)
            }
        }
    }
}

pub fn initialize_pool(authority: Pubkey, staking_mint: Pubkey, config: PoolConfig) -> Instruction {
    let stake_pool = pool_pda().0;
    Instruction {
        program_id: crate::ID,
        accounts: accounts::InitializePool {
            authority,
            stake_pool,
            staking_mint,
            vault: vault_pda().0,
            system_program: system_program::ID,
            token_program: anchor_spl::token::ID,
            rent: anchor_lang::solana_program::sysvar::rent::ID,
        }
        .to_account_metas(None),
        data: instruction::InitializePool { config }.data(),
    }
}

pub fn stake(owner: Pubkey, staking_mint: Pubkey, owner_tokens: Pubkey, amount: u64) -> Instruction {
    Instruction {
        program_id: crate::ID,
        accounts: accounts::Stake {
            owner,
            stake_pool: pool_pda().0,
            user_stake: stake_pda(&owner).0,
            staking_mint,
            owner_token_account: owner_tokens,
            vault: vault_pda().0,
            system_program: system_program::ID,
            token_program: anchor_spl::token::ID,
        }
        .to_account_metas(None),
        data: instruction::Stake { amount }.data(),
    }
}

pub fn unstake(owner: Pubkey, staking_mint: Pubkey, owner_tokens: Pubkey) -> Instruction {
    Instruction {
        program_id: crate::ID,
        accounts: accounts::Unstake {
            owner,
            stake_pool: pool_pda().0,
            user_stake: stake_pda(&owner).0,
            staking_mint,
            owner_token_account: owner_tokens,
            vault: vault_pda().0,
            token_program: anchor_spl::token::ID,
        }
        .to_account_metas(None),
        data: instruction::Unstake {}.data(),
    }
}

pub fn claim_rewards(owner: Pubkey, staking_mint: Pubkey, owner_tokens: Pubkey) -> Instruction {
    Instruction {
        program_id: crate::ID,
        accounts: accounts::ClaimRewards {
            owner,
            stake_pool: pool_pda().0,
            user_stake: stake_pda(&owner).0,
            staking_mint,
            owner_token_account: owner_tokens,
            vault: vault_pda().0,
            token_program: anchor_spl::token::ID,
        }
        .to_account_metas(None),
        data: instruction::ClaimRewards {}.data(),
    }
}

pub fn set_rate(authority: Pubkey, rate: RewardRate) -> Instruction {
    Instruction {
        program_id: crate::ID,
        accounts: admin_metas(authority),
        data: instruction::SetRate { rate }.data(),
    }
}

/// Needs no signer beyond the fee payer.
pub fn checkpoint_stakes(stake_accounts: &[Pubkey]) -> Instruction {
    let mut metas = accounts::CheckpointStakes {
        stake_pool: pool_pda().0,
    }
    .to_account_metas(None);
    metas.extend(
        stake_accounts
            .iter()
            .map(|address| AccountMeta::new(*address, false)),
    );
    Instruction {
        program_id: crate::ID,
        accounts: metas,
        data: instruction::CheckpointStakes {}.data(),
    }
}

pub fn set_paused(authority: Pubkey, paused: bool) -> Instruction {
    Instruction {
        program_id: crate::ID,
        accounts: admin_metas(authority),
        data: instruction::SetPaused { paused }.data(),
    }
}

pub fn fund_vault(
    funder: Pubkey,
    staking_mint: Pubkey,
    funder_tokens: Pubkey,
    amount: u64,
) -> Instruction {
    Instruction {
        program_id: crate::ID,
        accounts: accounts::FundVault {
            funder,
            stake_pool: pool_pda().0,
            staking_mint,
            funder_token_account: funder_tokens,
            vault: vault_pda().0,
            token_program: anchor_spl::token::ID,
        }
        .to_account_metas(None),
        data: instruction::FundVault { amount }.data(),
    }
}

pub fn transfer_authority(authority: Pubkey, new_authority: Pubkey) -> Instruction {
    Instruction {
        program_id: crate::ID,
        accounts: admin_metas(authority),
        data: instruction::TransferAuthority { new_authority }.data(),
    }
}

fn admin_metas(authority: Pubkey) -> Vec<AccountMeta> {
    accounts::AdminControl {
        authority,
        stake_pool: pool_pda().0,
    }
    .to_account_metas(None)
}
