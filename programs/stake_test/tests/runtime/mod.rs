//! Bank-backed harness: the program runs under `solana-program-test` with
//! the SPL token program loaded, and every call goes through a signed
//! transaction built from `stake_test::sdk`.

#![allow(dead_code)]

use anchor_lang::prelude::{AccountInfo, Pubkey};
use anchor_lang::solana_program::entrypoint::ProgramResult;
use anchor_lang::solana_program::program_pack::Pack;
use anchor_lang::AccountDeserialize;
use anchor_spl::token::spl_token;
use anchor_spl::token::TokenAccount;
use solana_program_test::{
    processor, BanksClientError, ProgramTest, ProgramTestBanksClientExt, ProgramTestContext,
};
use solana_sdk::clock::Clock;
use solana_sdk::instruction::{Instruction, InstructionError};
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::system_instruction;
use solana_sdk::transaction::{Transaction, TransactionError};
use stake_test::error::StakingError;
use stake_test::sdk;
use stake_test::state::{PoolConfig, StakePool, UserStake};

pub const DAY: i64 = 86_400;
pub const YEAR: i64 = 365 * DAY;

const LAMPORTS_PER_ACCOUNT: u64 = 1_000_000_000;

fn process_instruction(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    // The Anchor entry wants the account slice to share the infos' lifetime.
    let accounts = Box::leak(Box::new(accounts.to_vec()));
    stake_test::entry(program_id, accounts, data)
}

pub fn program_test() -> ProgramTest {
    let mut pt = ProgramTest::new("stake_test", stake_test::ID, processor!(process_instruction));
    pt.set_compute_max_units(1_000_000);
    pt
}

/// An owner with lamports for rent and a token account holding the mint.
pub struct Staker {
    pub keypair: Keypair,
    pub tokens: Pubkey,
}

impl Staker {
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn stake_address(&self) -> Pubkey {
        sdk::stake_pda(&self.pubkey()).0
    }
}

pub struct Pool {
    pub ctx: ProgramTestContext,
    pub authority: Keypair,
    pub mint: Pubkey,
    /// Clock reading when the pool was created.
    pub start: i64,
}

impl Pool {
    /// Starts a bank, creates a mint owned by the payer and initializes the
    /// pool under a fresh authority.
    pub async fn start(config: PoolConfig) -> Self {
        let mut ctx = program_test().start_with_context().await;
        let clock: Clock = ctx.banks_client.get_sysvar().await.unwrap();

        let mint = Keypair::new();
        let payer = ctx.payer.pubkey();
        let rent = ctx.banks_client.get_rent().await.unwrap();
        let create_mint = [
            system_instruction::create_account(
                &payer,
                &mint.pubkey(),
                rent.minimum_balance(spl_token::state::Mint::LEN),
                spl_token::state::Mint::LEN as u64,
                &spl_token::id(),
            ),
            spl_token::instruction::initialize_mint(&spl_token::id(), &mint.pubkey(), &payer, None, 0)
                .unwrap(),
        ];
        send_with(&mut ctx, &create_mint, &[&mint]).await.unwrap();

        let authority = Keypair::new();
        fund_lamports(&mut ctx, &authority.pubkey()).await;
        let init = sdk::initialize_pool(authority.pubkey(), mint.pubkey(), config);
        send_with(&mut ctx, &[init], &[&authority]).await.unwrap();

        Self {
            ctx,
            authority,
            mint: mint.pubkey(),
            start: clock.unix_timestamp,
        }
    }

    /// A new owner holding `amount` tokens.
    pub async fn staker(&mut self, amount: u64) -> Staker {
        let keypair = Keypair::new();
        fund_lamports(&mut self.ctx, &keypair.pubkey()).await;

        let tokens = Keypair::new();
        let payer = self.ctx.payer.pubkey();
        let rent = self.ctx.banks_client.get_rent().await.unwrap();
        let mut setup = vec![
            system_instruction::create_account(
                &payer,
                &tokens.pubkey(),
                rent.minimum_balance(spl_token::state::Account::LEN),
                spl_token::state::Account::LEN as u64,
                &spl_token::id(),
            ),
            spl_token::instruction::initialize_account3(
                &spl_token::id(),
                &tokens.pubkey(),
                &self.mint,
                &keypair.pubkey(),
            )
            .unwrap(),
        ];
        if amount > 0 {
            setup.push(
                spl_token::instruction::mint_to(
                    &spl_token::id(),
                    &self.mint,
                    &tokens.pubkey(),
                    &payer,
                    &[],
                    amount,
                )
                .unwrap(),
            );
        }
        send_with(&mut self.ctx, &setup, &[&tokens]).await.unwrap();

        Staker {
            keypair,
            tokens: tokens.pubkey(),
        }
    }

    pub async fn send(
        &mut self,
        instruction: Instruction,
        signers: &[&Keypair],
    ) -> Result<(), BanksClientError> {
        send_with(&mut self.ctx, &[instruction], signers).await
    }

    /// Sets the bank clock to `seconds` after the pool was created.
    pub async fn warp_to(&mut self, seconds: i64) {
        let mut clock: Clock = self.ctx.banks_client.get_sysvar().await.unwrap();
        clock.unix_timestamp = self.start + seconds;
        self.ctx.set_sysvar(&clock);
    }

    pub async fn pool(&mut self) -> StakePool {
        let data = self.data(sdk::pool_pda().0).await.unwrap();
        StakePool::try_deserialize(&mut data.as_slice()).unwrap()
    }

    pub async fn stake_of(&mut self, staker: &Staker) -> Option<UserStake> {
        let data = self.data(staker.stake_address()).await?;
        Some(UserStake::try_deserialize(&mut data.as_slice()).unwrap())
    }

    pub async fn token_balance(&mut self, address: Pubkey) -> u64 {
        let data = self.data(address).await.unwrap();
        TokenAccount::try_deserialize(&mut data.as_slice())
            .unwrap()
            .amount
    }

    pub async fn vault_balance(&mut self) -> u64 {
        self.token_balance(sdk::vault_pda().0).await
    }

    async fn data(&mut self, address: Pubkey) -> Option<Vec<u8>> {
        self.ctx
            .banks_client
            .get_account(address)
            .await
            .unwrap()
            .map(|account| account.data)
    }
}

async fn fund_lamports(ctx: &mut ProgramTestContext, recipient: &Pubkey) {
    let transfer =
        system_instruction::transfer(&ctx.payer.pubkey(), recipient, LAMPORTS_PER_ACCOUNT);
    send_with(ctx, &[transfer], &[]).await.unwrap();
}

/// Sends `instructions` paid for by the context payer, on a fresh blockhash
/// so identical transactions in a row are not deduplicated.
async fn send_with(
    ctx: &mut ProgramTestContext,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    ctx.last_blockhash = ctx
        .banks_client
        .get_new_latest_blockhash(&ctx.last_blockhash)
        .await
        .unwrap();
    let mut tx = Transaction::new_with_payer(instructions, Some(&ctx.payer.pubkey()));
    tx.partial_sign(&[&ctx.payer], ctx.last_blockhash);
    for signer in signers {
        tx.partial_sign(&[*signer], ctx.last_blockhash);
    }
    ctx.banks_client.process_transaction(tx).await
}

/// The custom error code a failed transaction returned.
pub fn error_code(err: BanksClientError) -> u32 {
    match err {
        BanksClientError::TransactionError(TransactionError::InstructionError(
            _,
            InstructionError::Custom(code),
        ))
        | BanksClientError::SimulationError {
            err: TransactionError::InstructionError(_, InstructionError::Custom(code)),
            ..
        } => code,
        other => panic!("expected a custom program error, got {other:?}"),
    }
}

pub fn staking_error(error: StakingError) -> u32 {
    anchor_lang::error::ERROR_CODE_OFFSET + error as u32
}

pub fn anchor_error(error: anchor_lang::error::ErrorCode) -> u32 {
    error as u32
}
