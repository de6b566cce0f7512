//! Error types for the StakeTest program.
//!
//! Every error aborts the whole instruction; no partial state is persisted.
//!
//! ## Error Code Ranges
//! - 6000-6005: Pool configuration errors
//! - 6006-6008: Balance errors
//! - 6009-6010: Time/lock errors
//! - 6011: Math errors
//! - 6012-6014: Authorization and account validation errors

use anchor_lang::prelude::*;

/// Custom error codes for the StakeTest program.
///
/// Error codes start at 6000 (Anchor's custom error offset).
#[error_code]
pub enum StakingError {
    // ========== Pool Configuration Errors (6000-6005) ==========

    /// [6000] The pool PDA already holds an initialized record.
    #[msg("Stake pool is already initialized")]
    AlreadyInitialized,

    /// [6001] Staking is paused by the pool authority.
    #[msg("Staking is currently paused")]
    PoolPaused,

    /// [6002] Reward rate denominator is zero.
    #[msg("Reward rate denominator must be greater than zero")]
    InvalidRate,

    /// [6003] Reward rate exceeds 100% per year.
    #[msg("Reward rate exceeds the maximum annual rate")]
    RateTooHigh,

    /// [6004] Lockup is negative or longer than the allowed maximum.
    #[msg("Lockup duration is out of range")]
    InvalidLockup,

    /// [6005] The oldest rate epoch still has stake accounts checkpointed in it.
    #[msg("Rate history is full - checkpoint idle stake accounts first")]
    RateHistoryFull,

    // ========== Balance Errors (6006-6008) ==========

    /// [6006] Cannot stake or fund with zero amount.
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    /// [6007] The payer's token balance is below the requested amount.
    #[msg("Insufficient funds for this operation")]
    InsufficientFunds,

    /// [6008] Funded rewards do not cover the payout.
    #[msg("Reward reserve cannot cover the reward payout")]
    InsufficientRewardReserve,

    // ========== Time/Lock Errors (6009-6010) ==========

    /// [6009] The lockup has not yet ended for this stake.
    #[msg("Lockup has not expired - cannot unstake yet")]
    LockupNotExpired,

    /// [6010] The clock reads earlier than a timestamp already recorded.
    #[msg("Clock is behind a recorded timestamp")]
    ClockSkew,

    // ========== Math Errors (6011) ==========

    /// [6011] Arithmetic overflow occurred during calculation.
    #[msg("Arithmetic overflow occurred during calculation")]
    ArithmeticOverflow,

    // ========== Authorization / Account Errors (6012-6014) ==========

    /// [6012] Signer is not the pool authority or the stake owner.
    #[msg("Unauthorized: signer does not control this account")]
    Unauthorized,

    /// [6013] An account does not match its expected derived address or pool.
    #[msg("Invalid account - address or seeds do not match")]
    InvalidAccount,

    /// [6014] A token account is for a different mint than the pool's.
    #[msg("Token mint mismatch - wrong token for this pool")]
    MintMismatch,
}
