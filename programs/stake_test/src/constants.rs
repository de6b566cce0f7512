//! Program constants for the StakeTest program.
//!
//! PDA seeds, time units and the bounds applied to pool configuration.

/// Seed for deriving the stake pool PDA (one pool per deployment)
pub const POOL_SEED: &[u8] = b"pool";

/// Seed for deriving the pool vault PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for deriving user stake account PDAs
pub const STAKE_SEED: &[u8] = b"stake";

/// Number of seconds in a day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Number of seconds in a year (365 days)
pub const SECONDS_PER_YEAR: u64 = 365 * 86_400;

/// Longest lockup a pool may be configured with (4 years)
pub const MAX_LOCKUP_SECONDS: i64 = 4 * 365 * SECONDS_PER_DAY;

/// Upper bound on `numerator / denominator` of the annual reward rate (100%)
pub const MAX_RATE_MULTIPLE: u64 = 1;

/// Rate epochs kept in the pool's rate history
pub const RATE_HISTORY_LEN: usize = 16;
