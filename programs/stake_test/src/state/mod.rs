//! State structures for the StakeTest program.
//!
//! Both records are Anchor accounts: an 8-byte discriminator followed by
//! fixed-width borsh fields, so every record of a type has the same `LEN`.

pub mod stake_pool;
pub mod user_stake;

pub use stake_pool::*;
pub use user_stake::*;
