//! Instruction handlers for the StakeTest program.
//!
//! Each module pairs the `#[derive(Accounts)]` validation for one instruction
//! with a pure `process_*` state transition and the Anchor handler that runs
//! it before moving tokens.

pub mod admin;
pub mod checkpoint_stakes;
pub mod claim_rewards;
pub mod fund_vault;
pub mod initialize;
pub mod stake;
pub mod unstake;

pub use admin::*;
pub use checkpoint_stakes::*;
pub use claim_rewards::*;
pub use fund_vault::*;
pub use initialize::*;
pub use stake::*;
pub use unstake::*;
