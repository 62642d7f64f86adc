// rewards/src/lib.rs

//! Companion reward token
//!
//! Investors receive reward tokens 1:1 with the principal they deposit into
//! the pool; the same amount is burned when they withdraw.

pub mod ledger;

pub use ledger::{RewardConfig, RewardKind, RewardLedger, RewardRecord, RewardTokenLedger};

use ledger_core::{Address, Amount};

/// Result type for reward ledger operations
pub type RewardsResult<T> = Result<T, RewardsError>;

/// Errors that can occur in reward ledger operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewardsError {
    #[error("Minting is disabled")]
    MintingDisabled,

    #[error("Supply cap exceeded: cap {cap}, requested supply {requested}")]
    SupplyCapExceeded { cap: Amount, requested: Amount },

    #[error("Insufficient reward balance for {account}: required {required}, available {available}")]
    InsufficientRewardBalance {
        account: Address,
        required: Amount,
        available: Amount,
    },

    #[error("Overflow error: {0}")]
    OverflowError(String),
}
