// liquidity/src/lib.rs

//! Pooled-deposit accounting ledger
//!
//! Investors move funds from their vault balance into a shared reserve and
//! receive a stake of equal size; the administrator credits profit to the
//! books; investors withdraw against their stake while the reserve can pay.
//!
//! - [`LiquidityPool`]: the aggregate and its all-or-nothing operations
//! - [`Deployment`]: one pool per administrator plus its collaborators
//! - [`SharedDeployment`]: single-writer, many-reader front end

pub mod deployment;
pub mod events;
pub mod pool;
pub mod shared;

pub use deployment::Deployment;
pub use events::PoolEvent;
pub use pool::{LiquidityPool, PoolMetrics, PoolSnapshot};
pub use shared::SharedDeployment;

use ledger_core::{Address, Amount, LedgerError};
use rewards::RewardsError;

/// Result type for liquidity operations
pub type LiquidityResult<T> = Result<T, LiquidityError>;

/// Errors that can occur in liquidity operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiquidityError {
    #[error("Unauthorized caller: {0}")]
    Unauthorized(Address),

    #[error("Pool already initialized")]
    AlreadyInitialized,

    #[error("Pool not initialized")]
    NotInitialized,

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("No stake recorded for {0}")]
    NoStake(Address),

    #[error("Insufficient stake: required {required}, available {available}")]
    InsufficientStake { required: Amount, available: Amount },

    #[error("Insufficient pool liquidity: required {required}, available {available}")]
    InsufficientPoolLiquidity { required: Amount, available: Amount },

    #[error("Overflow: {0}")]
    Overflow(String),

    #[error("Vault error: {0}")]
    Vault(#[from] LedgerError),

    #[error("Reward ledger error: {0}")]
    Rewards(#[from] RewardsError),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Deployment poisoned by a panicked operation")]
    Poisoned,
}
