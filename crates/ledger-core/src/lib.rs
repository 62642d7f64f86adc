// ledger-core/src/lib.rs

//! Shared primitives for the pooled-deposit ledger
//!
//! This crate provides:
//! - Account identity and caller credentials
//! - Amount and epoch types
//! - Opaque asset holdings and the asset vault that custodies them
//! - The epoch clock
//! - Checkpoint/rollback journaling for external collaborators

pub mod clock;
pub mod identity;
pub mod journal;
pub mod types;
pub mod vault;

pub use clock::{EpochClock, ManualClock, SystemClock};
pub use identity::{Address, Caller};
pub use journal::{Journaled, JournaledMap};
pub use types::*;
pub use vault::{AssetHolding, AssetVault, InMemoryVault, RejectedDeposit};

/// Result type for ledger primitive operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors that can occur in ledger primitive operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("Insufficient holding: required {required}, available {available}")]
    InsufficientHolding { required: Amount, available: Amount },

    #[error("Overflow: {0}")]
    Overflow(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Clock error: {0}")]
    ClockError(String),
}
