// ledger-core/src/types.rs

/// Asset amount in base units
pub type Amount = u64;

/// Opaque monotonic epoch supplied by an [`EpochClock`](crate::EpochClock)
pub type Epoch = u64;
