// pool-node/src/lib.rs
pub mod config;
pub mod runtime;

pub use config::LedgerConfig;
pub use runtime::{NodeClock, Operation, OperationOutcome, RunReport, ScriptRunner};
