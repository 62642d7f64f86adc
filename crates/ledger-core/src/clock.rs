// ledger-core/src/clock.rs

use crate::{Epoch, LedgerError, LedgerResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of the current epoch. Successive calls never go backwards.
pub trait EpochClock {
    fn now(&self) -> Epoch;
}

/// Clock advanced explicitly by the host; clones share the same epoch
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    epoch: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Epoch) -> Self {
        Self {
            epoch: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Move the clock forward by `epochs`
    pub fn advance(&self, epochs: u64) -> LedgerResult<Epoch> {
        let mut current = self.epoch.load(Ordering::SeqCst);
        loop {
            let next = current
                .checked_add(epochs)
                .ok_or_else(|| LedgerError::Overflow("Epoch overflow".into()))?;
            match self
                .epoch
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Ok(next),
                Err(actual) => current = actual,
            }
        }
    }

    /// Jump to `epoch`, which must not be earlier than the current one
    pub fn set(&self, epoch: Epoch) -> LedgerResult<()> {
        let previous = self.epoch.fetch_max(epoch, Ordering::SeqCst);
        if previous > epoch {
            return Err(LedgerError::ClockError(format!(
                "Cannot move clock back from {} to {}",
                previous, epoch
            )));
        }
        Ok(())
    }
}

impl EpochClock for ManualClock {
    fn now(&self) -> Epoch {
        self.epoch.load(Ordering::SeqCst)
    }
}

/// Wall-clock epoch in Unix seconds, clamped so it never decreases
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    high_water: Arc<AtomicU64>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EpochClock for SystemClock {
    fn now(&self) -> Epoch {
        let wall = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
        let previous = self.high_water.fetch_max(wall, Ordering::SeqCst);
        previous.max(wall)
    }
}
