// liquidity/src/events.rs

use ledger_core::{Address, Amount, Epoch};
use serde::{Deserialize, Serialize};

/// Record of a successful pool operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PoolEvent {
    Initialized {
        admin: Address,
        epoch: Epoch,
    },
    Invested {
        investor: Address,
        amount: Amount,
        stake: Amount,
        epoch: Epoch,
    },
    Withdrawn {
        investor: Address,
        amount: Amount,
        stake: Amount,
        epoch: Epoch,
    },
    ProfitDistributed {
        admin: Address,
        amount: Amount,
        total_profit: Amount,
        epoch: Epoch,
    },
}

impl PoolEvent {
    pub fn epoch(&self) -> Epoch {
        match self {
            PoolEvent::Initialized { epoch, .. }
            | PoolEvent::Invested { epoch, .. }
            | PoolEvent::Withdrawn { epoch, .. }
            | PoolEvent::ProfitDistributed { epoch, .. } => *epoch,
        }
    }
}
