// rewards/src/ledger.rs

use crate::{RewardsError, RewardsResult};
use ledger_core::{Address, Amount, Journaled, JournaledMap};
use serde::{Deserialize, Serialize};

/// Mints and burns reward tokens on behalf of the pool
pub trait RewardLedger: Journaled {
    fn mint(&mut self, account: &Address, amount: Amount) -> RewardsResult<()>;

    fn burn(&mut self, account: &Address, amount: Amount) -> RewardsResult<()>;
}

/// Reward token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Whether new tokens may be minted
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Upper bound on circulating supply, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_cap: Option<Amount>,
}

fn default_enabled() -> bool {
    true
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            supply_cap: None,
        }
    }
}

/// Kind of supply change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardKind {
    Mint,
    Burn,
}

/// Supply change record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRecord {
    pub kind: RewardKind,
    pub account: Address,
    pub amount: Amount,
}

/// Supply counters captured at a checkpoint
#[derive(Debug, Clone, Copy)]
struct SupplyMark {
    total_minted: Amount,
    total_burned: Amount,
    history_len: usize,
}

/// In-memory reward token
#[derive(Debug, Clone)]
pub struct RewardTokenLedger {
    config: RewardConfig,
    balances: JournaledMap<Address, Amount>,
    total_minted: Amount,
    total_burned: Amount,
    history: Vec<RewardRecord>,
    marks: Vec<SupplyMark>,
}

impl RewardTokenLedger {
    pub fn new(config: RewardConfig) -> Self {
        Self {
            config,
            balances: JournaledMap::new(),
            total_minted: 0,
            total_burned: 0,
            history: Vec::new(),
            marks: Vec::new(),
        }
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Tokens currently in circulation
    pub fn circulating_supply(&self) -> Amount {
        self.total_minted - self.total_burned
    }

    pub fn total_minted(&self) -> Amount {
        self.total_minted
    }

    pub fn total_burned(&self) -> Amount {
        self.total_burned
    }

    /// Every mint and burn since creation. Grows with each operation.
    pub fn history(&self) -> &[RewardRecord] {
        &self.history
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Enable or disable minting
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }
}

impl Default for RewardTokenLedger {
    fn default() -> Self {
        Self::new(RewardConfig::default())
    }
}

impl RewardLedger for RewardTokenLedger {
    fn mint(&mut self, account: &Address, amount: Amount) -> RewardsResult<()> {
        if !self.config.enabled {
            return Err(RewardsError::MintingDisabled);
        }

        let supply = self
            .circulating_supply()
            .checked_add(amount)
            .ok_or_else(|| RewardsError::OverflowError("Circulating supply overflow".into()))?;
        if let Some(cap) = self.config.supply_cap {
            if supply > cap {
                return Err(RewardsError::SupplyCapExceeded {
                    cap,
                    requested: supply,
                });
            }
        }

        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or_else(|| RewardsError::OverflowError("Reward balance overflow".into()))?;
        let total_minted = self
            .total_minted
            .checked_add(amount)
            .ok_or_else(|| RewardsError::OverflowError("Total minted overflow".into()))?;

        self.balances.insert(*account, balance);
        self.total_minted = total_minted;
        self.history.push(RewardRecord {
            kind: RewardKind::Mint,
            account: *account,
            amount,
        });

        tracing::debug!("Minted {} reward tokens to {}", amount, account);
        Ok(())
    }

    fn burn(&mut self, account: &Address, amount: Amount) -> RewardsResult<()> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(RewardsError::InsufficientRewardBalance {
                account: *account,
                required: amount,
                available,
            });
        }

        let total_burned = self
            .total_burned
            .checked_add(amount)
            .ok_or_else(|| RewardsError::OverflowError("Total burned overflow".into()))?;

        self.balances.insert(*account, available - amount);
        self.total_burned = total_burned;
        self.history.push(RewardRecord {
            kind: RewardKind::Burn,
            account: *account,
            amount,
        });

        tracing::debug!("Burned {} reward tokens from {}", amount, account);
        Ok(())
    }
}

impl Journaled for RewardTokenLedger {
    fn checkpoint(&mut self) {
        self.balances.checkpoint();
        self.marks.push(SupplyMark {
            total_minted: self.total_minted,
            total_burned: self.total_burned,
            history_len: self.history.len(),
        });
    }

    fn commit(&mut self) {
        self.balances.commit();
        self.marks.pop();
    }

    fn rollback(&mut self) {
        self.balances.rollback();
        if let Some(mark) = self.marks.pop() {
            self.total_minted = mark.total_minted;
            self.total_burned = mark.total_burned;
            self.history.truncate(mark.history_len);
        }
    }
}
