// liquidity/src/pool.rs

use crate::{LiquidityError, LiquidityResult};
use ledger_core::{Address, Amount, AssetHolding, AssetVault, Caller, Epoch, Journaled};
use rewards::RewardLedger;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Lifetime pool statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMetrics {
    /// Total principal ever invested
    pub total_deposited: Amount,
    /// Total principal ever withdrawn
    pub total_withdrawn: Amount,
    /// Number of profit distributions
    pub distributions: u64,
    /// Epoch of the last successful mutation
    pub updated_at: Epoch,
}

/// Point-in-time view of a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub admin: Address,
    pub total_liquidity: Amount,
    pub reserve: Amount,
    pub investor_stakes: BTreeMap<Address, Amount>,
    pub total_profit: Amount,
    pub last_profit_distribution: Epoch,
    pub metrics: PoolMetrics,
}

/// Shared pool of deposited funds with per-investor stakes.
///
/// Every mutating method is all-or-nothing: counters are computed up front,
/// collaborator effects run inside a checkpoint, and the pool's own fields
/// only change once everything else has succeeded.
#[derive(Debug)]
pub struct LiquidityPool {
    /// Administrator owning the pool
    admin: Address,
    /// Sum of all stakes
    total_liquidity: Amount,
    /// Custodied funds
    reserve: AssetHolding,
    /// Investor address -> staked amount
    investor_stakes: HashMap<Address, Amount>,
    /// Cumulative profit credited by the administrator
    total_profit: Amount,
    /// Epoch of the most recent profit distribution
    last_profit_distribution: Epoch,
    metrics: PoolMetrics,
}

impl LiquidityPool {
    /// Create an empty pool owned by `admin`
    pub fn new(admin: Address, created_at: Epoch) -> Self {
        Self {
            admin,
            total_liquidity: 0,
            reserve: AssetHolding::zero(),
            investor_stakes: HashMap::new(),
            total_profit: 0,
            last_profit_distribution: 0,
            metrics: PoolMetrics {
                updated_at: created_at,
                ..PoolMetrics::default()
            },
        }
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn total_liquidity(&self) -> Amount {
        self.total_liquidity
    }

    /// Stake of `investor`; 0 for addresses that never invested
    pub fn investor_stake(&self, investor: &Address) -> Amount {
        self.investor_stakes.get(investor).copied().unwrap_or(0)
    }

    pub fn has_stake(&self, investor: &Address) -> bool {
        self.investor_stakes.contains_key(investor)
    }

    pub fn investor_count(&self) -> usize {
        self.investor_stakes.len()
    }

    pub fn total_profit(&self) -> Amount {
        self.total_profit
    }

    pub fn last_profit_distribution(&self) -> Epoch {
        self.last_profit_distribution
    }

    /// Value of the custodied funds
    pub fn reserve_value(&self) -> Amount {
        self.reserve.value()
    }

    /// Custodied funds. Moving value out of here bypasses stake accounting,
    /// which is how externally deployed liquidity shows up.
    pub fn reserve_mut(&mut self) -> &mut AssetHolding {
        &mut self.reserve
    }

    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            admin: self.admin,
            total_liquidity: self.total_liquidity,
            reserve: self.reserve.value(),
            investor_stakes: self
                .investor_stakes
                .iter()
                .map(|(k, v)| (*k, *v))
                .collect(),
            total_profit: self.total_profit,
            last_profit_distribution: self.last_profit_distribution,
            metrics: self.metrics.clone(),
        }
    }

    /// Verify that total liquidity equals the sum of all stakes
    pub fn check_invariants(&self) -> LiquidityResult<()> {
        let staked: u128 = self.investor_stakes.values().map(|s| *s as u128).sum();
        if staked != self.total_liquidity as u128 {
            return Err(LiquidityError::InvariantViolation(format!(
                "total liquidity {} != sum of stakes {}",
                self.total_liquidity, staked
            )));
        }
        Ok(())
    }

    /// Move `amount` from the investor's vault balance into the reserve and
    /// record it as stake, minting the same amount of reward tokens.
    pub fn invest<V, R>(
        &mut self,
        investor: &Caller,
        amount: Amount,
        epoch: Epoch,
        vault: &mut V,
        rewards: &mut R,
    ) -> LiquidityResult<()>
    where
        V: AssetVault,
        R: RewardLedger,
    {
        let investor = investor.address();

        let available = vault.balance_of(&investor);
        if available < amount {
            return Err(LiquidityError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        let total_liquidity = self
            .total_liquidity
            .checked_add(amount)
            .ok_or_else(|| LiquidityError::Overflow("Total liquidity overflow".into()))?;
        let stake = self
            .investor_stake(&investor)
            .checked_add(amount)
            .ok_or_else(|| LiquidityError::Overflow("Stake overflow".into()))?;
        vault
            .value(&self.reserve)
            .checked_add(amount)
            .ok_or_else(|| LiquidityError::Overflow("Reserve overflow".into()))?;
        let total_deposited = self
            .metrics
            .total_deposited
            .checked_add(amount)
            .ok_or_else(|| LiquidityError::Overflow("Total deposits overflow".into()))?;

        transact(vault, rewards, |vault, rewards| {
            let funds = vault.withdraw(&investor, amount)?;
            rewards.mint(&investor, amount)?;
            vault.merge(&mut self.reserve, funds)?;

            self.total_liquidity = total_liquidity;
            self.investor_stakes.insert(investor, stake);
            self.metrics.total_deposited = total_deposited;
            self.metrics.updated_at = epoch;
            Ok(())
        })
    }

    /// Pay `amount` of the investor's stake back out of the reserve,
    /// burning the same amount of reward tokens.
    ///
    /// The request is all-or-nothing: if the reserve holds less than
    /// `amount` the withdrawal fails even when the stake would cover it.
    pub fn withdraw<V, R>(
        &mut self,
        investor: &Caller,
        amount: Amount,
        epoch: Epoch,
        vault: &mut V,
        rewards: &mut R,
    ) -> LiquidityResult<()>
    where
        V: AssetVault,
        R: RewardLedger,
    {
        let investor = investor.address();

        let Some(&stake) = self.investor_stakes.get(&investor) else {
            return Err(LiquidityError::NoStake(investor));
        };
        if stake < amount {
            return Err(LiquidityError::InsufficientStake {
                required: amount,
                available: stake,
            });
        }
        let reserve = vault.value(&self.reserve);
        if reserve < amount {
            return Err(LiquidityError::InsufficientPoolLiquidity {
                required: amount,
                available: reserve,
            });
        }

        let total_liquidity = self.total_liquidity.checked_sub(amount).ok_or_else(|| {
            LiquidityError::InvariantViolation("total liquidity below investor stake".into())
        })?;
        let total_withdrawn = self
            .metrics
            .total_withdrawn
            .checked_add(amount)
            .ok_or_else(|| LiquidityError::Overflow("Total withdrawals overflow".into()))?;

        transact(vault, rewards, |vault, rewards| {
            let payout = vault.extract(&mut self.reserve, amount)?;
            if let Err(rejected) = vault.deposit(&investor, payout) {
                vault.merge(&mut self.reserve, rejected.holding)?;
                return Err(rejected.error.into());
            }
            if let Err(e) = rewards.burn(&investor, amount) {
                // Pull the payout back into the reserve; rollback then
                // restores the investor's balance
                let refund = vault.withdraw(&investor, amount)?;
                vault.merge(&mut self.reserve, refund)?;
                return Err(e.into());
            }

            self.investor_stakes.insert(investor, stake - amount);
            self.total_liquidity = total_liquidity;
            self.metrics.total_withdrawn = total_withdrawn;
            self.metrics.updated_at = epoch;
            Ok(())
        })
    }

    /// Credit `profit` to the books. No funds move and no stake changes.
    pub fn distribute_profits(
        &mut self,
        admin: &Caller,
        profit: Amount,
        epoch: Epoch,
    ) -> LiquidityResult<()> {
        if !admin.is(&self.admin) {
            return Err(LiquidityError::Unauthorized(admin.address()));
        }

        let total_profit = self
            .total_profit
            .checked_add(profit)
            .ok_or_else(|| LiquidityError::Overflow("Total profit overflow".into()))?;
        let distributions = self
            .metrics
            .distributions
            .checked_add(1)
            .ok_or_else(|| LiquidityError::Overflow("Distribution count overflow".into()))?;

        self.total_profit = total_profit;
        self.last_profit_distribution = epoch;
        self.metrics.distributions = distributions;
        self.metrics.updated_at = epoch;

        Ok(())
    }
}

/// Run `f` against the collaborators inside a checkpoint, rolling both back
/// if it fails.
fn transact<V, R, T>(
    vault: &mut V,
    rewards: &mut R,
    f: impl FnOnce(&mut V, &mut R) -> LiquidityResult<T>,
) -> LiquidityResult<T>
where
    V: AssetVault,
    R: RewardLedger,
{
    vault.checkpoint();
    rewards.checkpoint();

    match f(vault, rewards) {
        Ok(value) => {
            vault.commit();
            rewards.commit();
            Ok(value)
        }
        Err(e) => {
            rewards.rollback();
            vault.rollback();
            tracing::warn!("Rolled back pool operation: {}", e);
            Err(e)
        }
    }
}
