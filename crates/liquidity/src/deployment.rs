// liquidity/src/deployment.rs

use crate::{
    events::PoolEvent,
    pool::{LiquidityPool, PoolMetrics, PoolSnapshot},
    LiquidityError, LiquidityResult,
};
use ledger_core::{Address, Amount, AssetVault, Caller, Epoch, EpochClock};
use rewards::RewardLedger;

/// Host environment for a single pool.
///
/// Holds the designated administrator, the pool once it has been
/// initialized, and the collaborators every operation runs against. All
/// mutating operations take `&mut self`, so at most one is ever in flight.
#[derive(Debug)]
pub struct Deployment<V, R, C> {
    /// Designated administrator; the pool is keyed by this identity
    admin: Address,
    pool: Option<LiquidityPool>,
    vault: V,
    rewards: R,
    clock: C,
    /// Successful operations, oldest first. Unbounded until drained with
    /// [`Deployment::take_events`].
    events: Vec<PoolEvent>,
}

impl<V, R, C> Deployment<V, R, C>
where
    V: AssetVault,
    R: RewardLedger,
    C: EpochClock,
{
    pub fn new(admin: Address, vault: V, rewards: R, clock: C) -> Self {
        Self {
            admin,
            pool: None,
            vault,
            rewards,
            clock,
            events: Vec::new(),
        }
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.is_some()
    }

    /// Create the pool. Only the designated administrator may do so, once.
    pub fn initialize(&mut self, caller: &Caller) -> LiquidityResult<()> {
        if !caller.is(&self.admin) {
            return Err(rejected("initialize", caller, LiquidityError::Unauthorized(caller.address())));
        }
        if self.pool.is_some() {
            return Err(rejected("initialize", caller, LiquidityError::AlreadyInitialized));
        }

        let epoch = self.clock.now();
        self.pool = Some(LiquidityPool::new(self.admin, epoch));
        self.events.push(PoolEvent::Initialized {
            admin: self.admin,
            epoch,
        });

        tracing::info!("Pool initialized by {} at epoch {}", self.admin, epoch);
        Ok(())
    }

    pub fn invest(&mut self, investor: &Caller, amount: Amount) -> LiquidityResult<()> {
        let epoch = self.clock.now();
        let pool = match self.pool.as_mut() {
            Some(pool) => pool,
            None => return Err(rejected("invest", investor, LiquidityError::NotInitialized)),
        };

        pool.invest(investor, amount, epoch, &mut self.vault, &mut self.rewards)
            .map_err(|e| rejected("invest", investor, e))?;

        let stake = pool.investor_stake(&investor.address());
        self.events.push(PoolEvent::Invested {
            investor: investor.address(),
            amount,
            stake,
            epoch,
        });

        tracing::info!(
            "{} invested {} (stake {}, total liquidity {})",
            investor.address(),
            amount,
            stake,
            pool.total_liquidity()
        );
        Ok(())
    }

    pub fn withdraw(&mut self, investor: &Caller, amount: Amount) -> LiquidityResult<()> {
        let epoch = self.clock.now();
        let pool = match self.pool.as_mut() {
            Some(pool) => pool,
            None => return Err(rejected("withdraw", investor, LiquidityError::NotInitialized)),
        };

        pool.withdraw(investor, amount, epoch, &mut self.vault, &mut self.rewards)
            .map_err(|e| rejected("withdraw", investor, e))?;

        let stake = pool.investor_stake(&investor.address());
        self.events.push(PoolEvent::Withdrawn {
            investor: investor.address(),
            amount,
            stake,
            epoch,
        });

        tracing::info!(
            "{} withdrew {} (stake {}, reserve {})",
            investor.address(),
            amount,
            stake,
            pool.reserve_value()
        );
        Ok(())
    }

    /// Credit `profit` to the pool's books.
    ///
    /// This is a counter update only: the reserve, the stakes and the total
    /// liquidity are untouched, and there is no way for investors to claim
    /// a share of the credited profit.
    pub fn distribute_profits(&mut self, admin: &Caller, profit: Amount) -> LiquidityResult<()> {
        if !admin.is(&self.admin) {
            return Err(rejected(
                "distribute_profits",
                admin,
                LiquidityError::Unauthorized(admin.address()),
            ));
        }

        let epoch = self.clock.now();
        let pool = match self.pool.as_mut() {
            Some(pool) => pool,
            None => return Err(rejected("distribute_profits", admin, LiquidityError::NotInitialized)),
        };

        pool.distribute_profits(admin, profit, epoch)
            .map_err(|e| rejected("distribute_profits", admin, e))?;

        self.events.push(PoolEvent::ProfitDistributed {
            admin: admin.address(),
            amount: profit,
            total_profit: pool.total_profit(),
            epoch,
        });

        tracing::info!(
            "Distributed profit {} at epoch {} (total profit {})",
            profit,
            epoch,
            pool.total_profit()
        );
        Ok(())
    }

    pub fn total_liquidity(&self) -> LiquidityResult<Amount> {
        Ok(self.pool()?.total_liquidity())
    }

    /// Stake of `investor`; 0 for addresses that never invested
    pub fn investor_stake(&self, investor: &Address) -> LiquidityResult<Amount> {
        Ok(self.pool()?.investor_stake(investor))
    }

    pub fn total_profit(&self) -> LiquidityResult<Amount> {
        Ok(self.pool()?.total_profit())
    }

    pub fn last_profit_distribution(&self) -> LiquidityResult<Epoch> {
        Ok(self.pool()?.last_profit_distribution())
    }

    pub fn reserve_value(&self) -> LiquidityResult<Amount> {
        Ok(self.pool()?.reserve_value())
    }

    pub fn metrics(&self) -> LiquidityResult<PoolMetrics> {
        Ok(self.pool()?.metrics().clone())
    }

    pub fn snapshot(&self) -> LiquidityResult<PoolSnapshot> {
        Ok(self.pool()?.snapshot())
    }

    pub fn check_invariants(&self) -> LiquidityResult<()> {
        self.pool()?.check_invariants()
    }

    pub fn pool(&self) -> LiquidityResult<&LiquidityPool> {
        self.pool.as_ref().ok_or(LiquidityError::NotInitialized)
    }

    /// Direct access to the pool for host-level custody operations
    pub fn pool_mut(&mut self) -> LiquidityResult<&mut LiquidityPool> {
        self.pool.as_mut().ok_or(LiquidityError::NotInitialized)
    }

    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Remove and return the recorded events. Long-running hosts call this
    /// periodically to keep the log from growing without bound.
    pub fn take_events(&mut self) -> Vec<PoolEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn vault_mut(&mut self) -> &mut V {
        &mut self.vault
    }

    pub fn rewards(&self) -> &R {
        &self.rewards
    }

    pub fn rewards_mut(&mut self) -> &mut R {
        &mut self.rewards
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

fn rejected(operation: &str, caller: &Caller, error: LiquidityError) -> LiquidityError {
    tracing::warn!("{} by {} rejected: {}", operation, caller.address(), error);
    error
}
