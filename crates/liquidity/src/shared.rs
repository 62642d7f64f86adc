// liquidity/src/shared.rs

use crate::{deployment::Deployment, pool::PoolSnapshot, LiquidityError, LiquidityResult};
use ledger_core::{Address, Amount, AssetVault, Caller, Epoch, EpochClock};
use rewards::RewardLedger;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe handle to a [`Deployment`].
///
/// Every mutating operation holds the write lock on the whole deployment
/// for its full duration; reads share the read lock and therefore only
/// ever observe fully applied operations. Once an operation panics while
/// holding the lock, every later call fails with
/// [`LiquidityError::Poisoned`].
pub struct SharedDeployment<V, R, C> {
    inner: Arc<RwLock<Deployment<V, R, C>>>,
}

impl<V, R, C> Clone for SharedDeployment<V, R, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V, R, C> SharedDeployment<V, R, C>
where
    V: AssetVault,
    R: RewardLedger,
    C: EpochClock,
{
    pub fn new(deployment: Deployment<V, R, C>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(deployment)),
        }
    }

    pub fn initialize(&self, caller: &Caller) -> LiquidityResult<()> {
        self.write()?.initialize(caller)
    }

    pub fn invest(&self, investor: &Caller, amount: Amount) -> LiquidityResult<()> {
        self.write()?.invest(investor, amount)
    }

    pub fn withdraw(&self, investor: &Caller, amount: Amount) -> LiquidityResult<()> {
        self.write()?.withdraw(investor, amount)
    }

    pub fn distribute_profits(&self, admin: &Caller, profit: Amount) -> LiquidityResult<()> {
        self.write()?.distribute_profits(admin, profit)
    }

    pub fn total_liquidity(&self) -> LiquidityResult<Amount> {
        self.read()?.total_liquidity()
    }

    pub fn investor_stake(&self, investor: &Address) -> LiquidityResult<Amount> {
        self.read()?.investor_stake(investor)
    }

    pub fn total_profit(&self) -> LiquidityResult<Amount> {
        self.read()?.total_profit()
    }

    pub fn last_profit_distribution(&self) -> LiquidityResult<Epoch> {
        self.read()?.last_profit_distribution()
    }

    pub fn snapshot(&self) -> LiquidityResult<PoolSnapshot> {
        self.read()?.snapshot()
    }

    /// Run `f` with shared access; concurrent writers wait until it returns
    pub fn with_read<T>(&self, f: impl FnOnce(&Deployment<V, R, C>) -> T) -> LiquidityResult<T> {
        Ok(f(&*self.read()?))
    }

    /// Run `f` with exclusive access to the whole deployment
    pub fn with_write<T>(&self, f: impl FnOnce(&mut Deployment<V, R, C>) -> T) -> LiquidityResult<T> {
        Ok(f(&mut *self.write()?))
    }

    // A panic inside an operation can leave collaborators mid-update, so a
    // poisoned lock is never handed out again.
    fn read(&self) -> LiquidityResult<RwLockReadGuard<'_, Deployment<V, R, C>>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> LiquidityResult<RwLockWriteGuard<'_, Deployment<V, R, C>>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> LiquidityError {
    tracing::error!("Deployment lock poisoned; refusing access");
    LiquidityError::Poisoned
}
