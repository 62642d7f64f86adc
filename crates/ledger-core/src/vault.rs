// ledger-core/src/vault.rs

use crate::{Address, Amount, Journaled, JournaledMap, LedgerError, LedgerResult};

/// Opaque quantity of the pooled asset held outside any account.
///
/// Holdings can only be created by withdrawing from an [`AssetVault`] or by
/// splitting an existing holding, so value is never minted out of thin air.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a holding destroys the asset it carries"]
pub struct AssetHolding {
    value: Amount,
}

impl AssetHolding {
    /// Empty holding
    pub fn zero() -> Self {
        Self { value: 0 }
    }

    pub(crate) fn new(value: Amount) -> Self {
        Self { value }
    }

    pub fn value(&self) -> Amount {
        self.value
    }

    /// Absorb `other` into this holding
    pub fn merge(&mut self, other: AssetHolding) -> LedgerResult<()> {
        self.value = self
            .value
            .checked_add(other.value)
            .ok_or_else(|| LedgerError::Overflow("Holding merge overflow".into()))?;
        Ok(())
    }

    /// Split `amount` off this holding
    pub fn extract(&mut self, amount: Amount) -> LedgerResult<AssetHolding> {
        if self.value < amount {
            return Err(LedgerError::InsufficientHolding {
                required: amount,
                available: self.value,
            });
        }
        self.value -= amount;
        Ok(AssetHolding::new(amount))
    }

    /// Consume the holding, leaving its value unaccounted for. Used by hosts
    /// moving custodied funds out of band.
    pub fn into_value(self) -> Amount {
        self.value
    }
}

/// Deposit that the vault refused, handing the holding back to the caller
#[derive(Debug, thiserror::Error)]
#[error("Deposit rejected: {error}")]
pub struct RejectedDeposit {
    pub holding: AssetHolding,
    pub error: LedgerError,
}

/// Custodian of per-account balances of the pooled asset
pub trait AssetVault: Journaled {
    /// Balance held by `account`; unknown accounts hold 0
    fn balance_of(&self, account: &Address) -> Amount;

    /// Take `amount` out of `account`
    fn withdraw(&mut self, account: &Address, amount: Amount) -> LedgerResult<AssetHolding>;

    /// Credit `holding` to `account`
    fn deposit(&mut self, account: &Address, holding: AssetHolding) -> Result<(), RejectedDeposit>;

    fn merge(&self, into: &mut AssetHolding, from: AssetHolding) -> LedgerResult<()> {
        into.merge(from)
    }

    fn extract(&self, from: &mut AssetHolding, amount: Amount) -> LedgerResult<AssetHolding> {
        from.extract(amount)
    }

    fn value(&self, holding: &AssetHolding) -> Amount {
        holding.value()
    }
}

/// Vault keeping balances in memory with checkpoint/rollback support
#[derive(Debug, Clone, Default)]
pub struct InMemoryVault {
    balances: JournaledMap<Address, Amount>,
}

impl InMemoryVault {
    /// Create new empty vault
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a vault with initial balances
    pub fn with_balances(balances: impl IntoIterator<Item = (Address, Amount)>) -> LedgerResult<Self> {
        let mut vault = Self::new();
        for (account, amount) in balances {
            vault.fund(&account, amount)?;
        }
        Ok(vault)
    }

    /// Issue `amount` of fresh asset to `account`
    pub fn fund(&mut self, account: &Address, amount: Amount) -> LedgerResult<()> {
        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow("Balance overflow".into()))?;
        self.balances.insert(*account, balance);
        Ok(())
    }

    /// Sum of all account balances
    pub fn total_balances(&self) -> u128 {
        self.balances.values().map(|b| *b as u128).sum()
    }
}

impl AssetVault for InMemoryVault {
    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn withdraw(&mut self, account: &Address, amount: Amount) -> LedgerResult<AssetHolding> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        self.balances.insert(*account, available - amount);
        tracing::debug!("Vault withdrew {} from {}", amount, account);

        Ok(AssetHolding::new(amount))
    }

    fn deposit(&mut self, account: &Address, holding: AssetHolding) -> Result<(), RejectedDeposit> {
        let Some(balance) = self.balance_of(account).checked_add(holding.value()) else {
            return Err(RejectedDeposit {
                holding,
                error: LedgerError::Overflow("Balance overflow".into()),
            });
        };

        tracing::debug!("Vault deposited {} to {}", holding.value(), account);
        self.balances.insert(*account, balance);

        Ok(())
    }
}

impl Journaled for InMemoryVault {
    fn checkpoint(&mut self) {
        self.balances.checkpoint();
    }

    fn commit(&mut self) {
        self.balances.commit();
    }

    fn rollback(&mut self) {
        self.balances.rollback();
    }
}
