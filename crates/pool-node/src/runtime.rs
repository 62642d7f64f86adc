// pool-node/src/runtime.rs
use crate::config::{ClockMode, LedgerConfig};
use ledger_core::{Address, Amount, Caller, Epoch, EpochClock, InMemoryVault, ManualClock, SystemClock};
use liquidity::{Deployment, PoolEvent, PoolSnapshot};
use rewards::RewardTokenLedger;
use serde::{Deserialize, Serialize};

/// Single step of a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Initialize { caller: Address },
    Invest { caller: Address, amount: Amount },
    Withdraw { caller: Address, amount: Amount },
    DistributeProfits { caller: Address, amount: Amount },
    AdvanceClock { epochs: u64 },
}

/// Result of applying one operation
#[derive(Debug, Clone, Serialize)]
pub struct OperationOutcome {
    pub index: usize,
    pub operation: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Clock selected by configuration
#[derive(Debug, Clone)]
pub enum NodeClock {
    Manual(ManualClock),
    System(SystemClock),
}

impl EpochClock for NodeClock {
    fn now(&self) -> Epoch {
        match self {
            NodeClock::Manual(clock) => clock.now(),
            NodeClock::System(clock) => clock.now(),
        }
    }
}

/// Final state printed after a run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<OperationOutcome>,
    pub pool: Option<PoolSnapshot>,
    pub events: Vec<PoolEvent>,
}

/// Applies scripted operations to an in-memory deployment
pub struct ScriptRunner {
    deployment: Deployment<InMemoryVault, RewardTokenLedger, NodeClock>,
    outcomes: Vec<OperationOutcome>,
}

impl ScriptRunner {
    pub fn new(config: &LedgerConfig) -> anyhow::Result<Self> {
        let vault = InMemoryVault::with_balances(
            config.genesis.iter().map(|g| (g.account, g.balance)),
        )?;
        let rewards = RewardTokenLedger::new(config.rewards.clone());
        let clock = match config.clock.mode {
            ClockMode::Manual => NodeClock::Manual(ManualClock::new(config.clock.start_epoch)),
            ClockMode::System => NodeClock::System(SystemClock::new()),
        };

        tracing::info!(
            "Deployment ready: admin {}, {} genesis accounts, {:?} clock",
            config.admin,
            config.genesis.len(),
            config.clock.mode
        );

        Ok(Self {
            deployment: Deployment::new(config.admin, vault, rewards, clock),
            outcomes: Vec::new(),
        })
    }

    /// Load a JSON array of operations
    pub fn load_script(path: &str) -> anyhow::Result<Vec<Operation>> {
        let contents = std::fs::read_to_string(path)?;
        let operations = serde_json::from_str(&contents)?;
        Ok(operations)
    }

    /// Apply one operation. Failures are recorded and leave state untouched.
    pub fn apply(&mut self, operation: Operation) -> &OperationOutcome {
        let result = self.execute(&operation);
        if let Err(e) = &result {
            tracing::warn!("Operation {} failed: {}", self.outcomes.len(), e);
        }

        self.outcomes.push(OperationOutcome {
            index: self.outcomes.len(),
            operation,
            error: result.err().map(|e| e.to_string()),
        });
        &self.outcomes[self.outcomes.len() - 1]
    }

    pub fn run(&mut self, operations: impl IntoIterator<Item = Operation>) -> &[OperationOutcome] {
        for operation in operations {
            self.apply(operation);
        }
        &self.outcomes
    }

    pub fn deployment(&self) -> &Deployment<InMemoryVault, RewardTokenLedger, NodeClock> {
        &self.deployment
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            outcomes: self.outcomes.clone(),
            pool: self.deployment.snapshot().ok(),
            events: self.deployment.events().to_vec(),
        }
    }

    fn execute(&mut self, operation: &Operation) -> anyhow::Result<()> {
        match operation {
            Operation::Initialize { caller } => {
                self.deployment.initialize(&Caller::new(*caller))?;
            }
            Operation::Invest { caller, amount } => {
                self.deployment.invest(&Caller::new(*caller), *amount)?;
            }
            Operation::Withdraw { caller, amount } => {
                self.deployment.withdraw(&Caller::new(*caller), *amount)?;
            }
            Operation::DistributeProfits { caller, amount } => {
                self.deployment.distribute_profits(&Caller::new(*caller), *amount)?;
            }
            Operation::AdvanceClock { epochs } => match self.deployment.clock() {
                NodeClock::Manual(clock) => {
                    let epoch = clock.advance(*epochs)?;
                    tracing::debug!("Clock advanced to epoch {}", epoch);
                }
                NodeClock::System(_) => anyhow::bail!("System clock cannot be advanced"),
            },
        }
        Ok(())
    }
}
