// pool-node/src/config.rs
use ledger_core::{Address, Amount, Epoch};
use rewards::RewardConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Designated administrator of the pool
    pub admin: Address,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub rewards: RewardConfig,
    /// Vault balances present before any operation runs
    #[serde(default)]
    pub genesis: Vec<GenesisBalance>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockMode {
    /// Epoch only moves when a script advances it
    Manual,
    /// Unix seconds
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    pub mode: ClockMode,
    /// Starting epoch for the manual clock
    #[serde(default)]
    pub start_epoch: Epoch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisBalance {
    pub account: Address,
    pub balance: Amount,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            mode: ClockMode::Manual,
            start_epoch: 0,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            admin: Address::repeat_byte(0xad),
            clock: ClockConfig::default(),
            rewards: RewardConfig::default(),
            genesis: vec![
                GenesisBalance {
                    account: Address::repeat_byte(0xa1),
                    balance: 1_000,
                },
                GenesisBalance {
                    account: Address::repeat_byte(0xb0),
                    balance: 1_000,
                },
            ],
        }
    }
}

impl LedgerConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
