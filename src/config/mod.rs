//! Configuration for the FTR wallet

pub mod rpc;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

// Re-export RPC config
pub use rpc::TransportConfig;

/// Environment variable holding a PEM private key for one-shot commands
pub const PRIVATE_KEY_PEM_ENV: &str = "FTR_PRIVATE_KEY_PEM";

/// Networks the wallet can be pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = Error;

    /// Accepts network names and the menu digits (`1` mainnet, `2` testnet)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "main" | "1" => Ok(Network::Mainnet),
            "testnet" | "test" | "2" => Ok(Network::Testnet),
            other => Err(Error::InvalidChoice(format!(
                "unknown network '{}' (expected mainnet or testnet)",
                other
            ))),
        }
    }
}

/// Endpoint URL for each network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPresets {
    pub mainnet: String,
    pub testnet: String,
}

impl NetworkPresets {
    pub fn url(&self, network: Network) -> &str {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Testnet => &self.testnet,
        }
    }
}

impl Default for NetworkPresets {
    fn default() -> Self {
        Self {
            mainnet: "http://mainnet.rpc.url".to_string(),
            testnet: "http://testnet.rpc.url".to_string(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network endpoint presets
    pub networks: NetworkPresets,
    /// Timeout for a single RPC call (seconds)
    pub rpc_timeout_secs: u64,
    /// Transactions fetched by the history command
    pub history_count: usize,
}

impl Config {
    /// Load a JSON config file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        rpc::validate_url(&self.networks.mainnet)?;
        rpc::validate_url(&self.networks.testnet)?;
        if self.rpc_timeout_secs == 0 {
            return Err(Error::Config("rpc_timeout_secs must be positive".to_string()));
        }
        if self.history_count == 0 {
            return Err(Error::Config("history_count must be positive".to_string()));
        }
        Ok(())
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            networks: NetworkPresets::default(),
            rpc_timeout_secs: rpc::DEFAULT_TIMEOUT.as_secs(),
            history_count: 10,
        }
    }
}
