use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::engine::types::{PositionSpec, PriceRange};
use crate::strategy::config::StrategyConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineSettings,
    pub strategy: StrategyConfig,
    pub networks: NetworkConfig,
    pub chain: ChainSettings,
    pub capital: CapitalSettings,
    pub positions: Vec<PositionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Seconds between optimization cycles
    pub interval_seconds: u64,
    /// Execute generated candidates; false means log-only
    pub auto_execute: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            auto_execute: true,
        }
    }
}

/// Per-network unbonding delays. Networks not listed fall back to the
/// conservative default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub default_unbonding_minutes: u64,
    pub unbonding_minutes: HashMap<String, u64>,
}

impl NetworkConfig {
    pub fn unbonding_minutes_for(&self, network: &str) -> u64 {
        self.unbonding_minutes
            .get(network)
            .copied()
            .unwrap_or(self.default_unbonding_minutes)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let mut unbonding_minutes = HashMap::new();
        unbonding_minutes.insert("ethereum".to_string(), 7 * 24 * 60);
        unbonding_minutes.insert("polygon".to_string(), 3 * 24 * 60);
        unbonding_minutes.insert("base".to_string(), 24 * 60);
        Self {
            default_unbonding_minutes: 7 * 24 * 60,
            unbonding_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    /// Simulated submission latency
    pub submit_latency_ms: u64,
    /// Simulated failure probability [0,1]
    pub failure_rate: f64,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            submit_latency_ms: 400,
            failure_rate: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapitalSettings {
    /// Capital available for new allocations, in native units
    pub available: f64,
}

impl Default for CapitalSettings {
    fn default() -> Self {
        Self { available: 1000.0 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            strategy: StrategyConfig::default(),
            networks: NetworkConfig::default(),
            chain: ChainSettings::default(),
            capital: CapitalSettings::default(),
            positions: default_positions(),
        }
    }
}

/// Demo seed portfolio: three staking allocations plus one concentrated
/// liquidity position.
fn default_positions() -> Vec<PositionSpec> {
    vec![
        PositionSpec {
            network: "ethereum".to_string(),
            validator: Some("Lido".to_string()),
            principal: 5.5,
            accrued_reward: 0.22,
            yield_rate_bps: 420.0,
            auto_compound: true,
            range: None,
            impermanent_loss_bps: None,
        },
        PositionSpec {
            network: "polygon".to_string(),
            validator: Some("Polygon POS".to_string()),
            principal: 25000.0,
            accrued_reward: 1250.0,
            yield_rate_bps: 850.0,
            auto_compound: true,
            range: None,
            impermanent_loss_bps: None,
        },
        PositionSpec {
            network: "base".to_string(),
            validator: Some("Coinbase".to_string()),
            principal: 2.1,
            accrued_reward: 0.08,
            yield_rate_bps: 380.0,
            auto_compound: false,
            range: None,
            impermanent_loss_bps: None,
        },
        PositionSpec {
            network: "polygon".to_string(),
            validator: None,
            principal: 125000.0,
            accrued_reward: 2550.0,
            yield_rate_bps: 12540.0,
            auto_compound: false,
            range: Some(PriceRange {
                low: 10.50,
                high: 11.00,
                current: 10.75,
            }),
            impermanent_loss_bps: Some(-230.0),
        },
    ]
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}
