use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

/// Lifecycle status of a position.
///
/// `Rebalancing` is a transient marker held only while the executor is
/// working on the position. `Removed` is terminal and keeps the row around
/// for audit history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    Active,
    Rebalancing,
    Unstaking,
    Removed,
}

impl PositionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionStatus::Active => "active",
            PositionStatus::Rebalancing => "rebalancing",
            PositionStatus::Unstaking => "unstaking",
            PositionStatus::Removed => "removed",
        }
    }
}

/// Concentrated-liquidity price bounds plus the last observed market price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
    pub current: f64,
}

impl PriceRange {
    /// Whether the configured bounds currently bracket the market price.
    /// Always derived, never stored.
    pub fn in_range(&self) -> bool {
        self.low <= self.current && self.current <= self.high
    }
}

/// One yield-bearing allocation: a staked balance on a network, or a
/// concentrated-liquidity deposit when `range` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub network: String,
    #[serde(default)]
    pub validator: Option<String>,
    pub principal: f64,
    pub accrued_reward: f64,
    pub yield_rate_bps: f64,
    pub auto_compound: bool,
    pub status: PositionStatus,
    #[serde(default)]
    pub range: Option<PriceRange>,
    #[serde(default)]
    pub impermanent_loss_bps: Option<f64>,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub unbonding_until: Option<DateTime<Utc>>,
}

impl Position {
    pub fn is_amm(&self) -> bool {
        self.range.is_some()
    }

    /// `None` for positions without price bounds.
    pub fn in_range(&self) -> Option<bool> {
        self.range.map(|r| r.in_range())
    }

    /// Principal plus unharvested rewards.
    pub fn total_value(&self) -> f64 {
        self.principal + self.accrued_reward
    }

    pub fn is_active(&self) -> bool {
        self.status == PositionStatus::Active
    }
}

/// Constructible subset of a position, supplied at initialization or when a
/// caller adds an allocation through the engine surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSpec {
    pub network: String,
    #[serde(default)]
    pub validator: Option<String>,
    pub principal: f64,
    #[serde(default)]
    pub accrued_reward: f64,
    pub yield_rate_bps: f64,
    #[serde(default)]
    pub auto_compound: bool,
    #[serde(default)]
    pub range: Option<PriceRange>,
    #[serde(default)]
    pub impermanent_loss_bps: Option<f64>,
}

impl PositionSpec {
    pub fn validate(&self) -> EngineResult<()> {
        if self.network.trim().is_empty() {
            return Err(EngineError::Validation("network must not be empty".to_string()));
        }
        if !self.principal.is_finite() || self.principal < 0.0 {
            return Err(EngineError::Validation(format!(
                "principal must be non-negative, got {}",
                self.principal
            )));
        }
        if !self.accrued_reward.is_finite() || self.accrued_reward < 0.0 {
            return Err(EngineError::Validation(format!(
                "accrued reward must be non-negative, got {}",
                self.accrued_reward
            )));
        }
        if !self.yield_rate_bps.is_finite() || self.yield_rate_bps < 0.0 {
            return Err(EngineError::Validation(format!(
                "yield rate must be non-negative, got {} bps",
                self.yield_rate_bps
            )));
        }
        if let Some(range) = &self.range {
            if range.low > range.high {
                return Err(EngineError::Validation(format!(
                    "inverted price range: {} > {}",
                    range.low, range.high
                )));
            }
        }
        Ok(())
    }
}

/// Point-in-time portfolio snapshot, recomputed from the ledger on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_principal: f64,
    pub total_rewards: f64,
    pub weighted_yield_bps: f64,
    pub position_count: usize,
    pub diversification_score: f64,
    pub discipline_score: f64,
    pub optimization_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyAction {
    Compound,
    Rebalance,
    AddCapital,
    RemoveCapital,
    CollectFees,
}

impl StrategyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyAction::Compound => "compound",
            StrategyAction::Rebalance => "rebalance",
            StrategyAction::AddCapital => "add_capital",
            StrategyAction::RemoveCapital => "remove_capital",
            StrategyAction::CollectFees => "collect_fees",
        }
    }
}

impl std::fmt::Display for StrategyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// New price bounds proposed by the range analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub low: f64,
    pub high: f64,
}

/// A proposed action. Immutable value; consumed exactly once by the executor
/// or discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyCandidate {
    pub action: StrategyAction,
    pub target_position_id: String,
    pub amount: f64,
    pub expected_return: f64,
    pub risk_score: f64,
    pub horizon_days: u32,
    pub reasoning: String,
    #[serde(default)]
    pub destination_network: Option<String>,
    #[serde(default)]
    pub new_range: Option<PriceBounds>,
}

/// Outcome of one strategy execution. Never retried automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<EngineError>,
}

impl ExecutionResult {
    pub fn ok(tx_id: String) -> Self {
        Self {
            success: true,
            tx_id: Some(tx_id),
            error: None,
        }
    }

    pub fn failed(error: EngineError) -> Self {
        Self {
            success: false,
            tx_id: None,
            error: Some(error),
        }
    }

    /// Whether the failure is a routine single-flight rejection.
    pub fn is_concurrency_rejection(&self) -> bool {
        matches!(self.error, Some(EngineError::Concurrency))
    }
}

/// Summary returned by the emergency drain path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyExitSummary {
    pub total_amount: f64,
    pub estimated_minutes: u64,
    pub positions_affected: usize,
}
