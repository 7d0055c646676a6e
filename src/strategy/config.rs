use serde::{Deserialize, Serialize};

/// Analyzer thresholds.
///
/// Defaults match the tuned production values; all of them can be overridden
/// from the `[strategy]` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Minimum aggregate pending reward before a compound is worth the fee
    pub compound_min_pending: f64,
    /// Minimum yield spread between best and worst position (basis points)
    pub rebalance_min_spread_bps: f64,
    /// Fraction of the worst position's principal to move per rebalance
    pub rebalance_move_fraction: f64,
    /// Minimum externally available capital before staking more
    pub add_capital_min: f64,
    /// Cap on a single capital allocation
    pub add_capital_max_single: f64,
    /// A position is prunable when its yield falls below this fraction of
    /// the portfolio-weighted yield
    pub prune_yield_fraction: f64,
    /// Impermanent loss floor (signed bps); deeper loss triggers removal
    pub prune_max_il_bps: f64,
    /// Fraction of principal removed per prune
    pub prune_remove_fraction: f64,
    /// Half-width of a recentered price range, as a fraction of the price
    pub range_width_fraction: f64,
    /// Minimum accrued fees before a harvest is worth the gas
    pub collect_fees_min: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            compound_min_pending: 0.1,
            rebalance_min_spread_bps: 200.0,
            rebalance_move_fraction: 0.5,
            add_capital_min: 100.0,
            add_capital_max_single: 500.0,
            prune_yield_fraction: 0.8,
            prune_max_il_bps: -1000.0,
            prune_remove_fraction: 0.5,
            range_width_fraction: 0.1,
            collect_fees_min: 0.05,
        }
    }
}
