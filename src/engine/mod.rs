// Optimization engine - position ledger, metrics, guarded execution
pub mod emergency;
pub mod engine;
pub mod executor;
pub mod ledger;
pub mod metrics;
pub mod scoring;
pub mod transitions;
pub mod types;

// Public API exports
pub use engine::OptimizerEngine;
pub use ledger::PositionLedger;
pub use metrics::compute as compute_metrics;
pub use scoring::{scoring_for, AmmScoring, ScoringStrategy, StakingScoring};

// Core types re-exports
pub use types::{
    EmergencyExitSummary, ExecutionResult, PortfolioMetrics, Position, PositionSpec,
    PositionStatus, PriceBounds, PriceRange, StrategyAction, StrategyCandidate,
};
