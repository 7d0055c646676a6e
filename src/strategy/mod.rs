// ═══════════════════════════════════════════════════════════════════════════════
// STRATEGY MODULE - HEURISTIC CANDIDATE GENERATION
// ═══════════════════════════════════════════════════════════════════════════════
//
// A fixed, ordered list of independent analyzers. Each inspects the current
// position snapshot plus derived metrics and emits at most one candidate;
// the generator concatenates all hits in order. There is no cross-analyzer
// deduplication - duplicate targets are legal and resolved by the executor's
// re-validation (a later candidate becomes a no-op once an earlier one has
// flipped the target's status).
//
// Analyzers never error: "no opportunity" is the absence of a candidate.

pub mod config;

mod add_capital;
mod collect_fees;
mod compound;
mod prune;
mod range;
mod rebalance;

pub use config::StrategyConfig;

use crate::engine::types::{PortfolioMetrics, Position, StrategyCandidate};

/// Run every analyzer against a snapshot and collect the candidates.
pub fn generate(
    positions: &[Position],
    metrics: &PortfolioMetrics,
    available_capital: f64,
    cfg: &StrategyConfig,
) -> Vec<StrategyCandidate> {
    let mut candidates = Vec::new();

    if let Some(c) = compound::analyze(positions, cfg) {
        candidates.push(c);
    }
    if let Some(c) = rebalance::analyze(positions, cfg) {
        candidates.push(c);
    }
    if let Some(c) = add_capital::analyze(positions, available_capital, cfg) {
        candidates.push(c);
    }
    if let Some(c) = prune::analyze(positions, metrics, cfg) {
        candidates.push(c);
    }
    if let Some(c) = range::analyze(positions, cfg) {
        candidates.push(c);
    }
    if let Some(c) = collect_fees::analyze(positions, cfg) {
        candidates.push(c);
    }

    candidates
}

/// Descending by a float key, ties broken by id so the pick is deterministic
/// regardless of snapshot ordering.
pub(crate) fn cmp_desc_then_id(
    key_a: f64,
    id_a: &str,
    key_b: f64,
    id_b: &str,
) -> std::cmp::Ordering {
    key_b
        .partial_cmp(&key_a)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| id_a.cmp(id_b))
}
