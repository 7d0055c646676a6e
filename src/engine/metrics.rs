use std::collections::HashSet;

use super::scoring::scoring_for;
use super::types::{Position, PortfolioMetrics, PositionStatus};

// Score weights; the total is capped at 100.
const NETWORK_POINTS: f64 = 10.0;
const DIVERSIFICATION_CAP: f64 = 30.0;
const DISCIPLINE_WEIGHT: f64 = 20.0;
const BALANCE_BONUS: f64 = 10.0;
const BALANCE_MIN_PRINCIPAL: f64 = 0.1;
const BALANCE_MAX_PRINCIPAL: f64 = 100_000.0;
const SCORE_CAP: f64 = 100.0;

/// Derive portfolio-level statistics from a position snapshot.
///
/// Pure function of its input: deterministic, side-effect free, and safe to
/// call concurrently with anything. Removed positions are audit rows with
/// zero principal and are excluded from every aggregate.
pub fn compute(positions: &[Position]) -> PortfolioMetrics {
    let live: Vec<&Position> = positions
        .iter()
        .filter(|p| p.status != PositionStatus::Removed)
        .collect();

    let total_principal: f64 = live.iter().map(|p| p.principal).sum();
    let total_rewards: f64 = live.iter().map(|p| p.accrued_reward).sum();

    let weighted_yield_bps = if total_principal > 0.0 {
        live.iter()
            .map(|p| p.yield_rate_bps * p.principal)
            .sum::<f64>()
            / total_principal
    } else {
        0.0
    };

    let networks: HashSet<&str> = live.iter().map(|p| p.network.as_str()).collect();
    let diversification_score = (networks.len() as f64 * NETWORK_POINTS).min(DIVERSIFICATION_CAP);

    let discipline_score = if live.is_empty() {
        0.0
    } else {
        let disciplined = live
            .iter()
            .filter(|p| scoring_for(p).disciplined(p))
            .count();
        disciplined as f64 / live.len() as f64 * DISCIPLINE_WEIGHT
    };

    let balanced = live
        .iter()
        .all(|p| p.principal >= BALANCE_MIN_PRINCIPAL && p.principal <= BALANCE_MAX_PRINCIPAL);
    let balance_bonus = if balanced { BALANCE_BONUS } else { 0.0 };

    let optimization_score = (diversification_score
        + yield_tier_score(weighted_yield_bps)
        + discipline_score
        + balance_bonus)
        .min(SCORE_CAP);

    PortfolioMetrics {
        total_principal,
        total_rewards,
        weighted_yield_bps,
        position_count: live.len(),
        diversification_score,
        discipline_score,
        optimization_score,
    }
}

fn yield_tier_score(weighted_yield_bps: f64) -> f64 {
    if weighted_yield_bps >= 800.0 {
        40.0
    } else if weighted_yield_bps >= 600.0 {
        30.0
    } else if weighted_yield_bps >= 400.0 {
        20.0
    } else {
        10.0
    }
}
