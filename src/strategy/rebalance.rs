use super::config::StrategyConfig;
use crate::engine::types::{Position, StrategyAction, StrategyCandidate};

/// Emit a rebalance when the yield spread between the best and worst funded
/// positions exceeds the configured threshold. The worst position is always
/// the deterministic pick: sorted by yield descending with id tie-breaks,
/// never whichever happened to come last in iteration order.
pub fn analyze(positions: &[Position], cfg: &StrategyConfig) -> Option<StrategyCandidate> {
    let mut funded: Vec<&Position> = positions
        .iter()
        .filter(|p| p.is_active() && p.principal > 0.0)
        .collect();
    if funded.len() < 2 {
        return None;
    }

    funded.sort_by(|a, b| {
        super::cmp_desc_then_id(a.yield_rate_bps, &a.id, b.yield_rate_bps, &b.id)
    });
    let best = funded.first()?;
    let worst = funded.last()?;

    let spread_bps = best.yield_rate_bps - worst.yield_rate_bps;
    if spread_bps <= cfg.rebalance_min_spread_bps {
        return None;
    }

    let amount = worst.principal * cfg.rebalance_move_fraction;

    Some(StrategyCandidate {
        action: StrategyAction::Rebalance,
        target_position_id: worst.id.clone(),
        amount,
        expected_return: amount * spread_bps / 10_000.0,
        risk_score: 0.3,
        horizon_days: 7,
        reasoning: format!(
            "Rebalance from {} ({:.0}bps) toward {} ({:.0}bps), moving {:.4}",
            worst.network, worst.yield_rate_bps, best.network, best.yield_rate_bps, amount
        ),
        destination_network: Some(best.network.clone()),
        new_range: None,
    })
}
