use super::config::StrategyConfig;
use crate::engine::scoring::scoring_for;
use crate::engine::types::{PortfolioMetrics, Position, StrategyAction, StrategyCandidate};

/// Trim capital from underperformers: positions whose yield trails the
/// portfolio-weighted yield, or AMM positions bleeding impermanent loss.
/// When several qualify, the lowest-yield one goes first.
pub fn analyze(
    positions: &[Position],
    metrics: &PortfolioMetrics,
    cfg: &StrategyConfig,
) -> Option<StrategyCandidate> {
    let worst = positions
        .iter()
        .filter(|p| {
            p.is_active()
                && p.principal > 0.0
                && scoring_for(p).underperforming(p, metrics.weighted_yield_bps, cfg)
        })
        .min_by(|a, b| {
            a.yield_rate_bps
                .partial_cmp(&b.yield_rate_bps)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        })?;

    let amount = worst.principal * cfg.prune_remove_fraction;
    let deep_il = worst
        .impermanent_loss_bps
        .map(|il| il < cfg.prune_max_il_bps)
        .unwrap_or(false);

    // expected return: avoided drag from the lagging yield, or avoided IL
    let expected_return = if deep_il {
        amount * worst.impermanent_loss_bps.unwrap_or(0.0).abs() / 10_000.0 * 0.5
    } else {
        (amount * (metrics.weighted_yield_bps - worst.yield_rate_bps) / 10_000.0).max(0.0)
    };

    let reasoning = if deep_il {
        format!(
            "Remove {:.4} from {} position: impermanent loss {:.0}bps breaches floor",
            amount,
            worst.network,
            worst.impermanent_loss_bps.unwrap_or(0.0)
        )
    } else {
        format!(
            "Remove {:.4} from {}: {:.0}bps trails weighted {:.0}bps",
            amount, worst.network, worst.yield_rate_bps, metrics.weighted_yield_bps
        )
    };

    Some(StrategyCandidate {
        action: StrategyAction::RemoveCapital,
        target_position_id: worst.id.clone(),
        amount,
        expected_return,
        risk_score: 0.1,
        horizon_days: 14,
        reasoning,
        destination_network: None,
        new_range: None,
    })
}
