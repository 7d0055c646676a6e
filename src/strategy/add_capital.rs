use super::config::StrategyConfig;
use crate::engine::types::{Position, StrategyAction, StrategyCandidate};

const DAYS_PER_YEAR: f64 = 365.0;
const HORIZON_DAYS: u32 = 30;

/// Deploy externally available capital into the best earning venue. The
/// capital figure is injected by the caller - the engine never computes it.
/// Out-of-range AMM positions are skipped; they earn nothing until
/// recentered.
pub fn analyze(
    positions: &[Position],
    available_capital: f64,
    cfg: &StrategyConfig,
) -> Option<StrategyCandidate> {
    if available_capital <= cfg.add_capital_min {
        return None;
    }

    let target = positions
        .iter()
        .filter(|p| p.is_active() && p.in_range().unwrap_or(true))
        .min_by(|a, b| super::cmp_desc_then_id(a.yield_rate_bps, &a.id, b.yield_rate_bps, &b.id))?;

    let amount = available_capital.min(cfg.add_capital_max_single);

    Some(StrategyCandidate {
        action: StrategyAction::AddCapital,
        target_position_id: target.id.clone(),
        amount,
        expected_return: amount * target.yield_rate_bps / 10_000.0 / DAYS_PER_YEAR
            * HORIZON_DAYS as f64,
        risk_score: 0.2,
        horizon_days: HORIZON_DAYS,
        reasoning: format!(
            "Stake {:.2} additional capital on {} at {:.0}bps",
            amount, target.network, target.yield_rate_bps
        ),
        destination_network: None,
        new_range: None,
    })
}
