use super::types::Position;
use crate::strategy::config::StrategyConfig;

/// Per-flavor scoring rules.
///
/// A single `Position` type covers both staking and concentrated-liquidity
/// allocations; the parts that genuinely differ between the two - what counts
/// as a disciplined position, and what flags one for capital removal - live
/// behind this trait so the metrics and prune paths share one control flow.
pub trait ScoringStrategy: Send + Sync {
    /// Whether the position counts toward the portfolio discipline score.
    fn disciplined(&self, position: &Position) -> bool;

    /// Whether the position should be flagged for capital removal.
    fn underperforming(
        &self,
        position: &Position,
        weighted_yield_bps: f64,
        cfg: &StrategyConfig,
    ) -> bool;
}

/// Staking flavor: discipline means rewards are auto-compounding; a position
/// underperforms when its yield trails the portfolio-weighted yield.
pub struct StakingScoring;

impl ScoringStrategy for StakingScoring {
    fn disciplined(&self, position: &Position) -> bool {
        position.auto_compound
    }

    fn underperforming(
        &self,
        position: &Position,
        weighted_yield_bps: f64,
        cfg: &StrategyConfig,
    ) -> bool {
        weighted_yield_bps > 0.0
            && position.yield_rate_bps < cfg.prune_yield_fraction * weighted_yield_bps
    }
}

/// AMM flavor: discipline means the position is in range and earning fees;
/// deep impermanent loss is an additional removal trigger.
pub struct AmmScoring;

impl ScoringStrategy for AmmScoring {
    fn disciplined(&self, position: &Position) -> bool {
        position.in_range().unwrap_or(false)
    }

    fn underperforming(
        &self,
        position: &Position,
        weighted_yield_bps: f64,
        cfg: &StrategyConfig,
    ) -> bool {
        let yield_lagging = StakingScoring.underperforming(position, weighted_yield_bps, cfg);
        let deep_il = position
            .impermanent_loss_bps
            .map(|il| il < cfg.prune_max_il_bps)
            .unwrap_or(false);
        yield_lagging || deep_il
    }
}

/// Dispatch on the position flavor.
pub fn scoring_for(position: &Position) -> &'static dyn ScoringStrategy {
    if position.is_amm() {
        &AmmScoring
    } else {
        &StakingScoring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{PositionStatus, PriceRange};
    use chrono::Utc;

    fn staking(yield_bps: f64, auto_compound: bool) -> Position {
        Position {
            id: "s1".to_string(),
            network: "polygon".to_string(),
            validator: None,
            principal: 1000.0,
            accrued_reward: 0.0,
            yield_rate_bps: yield_bps,
            auto_compound,
            status: PositionStatus::Active,
            range: None,
            impermanent_loss_bps: None,
            opened_at: Utc::now(),
            updated_at: Utc::now(),
            unbonding_until: None,
        }
    }

    fn amm(yield_bps: f64, current: f64, il_bps: f64) -> Position {
        let mut p = staking(yield_bps, false);
        p.id = "a1".to_string();
        p.range = Some(PriceRange {
            low: 10.0,
            high: 11.0,
            current,
        });
        p.impermanent_loss_bps = Some(il_bps);
        p
    }

    #[test]
    fn test_discipline_dispatch() {
        assert!(scoring_for(&staking(500.0, true)).disciplined(&staking(500.0, true)));
        assert!(!scoring_for(&staking(500.0, false)).disciplined(&staking(500.0, false)));

        let in_range = amm(500.0, 10.5, -100.0);
        let out_of_range = amm(500.0, 12.0, -100.0);
        assert!(scoring_for(&in_range).disciplined(&in_range));
        assert!(!scoring_for(&out_of_range).disciplined(&out_of_range));
    }

    #[test]
    fn test_yield_lag_flags_removal() {
        let cfg = StrategyConfig::default();
        let lagging = staking(300.0, true);
        assert!(scoring_for(&lagging).underperforming(&lagging, 500.0, &cfg));

        let healthy = staking(480.0, true);
        assert!(!scoring_for(&healthy).underperforming(&healthy, 500.0, &cfg));
    }

    #[test]
    fn test_deep_il_flags_removal_even_with_good_yield() {
        let cfg = StrategyConfig::default();
        let bleeding = amm(900.0, 10.5, -1500.0);
        assert!(scoring_for(&bleeding).underperforming(&bleeding, 500.0, &cfg));

        let shallow = amm(900.0, 10.5, -200.0);
        assert!(!scoring_for(&shallow).underperforming(&shallow, 500.0, &cfg));
    }

    #[test]
    fn test_zero_weighted_yield_never_flags() {
        let cfg = StrategyConfig::default();
        let p = staking(0.0, false);
        assert!(!scoring_for(&p).underperforming(&p, 0.0, &cfg));
    }
}
