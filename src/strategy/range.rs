use super::config::StrategyConfig;
use crate::engine::types::{Position, PriceBounds, StrategyAction, StrategyCandidate};

/// Fee-efficiency gain assumed from recentering an idle range.
const RECENTER_EFFICIENCY_GAIN: f64 = 0.02;

/// Recenter out-of-range AMM positions around the current price. Idle
/// liquidity earns nothing; the proposed bounds are a symmetric band around
/// the observed price. When several positions are out of range, the one with
/// the most idle principal goes first.
pub fn analyze(positions: &[Position], cfg: &StrategyConfig) -> Option<StrategyCandidate> {
    let target = positions
        .iter()
        .filter(|p| p.is_active() && p.in_range() == Some(false))
        .min_by(|a, b| super::cmp_desc_then_id(a.principal, &a.id, b.principal, &b.id))?;

    let current = target.range?.current;
    let new_range = PriceBounds {
        low: current * (1.0 - cfg.range_width_fraction),
        high: current * (1.0 + cfg.range_width_fraction),
    };

    Some(StrategyCandidate {
        action: StrategyAction::Rebalance,
        target_position_id: target.id.clone(),
        amount: target.principal,
        expected_return: target.principal * RECENTER_EFFICIENCY_GAIN,
        risk_score: 0.2,
        horizon_days: 7,
        reasoning: format!(
            "Recenter {} range to {:.4}-{:.4} around current price {:.4}",
            target.network, new_range.low, new_range.high, current
        ),
        destination_network: None,
        new_range: Some(new_range),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{PositionStatus, PriceRange};
    use chrono::Utc;

    fn amm(id: &str, principal: f64, current: f64) -> Position {
        Position {
            id: id.to_string(),
            network: "polygon".to_string(),
            validator: None,
            principal,
            accrued_reward: 0.0,
            yield_rate_bps: 9000.0,
            auto_compound: false,
            status: PositionStatus::Active,
            range: Some(PriceRange {
                low: 10.5,
                high: 11.0,
                current,
            }),
            impermanent_loss_bps: Some(-200.0),
            opened_at: Utc::now(),
            updated_at: Utc::now(),
            unbonding_until: None,
        }
    }

    #[test]
    fn test_out_of_range_gets_recentered() {
        let positions = vec![amm("a", 125000.0, 11.4)];
        let c = analyze(&positions, &StrategyConfig::default()).unwrap();
        assert_eq!(c.action, StrategyAction::Rebalance);
        let bounds = c.new_range.unwrap();
        assert!((bounds.low - 11.4 * 0.9).abs() < 1e-9);
        assert!((bounds.high - 11.4 * 1.1).abs() < 1e-9);
        // the proposed band brackets the current price
        assert!(bounds.low <= 11.4 && 11.4 <= bounds.high);
    }

    #[test]
    fn test_in_range_stays_quiet() {
        let positions = vec![amm("a", 125000.0, 10.75)];
        assert!(analyze(&positions, &StrategyConfig::default()).is_none());
    }

    #[test]
    fn test_staking_positions_ignored() {
        let mut staking = amm("a", 1000.0, 11.4);
        staking.range = None;
        assert!(analyze(&[staking], &StrategyConfig::default()).is_none());
    }

    #[test]
    fn test_largest_idle_principal_first() {
        let positions = vec![amm("small", 1000.0, 11.4), amm("large", 50000.0, 9.0)];
        let c = analyze(&positions, &StrategyConfig::default()).unwrap();
        assert_eq!(c.target_position_id, "large");
    }
}
