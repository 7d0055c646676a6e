use super::config::StrategyConfig;
use crate::engine::types::{Position, StrategyAction, StrategyCandidate};

/// Harvest accumulated trading fees from the liquidity position holding the
/// most. Fees sitting in the position earn nothing until collected.
pub fn analyze(positions: &[Position], cfg: &StrategyConfig) -> Option<StrategyCandidate> {
    let target = positions
        .iter()
        .filter(|p| p.is_active() && p.is_amm() && p.accrued_reward > cfg.collect_fees_min)
        .min_by(|a, b| {
            super::cmp_desc_then_id(a.accrued_reward, &a.id, b.accrued_reward, &b.id)
        })?;

    Some(StrategyCandidate {
        action: StrategyAction::CollectFees,
        target_position_id: target.id.clone(),
        amount: target.accrued_reward,
        expected_return: target.accrued_reward,
        risk_score: 0.05,
        horizon_days: 1,
        reasoning: format!(
            "Collect {:.4} in accrued fees from {} liquidity position",
            target.accrued_reward, target.network
        ),
        destination_network: None,
        new_range: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{PositionStatus, PriceRange};
    use chrono::Utc;

    fn amm(id: &str, reward: f64) -> Position {
        Position {
            id: id.to_string(),
            network: "base".to_string(),
            validator: None,
            principal: 42000.0,
            accrued_reward: reward,
            yield_rate_bps: 6820.0,
            auto_compound: false,
            status: PositionStatus::Active,
            range: Some(PriceRange {
                low: 0.08,
                high: 0.12,
                current: 0.10,
            }),
            impermanent_loss_bps: Some(-90.0),
            opened_at: Utc::now(),
            updated_at: Utc::now(),
            unbonding_until: None,
        }
    }

    #[test]
    fn test_harvests_largest_fee_pool() {
        let positions = vec![amm("a", 840.0), amm("b", 2550.0)];
        let c = analyze(&positions, &StrategyConfig::default()).unwrap();
        assert_eq!(c.action, StrategyAction::CollectFees);
        assert_eq!(c.target_position_id, "b");
        assert_eq!(c.amount, 2550.0);
    }

    #[test]
    fn test_dust_fees_ignored() {
        let positions = vec![amm("a", 0.01)];
        assert!(analyze(&positions, &StrategyConfig::default()).is_none());
    }

    #[test]
    fn test_staking_rewards_not_harvested() {
        let mut staking = amm("a", 500.0);
        staking.range = None;
        assert!(analyze(&[staking], &StrategyConfig::default()).is_none());
    }
}
