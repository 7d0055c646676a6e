use super::config::StrategyConfig;
use crate::engine::types::{Position, StrategyAction, StrategyCandidate};

/// Compounding gains roughly 5% extra annualized yield on the folded amount.
const COMPOUND_UPLIFT: f64 = 0.05;

/// Emit a compound when enough rewards have piled up on positions that are
/// not auto-compounding. The candidate reports the aggregate pending amount
/// and targets the position holding the largest share of it.
pub fn analyze(positions: &[Position], cfg: &StrategyConfig) -> Option<StrategyCandidate> {
    let pending: Vec<&Position> = positions
        .iter()
        .filter(|p| p.is_active() && !p.auto_compound && p.accrued_reward > 0.0)
        .collect();

    let total: f64 = pending.iter().map(|p| p.accrued_reward).sum();
    if total <= cfg.compound_min_pending {
        return None;
    }

    let target = pending.iter().min_by(|a, b| {
        super::cmp_desc_then_id(a.accrued_reward, &a.id, b.accrued_reward, &b.id)
    })?;

    Some(StrategyCandidate {
        action: StrategyAction::Compound,
        target_position_id: target.id.clone(),
        amount: total,
        expected_return: total * COMPOUND_UPLIFT,
        risk_score: 0.1,
        horizon_days: 1,
        reasoning: format!(
            "Compound {:.4} pending rewards across {} position(s) to maximize yield",
            total,
            pending.len()
        ),
        destination_network: None,
        new_range: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::PositionStatus;
    use chrono::Utc;

    fn position(id: &str, reward: f64, auto_compound: bool) -> Position {
        Position {
            id: id.to_string(),
            network: "base".to_string(),
            validator: None,
            principal: 100.0,
            accrued_reward: reward,
            yield_rate_bps: 400.0,
            auto_compound,
            status: PositionStatus::Active,
            range: None,
            impermanent_loss_bps: None,
            opened_at: Utc::now(),
            updated_at: Utc::now(),
            unbonding_until: None,
        }
    }

    #[test]
    fn test_below_threshold_stays_quiet() {
        let positions = vec![position("a", 0.05, false)];
        assert!(analyze(&positions, &StrategyConfig::default()).is_none());
    }

    #[test]
    fn test_above_threshold_emits() {
        let positions = vec![position("a", 0.15, false)];
        let c = analyze(&positions, &StrategyConfig::default()).unwrap();
        assert_eq!(c.action, StrategyAction::Compound);
        assert_eq!(c.target_position_id, "a");
        assert!((c.amount - 0.15).abs() < 1e-12);
        assert_eq!(c.horizon_days, 1);
    }

    #[test]
    fn test_auto_compounders_are_ignored() {
        // plenty of rewards, but they already compound on their own
        let positions = vec![position("a", 5.0, true), position("b", 0.04, false)];
        assert!(analyze(&positions, &StrategyConfig::default()).is_none());
    }

    #[test]
    fn test_aggregates_and_targets_largest() {
        let positions = vec![
            position("small", 0.06, false),
            position("big", 0.09, false),
        ];
        let c = analyze(&positions, &StrategyConfig::default()).unwrap();
        assert!((c.amount - 0.15).abs() < 1e-12);
        assert_eq!(c.target_position_id, "big");
    }

    #[test]
    fn test_inactive_positions_excluded() {
        let mut unstaking = position("a", 0.5, false);
        unstaking.status = PositionStatus::Unstaking;
        assert!(analyze(&[unstaking], &StrategyConfig::default()).is_none());
    }
}
