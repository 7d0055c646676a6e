use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::transitions::is_valid_transition;
use super::types::{Position, PositionSpec, PositionStatus};
use crate::errors::{EngineError, EngineResult};
use crate::logger::{self, LogTag};

struct LedgerInner {
    positions: Vec<Position>,
    // Positions are never physically deleted, so vec indexes stay stable.
    index: HashMap<String, usize>,
}

/// Authoritative in-memory store of positions.
///
/// Exclusively owns position lifetimes: rows are created by `add_position`,
/// mutated only through ledger methods, and retired by flipping status to
/// `Removed` with principal zeroed - never deleted, so audit history
/// survives. All mutators enforce the per-entity invariants
/// (`principal >= 0`, guarded status transitions).
pub struct PositionLedger {
    inner: RwLock<LedgerInner>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LedgerInner {
                positions: Vec::new(),
                index: HashMap::new(),
            }),
        }
    }

    /// Create a new Active position from a validated spec.
    pub async fn add_position(
        &self,
        spec: PositionSpec,
        now: DateTime<Utc>,
    ) -> EngineResult<Position> {
        spec.validate()?;

        let position = Position {
            id: Uuid::new_v4().to_string(),
            network: spec.network,
            validator: spec.validator,
            principal: spec.principal,
            accrued_reward: spec.accrued_reward,
            yield_rate_bps: spec.yield_rate_bps,
            auto_compound: spec.auto_compound,
            status: PositionStatus::Active,
            range: spec.range,
            impermanent_loss_bps: spec.impermanent_loss_bps,
            opened_at: now,
            updated_at: now,
            unbonding_until: None,
        };

        let mut inner = self.inner.write().await;
        inner.positions.push(position.clone());
        let idx = inner.positions.len() - 1;
        inner.index.insert(position.id.clone(), idx);

        logger::debug(
            LogTag::Ledger,
            &format!(
                "➕ Added position {} on {} ({:.4} @ {:.0}bps)",
                position.id, position.network, position.principal, position.yield_rate_bps
            ),
        );

        Ok(position)
    }

    /// Atomically adjust principal and accrued reward.
    pub async fn apply_delta(
        &self,
        id: &str,
        principal_delta: f64,
        reward_delta: f64,
        now: DateTime<Utc>,
    ) -> EngineResult<Position> {
        self.mutate(id, now, |position| {
            let new_principal = position.principal + principal_delta;
            let new_reward = position.accrued_reward + reward_delta;
            if new_principal < 0.0 {
                return Err(EngineError::Invariant(format!(
                    "principal would go negative on {}: {:.6} {:+.6}",
                    position.id, position.principal, principal_delta
                )));
            }
            if new_reward < 0.0 {
                return Err(EngineError::Invariant(format!(
                    "accrued reward would go negative on {}: {:.6} {:+.6}",
                    position.id, position.accrued_reward, reward_delta
                )));
            }
            position.principal = new_principal;
            position.accrued_reward = new_reward;
            Ok(())
        })
        .await
    }

    /// Guarded status transition. Moving to `Removed` zeroes principal as
    /// part of the same write.
    pub async fn set_status(
        &self,
        id: &str,
        status: PositionStatus,
        now: DateTime<Utc>,
    ) -> EngineResult<Position> {
        self.mutate(id, now, |position| {
            if !is_valid_transition(position.status, status) {
                return Err(EngineError::InvalidTransition {
                    id: position.id.clone(),
                    from: position.status,
                    to: status,
                });
            }
            position.status = status;
            if status == PositionStatus::Removed {
                position.principal = 0.0;
            }
            Ok(())
        })
        .await
    }

    /// Emergency override: pull the position into `Unstaking` from any
    /// non-terminal status, including `Rebalancing`. Only the emergency exit
    /// path calls this.
    pub async fn force_unstake(
        &self,
        id: &str,
        unbonding_until: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> EngineResult<Position> {
        self.mutate(id, now, |position| {
            if position.status == PositionStatus::Removed {
                return Err(EngineError::InvalidTransition {
                    id: position.id.clone(),
                    from: position.status,
                    to: PositionStatus::Unstaking,
                });
            }
            position.status = PositionStatus::Unstaking;
            position.unbonding_until = unbonding_until;
            Ok(())
        })
        .await
    }

    /// Fold accrued rewards into principal (value-neutral).
    pub async fn fold_reward(&self, id: &str, now: DateTime<Utc>) -> EngineResult<Position> {
        self.mutate(id, now, |position| {
            position.principal += position.accrued_reward;
            position.accrued_reward = 0.0;
            Ok(())
        })
        .await
    }

    /// Harvest accrued rewards out of the position; returns the amount taken.
    pub async fn collect_reward(&self, id: &str, now: DateTime<Utc>) -> EngineResult<f64> {
        let mut collected = 0.0;
        self.mutate(id, now, |position| {
            collected = position.accrued_reward;
            position.accrued_reward = 0.0;
            Ok(())
        })
        .await?;
        Ok(collected)
    }

    /// Replace the price bounds of an AMM position, keeping the observed price.
    pub async fn update_range(
        &self,
        id: &str,
        low: f64,
        high: f64,
        now: DateTime<Utc>,
    ) -> EngineResult<Position> {
        if low > high {
            return Err(EngineError::Validation(format!(
                "inverted price range: {} > {}",
                low, high
            )));
        }
        self.mutate(id, now, |position| match position.range.as_mut() {
            Some(range) => {
                range.low = low;
                range.high = high;
                Ok(())
            }
            None => Err(EngineError::Validation(format!(
                "position {} has no price range",
                position.id
            ))),
        })
        .await
    }

    /// Record a new observed market price for an AMM position. Range
    /// membership is derived from the bounds, so nothing else changes.
    pub async fn update_price(
        &self,
        id: &str,
        price: f64,
        now: DateTime<Utc>,
    ) -> EngineResult<Position> {
        if !price.is_finite() || price <= 0.0 {
            return Err(EngineError::Validation(format!("invalid price: {}", price)));
        }
        self.mutate(id, now, |position| match position.range.as_mut() {
            Some(range) => {
                range.current = price;
                Ok(())
            }
            None => Err(EngineError::Validation(format!(
                "position {} has no price range",
                position.id
            ))),
        })
        .await
    }

    /// Immutable copy of all positions, including removed audit rows.
    pub async fn snapshot(&self) -> Vec<Position> {
        self.inner.read().await.positions.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Position> {
        let inner = self.inner.read().await;
        inner
            .index
            .get(id)
            .and_then(|&idx| inner.positions.get(idx))
            .cloned()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.positions.len()
    }

    async fn mutate(
        &self,
        id: &str,
        now: DateTime<Utc>,
        update: impl FnOnce(&mut Position) -> EngineResult<()>,
    ) -> EngineResult<Position> {
        let mut inner = self.inner.write().await;
        let idx = *inner
            .index
            .get(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        let position = inner
            .positions
            .get_mut(idx)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        update(position)?;
        position.updated_at = now;
        Ok(position.clone())
    }
}

impl Default for PositionLedger {
    fn default() -> Self {
        Self::new()
    }
}
