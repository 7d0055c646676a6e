use std::sync::atomic::{AtomicBool, Ordering};

use super::ledger::PositionLedger;
use super::types::{ExecutionResult, Position, PositionStatus, StrategyAction, StrategyCandidate};
use crate::chain::{ChainExecutor, Clock};
use crate::errors::{EngineError, EngineResult};
use crate::logger::{self, LogTag};

/// Single-flight guard over the engine's one mutating path.
///
/// Acquisition is an atomic compare-and-swap; losers get an immediate
/// `Concurrency` rejection instead of waiting. The flag is released on drop
/// so no exit path can leave it dangling.
pub(crate) struct ExecutionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ExecutionGuard<'a> {
    pub(crate) fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ExecutionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Execute one strategy candidate against the ledger.
///
/// From the caller's point of view the sequence is atomic: either the full
/// apply completes and the ledger reflects the new state, or it fails and
/// the only trace is the transient `Rebalancing` flip, which is always
/// reverted before returning.
pub(crate) async fn execute(
    ledger: &PositionLedger,
    chain: &dyn ChainExecutor,
    flag: &AtomicBool,
    clock: &dyn Clock,
    candidate: &StrategyCandidate,
) -> ExecutionResult {
    let _guard = match ExecutionGuard::try_acquire(flag) {
        Some(guard) => guard,
        None => {
            // routine outcome: the caller skips to the next cycle
            logger::debug(
                LogTag::Executor,
                &format!(
                    "⏳ Cycle in flight, rejecting {} for {}",
                    candidate.action, candidate.target_position_id
                ),
            );
            return ExecutionResult::failed(EngineError::Concurrency);
        }
    };

    // Re-validate under the guard: an earlier candidate or an emergency
    // drain may have changed the target since generation.
    let target = match ledger.get(&candidate.target_position_id).await {
        Some(position) => position,
        None => {
            return ExecutionResult::failed(EngineError::NotFound(
                candidate.target_position_id.clone(),
            ))
        }
    };
    if target.status != PositionStatus::Active {
        return ExecutionResult::failed(EngineError::InvalidTransition {
            id: target.id.clone(),
            from: target.status,
            to: PositionStatus::Rebalancing,
        });
    }

    if let Err(e) = ledger
        .set_status(&target.id, PositionStatus::Rebalancing, clock.now())
        .await
    {
        return ExecutionResult::failed(e);
    }

    logger::info(
        LogTag::Executor,
        &format!(
            "🚀 Executing {} on {} ({})",
            candidate.action, target.network, candidate.reasoning
        ),
    );

    match chain.submit(candidate).await {
        Ok(tx_id) => {
            if let Err(e) = apply_candidate(ledger, candidate, clock).await {
                logger::error(
                    LogTag::Executor,
                    &format!("❌ Apply failed after submit for {}: {}", target.id, e),
                );
                restore_active(ledger, &target.id, clock).await;
                return ExecutionResult::failed(e);
            }
            restore_active(ledger, &target.id, clock).await;
            logger::info(
                LogTag::Executor,
                &format!("✅ {} complete | TX: {}", candidate.action, tx_id),
            );
            ExecutionResult::ok(tx_id)
        }
        Err(e) => {
            restore_active(ledger, &target.id, clock).await;
            logger::error(
                LogTag::Executor,
                &format!(
                    "❌ {} failed for {}: {} (no automatic retry)",
                    candidate.action, target.id, e
                ),
            );
            ExecutionResult::failed(e)
        }
    }
}

/// Reflect a successful chain submission in the ledger.
async fn apply_candidate(
    ledger: &PositionLedger,
    candidate: &StrategyCandidate,
    clock: &dyn Clock,
) -> EngineResult<()> {
    let id = &candidate.target_position_id;
    match candidate.action {
        StrategyAction::Compound => {
            ledger.fold_reward(id, clock.now()).await?;
        }
        StrategyAction::AddCapital => {
            ledger
                .apply_delta(id, candidate.amount, 0.0, clock.now())
                .await?;
        }
        StrategyAction::RemoveCapital => {
            ledger
                .apply_delta(id, -candidate.amount, 0.0, clock.now())
                .await?;
        }
        StrategyAction::CollectFees => {
            ledger.collect_reward(id, clock.now()).await?;
        }
        StrategyAction::Rebalance => {
            if let Some(bounds) = &candidate.new_range {
                ledger
                    .update_range(id, bounds.low, bounds.high, clock.now())
                    .await?;
            } else if let Some(destination) = &candidate.destination_network {
                move_principal(ledger, id, destination, candidate.amount, clock).await?;
            }
        }
    }
    Ok(())
}

/// Shift principal from the target toward the best-yield active position on
/// the destination network. Value is conserved; if no destination position
/// survives re-validation the move is skipped.
async fn move_principal(
    ledger: &PositionLedger,
    source_id: &str,
    destination_network: &str,
    amount: f64,
    clock: &dyn Clock,
) -> EngineResult<()> {
    let snapshot = ledger.snapshot().await;
    let receiver: Option<Position> = snapshot
        .into_iter()
        .filter(|p| p.is_active() && p.network == destination_network && p.id != source_id)
        .max_by(|a, b| {
            a.yield_rate_bps
                .partial_cmp(&b.yield_rate_bps)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.id.cmp(&a.id))
        });

    let receiver = match receiver {
        Some(r) => r,
        None => {
            logger::warning(
                LogTag::Executor,
                &format!(
                    "⚠️ No active position on {} to receive {:.4}; move skipped",
                    destination_network, amount
                ),
            );
            return Ok(());
        }
    };

    ledger
        .apply_delta(source_id, -amount, 0.0, clock.now())
        .await?;
    if let Err(e) = ledger
        .apply_delta(&receiver.id, amount, 0.0, clock.now())
        .await
    {
        // restore the source so value is never lost
        ledger
            .apply_delta(source_id, amount, 0.0, clock.now())
            .await?;
        return Err(e);
    }
    Ok(())
}

/// Clear the transient `Rebalancing` marker. An emergency drain may have
/// force-unstaked the position mid-flight; its override wins.
async fn restore_active(ledger: &PositionLedger, id: &str, clock: &dyn Clock) {
    if let Err(e) = ledger
        .set_status(id, PositionStatus::Active, clock.now())
        .await
    {
        logger::debug(
            LogTag::Executor,
            &format!("Status restore for {} superseded: {}", id, e),
        );
    }
}
