use chrono::Duration;

use super::ledger::PositionLedger;
use super::types::{EmergencyExitSummary, PositionStatus};
use crate::chain::Clock;
use crate::config::NetworkConfig;
use crate::logger::{self, LogTag};

/// Drain matching positions immediately.
///
/// Runs outside the single-flight guard on purpose: an emergency takes
/// precedence over an in-flight optimization, and any position it touches is
/// force-transitioned to `Unstaking` even if an executor currently holds it
/// in `Rebalancing`. Funds stay in `Unstaking` until a separate confirmation
/// step finalizes the withdrawal; nothing here moves to `Removed`.
pub(crate) async fn emergency_exit(
    ledger: &PositionLedger,
    networks: &NetworkConfig,
    clock: &dyn Clock,
    network_filter: Option<&str>,
) -> EmergencyExitSummary {
    let scope = network_filter.unwrap_or("all networks");
    logger::warning(
        LogTag::Emergency,
        &format!("🚨 Emergency exit initiated for {}", scope),
    );

    let snapshot = ledger.snapshot().await;
    let matched: Vec<_> = snapshot
        .iter()
        .filter(|p| {
            matches!(
                p.status,
                PositionStatus::Active | PositionStatus::Rebalancing
            ) && network_filter.map_or(true, |n| p.network == n)
        })
        .collect();

    let mut total_amount = 0.0;
    let mut estimated_minutes = 0u64;
    let mut positions_affected = 0usize;

    for position in matched {
        let minutes = networks.unbonding_minutes_for(&position.network);
        let until = clock.now() + Duration::minutes(minutes as i64);
        match ledger
            .force_unstake(&position.id, Some(until), clock.now())
            .await
        {
            Ok(_) => {
                total_amount += position.principal;
                estimated_minutes = estimated_minutes.max(minutes);
                positions_affected += 1;
            }
            Err(e) => {
                // a row removed between snapshot and drain; nothing to unwind
                logger::warning(
                    LogTag::Emergency,
                    &format!("Skipped {} during drain: {}", position.id, e),
                );
            }
        }
    }

    logger::warning(
        LogTag::Emergency,
        &format!(
            "🚨 Drained {} position(s), {:.4} total, unlock in ~{} minutes",
            positions_affected, total_amount, estimated_minutes
        ),
    );

    EmergencyExitSummary {
        total_amount,
        estimated_minutes,
        positions_affected,
    }
}
