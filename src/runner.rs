use std::sync::Arc;

use tokio::sync::Notify;
use tokio::time::{sleep, Duration};

use crate::engine::OptimizerEngine;
use crate::logger::{self, LogTag};

/// Periodic optimization service.
///
/// The engine owns no timers; this loop is the external scheduler that
/// drives it. Each cycle regenerates candidates from the current snapshot
/// and walks them in emission order. A `Concurrency` rejection is routine -
/// the rest of the cycle is skipped and the next tick retries.
pub async fn run_optimizer_service(
    engine: Arc<OptimizerEngine>,
    interval: Duration,
    auto_execute: bool,
    shutdown: Arc<Notify>,
) {
    logger::info(
        LogTag::Runner,
        &format!(
            "🚀 Optimization loop started (interval: {}s, auto-execute: {})",
            interval.as_secs(),
            auto_execute
        ),
    );

    let mut cycle: u64 = 0;

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                logger::info(LogTag::Runner, "🛑 Optimization loop stopping");
                break;
            }
            _ = sleep(interval) => {
                cycle += 1;
                run_cycle(&engine, cycle, auto_execute).await;
            }
        }
    }
}

async fn run_cycle(engine: &OptimizerEngine, cycle: u64, auto_execute: bool) {
    let candidates = engine.generate_strategies().await;

    if candidates.is_empty() {
        logger::debug(
            LogTag::Runner,
            &format!("Cycle {}: no opportunities found", cycle),
        );
    } else {
        logger::info(
            LogTag::Runner,
            &format!("💡 Cycle {}: {} candidate(s)", cycle, candidates.len()),
        );

        for candidate in candidates {
            logger::info(
                LogTag::Runner,
                &format!(
                    "   {} -> {} | amount {:.4} | risk {:.2} | {}",
                    candidate.action,
                    candidate.target_position_id,
                    candidate.amount,
                    candidate.risk_score,
                    candidate.reasoning
                ),
            );

            if !auto_execute {
                continue;
            }

            let result = engine.execute_strategy(candidate).await;
            if result.is_concurrency_rejection() {
                logger::debug(
                    LogTag::Runner,
                    "Guard busy; skipping remaining candidates this cycle",
                );
                break;
            }
            if let Some(error) = &result.error {
                // surfaced already by the executor; the candidate is dropped,
                // never retried
                logger::debug(LogTag::Runner, &format!("Candidate dropped: {}", error));
            }
        }
    }

    let metrics = engine.get_metrics().await;
    logger::info(
        LogTag::Runner,
        &format!(
            "📊 Cycle {}: score {:.0}/100 | principal {:.4} | rewards {:.4} | {} position(s) | weighted {:.0}bps",
            cycle,
            metrics.optimization_score,
            metrics.total_principal,
            metrics.total_rewards,
            metrics.position_count,
            metrics.weighted_yield_bps
        ),
    );
}
