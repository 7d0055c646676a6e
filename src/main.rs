use std::path::Path;
use std::sync::Arc;

use tokio::sync::Notify;
use tokio::time::Duration;

use yieldbot::{
    arguments,
    chain::{FixedCapital, SimulatedChainExecutor, StaticPositionSource, SystemClock},
    config,
    engine::OptimizerEngine,
    logger::{self, LogTag},
    runner,
};

#[tokio::main]
async fn main() {
    arguments::set_cmd_args(std::env::args().collect());
    logger::init();

    if arguments::is_help_requested() {
        arguments::print_help();
        return;
    }

    logger::info(LogTag::System, "🚀 yieldbot starting up...");

    let config_path = arguments::get_config_path();
    let config = match config::load_config(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            logger::error(LogTag::Config, &format!("❌ {:#}", e));
            std::process::exit(1);
        }
    };

    let engine = Arc::new(OptimizerEngine::new(
        Arc::new(SimulatedChainExecutor::new(
            config.chain.submit_latency_ms,
            config.chain.failure_rate,
        )),
        Arc::new(FixedCapital(config.capital.available)),
        Arc::new(SystemClock),
        config.strategy.clone(),
        config.networks.clone(),
    ));

    // a fetch failure is already logged; the engine runs on an empty ledger
    let source = StaticPositionSource::new(config.positions.clone());
    let _ = engine.initialize_from_source(&source).await;

    // One-shot drain mode
    if arguments::is_emergency_exit_enabled() {
        let filter = arguments::get_network_filter();
        match engine.emergency_exit(filter.as_deref()).await {
            Ok(summary) => {
                logger::info(
                    LogTag::System,
                    &format!(
                        "Drained {:.4} from {} position(s); funds unlock in ~{} minutes",
                        summary.total_amount,
                        summary.positions_affected,
                        summary.estimated_minutes
                    ),
                );
                return;
            }
            Err(e) => {
                logger::error(LogTag::System, &format!("❌ Emergency exit failed: {}", e));
                std::process::exit(1);
            }
        }
    }

    let shutdown = Arc::new(Notify::new());
    {
        let shutdown = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            shutdown.notify_waiters();
        }) {
            logger::error(
                LogTag::System,
                &format!("❌ Failed to install shutdown handler: {}", e),
            );
            std::process::exit(1);
        }
    }

    let interval = arguments::get_interval_override().unwrap_or(config.engine.interval_seconds);
    let auto_execute = config.engine.auto_execute && !arguments::is_dry_run_enabled();

    runner::run_optimizer_service(
        engine,
        Duration::from_secs(interval),
        auto_execute,
        shutdown,
    )
    .await;

    logger::info(LogTag::System, "👋 Shutdown complete");
}
