use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::emergency;
use super::executor;
use super::ledger::PositionLedger;
use super::metrics;
use super::types::{
    EmergencyExitSummary, ExecutionResult, PortfolioMetrics, Position, PositionSpec,
    StrategyCandidate,
};
use crate::chain::{CapitalProvider, ChainExecutor, Clock, PositionSource};
use crate::config::NetworkConfig;
use crate::errors::{EngineError, EngineResult};
use crate::logger::{self, LogTag};
use crate::strategy::{self, StrategyConfig};

/// Autonomous portfolio rebalancing engine.
///
/// One engine instance is the single logical owner of its ledger. All
/// external effects go through the injected collaborators, so the engine is
/// fully deterministic under test doubles. It owns no timers; a periodic
/// caller drives it.
pub struct OptimizerEngine {
    ledger: PositionLedger,
    chain: Arc<dyn ChainExecutor>,
    capital: Arc<dyn CapitalProvider>,
    clock: Arc<dyn Clock>,
    strategy_config: StrategyConfig,
    networks: NetworkConfig,
    cycle_in_flight: AtomicBool,
}

impl OptimizerEngine {
    pub fn new(
        chain: Arc<dyn ChainExecutor>,
        capital: Arc<dyn CapitalProvider>,
        clock: Arc<dyn Clock>,
        strategy_config: StrategyConfig,
        networks: NetworkConfig,
    ) -> Self {
        Self {
            ledger: PositionLedger::new(),
            chain,
            capital,
            clock,
            strategy_config,
            networks,
            cycle_in_flight: AtomicBool::new(false),
        }
    }

    /// Populate the ledger from a spec list. All-or-nothing: specs are
    /// validated up front so a bad entry cannot leave a partial load behind.
    pub async fn initialize(&self, specs: Vec<PositionSpec>) -> EngineResult<usize> {
        for spec in &specs {
            spec.validate()?;
        }
        let count = specs.len();
        for spec in specs {
            self.ledger.add_position(spec, self.clock.now()).await?;
        }
        logger::info(
            LogTag::Engine,
            &format!("📊 Loaded {} position(s) into ledger", count),
        );
        Ok(count)
    }

    /// Initialize from a collaborator fetch. A fetch failure surfaces as
    /// `DataUnavailable` and leaves the engine running on an empty ledger
    /// rather than crashing.
    pub async fn initialize_from_source(
        &self,
        source: &dyn PositionSource,
    ) -> EngineResult<usize> {
        match source.fetch().await {
            Ok(specs) => self.initialize(specs).await,
            Err(e) => {
                logger::warning(
                    LogTag::Engine,
                    &format!("⚠️ Position source unavailable, starting empty: {}", e),
                );
                Err(EngineError::DataUnavailable(e.to_string()))
            }
        }
    }

    /// Add a single position through the engine surface.
    pub async fn add_position(&self, spec: PositionSpec) -> EngineResult<Position> {
        self.ledger.add_position(spec, self.clock.now()).await
    }

    /// Record a new observed market price for an AMM position.
    pub async fn record_price(&self, id: &str, price: f64) -> EngineResult<Position> {
        self.ledger.update_price(id, price, self.clock.now()).await
    }

    /// Read-only snapshot of every position, audit rows included.
    pub async fn get_positions(&self) -> Vec<Position> {
        self.ledger.snapshot().await
    }

    /// Recompute portfolio metrics from the current ledger state.
    pub async fn get_metrics(&self) -> PortfolioMetrics {
        metrics::compute(&self.ledger.snapshot().await)
    }

    /// Run every analyzer over the current snapshot. Read-only and safe to
    /// call concurrently with anything, including an in-flight execution.
    pub async fn generate_strategies(&self) -> Vec<StrategyCandidate> {
        let snapshot = self.ledger.snapshot().await;
        let portfolio = metrics::compute(&snapshot);
        let candidates = strategy::generate(
            &snapshot,
            &portfolio,
            self.capital.available(),
            &self.strategy_config,
        );
        if !candidates.is_empty() {
            logger::debug(
                LogTag::Strategy,
                &format!("💡 Generated {} candidate(s)", candidates.len()),
            );
        }
        candidates
    }

    /// Execute one candidate under the single-flight guard. Consumes the
    /// candidate; losers of the guard race get an immediate `Concurrency`
    /// rejection.
    pub async fn execute_strategy(&self, candidate: StrategyCandidate) -> ExecutionResult {
        executor::execute(
            &self.ledger,
            self.chain.as_ref(),
            &self.cycle_in_flight,
            self.clock.as_ref(),
            &candidate,
        )
        .await
    }

    /// Drain matching positions immediately, bypassing the guard.
    pub async fn emergency_exit(
        &self,
        network_filter: Option<&str>,
    ) -> EngineResult<EmergencyExitSummary> {
        Ok(emergency::emergency_exit(
            &self.ledger,
            &self.networks,
            self.clock.as_ref(),
            network_filter,
        )
        .await)
    }
}
