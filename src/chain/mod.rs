//! Collaborator interfaces the engine depends on.
//!
//! The engine never talks to a chain, a price feed or a treasury directly;
//! everything external arrives through these traits so production wiring and
//! test doubles are interchangeable.

mod simulated;

pub use simulated::SimulatedChainExecutor;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::engine::types::{PositionSpec, StrategyCandidate};
use crate::errors::EngineResult;

/// Submits a strategy to the underlying chain.
///
/// The engine treats this as an opaque, potentially slow call that either
/// yields a transaction id or fails. Timeouts are the implementor's job and
/// surface as ordinary failures.
#[async_trait]
pub trait ChainExecutor: Send + Sync {
    async fn submit(&self, candidate: &StrategyCandidate) -> EngineResult<String>;
}

/// Reports capital available for new allocations. The engine never computes
/// this figure itself.
pub trait CapitalProvider: Send + Sync {
    fn available(&self) -> f64;
}

/// Fetches the initial position set during engine initialization.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn fetch(&self) -> EngineResult<Vec<PositionSpec>>;
}

/// Time source, injected so tests can pin the clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed capital figure, useful for config-driven wiring.
pub struct FixedCapital(pub f64);

impl CapitalProvider for FixedCapital {
    fn available(&self) -> f64 {
        self.0
    }
}

/// Position source backed by a static spec list (config seeds).
pub struct StaticPositionSource {
    specs: Vec<PositionSpec>,
}

impl StaticPositionSource {
    pub fn new(specs: Vec<PositionSpec>) -> Self {
        Self { specs }
    }
}

#[async_trait]
impl PositionSource for StaticPositionSource {
    async fn fetch(&self) -> EngineResult<Vec<PositionSpec>> {
        Ok(self.specs.clone())
    }
}
