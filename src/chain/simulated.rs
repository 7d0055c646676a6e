use async_trait::async_trait;
use rand::Rng;
use tokio::time::{sleep, Duration};

use super::ChainExecutor;
use crate::engine::types::StrategyCandidate;
use crate::errors::{EngineError, EngineResult};
use crate::logger::{self, LogTag};

/// Chain executor double with production-shaped behavior: a submission
/// latency and a configurable failure rate. Used by the demo binary; tests
/// use scripted doubles instead so outcomes stay deterministic.
pub struct SimulatedChainExecutor {
    latency: Duration,
    failure_rate: f64,
}

impl SimulatedChainExecutor {
    pub fn new(latency_ms: u64, failure_rate: f64) -> Self {
        Self {
            latency: Duration::from_millis(latency_ms),
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl ChainExecutor for SimulatedChainExecutor {
    async fn submit(&self, candidate: &StrategyCandidate) -> EngineResult<String> {
        logger::debug(
            LogTag::Chain,
            &format!(
                "📡 Submitting {} for position {}",
                candidate.action, candidate.target_position_id
            ),
        );

        sleep(self.latency).await;

        let (roll, tx_hi, tx_lo) = {
            let mut rng = rand::thread_rng();
            (rng.gen::<f64>(), rng.gen::<u128>(), rng.gen::<u128>())
        };

        if roll < self.failure_rate {
            return Err(EngineError::Execution(
                "transaction rejected by network conditions".to_string(),
            ));
        }

        Ok(format!("0x{:032x}{:032x}", tx_hi, tx_lo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::StrategyAction;

    fn candidate() -> StrategyCandidate {
        StrategyCandidate {
            action: StrategyAction::Compound,
            target_position_id: "p1".to_string(),
            amount: 1.0,
            expected_return: 0.05,
            risk_score: 0.1,
            horizon_days: 1,
            reasoning: "test".to_string(),
            destination_network: None,
            new_range: None,
        }
    }

    #[tokio::test]
    async fn test_zero_failure_rate_always_succeeds() {
        let executor = SimulatedChainExecutor::new(0, 0.0);
        let tx = executor.submit(&candidate()).await.unwrap();
        assert!(tx.starts_with("0x"));
        assert_eq!(tx.len(), 66);
    }

    #[tokio::test]
    async fn test_certain_failure_rate_always_fails() {
        let executor = SimulatedChainExecutor::new(0, 1.0);
        let err = executor.submit(&candidate()).await.unwrap_err();
        assert!(matches!(err, EngineError::Execution(_)));
    }
}
