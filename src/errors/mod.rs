use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::types::PositionStatus;

/// Error taxonomy for the optimization engine.
///
/// Every engine method returns these as values; nothing panics across the
/// engine boundary. `Concurrency` is a routine outcome of the single-flight
/// guard and is not treated as a failure by callers.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Position not found: {0}")]
    NotFound(String),

    #[error("Invalid transition for position {id}: {from:?} -> {to:?}")]
    InvalidTransition {
        id: String,
        from: PositionStatus,
        to: PositionStatus,
    },

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Optimization cycle already in flight")]
    Concurrency,

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
}

impl EngineError {
    /// Routine errors are expected during normal operation and should not be
    /// logged as failures. The periodic runner simply skips to the next cycle.
    pub fn is_routine(&self) -> bool {
        matches!(self, EngineError::Concurrency)
    }

    /// Whether a later attempt at the same operation could succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::Concurrency | EngineError::Execution(_) | EngineError::DataUnavailable(_)
        )
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_is_routine() {
        assert!(EngineError::Concurrency.is_routine());
        assert!(!EngineError::Execution("network".to_string()).is_routine());
        assert!(!EngineError::NotFound("abc".to_string()).is_routine());
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(EngineError::Execution("timeout".to_string()).is_recoverable());
        assert!(EngineError::DataUnavailable("rpc down".to_string()).is_recoverable());
        assert!(!EngineError::Validation("negative principal".to_string()).is_recoverable());
        assert!(!EngineError::InvalidTransition {
            id: "p1".to_string(),
            from: PositionStatus::Removed,
            to: PositionStatus::Active,
        }
        .is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = EngineError::Validation("principal must be non-negative".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: principal must be non-negative"
        );
        assert_eq!(
            EngineError::Concurrency.to_string(),
            "Optimization cycle already in flight"
        );
    }
}
