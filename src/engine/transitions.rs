use super::types::PositionStatus;

/// Position status state machine.
///
/// `Active -> Rebalancing -> Active` is the transient executor loop;
/// `Active -> Unstaking -> Removed` is the one-way exit path. Everything
/// else is rejected. The emergency path uses `PositionLedger::force_unstake`
/// which deliberately bypasses this table for `Rebalancing` positions.
pub fn is_valid_transition(from: PositionStatus, to: PositionStatus) -> bool {
    use PositionStatus::*;
    matches!(
        (from, to),
        (Active, Rebalancing) | (Rebalancing, Active) | (Active, Unstaking) | (Unstaking, Removed)
    )
}

pub fn is_terminal(status: PositionStatus) -> bool {
    status == PositionStatus::Removed
}
