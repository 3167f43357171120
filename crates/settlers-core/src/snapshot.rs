//! JSON snapshots of a game.

use crate::game::GameState;
use crate::invariants::InvariantViolation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted snapshot: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl GameState {
    /// Serialize the full state to compact JSON
    pub fn to_snapshot(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_snapshot_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore a state, rejecting anything that fails the consistency checks
    pub fn from_snapshot(json: &str) -> Result<Self, SnapshotError> {
        let state: GameState = serde_json::from_str(json)?;
        state.check_invariants()?;
        Ok(state)
    }
}
