//! Reconciliation error taxonomy.
//!
//! Planning problems never reach this type: a stale or malformed drop is a
//! silent no-op. What can fail is the network dispatch, and callers need to
//! tell a clean failure (nothing reached the server) from a partial one
//! (some calls landed, the server now diverges from the rolled-back client
//! until the next refetch).

use thiserror::Error;

/// A dispatched call that completed before a later one failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    StatusUpdate { task_id: String },
    OrderPersist { group_id: String },
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("status update for task {task_id} failed (correlation {correlation_id}): {cause}")]
    StatusUpdate {
        task_id: String,
        correlation_id: u64,
        completed: Vec<Step>,
        cause: anyhow::Error,
    },

    #[error("order persistence for group {group_id} failed (correlation {correlation_id}): {cause}")]
    OrderPersist {
        group_id: String,
        correlation_id: u64,
        completed: Vec<Step>,
        cause: anyhow::Error,
    },
}

impl SyncError {
    pub fn correlation_id(&self) -> u64 {
        match self {
            SyncError::StatusUpdate { correlation_id, .. }
            | SyncError::OrderPersist { correlation_id, .. } => *correlation_id,
        }
    }

    /// Calls that had already succeeded when this error occurred.
    pub fn completed_steps(&self) -> &[Step] {
        match self {
            SyncError::StatusUpdate { completed, .. }
            | SyncError::OrderPersist { completed, .. } => completed,
        }
    }

    /// True when the server holds part of the change the client rolled back.
    pub fn is_partial(&self) -> bool {
        !self.completed_steps().is_empty()
    }
}
