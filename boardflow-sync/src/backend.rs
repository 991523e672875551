//! Backend seam: the two write operations the engine needs from the server.
//!
//! The server is an opaque authoritative store reachable only through
//! request/response calls that can reject. Real adapters (HTTP, local file)
//! live in other crates; tests use hand-rolled fakes.

use anyhow::Result;

/// Write surface of the authoritative task store.
///
/// Both operations replace server state wholesale: `persist_order` sends a
/// group's entire ordered id list, there is no per-task rank patch. The
/// server remains the final arbiter of order; what the client persisted is a
/// prediction until the next read.
pub trait TaskBackend {
    /// Reassign a task to a new status group.
    async fn update_task_status(&self, task_id: &str, new_status_id: &str) -> Result<()>;

    /// Replace a group's task ordering with `ordered_task_ids`.
    async fn persist_order(&self, group_id: &str, ordered_task_ids: &[String]) -> Result<()>;
}

impl<B: TaskBackend> TaskBackend for &B {
    async fn update_task_status(&self, task_id: &str, new_status_id: &str) -> Result<()> {
        (**self).update_task_status(task_id, new_status_id).await
    }

    async fn persist_order(&self, group_id: &str, ordered_task_ids: &[String]) -> Result<()> {
        (**self).persist_order(group_id, ordered_task_ids).await
    }
}
