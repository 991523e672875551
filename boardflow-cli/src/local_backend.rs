//! File-writing TaskBackend for demos and manual testing.
//!
//! Plays the authoritative store: every write call re-reads the board file,
//! applies the change, and writes it back. Failures can be injected per call
//! kind to demonstrate the reconciler's rollback end to end.

use anyhow::{bail, Result};
use boardflow_sync::TaskBackend;
use std::path::PathBuf;

use crate::board_file::{read_board, write_board};

#[derive(Debug, Clone)]
pub struct LocalBackend {
    path: PathBuf,
    fail_status: bool,
    fail_order_for: Option<String>,
}

impl LocalBackend {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            fail_status: false,
            fail_order_for: None,
        }
    }

    /// Reject every status-change call.
    pub fn with_status_failure(mut self) -> Self {
        self.fail_status = true;
        self
    }

    /// Reject order persistence for one group.
    pub fn with_order_failure(mut self, group_id: impl Into<String>) -> Self {
        self.fail_order_for = Some(group_id.into());
        self
    }
}

impl TaskBackend for LocalBackend {
    async fn update_task_status(&self, task_id: &str, new_status_id: &str) -> Result<()> {
        if self.fail_status {
            bail!("injected failure: status update refused");
        }

        let mut board = read_board(&self.path)?;
        let Some(task) = board.tasks.iter_mut().find(|t| t.id == task_id) else {
            bail!("unknown task {task_id}");
        };
        task.status_id = new_status_id.to_string();
        write_board(&self.path, &board)
    }

    async fn persist_order(&self, group_id: &str, ordered_task_ids: &[String]) -> Result<()> {
        if self.fail_order_for.as_deref() == Some(group_id) {
            bail!("injected failure: order persistence refused for {group_id}");
        }

        let mut board = read_board(&self.path)?;

        // Group members keep their slots in the flat list; only their
        // relative order changes, so the rest of the list is untouched.
        let slots: Vec<usize> = board
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.status_id == group_id)
            .map(|(i, _)| i)
            .collect();
        if slots.len() != ordered_task_ids.len() {
            bail!(
                "order for {group_id} lists {} tasks but the store holds {}",
                ordered_task_ids.len(),
                slots.len()
            );
        }

        let mut reordered = Vec::with_capacity(slots.len());
        for id in ordered_task_ids {
            let Some(task) = board.tasks.iter().find(|t| &t.id == id) else {
                bail!("order for {group_id} names unknown task {id}");
            };
            if task.status_id != group_id {
                bail!("task {id} is not in group {group_id}");
            }
            reordered.push(task.clone());
        }
        for (slot, task) in slots.into_iter().zip(reordered) {
            board.tasks[slot] = task;
        }

        write_board(&self.path, &board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_file::BoardFile;
    use boardflow_core::{Status, Task};

    fn temp_board() -> (tempfile::TempDir, PathBuf, LocalBackend) {
        let board = BoardFile {
            space_id: "sp".to_string(),
            list_id: "li".to_string(),
            statuses: vec![Status::new("open", "Open", 0), Status::new("done", "Done", 1)],
            tasks: vec![
                Task::new("a", "a", "open"),
                Task::new("b", "b", "open"),
                Task::new("c", "c", "done"),
            ],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        write_board(&path, &board).unwrap();
        let backend = LocalBackend::new(path.clone());
        (dir, path, backend)
    }

    #[tokio::test]
    async fn status_update_rewrites_the_file() {
        let (_dir, path, backend) = temp_board();

        backend.update_task_status("a", "done").await.unwrap();

        let board = read_board(&path).unwrap();
        let a = board.tasks.iter().find(|t| t.id == "a").unwrap();
        assert_eq!(a.status_id, "done");
    }

    #[tokio::test]
    async fn persist_order_reorders_within_group_only() {
        let (_dir, path, backend) = temp_board();

        backend
            .persist_order("open", &["b".to_string(), "a".to_string()])
            .await
            .unwrap();

        let board = read_board(&path).unwrap();
        let flat: Vec<&str> = board.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(flat, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn injected_failures_reject() {
        let (_dir, _path, backend) = temp_board();
        let failing = backend.clone().with_status_failure();

        assert!(failing.update_task_status("a", "done").await.is_err());

        let failing_order = backend.with_order_failure("open");
        assert!(failing_order
            .persist_order("open", &["b".to_string(), "a".to_string()])
            .await
            .is_err());
    }

    #[tokio::test]
    async fn stale_order_list_is_rejected() {
        let (_dir, _path, backend) = temp_board();

        // Only lists one of the two open tasks.
        let res = backend.persist_order("open", &["a".to_string()]).await;
        assert!(res.is_err());
    }
}
