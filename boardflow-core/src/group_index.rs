//! GroupIndex: the derived, per-status view of a flat task collection.
//!
//! The index is disposable by design: the source of truth is always the
//! repository's flat task list plus each task's `status_id`. Rebuild it on
//! every render; never persist it.
//!
//! Invariants the builder guarantees:
//! - a task id appears in exactly one group's sequence;
//! - sequences contain no duplicates;
//! - relative task order within a group matches the input order (callers
//!   supply tasks in backend-canonical order);
//! - tasks whose status id is unknown are omitted everywhere and logged.
//!   Omitting an orphan beats rendering it twice.

use crate::task::{Status, StatusKind, Task};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One status column together with its ordered task sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusGroup {
    pub status: Status,
    pub tasks: Vec<Task>,
}

impl StatusGroup {
    /// Ordered task ids, the shape order-persistence calls want.
    pub fn ordered_ids(&self) -> Vec<String> {
        self.tasks.iter().map(|t| t.id.clone()).collect()
    }
}

/// Ordered mapping from status to its task sequence.
///
/// Groups keep the display order of the `statuses` slice they were built
/// from. Structural equality (`PartialEq`) is what rollback is checked
/// against, so `Clone` must produce a fully independent value (it does;
/// there is no interior sharing).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupIndex {
    groups: Vec<StatusGroup>,
}

impl GroupIndex {
    /// Partition `tasks` into per-status sequences.
    ///
    /// `statuses` must already be in display order (ascending `orderindex`);
    /// this function does not sort. Pure aside from a warn for orphans, so
    /// it is safe to call on every render.
    pub fn build(tasks: &[Task], statuses: &[Status]) -> Self {
        let known: HashSet<&str> = statuses.iter().map(|s| s.id.as_str()).collect();

        for task in tasks {
            if !known.contains(task.status_id.as_str()) {
                log::warn!(
                    "task {} references unknown status {}; omitting from board",
                    task.id,
                    task.status_id
                );
            }
        }

        let groups = statuses
            .iter()
            .map(|status| StatusGroup {
                status: status.clone(),
                tasks: tasks
                    .iter()
                    .filter(|t| t.status_id == status.id)
                    .cloned()
                    .collect(),
            })
            .collect();

        Self { groups }
    }

    pub fn groups(&self) -> &[StatusGroup] {
        &self.groups
    }

    pub fn group(&self, status_id: &str) -> Option<&StatusGroup> {
        self.groups.iter().find(|g| g.status.id == status_id)
    }

    pub(crate) fn group_mut(&mut self, status_id: &str) -> Option<&mut StatusGroup> {
        self.groups.iter_mut().find(|g| g.status.id == status_id)
    }

    /// Locate a task: `(group id, index within group)`.
    pub fn find_task(&self, task_id: &str) -> Option<(&str, usize)> {
        self.groups.iter().find_map(|g| {
            g.tasks
                .iter()
                .position(|t| t.id == task_id)
                .map(|i| (g.status.id.as_str(), i))
        })
    }

    pub fn contains_task(&self, task_id: &str) -> bool {
        self.find_task(task_id).is_some()
    }

    /// Total tasks across all groups.
    pub fn task_count(&self) -> usize {
        self.groups.iter().map(|g| g.tasks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.task_count() == 0
    }

    /// Per-group counts plus a completion ratio, for headers and summaries.
    pub fn summary(&self) -> BoardSummary {
        let per_group = self
            .groups
            .iter()
            .map(|g| GroupCount {
                status_id: g.status.id.clone(),
                status_name: g.status.name.clone(),
                count: g.tasks.len(),
            })
            .collect();

        let total = self.task_count();
        let done = self
            .groups
            .iter()
            .filter(|g| matches!(g.status.kind, StatusKind::Done | StatusKind::Closed))
            .map(|g| g.tasks.len())
            .sum::<usize>();

        BoardSummary {
            per_group,
            total,
            done_ratio: if total == 0 {
                0.0
            } else {
                done as f64 / total as f64
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCount {
    pub status_id: String,
    pub status_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub per_group: Vec<GroupCount>,
    pub total: usize,
    pub done_ratio: f64,
}
