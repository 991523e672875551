//! Optimistic local store: applies a planned transaction synchronously.
//!
//! `apply` never mutates its input. It builds a fresh GroupIndex so a
//! snapshot of the previous one stays a valid, independent rollback value
//! while the network catches up.

use crate::group_index::GroupIndex;
use crate::planner::Transaction;
use serde::{Deserialize, Serialize};

/// Status reassignment implied by a cross-group move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub task_id: String,
    pub new_status_id: String,
}

/// Result of applying one transaction: the new index plus everything the
/// reconciler needs to send.
///
/// `source_order` is present only for cross-group moves: pulling a task out
/// of the middle of a sequence reindexes every task after it, so the source
/// group's order must be re-persisted too.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMove {
    pub index: GroupIndex,
    pub dest_order: Vec<String>,
    pub source_order: Option<Vec<String>>,
    pub status_change: Option<StatusChange>,
}

/// Apply `txn` to `index`, producing a new index and the reconciliation
/// payloads.
///
/// `txn` must have been produced by [`crate::planner::plan`] against this
/// same index; the planner has already validated groups and bounds, so a
/// miss here is a programmer error, not a recoverable condition.
pub fn apply(index: &GroupIndex, txn: &Transaction) -> AppliedMove {
    let mut next = index.clone();

    let mut task = {
        let source = next
            .group_mut(&txn.source_group)
            .expect("planned transaction references a known source group");
        source.tasks.remove(txn.source_index)
    };

    let status_change = if txn.is_cross_group() {
        task.status_id = txn.dest_group.clone();
        Some(StatusChange {
            task_id: task.id.clone(),
            new_status_id: txn.dest_group.clone(),
        })
    } else {
        None
    };

    let dest = next
        .group_mut(&txn.dest_group)
        .expect("planned transaction references a known destination group");
    dest.tasks.insert(txn.dest_index, task);

    let dest_order = next
        .group(&txn.dest_group)
        .map(|g| g.ordered_ids())
        .unwrap_or_default();
    let source_order = txn
        .is_cross_group()
        .then(|| {
            next.group(&txn.source_group)
                .map(|g| g.ordered_ids())
                .unwrap_or_default()
        });

    AppliedMove {
        index: next,
        dest_order,
        source_order,
        status_change,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group_index::GroupIndex;
    use crate::planner::{plan, DropEvent, DropSlot};
    use crate::task::{Status, Task};

    fn board(open: &[&str], done: &[&str]) -> GroupIndex {
        let statuses = vec![Status::new("open", "Open", 0), Status::new("done", "Done", 1)];
        let tasks: Vec<Task> = open
            .iter()
            .map(|id| Task::new(*id, *id, "open"))
            .chain(done.iter().map(|id| Task::new(*id, *id, "done")))
            .collect();
        GroupIndex::build(&tasks, &statuses)
    }

    fn move_task(index: &GroupIndex, from: (&str, usize), to: (&str, usize)) -> AppliedMove {
        let event = DropEvent::new(DropSlot::new(from.0, from.1), DropSlot::new(to.0, to.1));
        let txn = plan(index, &event).expect("move should not be a no-op");
        apply(index, &txn)
    }

    #[test]
    fn same_group_reorder() {
        let index = board(&["a", "b", "c"], &[]);
        let applied = move_task(&index, ("open", 1), ("open", 0));

        assert_eq!(applied.index.group("open").unwrap().ordered_ids(), vec!["b", "a", "c"]);
        assert_eq!(applied.dest_order, vec!["b", "a", "c"]);
        assert_eq!(applied.source_order, None);
        assert_eq!(applied.status_change, None);
    }

    #[test]
    fn cross_group_move_reassigns_status_and_reports_both_orders() {
        let index = board(&["a", "b"], &["c"]);
        let applied = move_task(&index, ("open", 0), ("done", 1));

        assert_eq!(applied.index.group("open").unwrap().ordered_ids(), vec!["b"]);
        assert_eq!(applied.index.group("done").unwrap().ordered_ids(), vec!["c", "a"]);

        let moved = &applied.index.group("done").unwrap().tasks[1];
        assert_eq!(moved.status_id, "done");

        assert_eq!(applied.dest_order, vec!["c", "a"]);
        assert_eq!(applied.source_order, Some(vec!["b".to_string()]));
        assert_eq!(
            applied.status_change,
            Some(StatusChange {
                task_id: "a".to_string(),
                new_status_id: "done".to_string(),
            })
        );
    }

    #[test]
    fn apply_leaves_the_input_index_untouched() {
        let index = board(&["a", "b"], &["c"]);
        let before = index.clone();

        let _ = move_task(&index, ("open", 0), ("done", 0));

        assert_eq!(index, before);
    }

    #[test]
    fn move_there_and_back_restores_original() {
        let index = board(&["a", "b", "c", "d"], &[]);

        let forward = move_task(&index, ("open", 1), ("open", 3));
        let back = move_task(&forward.index, ("open", 3), ("open", 1));

        assert_eq!(back.index, index);
    }

    #[test]
    fn task_count_is_conserved() {
        let index = board(&["a", "b"], &["c"]);

        let same = move_task(&index, ("open", 0), ("open", 1));
        assert_eq!(same.index.task_count(), index.task_count());

        let cross = move_task(&index, ("open", 0), ("done", 0));
        assert_eq!(cross.index.task_count(), index.task_count());
    }

    #[test]
    fn subtasks_reorder_like_ordinary_tasks() {
        use chrono::{TimeZone, Utc};

        let statuses = vec![
            Status::new("open", "Open", 0).with_color("#d3d3d3"),
            Status::new("done", "Done", 1).with_color("#6bc950"),
        ];
        let due = Utc.with_ymd_and_hms(2026, 9, 1, 17, 0, 0).unwrap();
        let tasks = vec![
            Task::new("parent", "epic", "open").with_due_date(due),
            Task::new("child", "step one", "open").with_parent("parent"),
            Task::new("shipped", "released", "done"),
        ];
        let index = GroupIndex::build(&tasks, &statuses);

        // Moving the subtask is just a move; the parent link rides along.
        let applied = move_task(&index, ("open", 1), ("done", 0));

        assert_eq!(applied.index.group("done").unwrap().ordered_ids(), vec!["child", "shipped"]);
        let child = &applied.index.group("done").unwrap().tasks[0];
        assert_eq!(child.parent_id.as_deref(), Some("parent"));
        assert_eq!(child.status_id, "done");

        // The parent itself is untouched.
        let parent = &applied.index.group("open").unwrap().tasks[0];
        assert_eq!(parent.due_date, Some(due));
    }

    #[test]
    fn membership_invariant_holds_after_cross_group_move() {
        let index = board(&["a", "b"], &["c"]);
        let applied = move_task(&index, ("open", 1), ("done", 0));

        for id in ["a", "b", "c"] {
            let homes = applied
                .index
                .groups()
                .iter()
                .filter(|g| g.tasks.iter().any(|t| t.id == id))
                .count();
            assert_eq!(homes, 1, "task {id} must live in exactly one group");
        }
    }
}
