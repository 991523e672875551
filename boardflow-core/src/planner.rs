//! Drag transaction planner: turns a raw drop event into the minimal move.
//!
//! The planner is pure and fails closed. Anything it cannot validate against
//! the current (possibly stale) GroupIndex becomes a no-op rather than a
//! guessed position; the caller is expected to force a cache refresh when
//! that happens.

use crate::group_index::GroupIndex;
use serde::{Deserialize, Serialize};

/// A position on the board: which group, which index within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropSlot {
    pub group_id: String,
    pub index: usize,
}

impl DropSlot {
    pub fn new(group_id: impl Into<String>, index: usize) -> Self {
        Self {
            group_id: group_id.into(),
            index,
        }
    }
}

/// What the gesture layer reports when a drag ends.
///
/// `destination` is `None` when the card was released outside any drop
/// target (drag cancelled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropEvent {
    pub source: DropSlot,
    pub destination: Option<DropSlot>,
}

impl DropEvent {
    pub fn new(source: DropSlot, destination: DropSlot) -> Self {
        Self {
            source,
            destination: Some(destination),
        }
    }

    pub fn cancelled(source: DropSlot) -> Self {
        Self {
            source,
            destination: None,
        }
    }
}

/// The resolved effect of one drop: which task moves where.
///
/// Ephemeral value: created here, consumed once by the optimistic store,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub task_id: String,
    pub source_group: String,
    pub source_index: usize,
    pub dest_group: String,
    pub dest_index: usize,
}

impl Transaction {
    pub fn is_cross_group(&self) -> bool {
        self.source_group != self.dest_group
    }
}

/// Plan the move a drop event implies. `None` means no-op: nothing to apply,
/// nothing to send.
///
/// No-op cases:
/// - cancelled drag (no destination);
/// - dropped back on its own slot;
/// - stale coordinates: unknown source/destination group, or a source index
///   past the end of the source sequence (a concurrent update already moved
///   or removed the task).
///
/// A destination index past the end of the destination sequence is not
/// stale, just the everyday "dropped below the last card" gesture, and is
/// clamped to append.
pub fn plan(index: &GroupIndex, event: &DropEvent) -> Option<Transaction> {
    let dest = event.destination.as_ref()?;
    let source = &event.source;

    if source.group_id == dest.group_id && source.index == dest.index {
        return None;
    }

    let Some(source_group) = index.group(&source.group_id) else {
        log::warn!("drop from unknown group {}; ignoring", source.group_id);
        return None;
    };
    let Some(dest_group) = index.group(&dest.group_id) else {
        log::warn!("drop into unknown group {}; ignoring", dest.group_id);
        return None;
    };

    let Some(task) = source_group.tasks.get(source.index) else {
        log::warn!(
            "stale drop: {}[{}] is out of bounds (len {}); ignoring",
            source.group_id,
            source.index,
            source_group.tasks.len()
        );
        return None;
    };

    // Clamp: for a same-group move the task itself leaves the sequence
    // first, so the largest landing index is len - 1; cross-group it is len.
    let max_dest = if source.group_id == dest.group_id {
        dest_group.tasks.len().saturating_sub(1)
    } else {
        dest_group.tasks.len()
    };
    let dest_index = dest.index.min(max_dest);

    if source.group_id == dest.group_id && source.index == dest_index {
        return None;
    }

    Some(Transaction {
        task_id: task.id.clone(),
        source_group: source.group_id.clone(),
        source_index: source.index,
        dest_group: dest.group_id.clone(),
        dest_index,
    })
}
