//! Task and status model for the board reordering engine.
//!
//! Position is deliberately absent from `Task`: a task's place in its group
//! is its index in the group's ordered sequence, and the engine persists
//! whole sequences, never per-task ranks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow stage a status column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Open,
    InProgress,
    Done,
    Closed,
    Custom,
}

/// A status column: identity plus display metadata.
///
/// `orderindex` is the column's display position. Callers hand the engine
/// statuses already sorted by it; the engine never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: String,
    pub name: String,
    pub color: String,
    pub kind: StatusKind,
    pub orderindex: i32,
}

impl Status {
    pub fn new(id: impl Into<String>, name: impl Into<String>, orderindex: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: "#808080".to_string(),
            kind: StatusKind::Custom,
            orderindex,
        }
    }

    pub fn with_kind(mut self, kind: StatusKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Core task type.
///
/// Kept small and serializable; the server owns everything else about a task
/// (assignees, descriptions, custom fields) and this engine never touches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,

    /// Id of the status group this task currently belongs to.
    pub status_id: String,

    /// Subtasks carry their parent's id but reorder like any other task.
    pub parent_id: Option<String>,

    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status_id: status_id.into(),
            parent_id: None,
            due_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }
}
