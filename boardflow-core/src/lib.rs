//! boardflow-core: grouped task reordering engine.
//!
//! The pure half of the pipeline: partition a flat task collection into
//! ordered per-status groups, plan the effect of a drag-and-drop move, and
//! apply it to a fresh copy of local state. Network reconciliation lives in
//! boardflow-sync.

pub mod group_index;
pub mod planner;
pub mod store;
pub mod task;

pub use group_index::{BoardSummary, GroupCount, GroupIndex, StatusGroup};
pub use planner::{plan, DropEvent, DropSlot, Transaction};
pub use store::{apply, AppliedMove, StatusChange};
pub use task::{Status, StatusKind, Task};
