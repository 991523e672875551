//! boardflow-sync: optimistic synchronization for board moves.
//!
//! Takes the pure moves planned by boardflow-core and reconciles them with
//! an authoritative backend: snapshot, optimistic apply, asynchronous
//! dispatch, cache invalidation on success, rollback on failure.

pub mod backend;
pub mod cache;
pub mod error;
pub mod mutator;

pub use backend::TaskBackend;
pub use cache::{BoardScope, CacheKey, CacheLayer, GROUP_ORDER_OP, TASK_LIST_OP};
pub use error::{Step, SyncError};
pub use mutator::{PendingMove, ReconcileOutcome, Reconciler};
