//! Reconciliation mutator: the optimistic-and-reconcile state machine.
//!
//! Per drop: `Idle -> Optimistic(snapshot) -> Reconciled | RolledBack`.
//!
//! `begin` is the synchronous half (plan, snapshot, apply) so the board
//! re-renders before any byte hits the wire. `reconcile` is the asynchronous
//! half: dispatch the status change and order persistence calls, then either
//! invalidate the touched cache keys (success) or hand back the snapshot
//! (failure). The only suspension points in the whole engine are the awaits
//! in `reconcile`.
//!
//! Drags are not serialized. Each `begin` captures its own snapshot, so two
//! in-flight reconciliations work on independently captured state; a later
//! drag applied on top of an earlier unconfirmed one inherits that earlier
//! prediction as its base. No automatic retry: a failed reconciliation needs
//! a fresh drag or an explicit refresh.

use std::sync::atomic::{AtomicU64, Ordering};

use boardflow_core::{apply, plan, AppliedMove, DropEvent, GroupIndex, Transaction};

use crate::backend::TaskBackend;
use crate::cache::{BoardScope, CacheKey, CacheLayer};
use crate::error::{Step, SyncError};

/// An optimistically applied move awaiting reconciliation.
///
/// Owns the pre-transaction snapshot for exactly as long as the network call
/// is in flight; `reconcile` consumes it and either drops the snapshot or
/// returns it.
#[derive(Debug)]
pub struct PendingMove {
    pub correlation_id: u64,
    pub transaction: Transaction,
    applied: AppliedMove,
    snapshot: GroupIndex,
}

impl PendingMove {
    /// The optimistic index: render from this immediately.
    pub fn index(&self) -> &GroupIndex {
        &self.applied.index
    }
}

/// Terminal state of one reconciliation.
#[derive(Debug)]
pub enum ReconcileOutcome {
    /// All calls landed; the listed keys were invalidated so the next read
    /// comes from the server.
    Reconciled {
        correlation_id: u64,
        invalidated: Vec<CacheKey>,
    },
    /// A call failed; `restored` is the pre-transaction snapshot the caller
    /// must render from, `error` is what to surface to the user.
    RolledBack {
        correlation_id: u64,
        restored: GroupIndex,
        error: SyncError,
    },
}

impl ReconcileOutcome {
    pub fn is_reconciled(&self) -> bool {
        matches!(self, ReconcileOutcome::Reconciled { .. })
    }
}

/// Ties the planner and store to a backend and cache layer for one board
/// scope.
pub struct Reconciler<B: TaskBackend, C: CacheLayer> {
    backend: B,
    cache: C,
    scope: BoardScope,
    filters: Vec<(String, String)>,
    correlation: AtomicU64,
}

impl<B: TaskBackend, C: CacheLayer> Reconciler<B, C> {
    pub fn new(backend: B, cache: C, scope: BoardScope) -> Self {
        Self {
            backend,
            cache,
            scope,
            filters: Vec::new(),
            correlation: AtomicU64::new(1),
        }
    }

    /// Scope cache keys to an active filter set (two filtered views of one
    /// list cache independently).
    pub fn with_filters(mut self, filters: Vec<(String, String)>) -> Self {
        self.filters = filters;
        self
    }

    /// Synchronous half: plan the drop and apply it optimistically.
    ///
    /// `None` means the drop was a no-op (cancelled, dropped in place, or
    /// stale coordinates): no state change and nothing to reconcile.
    pub fn begin(&self, index: &GroupIndex, event: &DropEvent) -> Option<PendingMove> {
        let transaction = plan(index, event)?;
        let correlation_id = self.correlation.fetch_add(1, Ordering::Relaxed);

        log::debug!(
            "begin correlation {}: move {} {}[{}] -> {}[{}]",
            correlation_id,
            transaction.task_id,
            transaction.source_group,
            transaction.source_index,
            transaction.dest_group,
            transaction.dest_index
        );

        let snapshot = index.clone();
        let applied = apply(index, &transaction);

        Some(PendingMove {
            correlation_id,
            transaction,
            applied,
            snapshot,
        })
    }

    /// Asynchronous half: dispatch the backend calls for `pending`.
    ///
    /// Calls go out sequentially in a fixed order: status change for cross-
    /// group moves, then destination order, then source order. A partial
    /// failure therefore always reports a deterministic completed-step list.
    /// There is no wire-level transaction tying them together: on partial
    /// failure the client rolls back wholesale while the server keeps the
    /// calls that landed, and the divergence stands until the next refetch.
    pub async fn reconcile(&self, pending: PendingMove) -> ReconcileOutcome {
        let PendingMove {
            correlation_id,
            transaction,
            applied,
            snapshot,
        } = pending;

        let mut completed: Vec<Step> = Vec::new();

        if let Some(change) = &applied.status_change {
            if let Err(source) = self
                .backend
                .update_task_status(&change.task_id, &change.new_status_id)
                .await
            {
                return self.rolled_back(
                    snapshot,
                    SyncError::StatusUpdate {
                        task_id: change.task_id.clone(),
                        correlation_id,
                        completed,
                        cause: source,
                    },
                );
            }
            completed.push(Step::StatusUpdate {
                task_id: change.task_id.clone(),
            });
        }

        if let Err(source) = self
            .backend
            .persist_order(&transaction.dest_group, &applied.dest_order)
            .await
        {
            return self.rolled_back(
                snapshot,
                SyncError::OrderPersist {
                    group_id: transaction.dest_group.clone(),
                    correlation_id,
                    completed,
                    cause: source,
                },
            );
        }
        completed.push(Step::OrderPersist {
            group_id: transaction.dest_group.clone(),
        });

        if let Some(source_order) = &applied.source_order {
            if let Err(source) = self
                .backend
                .persist_order(&transaction.source_group, source_order)
                .await
            {
                return self.rolled_back(
                    snapshot,
                    SyncError::OrderPersist {
                        group_id: transaction.source_group.clone(),
                        correlation_id,
                        completed,
                        cause: source,
                    },
                );
            }
        }

        let invalidated = self.touched_keys(&transaction);
        for key in &invalidated {
            self.cache.invalidate(key);
        }

        log::debug!(
            "correlation {} reconciled; {} cache keys invalidated",
            correlation_id,
            invalidated.len()
        );

        ReconcileOutcome::Reconciled {
            correlation_id,
            invalidated,
        }
    }

    fn rolled_back(&self, snapshot: GroupIndex, error: SyncError) -> ReconcileOutcome {
        log::warn!(
            "correlation {} rolled back ({} calls had landed): {}",
            error.correlation_id(),
            error.completed_steps().len(),
            error
        );
        ReconcileOutcome::RolledBack {
            correlation_id: error.correlation_id(),
            restored: snapshot,
            error,
        }
    }

    /// The scoping key plus one ordering key per touched group. Never assume
    /// one group's key covers another's.
    fn touched_keys(&self, transaction: &Transaction) -> Vec<CacheKey> {
        let mut keys = vec![
            CacheKey::task_list(self.scope.clone(), self.filters.clone()),
            CacheKey::group_order(self.scope.clone(), &transaction.dest_group),
        ];
        if transaction.is_cross_group() {
            keys.push(CacheKey::group_order(
                self.scope.clone(),
                &transaction.source_group,
            ));
        }
        keys
    }
}
