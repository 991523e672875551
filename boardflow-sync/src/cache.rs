//! Cache key and invalidation contract.
//!
//! The engine consumes the cache layer, it does not own one: after a
//! successful reconciliation it marks the scoping keys of every group it
//! touched as stale, and the excluded data-fetching layer refetches. Keys
//! address a scope (space + list + filters), never individual task ids, and
//! invalidating one group's key says nothing about any other group's key.

use serde::{Deserialize, Serialize};

/// Operation name for a whole-list task query.
pub const TASK_LIST_OP: &str = "tasks.by_list";
/// Operation name for a single group's ordering query.
pub const GROUP_ORDER_OP: &str = "tasks.group_order";

/// The list/space context a board is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoardScope {
    pub space_id: String,
    pub list_id: String,
}

impl BoardScope {
    pub fn new(space_id: impl Into<String>, list_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            list_id: list_id.into(),
        }
    }
}

/// `(operation, scope, filters)`: the full address of one cached query.
///
/// Filters are normalized (sorted by key) on construction so two views with
/// the same filter set in different order produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub operation: String,
    pub scope: BoardScope,
    pub filters: Vec<(String, String)>,
}

impl CacheKey {
    pub fn new(operation: &str, scope: BoardScope, mut filters: Vec<(String, String)>) -> Self {
        filters.sort();
        Self {
            operation: operation.to_string(),
            scope,
            filters,
        }
    }

    /// Key of the whole-list task query for `scope` under `filters`.
    pub fn task_list(scope: BoardScope, filters: Vec<(String, String)>) -> Self {
        Self::new(TASK_LIST_OP, scope, filters)
    }

    /// Key of a single group's ordering query.
    pub fn group_order(scope: BoardScope, group_id: &str) -> Self {
        Self::new(
            GROUP_ORDER_OP,
            scope,
            vec![("group".to_string(), group_id.to_string())],
        )
    }
}

/// The one thing the engine asks of the query layer.
pub trait CacheLayer {
    fn invalidate(&self, key: &CacheKey);
}

impl<C: CacheLayer> CacheLayer for &C {
    fn invalidate(&self, key: &CacheKey) {
        (**self).invalidate(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_are_normalized() {
        let scope = BoardScope::new("sp1", "li1");
        let a = CacheKey::task_list(
            scope.clone(),
            vec![
                ("assignee".to_string(), "me".to_string()),
                ("archived".to_string(), "false".to_string()),
            ],
        );
        let b = CacheKey::task_list(
            scope,
            vec![
                ("archived".to_string(), "false".to_string()),
                ("assignee".to_string(), "me".to_string()),
            ],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn group_keys_are_distinct_per_group() {
        let scope = BoardScope::new("sp1", "li1");
        let open = CacheKey::group_order(scope.clone(), "open");
        let done = CacheKey::group_order(scope, "done");
        assert_ne!(open, done);
    }

    #[test]
    fn list_and_group_keys_do_not_collide() {
        let scope = BoardScope::new("sp1", "li1");
        assert_ne!(
            CacheKey::task_list(scope.clone(), vec![]),
            CacheKey::group_order(scope, "open")
        );
    }
}
