//! Reconciliation of two hostname-keyed entity maps.
//!
//! Routers and servers share one classification pass; only the per-entity
//! differ differs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// The differences between two definitions of the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDiff<D> {
    /// Whether there is any difference between the two
    pub changed: bool,
    pub diff: D,
}

/// Summary of the differences between two sets of entities.
///
/// `changes` is always `changed.len() + deleted.len() + new.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySetDiff<E, D> {
    pub changed: Vec<D>,
    pub changes: usize,
    pub deleted: Vec<E>,
    pub new: Vec<E>,
    pub unchanged: Vec<E>,
}

impl<E, D> Default for EntitySetDiff<E, D> {
    fn default() -> Self {
        Self {
            changed: Vec::new(),
            changes: 0,
            deleted: Vec::new(),
            new: Vec::new(),
            unchanged: Vec::new(),
        }
    }
}

impl<E, D> EntitySetDiff<E, D> {
    pub fn has_changes(&self) -> bool {
        self.changes > 0
    }
}

/// Classify every hostname of `current` and `pending`.
///
/// Hostnames only in `current` are deleted, hostnames only in `pending` are
/// new, and hostnames in both are run through `differ`. Inputs are never
/// modified; classified entities are cloned into the result.
pub(crate) fn reconcile<E, D, F>(
    op: &'static str,
    current: &BTreeMap<String, E>,
    pending: &BTreeMap<String, E>,
    differ: F,
) -> EntitySetDiff<E, D>
where
    E: Clone,
    F: Fn(&str, &E, &E) -> EntityDiff<D>,
{
    let start = Instant::now();
    crate::log_op_start!(
        op,
        current_len = current.len(),
        pending_len = pending.len()
    );

    let mut diffs = EntitySetDiff::default();
    for (hostname, cur) in current {
        match pending.get(hostname) {
            None => {
                tracing::debug!(op, hostname = hostname.as_str(), "deleted");
                diffs.deleted.push(cur.clone());
            }
            Some(pen) => {
                let diff = differ(hostname, cur, pen);
                if diff.changed {
                    tracing::debug!(op, hostname = hostname.as_str(), "changed");
                    diffs.changed.push(diff.diff);
                } else {
                    tracing::trace!(op, hostname = hostname.as_str(), "unchanged");
                    diffs.unchanged.push(cur.clone());
                }
            }
        }
    }

    for (hostname, pen) in pending {
        if !current.contains_key(hostname) {
            tracing::debug!(op, hostname = hostname.as_str(), "new");
            diffs.new.push(pen.clone());
        }
    }

    diffs.changes = diffs.changed.len() + diffs.deleted.len() + diffs.new.len();

    crate::log_op_end!(
        op,
        duration_ms = start.elapsed().as_millis() as u64,
        changes = diffs.changes
    );
    diffs
}
