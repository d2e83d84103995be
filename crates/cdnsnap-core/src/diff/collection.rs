//! Differs for homogeneous collections.
//!
//! JSON has no set type, so unordered collections arrive as arrays. The
//! caller picks the semantics: [`unordered_diff`] for sets such as server
//! capabilities, [`ordered_diff`] for sequences where position matters such
//! as consistent-hash assignment order.

use crate::diff::value::DiffValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Differences between two unordered collections.
///
/// The three sets are pairwise disjoint; `deleted ∪ unchanged` is the
/// current collection and `new ∪ unchanged` is the pending one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDiff<T: Ord> {
    pub deleted: BTreeSet<T>,
    pub new: BTreeSet<T>,
    pub unchanged: BTreeSet<T>,
}

impl<T: Ord> SetDiff<T> {
    /// True when either side has a member the other lacks
    pub fn is_changed(&self) -> bool {
        !self.deleted.is_empty() || !self.new.is_empty()
    }
}

impl<T: Ord> Default for SetDiff<T> {
    fn default() -> Self {
        Self {
            deleted: BTreeSet::new(),
            new: BTreeSet::new(),
            unchanged: BTreeSet::new(),
        }
    }
}

/// Differences between two ordered collections, aligned by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDiff<T> {
    /// One entry per index up to the longer length
    pub changes: Vec<DiffValue<T>>,
    /// True when any index differs or the lengths differ
    pub changed: bool,
}

/// Find the differences between two collections where order does not
/// matter. Duplicates on either side collapse.
pub fn unordered_diff<T: Ord + Clone>(current: &[T], pending: &[T]) -> SetDiff<T> {
    let mut diff = SetDiff {
        new: pending.iter().cloned().collect(),
        ..SetDiff::default()
    };
    for c in current {
        if diff.new.remove(c) || diff.unchanged.contains(c) {
            diff.unchanged.insert(c.clone());
        } else {
            diff.deleted.insert(c.clone());
        }
    }
    diff
}

/// Find the differences between two collections where order matters.
///
/// Indices present in both are paired; leftover elements of the longer
/// collection are reported with the other side absent and always mark the
/// diff as changed.
pub fn ordered_diff<T: PartialEq + Clone>(current: &[T], pending: &[T]) -> SequenceDiff<T> {
    let shared = current.len().min(pending.len());
    let mut changes = Vec::with_capacity(current.len().max(pending.len()));
    let mut changed = current.len() != pending.len();

    for (c, p) in current.iter().zip(pending) {
        if c != p {
            changed = true;
        }
        changes.push(DiffValue::both(c.clone(), p.clone()));
    }
    changes.extend(current[shared..].iter().cloned().map(DiffValue::removed));
    changes.extend(pending[shared..].iter().cloned().map(DiffValue::added));

    SequenceDiff { changes, changed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unordered_ignores_order() {
        let a = strings(&["foo", "bar", "test", "quest"]);
        let b = strings(&["fizz", "test", "quest", "buzz"]);

        let diff = unordered_diff(&a, &b);
        assert_eq!(diff.deleted, set(&["foo", "bar"]));
        assert_eq!(diff.new, set(&["fizz", "buzz"]));
        assert_eq!(diff.unchanged, set(&["test", "quest"]));
        assert!(diff.is_changed());
    }

    #[test]
    fn test_unordered_collapses_duplicates() {
        let a = strings(&["a", "a", "b"]);
        let b = strings(&["a", "c", "c"]);

        let diff = unordered_diff(&a, &b);
        assert_eq!(diff.deleted, set(&["b"]));
        assert_eq!(diff.new, set(&["c"]));
        assert_eq!(diff.unchanged, set(&["a"]));
    }

    #[test]
    fn test_unordered_empty() {
        let diff = unordered_diff::<String>(&[], &[]);
        assert_eq!(diff, SetDiff::default());
        assert!(!diff.is_changed());
    }

    #[test]
    fn test_ordered_considers_order() {
        let a = strings(&["foo", "bar", "test", "quest"]);
        let b = strings(&["fizz", "quest", "test", "buzz", "entirely new value"]);

        let diff = ordered_diff(&a, &b);
        assert!(diff.changed);
        assert_eq!(diff.changes.len(), 5);
        assert_eq!(
            diff.changes[0],
            DiffValue::both("foo".to_string(), "fizz".to_string())
        );
        assert_eq!(
            diff.changes[1],
            DiffValue::both("bar".to_string(), "quest".to_string())
        );
        assert!(!diff.changes[2].is_changed());
        assert_eq!(
            diff.changes[3],
            DiffValue::both("quest".to_string(), "buzz".to_string())
        );
        assert_eq!(
            diff.changes[4],
            DiffValue::added("entirely new value".to_string())
        );

        let same = ordered_diff(&a, &a);
        assert!(!same.changed);
        assert_eq!(same.changes.len(), a.len());
        for (i, change) in same.changes.iter().enumerate() {
            assert_eq!(change.new_value.as_ref(), Some(&a[i]));
            assert_eq!(change.old_value.as_ref(), Some(&a[i]));
        }
    }

    #[test]
    fn test_ordered_longer_current_reports_removals() {
        let a = strings(&["1", "2", "3", "4"]);
        let b = strings(&["1", "2"]);

        let diff = ordered_diff(&a, &b);
        assert!(diff.changed);
        assert_eq!(diff.changes.len(), 4);
        assert!(!diff.changes[0].is_changed());
        assert!(!diff.changes[1].is_changed());
        assert_eq!(diff.changes[2], DiffValue::removed("3".to_string()));
        assert_eq!(diff.changes[3], DiffValue::removed("4".to_string()));
    }

    #[test]
    fn test_ordered_prefix_is_a_change() {
        let diff = ordered_diff(&[1, 2], &[1, 2, 3]);
        assert!(diff.changed);
        assert_eq!(diff.changes[2], DiffValue::added(3));
    }
}
