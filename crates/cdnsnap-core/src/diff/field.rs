//! Schema-agnostic diff of two flat records.

use crate::diff::sink::{DiagnosticSink, NoopDiagnosticSink};
use crate::diff::value::{compare_diffable, DiffValue, Diffable};
use crate::errors::ExError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A flat record of field name to primitive value.
pub type Record = BTreeMap<String, Diffable>;

/// A collection of differences between two records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    /// Every field that exists in either the current or the pending record
    pub fields: BTreeMap<String, DiffValue<Diffable>>,
    /// Number of fields whose values differ
    pub num: usize,
}

impl FieldDiff {
    pub fn get(&self, field: &str) -> Option<&DiffValue<Diffable>> {
        self.fields.get(field)
    }

    /// True when no field differs
    pub fn is_unchanged(&self) -> bool {
        self.num == 0
    }

    /// Fields whose two sides differ, in field-name order.
    ///
    /// Pairs the comparator refused to order are not included.
    pub fn changed_fields(&self) -> impl Iterator<Item = (&str, &DiffValue<Diffable>)> + '_ {
        self.fields
            .iter()
            .filter(|(name, value)| {
                sides_differ(
                    name,
                    value.old_value.as_ref(),
                    value.new_value.as_ref(),
                    &NoopDiagnosticSink,
                )
            })
            .map(|(name, value)| (name.as_str(), value))
    }
}

/// Decide whether two sides of one field differ.
///
/// Values the comparator refuses to order are reported to `sink` and count
/// as equal.
pub(crate) fn sides_differ(
    field: &str,
    old_value: Option<&Diffable>,
    new_value: Option<&Diffable>,
    sink: &dyn DiagnosticSink,
) -> bool {
    match (old_value, new_value) {
        (Some(old), Some(new)) => match compare_diffable(old, new) {
            Ok(ordering) => ordering != Ordering::Equal,
            Err(err) => {
                let err = ExError::from(err).with_op("build_diff").with_field(field);
                sink.comparison_failed(field, &err);
                false
            }
        },
        (None, None) => false,
        _ => true,
    }
}

/// Build the differences between two records.
///
/// Values from `current` become `old_value`s and values from `pending`
/// become `new_value`s. The field set is the union of both key sets; a field
/// present on one side only has the other side absent.
pub fn build_diff(current: &Record, pending: &Record, sink: &dyn DiagnosticSink) -> FieldDiff {
    let mut diff = FieldDiff::default();

    for (name, old_value) in current {
        let new_value = pending.get(name);
        if sides_differ(name, Some(old_value), new_value, sink) {
            diff.num += 1;
        }
        diff.fields.insert(
            name.clone(),
            DiffValue {
                new_value: new_value.cloned(),
                old_value: Some(old_value.clone()),
            },
        );
    }

    for (name, new_value) in pending {
        if !current.contains_key(name) {
            diff.num += 1;
            diff.fields
                .insert(name.clone(), DiffValue::added(new_value.clone()));
        }
    }

    diff
}
