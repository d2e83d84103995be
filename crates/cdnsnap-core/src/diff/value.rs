//! Primitive values and the before/after pair used throughout the diff.

use crate::errors::{DiffError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A value that can be diffed field-by-field: a JSON primitive, never a
/// collection or object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Diffable {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl Diffable {
    /// Runtime type name, as reported in type-mismatch errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Diffable::Null => "null",
            Diffable::Bool(_) => "boolean",
            Diffable::Number(_) => "number",
            Diffable::String(_) => "string",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Diffable::Null)
    }
}

impl fmt::Display for Diffable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diffable::Null => f.write_str("null"),
            Diffable::Bool(b) => write!(f, "{}", b),
            Diffable::Number(n) => write!(f, "{}", n),
            Diffable::String(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<&str> for Diffable {
    fn from(value: &str) -> Self {
        Diffable::String(value.to_string())
    }
}

impl From<String> for Diffable {
    fn from(value: String) -> Self {
        Diffable::String(value)
    }
}

impl From<bool> for Diffable {
    fn from(value: bool) -> Self {
        Diffable::Bool(value)
    }
}

macro_rules! diffable_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Diffable {
                fn from(value: $t) -> Self {
                    Diffable::Number(value.into())
                }
            }
        )*
    };
}

diffable_from_int!(u8, u16, u32, u64, i32, i64);

impl From<f64> for Diffable {
    /// Non-finite floats have no JSON representation and become `Null`.
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Diffable::Number)
            .unwrap_or(Diffable::Null)
    }
}

impl<T: Into<Diffable>> From<Option<T>> for Diffable {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Diffable::Null)
    }
}

impl TryFrom<serde_json::Value> for Diffable {
    type Error = DiffError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Null => Ok(Diffable::Null),
            serde_json::Value::Bool(b) => Ok(Diffable::Bool(b)),
            serde_json::Value::Number(n) => Ok(Diffable::Number(n)),
            serde_json::Value::String(s) => Ok(Diffable::String(s)),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Err(DiffError::InvalidSnapshot {
                    reason: "only primitive JSON values can be diffed field-by-field".to_string(),
                })
            }
        }
    }
}

fn compare_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or_default();
    let y = b.as_f64().unwrap_or_default();
    x.total_cmp(&y)
}

/// Order two primitives.
///
/// `Null` sorts after every non-null value and two `Null`s are equal.
/// Numbers compare by value, so `1` and `1.0` are equal.
///
/// # Errors
///
/// `DiffError::TypeMismatch` when the two values are of different runtime
/// types (other than the `Null` cases above). Values are never coerced.
pub fn compare_diffable(a: &Diffable, b: &Diffable) -> Result<Ordering> {
    match (a, b) {
        (Diffable::Null, Diffable::Null) => Ok(Ordering::Equal),
        (Diffable::Null, _) => Ok(Ordering::Greater),
        (_, Diffable::Null) => Ok(Ordering::Less),
        (Diffable::Bool(x), Diffable::Bool(y)) => Ok(x.cmp(y)),
        (Diffable::Number(x), Diffable::Number(y)) => Ok(compare_numbers(x, y)),
        (Diffable::String(x), Diffable::String(y)) => Ok(x.cmp(y)),
        _ => Err(DiffError::TypeMismatch {
            left: a.type_name(),
            right: b.type_name(),
        }),
    }
}

/// A single difference in value.
///
/// A side is `None` when the field or element does not exist on that side.
/// An entity field absent from both definitions has both sides `None` and
/// is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffValue<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<T>,
}

impl<T> DiffValue<T> {
    /// A value present on both sides.
    pub fn both(old_value: T, new_value: T) -> Self {
        Self {
            new_value: Some(new_value),
            old_value: Some(old_value),
        }
    }

    /// A value that exists only in the pending side.
    pub fn added(new_value: T) -> Self {
        Self {
            new_value: Some(new_value),
            old_value: None,
        }
    }

    /// A value that exists only in the current side.
    pub fn removed(old_value: T) -> Self {
        Self {
            new_value: None,
            old_value: Some(old_value),
        }
    }

    /// Convert both sides into another representation.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> DiffValue<U> {
        DiffValue {
            new_value: self.new_value.map(&mut f),
            old_value: self.old_value.map(&mut f),
        }
    }
}

impl<T: PartialEq> DiffValue<T> {
    /// True when the two sides differ, including when only one side exists.
    pub fn is_changed(&self) -> bool {
        self.new_value != self.old_value
    }
}

/// Diff one optional entity field, folding inequality into `changed`.
///
/// A field present on one side only is a change.
pub(crate) fn diff_field<T: PartialEq + Clone>(
    current: &Option<T>,
    pending: &Option<T>,
    changed: &mut bool,
) -> DiffValue<T> {
    if current != pending {
        *changed = true;
    }
    DiffValue {
        new_value: pending.clone(),
        old_value: current.clone(),
    }
}
