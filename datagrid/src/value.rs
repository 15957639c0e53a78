use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use core::fmt;

use crate::RowId;

/// Display text for a missing or null value.
pub const PLACEHOLDER: &str = "-";

/// A data item as seen by the grid: an opaque record with an integer identity and named fields.
///
/// Nested records are exposed as [`CellValue::Record`], which lets columns address them with a
/// dot-separated key path (`"owner.address.city"`).
pub trait Row {
    fn id(&self) -> RowId;

    /// Returns the value of a top-level field, or `None` when the field does not exist.
    fn field(&self, name: &str) -> Option<CellValue<'_>>;
}

#[derive(Clone)]
pub enum CellValue<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Cow<'a, str>),
    Record(&'a dyn Row),
}

impl CellValue<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Plain display text. Nested records have no text form and render as the placeholder.
    pub fn to_text(&self) -> String {
        match self {
            Self::Null | Self::Record(_) => PLACEHOLDER.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(x) => x.to_string(),
            Self::Text(s) => s.to_string(),
        }
    }
}

impl fmt::Debug for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Record(r) => f.debug_tuple("Record").field(&r.id()).finish(),
        }
    }
}

/// Walks a dot-separated key path into `row`.
///
/// Returns `None` as soon as a segment is missing or null, or when an intermediate segment is
/// not a nested record.
pub fn lookup_path<'r, R: Row + ?Sized>(row: &'r R, path: &str) -> Option<CellValue<'r>> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut value = row.field(first)?;
    for segment in segments {
        let CellValue::Record(inner) = value else {
            return None;
        };
        value = inner.field(segment)?;
    }
    if value.is_null() { None } else { Some(value) }
}

/// Resolves a key path to display text, falling back to [`PLACEHOLDER`].
pub fn resolve_path<R: Row + ?Sized>(row: &R, path: &str) -> String {
    match lookup_path(row, path) {
        Some(value) => value.to_text(),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(feature = "json")]
mod json {
    use alloc::borrow::Cow;
    use alloc::string::{String, ToString};

    use serde_json::Value;

    use super::{CellValue, Row};
    use crate::RowId;

    /// JSON objects are rows; the identity is read from the `"id"` field (`0` when absent).
    impl Row for Value {
        fn id(&self) -> RowId {
            self.get("id").and_then(Value::as_u64).unwrap_or(0)
        }

        fn field(&self, name: &str) -> Option<CellValue<'_>> {
            let value = self.as_object()?.get(name)?;
            Some(match value {
                Value::Null => CellValue::Null,
                Value::Bool(b) => CellValue::Bool(*b),
                Value::Number(n) => match n.as_i64() {
                    Some(i) => CellValue::Int(i),
                    None => CellValue::Float(n.as_f64().unwrap_or(f64::NAN)),
                },
                Value::String(s) => CellValue::Text(Cow::Borrowed(s)),
                Value::Array(items) => {
                    let mut out = String::new();
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        match item {
                            Value::String(s) => out.push_str(s),
                            other => out.push_str(&other.to_string()),
                        }
                    }
                    CellValue::Text(Cow::Owned(out))
                }
                Value::Object(_) => CellValue::Record(value),
            })
        }
    }
}
