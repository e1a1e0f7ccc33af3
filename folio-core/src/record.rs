//! Raw records as delivered by the host API.
//!
//! The host makes no promise about field presence or naming, so a record is
//! kept as plain JSON and only probed through the accessors below.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A loosely-typed transaction or position object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Value);

pub type RawTransaction = RawRecord;
pub type RawPosition = RawRecord;

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Top-level field, whatever its value. Non-object records have no fields.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Top-level field, only if it holds a present value.
    pub fn present(&self, name: &str) -> Option<&Value> {
        self.field(name).filter(|v| is_present(v))
    }

    /// `parent.name`, only when `parent` is an object and the value is present.
    pub fn nested(&self, parent: &str, name: &str) -> Option<&Value> {
        self.field(parent)
            .filter(|p| p.is_object())
            .and_then(|p| p.get(name))
            .filter(|v| is_present(v))
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Presence test used by every field fallback chain.
///
/// `null`, `false`, `0`, `NaN` and `""` count as absent. Everything else,
/// including empty arrays and objects, counts as present.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
