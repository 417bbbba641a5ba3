//! Parameter values and their canonical text form
//!
//! A parameter mapping binds string keys to JSON values. The map is ordered
//! (`BTreeMap`) so that every pass over it visits keys in the same order on
//! every run, which keeps template processing fully deterministic.

use serde_json::Value;
use std::collections::BTreeMap;

/// A named-parameter mapping. Values may be null, scalar or collection-valued.
pub type ParamMap = BTreeMap<String, Value>;

/// Render a value to the canonical text used everywhere a value meets
/// template text: value-gate literal matching and injection both go through
/// here, so the two features can never disagree on how a value is spelled.
///
/// Strings render without quotes, numbers and booleans in their natural
/// decimal/keyword form, null as `null`. Arrays and objects have no scalar
/// spelling; they fall back to their compact JSON rendering.
pub fn canonical_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
