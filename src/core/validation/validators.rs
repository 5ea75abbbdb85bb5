//! Reusable field validators
//!
//! A validator receives the dotted field path and the field's JSON value
//! (`Value::Null` when the field is absent).

use serde_json::Value;

/// Boxed validator, as stored by [`super::ValidationRules`]
pub type Validator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Validator: field is a string with at least one non-whitespace character
pub fn required_text() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_field: &str, value: &Value| match value {
        Value::String(s) if !s.trim().is_empty() => Ok(()),
        Value::String(_) | Value::Null => Err("is required".to_string()),
        _ => Err("must be a string".to_string()),
    }
}
