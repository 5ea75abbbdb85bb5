//! Declarative validation of JSON documents
//!
//! Rules are attached to dotted field paths and checked against a
//! `serde_json::Value`. The same rules back the server's create/update
//! checks and the client's pre-submit check.

pub mod validators;

use crate::core::error::{FieldViolation, ValidationError};
use serde_json::Value;
use validators::Validator;

/// An ordered set of field rules
#[derive(Default)]
pub struct ValidationRules {
    rules: Vec<(&'static str, Validator)>,
}

impl ValidationRules {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Attach a validator to a dotted field path
    pub fn field<F>(mut self, path: &'static str, validator: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rules.push((path, Box::new(validator)));
        self
    }

    /// Run every rule, collecting all violations
    pub fn check(&self, document: &Value) -> Vec<FieldViolation> {
        self.rules
            .iter()
            .filter_map(|(path, validator)| {
                let value = lookup(document, path).unwrap_or(&Value::Null);
                validator(path, value).err().map(|message| FieldViolation {
                    field: path.to_string(),
                    message,
                })
            })
            .collect()
    }

    /// Run every rule and fail with all violations if any
    pub fn validate(&self, document: &Value) -> Result<(), ValidationError> {
        let violations = self.check(document);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(violations))
        }
    }
}

/// Resolve a dotted path (`"vendor.name"`) inside a JSON object
pub fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

#[cfg(test)]
mod tests {
    use super::validators::required_text;
    use super::*;
    use serde_json::json;

    fn rules() -> ValidationRules {
        ValidationRules::new()
            .field("vendor.name", required_text())
            .field("invoice.number", required_text())
    }

    #[test]
    fn test_lookup_nested() {
        let doc = json!({ "vendor": { "name": "Acme" } });
        assert_eq!(lookup(&doc, "vendor.name"), Some(&json!("Acme")));
        assert_eq!(lookup(&doc, "vendor.address"), None);
        assert_eq!(lookup(&doc, "invoice.number"), None);
    }

    #[test]
    fn test_valid_document() {
        let doc = json!({ "vendor": { "name": "Acme" }, "invoice": { "number": "INV-1" } });
        assert!(rules().validate(&doc).is_ok());
    }

    #[test]
    fn test_collects_every_violation_in_order() {
        let doc = json!({ "vendor": { "name": "" } });
        let violations = rules().check(&doc);
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["vendor.name", "invoice.number"]);
    }
}
