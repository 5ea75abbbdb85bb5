//! The invoice document

use crate::core::entity::{Entity, Searchable};
use crate::core::error::{AppError, ValidationError};
use crate::core::validation::ValidationRules;
use crate::core::validation::validators::required_text;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Keys the store owns; they are ignored when they appear in a request body.
const SERVER_MANAGED_KEYS: &[&str] = &["id", "_id", "createdAt", "updatedAt"];

/// Seller block
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
}

/// Header block of the invoice itself
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetails {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub subtotal: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub tax_percent: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// One row of the invoice body
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub unit_price: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<f64>,
}

/// The user-editable part of an invoice (everything but id and timestamps)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceContent {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub file_id: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub file_name: String,
    #[serde(default)]
    pub vendor: Vendor,
    #[serde(default)]
    pub invoice: InvoiceDetails,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl InvoiceContent {
    /// Rules a document must satisfy before it is stored
    pub fn rules() -> ValidationRules {
        ValidationRules::new()
            .field("vendor.name", required_text())
            .field("invoice.number", required_text())
    }

    /// Parse a request body, ignoring server-managed keys
    pub fn from_payload(payload: Value) -> Result<Self, AppError> {
        let Value::Object(mut map) = payload else {
            return Err(ValidationError::InvalidPayload {
                message: "expected a JSON object".to_string(),
            }
            .into());
        };
        for key in SERVER_MANAGED_KEYS {
            map.remove(*key);
        }
        serde_json::from_value(Value::Object(map)).map_err(|e| {
            ValidationError::InvalidPayload {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Check required fields
    pub fn validate(&self) -> Result<(), AppError> {
        let json = serde_json::to_value(self)
            .map_err(|e| AppError::Internal(format!("Failed to serialize invoice: {}", e)))?;
        Self::rules().validate(&json).map_err(Into::into)
    }
}

/// A stored invoice document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    #[serde(flatten)]
    pub content: InvoiceContent,
    #[serde(serialize_with = "fixed_width_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "fixed_width_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// RFC 3339 with all nine fractional digits, so stored timestamps sort
/// lexically in time order.
fn fixed_width_timestamp<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Nanos, true))
}

impl Invoice {
    /// Build a new document with a fresh id and timestamps
    pub fn new(content: InvoiceContent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate a create payload and turn it into a new document
    pub fn from_payload(payload: Value) -> Result<Self, AppError> {
        let content = InvoiceContent::from_payload(payload)?;
        content.validate()?;
        Ok(Self::new(content))
    }

    /// Merge a partial update into this document
    ///
    /// The id and `createdAt` are kept; `updatedAt` is refreshed.
    pub fn patched(&self, patch: Value) -> Result<Self, AppError> {
        if !patch.is_object() {
            return Err(ValidationError::InvalidPayload {
                message: "expected a JSON object".to_string(),
            }
            .into());
        }

        let mut merged = serde_json::to_value(&self.content)
            .map_err(|e| AppError::Internal(format!("Failed to serialize invoice: {}", e)))?;
        json_patch::merge(&mut merged, &patch);

        let content = InvoiceContent::from_payload(merged)?;
        content.validate()?;

        Ok(Self {
            id: self.id,
            content,
            created_at: self.created_at,
            updated_at: Utc::now().max(self.created_at),
        })
    }
}

impl Entity for Invoice {
    fn resource_name() -> &'static str {
        "invoices"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Searchable for Invoice {
    fn searchable_fields() -> &'static [&'static str] {
        &["vendor.name", "invoice.number"]
    }

    fn field_text(&self, field: &str) -> Option<&str> {
        match field {
            "vendor.name" => Some(&self.content.vendor.name),
            "invoice.number" => Some(&self.content.invoice.number),
            _ => None,
        }
    }
}

/// Read a JSON number leniently
///
/// Accepts numbers and numeric strings in either separator convention
/// (`"1,234.50"`, `"1.234,50"`, `"19,5"`, `" 12 "`). Ambiguous or malformed
/// grouping yields `None`.
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Parse a human-formatted amount
///
/// When both `.` and `,` appear, the last one is the decimal mark. A lone
/// `,` is a thousands separator only when exactly three digits follow it;
/// otherwise it is the decimal mark. A lone `.` is always the decimal mark.
fn parse_amount(text: &str) -> Option<f64> {
    let s = text.trim();
    let normalized = match (s.rfind('.'), s.rfind(',')) {
        (None, None) => s.to_string(),
        (Some(dot), Some(comma)) if dot > comma => {
            let (int, frac) = s.split_at(dot);
            format!("{}{}", ungroup(int, ',')?, frac)
        }
        (Some(_), Some(comma)) => {
            let (int, frac) = s.split_at(comma);
            format!("{}.{}", ungroup(int, '.')?, &frac[1..])
        }
        (None, Some(comma)) => {
            if s.matches(',').count() == 1 && s[comma + 1..].len() != 3 {
                s.replacen(',', ".", 1)
            } else {
                ungroup(s, ',')?
            }
        }
        (Some(_), None) => {
            if s.matches('.').count() == 1 {
                s.to_string()
            } else {
                ungroup(s, '.')?
            }
        }
    };
    normalized.parse::<f64>().ok()
}

/// Remove thousands separators, requiring well-formed three-digit groups
fn ungroup(int: &str, separator: char) -> Option<String> {
    let mut groups = int.split(separator);
    let first = groups.next()?;
    let lead = first.trim_start_matches(['-', '+']);
    if lead.is_empty() || lead.len() > 3 {
        return None;
    }

    let mut digits = first.to_string();
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(0.0),
        other => number_from_value(&other)
            .ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {}", other))),
    }
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
