//! Editable invoice draft
//!
//! A draft is an immutable value: every edit returns a new draft and
//! leaves the previous one untouched. Drafts are always fully populated;
//! partial data from the server is reconciled field by field against the
//! zero-valued defaults below.
//!
//! | field                                   | default |
//! |-----------------------------------------|---------|
//! | every text field                        | `""`    |
//! | `subtotal`, `taxPercent`, `total`       | `0`     |
//! | line item `unitPrice`, `quantity`, `total`, `discount`, `vat` | `0` |
//! | `lineItems`                             | `[]`    |

use super::ClientError;
use crate::entities::invoice::{InvoiceContent, number_from_value};
use crate::entities::Invoice;
use serde::Serialize;
use serde_json::{Map, Value};

/// Vendor section of a draft
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDraft {
    pub name: String,
    pub address: String,
    pub tax_id: String,
    pub customer_code: String,
    pub contact_name: String,
}

/// Invoice header section of a draft
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsDraft {
    pub number: String,
    pub date: String,
    pub currency: String,
    pub subtotal: f64,
    pub tax_percent: f64,
    pub total: f64,
    pub po_number: String,
    pub po_date: String,
    pub locale: String,
}

/// One line item of a draft
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDraft {
    pub description: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub total: f64,
    pub discount: f64,
    pub vat: f64,
}

/// The client's in-memory copy of an invoice under review
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub vendor: VendorDraft,
    pub invoice: DetailsDraft,
    pub line_items: Vec<LineItemDraft>,
}

fn section<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    value.get(key).and_then(Value::as_object)
}

fn text(map: Option<&Map<String, Value>>, key: &str) -> String {
    match map.and_then(|m| m.get(key)) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn number(map: Option<&Map<String, Value>>, key: &str) -> f64 {
    map.and_then(|m| m.get(key))
        .and_then(number_from_value)
        .unwrap_or(0.0)
}

impl VendorDraft {
    fn reconcile(map: Option<&Map<String, Value>>) -> Self {
        Self {
            name: text(map, "name"),
            address: text(map, "address"),
            tax_id: text(map, "taxId"),
            customer_code: text(map, "customerCode"),
            contact_name: text(map, "contactName"),
        }
    }
}

impl DetailsDraft {
    fn reconcile(map: Option<&Map<String, Value>>) -> Self {
        Self {
            number: text(map, "number"),
            date: text(map, "date"),
            currency: text(map, "currency"),
            subtotal: number(map, "subtotal"),
            tax_percent: number(map, "taxPercent"),
            total: number(map, "total"),
            po_number: text(map, "poNumber"),
            po_date: text(map, "poDate"),
            locale: text(map, "locale"),
        }
    }
}

impl LineItemDraft {
    fn reconcile(map: &Map<String, Value>) -> Self {
        let map = Some(map);
        Self {
            description: text(map, "description"),
            unit_price: number(map, "unitPrice"),
            quantity: number(map, "quantity"),
            total: number(map, "total"),
            discount: number(map, "discount"),
            vat: number(map, "vat"),
        }
    }
}

impl InvoiceDraft {
    /// Layer partial invoice data over the zero-valued defaults
    ///
    /// Each section is reconciled on its own, so a missing or malformed
    /// `vendor` does not affect `invoice`. Non-object line items are dropped.
    pub fn reconcile(partial: &Value) -> Self {
        let line_items = partial
            .get("lineItems")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(LineItemDraft::reconcile)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            vendor: VendorDraft::reconcile(section(partial, "vendor")),
            invoice: DetailsDraft::reconcile(section(partial, "invoice")),
            line_items,
        }
    }

    /// Seed a draft from a stored invoice
    pub fn from_invoice(invoice: &Invoice) -> Self {
        let value = serde_json::to_value(&invoice.content).unwrap_or(Value::Null);
        Self::reconcile(&value)
    }

    /// A new draft with the vendor section edited
    pub fn with_vendor(&self, edit: impl FnOnce(&mut VendorDraft)) -> Self {
        let mut next = self.clone();
        edit(&mut next.vendor);
        next
    }

    /// A new draft with the invoice header edited
    pub fn with_invoice(&self, edit: impl FnOnce(&mut DetailsDraft)) -> Self {
        let mut next = self.clone();
        edit(&mut next.invoice);
        next
    }

    /// A new draft with one line item edited; out-of-range indices change nothing
    pub fn with_line_item(&self, index: usize, edit: impl FnOnce(&mut LineItemDraft)) -> Self {
        let mut next = self.clone();
        if let Some(item) = next.line_items.get_mut(index) {
            edit(item);
        }
        next
    }

    /// A new draft with an empty line item appended
    pub fn with_line_item_added(&self) -> Self {
        let mut next = self.clone();
        next.line_items.push(LineItemDraft::default());
        next
    }

    /// A new draft without the line item at `index`
    pub fn with_line_item_removed(&self, index: usize) -> Self {
        let mut next = self.clone();
        if index < next.line_items.len() {
            next.line_items.remove(index);
        }
        next
    }

    /// The draft as a JSON request body
    pub fn to_payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Check the fields the server requires before submitting
    pub fn validate(&self) -> Result<(), ClientError> {
        let missing: Vec<String> = InvoiceContent::rules()
            .check(&self.to_payload())
            .into_iter()
            .map(|v| v.field)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Validation { missing })
        }
    }
}
