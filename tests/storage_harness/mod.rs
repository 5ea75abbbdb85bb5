//! Shared test harness for storage backend testing
//!
//! Provides helpers for building `Invoice` documents and the
//! `data_service_tests!` conformance suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod data_service_tests;

use chrono::{DateTime, Duration, Utc};
use invoice_desk::entities::{Invoice, InvoiceContent, InvoiceDetails, LineItem, Vendor};

// ---------------------------------------------------------------------------
// Helper functions - Invoice creation
// ---------------------------------------------------------------------------

/// Create an `Invoice` with a random ID, one line item and current timestamps.
pub fn create_test_invoice(vendor: &str, number: &str) -> Invoice {
    Invoice::new(InvoiceContent {
        file_id: format!("1700000000000-{}.pdf", number),
        file_name: format!("{}.pdf", number),
        vendor: Vendor {
            name: vendor.to_string(),
            address: Some("1 Main Street".to_string()),
            ..Default::default()
        },
        invoice: InvoiceDetails {
            number: number.to_string(),
            currency: Some("EUR".to_string()),
            subtotal: 100.0,
            tax_percent: 19.0,
            total: 119.0,
            ..Default::default()
        },
        line_items: vec![LineItem {
            description: "Consulting".to_string(),
            unit_price: 50.0,
            quantity: 2.0,
            total: 100.0,
            ..Default::default()
        }],
    })
}

/// Create an `Invoice` whose `created_at` lies `minutes_ago` in the past.
pub fn create_aged_invoice(vendor: &str, number: &str, minutes_ago: i64) -> Invoice {
    let mut invoice = create_test_invoice(vendor, number);
    invoice.created_at = Utc::now() - Duration::minutes(minutes_ago);
    invoice.updated_at = invoice.created_at;
    invoice
}

/// Create an `Invoice` stamped at exactly `created_at`.
pub fn create_invoice_at(vendor: &str, number: &str, created_at: DateTime<Utc>) -> Invoice {
    let mut invoice = create_test_invoice(vendor, number);
    invoice.created_at = created_at;
    invoice.updated_at = created_at;
    invoice
}

/// Generate `n` invoices, each one minute older than the previous.
///
/// Index 0 is the newest.
pub fn sample_batch(n: usize) -> Vec<Invoice> {
    (0..n)
        .map(|i| create_aged_invoice(&format!("Vendor_{}", i), &format!("INV-{}", i), i as i64))
        .collect()
}

// ---------------------------------------------------------------------------
// Assertions helpers
// ---------------------------------------------------------------------------

/// Assert that a list contains exactly `n` invoices.
pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}

/// Assert that two invoices carry the same content, ignoring timestamp precision.
pub fn assert_same_content(actual: &Invoice, expected: &Invoice) {
    assert_eq!(actual.id, expected.id);
    assert_eq!(actual.content, expected.content);
}
