//! Macro-generated test suite for `DataService<Invoice>` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use invoice_desk::storage::InMemoryDataService;
//!
//! data_service_tests!(InMemoryDataService::<Invoice>::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_get`: create then retrieve, verify all fields
//! - `test_get_nonexistent`: get with random UUID returns None
//! - `test_list_empty`: list on empty store returns empty vec
//! - `test_list_newest_first`: list is ordered by createdAt, newest first
//! - `test_list_orders_within_same_second`: sub-second createdAt differences order correctly
//! - `test_update_existing`: replace content, verify persisted
//! - `test_update_nonexistent`: update unknown ID returns None
//! - `test_delete_existing`: delete then get returns None
//! - `test_delete_nonexistent`: delete unknown ID returns false
//!
//! ## Search
//! - `test_search_vendor_name`: case-insensitive vendor substring
//! - `test_search_invoice_number`: invoice number substring
//! - `test_search_no_results`: non-matching query
//! - `test_search_is_literal`: regex metacharacters match literally
//!
//! ## Edge Cases
//! - `test_concurrent_access`: parallel creates from spawned tasks

/// Generate a full `DataService<Invoice>` conformance test suite.
///
/// `$factory` must be an expression that evaluates to an instance implementing
/// `DataService<Invoice>`. It is re-evaluated for each test to ensure
/// isolation. For the concurrent access test, the returned service must also
/// implement `Clone + 'static`.
#[macro_export]
macro_rules! data_service_tests {
    ($factory:expr) => {
        mod data_service_contract_tests {
            use super::*;
            use invoice_desk::core::DataService;
            use invoice_desk::entities::Invoice;
            use uuid::Uuid;

            fn ids(list: &[Invoice]) -> Vec<Uuid> {
                list.iter().map(|i| i.id).collect()
            }

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let service = $factory;
                let invoice = create_test_invoice("Acme", "INV-1");
                let original_id = invoice.id;

                let created = service.create(invoice.clone()).await.unwrap();
                assert_same_content(&created, &invoice);

                let retrieved = service.get(&original_id).await.unwrap();
                assert!(retrieved.is_some(), "Invoice should exist after create");
                let retrieved = retrieved.unwrap();
                assert_same_content(&retrieved, &invoice);
                assert_eq!(retrieved.content.line_items.len(), 1);
                assert_eq!(retrieved.content.invoice.total, 119.0);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $factory;
                let result = service.get(&Uuid::new_v4()).await.unwrap();
                assert!(result.is_none(), "Getting a nonexistent invoice should return None");
            }

            #[tokio::test]
            async fn test_list_empty() {
                let service = $factory;
                let all = service.list().await.unwrap();
                assert!(all.is_empty(), "List on empty store should return empty vec");
            }

            #[tokio::test]
            async fn test_list_newest_first() {
                let service = $factory;
                let batch = sample_batch(4);
                let expected = ids(&batch);

                // Insert oldest first so insertion order differs from the expected order
                for invoice in batch.into_iter().rev() {
                    service.create(invoice).await.unwrap();
                }

                let all = service.list().await.unwrap();
                assert_count(&all, 4);
                assert_eq!(ids(&all), expected);
            }

            #[tokio::test]
            async fn test_list_orders_within_same_second() {
                use chrono::{Duration, Timelike, Utc};

                let service = $factory;
                // A whole second next to one 123ms later: their text forms
                // differ in length unless timestamps are written at fixed width
                let whole = Utc::now().with_nanosecond(0).unwrap();
                let older = create_invoice_at("Older", "S-1", whole);
                let newer = create_invoice_at("Newer", "S-2", whole + Duration::milliseconds(123));
                let expected = vec![newer.id, older.id];

                service.create(older).await.unwrap();
                service.create(newer).await.unwrap();

                let all = service.list().await.unwrap();
                assert_eq!(ids(&all), expected);
            }

            #[tokio::test]
            async fn test_update_existing() {
                let service = $factory;
                let invoice = create_test_invoice("Acme", "INV-1");
                let id = invoice.id;
                service.create(invoice.clone()).await.unwrap();

                let mut changed = invoice.clone();
                changed.content.invoice.total = 250.0;
                changed.content.vendor.name = "Acme Holdings".to_string();

                let updated = service.update(&id, changed).await.unwrap();
                let updated = updated.expect("update should find the invoice");
                assert_eq!(updated.content.invoice.total, 250.0);

                let retrieved = service.get(&id).await.unwrap().unwrap();
                assert_eq!(retrieved.content.vendor.name, "Acme Holdings");
                assert_eq!(retrieved.content.invoice.number, "INV-1");
                assert_count(&service.list().await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let service = $factory;
                let invoice = create_test_invoice("Ghost", "INV-0");
                let id = invoice.id;

                let result = service.update(&id, invoice).await.unwrap();
                assert!(result.is_none(), "Updating a nonexistent invoice should return None");
                assert!(service.get(&id).await.unwrap().is_none(), "Update must not upsert");
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let service = $factory;
                let created = service
                    .create(create_test_invoice("Acme", "INV-1"))
                    .await
                    .unwrap();

                assert!(service.delete(&created.id).await.unwrap());
                assert!(service.get(&created.id).await.unwrap().is_none());
                assert!(service.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let service = $factory;
                assert!(!service.delete(&Uuid::new_v4()).await.unwrap());
            }

            // ==================================================================
            // Search
            // ==================================================================

            #[tokio::test]
            async fn test_search_vendor_name() {
                let service = $factory;
                let acme = service
                    .create(create_test_invoice("Acme Corp", "A-1"))
                    .await
                    .unwrap();
                service
                    .create(create_test_invoice("Globex", "G-1"))
                    .await
                    .unwrap();

                let found = service.search("aCmE").await.unwrap();
                assert_eq!(ids(&found), vec![acme.id]);
            }

            #[tokio::test]
            async fn test_search_invoice_number() {
                let service = $factory;
                let older = service
                    .create(create_aged_invoice("Globex", "INV-2024-001", 5))
                    .await
                    .unwrap();
                let newer = service
                    .create(create_aged_invoice("Initech", "inv-2024-002", 1))
                    .await
                    .unwrap();
                service
                    .create(create_test_invoice("Umbrella", "X-9"))
                    .await
                    .unwrap();

                let found = service.search("INV-2024").await.unwrap();
                assert_eq!(ids(&found), vec![newer.id, older.id]);
            }

            #[tokio::test]
            async fn test_search_no_results() {
                let service = $factory;
                service
                    .create(create_test_invoice("Acme", "INV-1"))
                    .await
                    .unwrap();

                let found = service.search("nonexistent").await.unwrap();
                assert!(found.is_empty());
            }

            #[tokio::test]
            async fn test_search_is_literal() {
                let service = $factory;
                let dotted = service
                    .create(create_test_invoice("A.C. Supplies", "D-1"))
                    .await
                    .unwrap();
                service
                    .create(create_test_invoice("ABC Supplies", "D-2"))
                    .await
                    .unwrap();

                let found = service.search("a.c").await.unwrap();
                assert_eq!(ids(&found), vec![dotted.id]);

                let found = service.search("(").await.unwrap();
                assert!(found.is_empty());
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
            async fn test_concurrent_access() {
                let service = $factory;
                let s1 = service.clone();
                let s2 = service.clone();

                let a = create_test_invoice("Concurrent_A", "C-1");
                let b = create_test_invoice("Concurrent_B", "C-2");
                let id_a = a.id;
                let id_b = b.id;

                let h1 = tokio::spawn(async move { s1.create(a).await });
                let h2 = tokio::spawn(async move { s2.create(b).await });

                let (r1, r2) = tokio::time::timeout(std::time::Duration::from_secs(30), async {
                    tokio::try_join!(h1, h2).unwrap()
                })
                .await
                .expect("Concurrent creates timed out after 30s");

                r1.unwrap();
                r2.unwrap();

                let all = service.list().await.unwrap();
                assert_count(&all, 2);
                let all_ids = ids(&all);
                assert!(all_ids.contains(&id_a), "Invoice A should be present");
                assert!(all_ids.contains(&id_b), "Invoice B should be present");
            }
        }
    };
}
