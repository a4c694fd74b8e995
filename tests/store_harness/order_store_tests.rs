//! Macro-generated test suite for `OrderStore` contract validation.
//!
//! # Generated Tests
//!
//! ## Insert & fetch
//! - `test_insert_and_fetch_order`: row values survive a round trip
//! - `test_items_in_storage_order`: ascending ids, submitted values
//! - `test_fetch_missing_order`: `NotFound`
//! - `test_items_of_unknown_order`: empty list
//! - `test_order_without_items`: the store itself permits zero items
//!
//! ## Listing
//! - `test_orders_by_user_newest_first`
//! - `test_orders_by_user_empty`
//! - `test_items_for_orders_grouped`
//!
//! ## Status
//! - `test_update_status`: status persisted, `updated_at` strictly increases
//! - `test_update_status_same_value`: still a success
//! - `test_update_missing_status`: `NotFound`
//!
//! ## Edge Cases
//! - `test_duplicate_id_leaves_no_trace`: integrity error, nothing partial
//! - `test_concurrent_inserts_keep_items_apart`

/// Generate a full `OrderStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh, empty store implementing
/// `OrderStore + Clone + 'static`. It is re-evaluated for each test.
#[macro_export]
macro_rules! order_store_tests {
    ($factory:expr) => {
        mod order_store_contract_tests {
            use super::*;
            use order_service::core::error::{OrderError, StorageError};
            use order_service::core::order::OrderStatus;
            use order_service::core::store::OrderStore;
            use rust_decimal::dec;
            use std::time::Duration;
            use uuid::Uuid;

            // ==================================================================
            // Insert & fetch
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_fetch_order() {
                let store = $factory;
                let order = new_order(7, dec!(19.00));
                let items = vec![new_item(1, Some("Keyboard"), 2, dec!(9.50))];

                store.insert_order_with_items(&order, &items).await.unwrap();

                let fetched = store.fetch_order(order.id).await.unwrap();
                assert_eq!(fetched.id, order.id);
                assert_eq!(fetched.user_id, 7);
                assert_eq!(fetched.status, OrderStatus::Pending);
                assert_eq!(fetched.total_amount, dec!(19.00));
                assert!(fetched.items.is_empty());
                assert_eq!(fetched.created_at, fetched.updated_at);

                let again = store.fetch_order(order.id).await.unwrap();
                assert_eq!(again, fetched);
            }

            #[tokio::test]
            async fn test_items_in_storage_order() {
                let store = $factory;
                let order = new_order(1, dec!(0));
                let items = vec![
                    new_item(10, Some("Mouse"), 1, dec!(25.00)),
                    new_item(11, None, 3, dec!(1.25)),
                    new_item(12, Some("Cable"), 2, dec!(4.99)),
                ];

                store.insert_order_with_items(&order, &items).await.unwrap();

                let stored = store.fetch_items(order.id).await.unwrap();
                assert_eq!(stored.len(), 3);
                for (stored, submitted) in stored.iter().zip(&items) {
                    assert_item_matches(stored, submitted, order.id);
                }
                assert!(stored.windows(2).all(|w| w[0].id < w[1].id));
            }

            #[tokio::test]
            async fn test_fetch_missing_order() {
                let store = $factory;
                let err = store.fetch_order(Uuid::new_v4()).await.unwrap_err();
                assert!(matches!(err, OrderError::NotFound { .. }));
            }

            #[tokio::test]
            async fn test_items_of_unknown_order() {
                let store = $factory;
                let items = store.fetch_items(Uuid::new_v4()).await.unwrap();
                assert!(items.is_empty());
            }

            #[tokio::test]
            async fn test_order_without_items() {
                let store = $factory;
                let order = new_order(3, dec!(0));
                store.insert_order_with_items(&order, &[]).await.unwrap();

                assert_eq!(store.fetch_order(order.id).await.unwrap().user_id, 3);
                assert!(store.fetch_items(order.id).await.unwrap().is_empty());
            }

            // ==================================================================
            // Listing
            // ==================================================================

            #[tokio::test]
            async fn test_orders_by_user_newest_first() {
                let store = $factory;
                let mut ids = Vec::new();
                for i in 0..3 {
                    let order = new_order(42, dec!(1.00) * rust_decimal::Decimal::from(i + 1));
                    ids.push(order.id);
                    store
                        .insert_order_with_items(&order, &[new_item(i, None, 1, dec!(1.00))])
                        .await
                        .unwrap();
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
                let other = new_order(43, dec!(5.00));
                store.insert_order_with_items(&other, &[]).await.unwrap();

                let listed = store.fetch_orders_by_user(42).await.unwrap();
                let listed_ids: Vec<Uuid> = listed.iter().map(|o| o.id).collect();
                ids.reverse();
                assert_eq!(listed_ids, ids);
                assert!(listed.iter().all(|o| o.user_id == 42));
                assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
            }

            #[tokio::test]
            async fn test_orders_by_user_empty() {
                let store = $factory;
                let listed = store.fetch_orders_by_user(999).await.unwrap();
                assert!(listed.is_empty());
            }

            #[tokio::test]
            async fn test_items_for_orders_grouped() {
                let store = $factory;
                let first = new_order(5, dec!(0));
                let second = new_order(5, dec!(0));
                let empty = new_order(5, dec!(0));
                store
                    .insert_order_with_items(
                        &first,
                        &[new_item(1, None, 1, dec!(1)), new_item(2, None, 1, dec!(2))],
                    )
                    .await
                    .unwrap();
                store
                    .insert_order_with_items(&second, &[new_item(3, None, 1, dec!(3))])
                    .await
                    .unwrap();
                store.insert_order_with_items(&empty, &[]).await.unwrap();

                let grouped = store
                    .fetch_items_for_orders(&[first.id, second.id, empty.id])
                    .await
                    .unwrap();
                assert_eq!(grouped[&first.id].len(), 2);
                assert_eq!(grouped[&first.id][0].product_id, 1);
                assert_eq!(grouped[&second.id].len(), 1);
                assert!(!grouped.contains_key(&empty.id));

                let only_second = store.fetch_items_for_orders(&[second.id]).await.unwrap();
                assert_eq!(only_second.len(), 1);

                assert!(store.fetch_items_for_orders(&[]).await.unwrap().is_empty());
            }

            // ==================================================================
            // Status
            // ==================================================================

            #[tokio::test]
            async fn test_update_status() {
                let store = $factory;
                let order = new_order(1, dec!(10));
                store.insert_order_with_items(&order, &[]).await.unwrap();
                let before = store.fetch_order(order.id).await.unwrap();

                store
                    .update_status(order.id, OrderStatus::Shipped)
                    .await
                    .unwrap();

                let after = store.fetch_order(order.id).await.unwrap();
                assert_eq!(after.status, OrderStatus::Shipped);
                assert!(after.updated_at > before.updated_at);
                assert_eq!(after.created_at, before.created_at);
                assert_eq!(after.total_amount, before.total_amount);
            }

            #[tokio::test]
            async fn test_update_status_same_value() {
                let store = $factory;
                let order = new_order(1, dec!(10));
                store.insert_order_with_items(&order, &[]).await.unwrap();

                let mut previous = store.fetch_order(order.id).await.unwrap().updated_at;
                for _ in 0..3 {
                    store
                        .update_status(order.id, OrderStatus::Pending)
                        .await
                        .unwrap();
                    let current = store.fetch_order(order.id).await.unwrap();
                    assert_eq!(current.status, OrderStatus::Pending);
                    assert!(current.updated_at > previous);
                    previous = current.updated_at;
                }
            }

            #[tokio::test]
            async fn test_update_missing_status() {
                let store = $factory;
                let err = store
                    .update_status(Uuid::new_v4(), OrderStatus::Cancelled)
                    .await
                    .unwrap_err();
                assert!(matches!(err, OrderError::NotFound { .. }));
            }

            // ==================================================================
            // Edge cases
            // ==================================================================

            #[tokio::test]
            async fn test_duplicate_id_leaves_no_trace() {
                let store = $factory;
                let order = new_order(8, dec!(3.00));
                store
                    .insert_order_with_items(&order, &[new_item(1, None, 1, dec!(3.00))])
                    .await
                    .unwrap();

                let mut duplicate = order.clone();
                duplicate.user_id = 9;
                let err = store
                    .insert_order_with_items(&duplicate, &[new_item(2, None, 4, dec!(1.00))])
                    .await
                    .unwrap_err();
                assert!(matches!(
                    err,
                    OrderError::Persistence(StorageError::Integrity { .. })
                ));

                let fetched = store.fetch_order(order.id).await.unwrap();
                assert_eq!(fetched.user_id, 8);
                let items = store.fetch_items(order.id).await.unwrap();
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].product_id, 1);
                assert!(store.fetch_orders_by_user(9).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_concurrent_inserts_keep_items_apart() {
                let store = $factory;
                let mut handles = Vec::new();

                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        let order = new_order(77, dec!(0));
                        let items = vec![
                            new_item(i * 100 + 1, None, 1, dec!(1)),
                            new_item(i * 100 + 2, None, 2, dec!(2)),
                        ];
                        store.insert_order_with_items(&order, &items).await.unwrap();
                        (order.id, i)
                    }));
                }

                for handle in handles {
                    let (order_id, i) = handle.await.unwrap();
                    let items = store.fetch_items(order_id).await.unwrap();
                    let products: Vec<i32> = items.iter().map(|item| item.product_id).collect();
                    assert_eq!(products, vec![i * 100 + 1, i * 100 + 2]);
                }

                assert_eq!(store.fetch_orders_by_user(77).await.unwrap().len(), 10);
            }
        }
    };
}
