//! Macro-generated test suite for `OrderStore` contract validation.
//!
//! The `order_store_tests!` macro generates a test module that validates any
//! `OrderStore + SeedRecords` implementation against the full contract.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! use store_harness::*;
//! use orderapi::storage::InMemoryOrderStore;
//!
//! order_store_tests!(InMemoryOrderStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## Orders
//! - `test_create_and_get`: create then retrieve, verify all fields
//! - `test_get_nonexistent`: unknown id returns None
//! - `test_list_empty` / `test_list_ordered_by_id`
//! - `test_ids_are_increasing`: every create gets a larger id
//! - `test_update_existing`: mandatory fields replaced, created_at kept
//! - `test_update_foreign_keys`: absent key kept, null key cleared
//! - `test_update_nonexistent`: None, and nothing is inserted
//! - `test_delete_existing`: delete then get returns None
//!
//! ## Referenced records
//! - `test_get_referenced_records`: seeded rows come back with their attributes
//! - `test_list_with_relations`: observation and causal loaded, dangling ids load as None
//!
//! ## Activities
//! - `test_attach_and_list_activities`
//! - `test_duplicate_attach_then_detach`: detach removes every row for the pair
//! - `test_detach_missing_pair_is_noop`
//! - `test_delete_cascades_to_activities`
//!
//! ## Edge Cases
//! - `test_concurrent_creates`: parallel creates from spawned tasks get distinct ids

/// Generate a full `OrderStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh, empty store implementing
/// `OrderStore + SeedRecords + Clone + 'static`. It is re-evaluated for each
/// test.
#[macro_export]
macro_rules! order_store_tests {
    ($factory:expr) => {
        mod order_store_contract_tests {
            use super::*;
            use orderapi::core::service::OrderStore;
            use std::collections::HashSet;

            // ==================================================================
            // Orders
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let store = $factory;
                store.seed_observation(1, "Sin novedad").await.unwrap();
                store.seed_causal(2, "Cliente ausente").await.unwrap();

                let created = store
                    .create(order_input_with_refs("123 Main St", 1, 2))
                    .await
                    .unwrap();
                assert_eq!(created.legalization_date, date(2024, 1, 15));
                assert_eq!(created.address, "123 Main St");
                assert_eq!(created.city, "Springfield");
                assert_eq!(created.observation_id, Some(1));
                assert_eq!(created.causal_id, Some(2));
                assert_eq!(created.created_at, created.updated_at);

                let fetched = store.get(created.id).await.unwrap().unwrap();
                assert_eq!(fetched, created);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                assert!(store.get(999_999).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_empty() {
                let store = $factory;
                assert!(store.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_ordered_by_id() {
                let store = $factory;
                for address in ["Calle 1", "Calle 2", "Calle 3"] {
                    store.create(order_input(address, "Bogota")).await.unwrap();
                }

                let orders = store.list().await.unwrap();
                assert_eq!(orders.len(), 3);
                let addresses: Vec<_> = orders.iter().map(|o| o.address.as_str()).collect();
                assert_eq!(addresses, vec!["Calle 1", "Calle 2", "Calle 3"]);
                assert!(orders.windows(2).all(|w| w[0].id < w[1].id));
            }

            #[tokio::test]
            async fn test_ids_are_increasing() {
                let store = $factory;
                let first = store.create(order_input("Calle 1", "Cali")).await.unwrap();
                store.delete(first.id).await.unwrap();
                let second = store.create(order_input("Calle 2", "Cali")).await.unwrap();
                assert!(second.id > first.id);
            }

            #[tokio::test]
            async fn test_update_existing() {
                let store = $factory;
                let created = store.create(order_input("Calle 1", "Medellin")).await.unwrap();

                let mut input = order_input("Carrera 45", "Barranquilla");
                input.legalization_date = date(2024, 3, 1);
                let updated = store.update(created.id, input).await.unwrap().unwrap();

                assert_eq!(updated.id, created.id);
                assert_eq!(updated.address, "Carrera 45");
                assert_eq!(updated.city, "Barranquilla");
                assert_eq!(updated.legalization_date, date(2024, 3, 1));
                assert_eq!(updated.created_at, created.created_at);
                assert!(updated.updated_at >= created.updated_at);

                let fetched = store.get(created.id).await.unwrap().unwrap();
                assert_eq!(fetched.address, "Carrera 45");
                assert_eq!(fetched.city, "Barranquilla");
                assert_eq!(store.list().await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_update_foreign_keys() {
                let store = $factory;
                let created = store
                    .create(order_input_with_refs("Calle 1", 10, 20))
                    .await
                    .unwrap();

                // causal_id absent: kept; observation_id null: cleared
                let mut input = order_input("Calle 1", "Springfield");
                input.observation_id = Some(None);
                let updated = store.update(created.id, input).await.unwrap().unwrap();
                assert_eq!(updated.observation_id, None);
                assert_eq!(updated.causal_id, Some(20));

                let fetched = store.get(created.id).await.unwrap().unwrap();
                assert_eq!(fetched.observation_id, None);
                assert_eq!(fetched.causal_id, Some(20));
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let store = $factory;
                let result = store.update(999_999, order_input("Calle 1", "Cali")).await;
                assert!(result.unwrap().is_none());
                assert!(store.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                let keep = store.create(order_input("Calle 1", "Cali")).await.unwrap();
                let gone = store.create(order_input("Calle 2", "Cali")).await.unwrap();

                store.delete(gone.id).await.unwrap();

                assert!(store.get(gone.id).await.unwrap().is_none());
                assert!(store.get(keep.id).await.unwrap().is_some());
                assert_eq!(store.list().await.unwrap().len(), 1);
            }

            // ==================================================================
            // Referenced records
            // ==================================================================

            #[tokio::test]
            async fn test_get_referenced_records() {
                let store = $factory;
                store.seed_activity(1, "Inspeccion").await.unwrap();
                store.seed_observation(2, "Sin novedad").await.unwrap();
                store.seed_causal(3, "Cliente ausente").await.unwrap();

                assert_eq!(
                    store.get_activity(1).await.unwrap(),
                    Some(record(1, "Inspeccion"))
                );
                assert_eq!(
                    store.get_observation(2).await.unwrap(),
                    Some(record(2, "Sin novedad"))
                );
                assert_eq!(
                    store.get_causal(3).await.unwrap(),
                    Some(record(3, "Cliente ausente"))
                );
                assert!(store.get_activity(2).await.unwrap().is_none());
                assert!(store.get_observation(99).await.unwrap().is_none());
                assert!(store.get_causal(99).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_with_relations() {
                let store = $factory;
                store.seed_observation(1, "Sin novedad").await.unwrap();
                store.seed_causal(2, "Cliente ausente").await.unwrap();

                let linked = store
                    .create(order_input_with_refs("Calle 1", 1, 2))
                    .await
                    .unwrap();
                let plain = store.create(order_input("Calle 2", "Cali")).await.unwrap();
                let dangling = store
                    .create(order_input_with_refs("Calle 3", 77, 88))
                    .await
                    .unwrap();

                let entries = store.list_with_relations().await.unwrap();
                assert_eq!(entries.len(), 3);

                assert_eq!(entries[0].order.id, linked.id);
                assert_eq!(entries[0].observation, Some(record(1, "Sin novedad")));
                assert_eq!(entries[0].causal, Some(record(2, "Cliente ausente")));

                assert_eq!(entries[1].order.id, plain.id);
                assert!(entries[1].observation.is_none());
                assert!(entries[1].causal.is_none());

                assert_eq!(entries[2].order.id, dangling.id);
                assert_eq!(entries[2].order.observation_id, Some(77));
                assert!(entries[2].observation.is_none());
                assert!(entries[2].causal.is_none());
            }

            // ==================================================================
            // Activities
            // ==================================================================

            #[tokio::test]
            async fn test_attach_and_list_activities() {
                let store = $factory;
                store.seed_activity(1, "Inspeccion").await.unwrap();
                store.seed_activity(2, "Reparacion").await.unwrap();
                let order = store.create(order_input("Calle 1", "Cali")).await.unwrap();
                let other = store.create(order_input("Calle 2", "Cali")).await.unwrap();

                assert!(store.activities_of(order.id).await.unwrap().is_empty());

                store.attach_activity(order.id, 1).await.unwrap();
                store.attach_activity(order.id, 2).await.unwrap();
                store.attach_activity(other.id, 2).await.unwrap();

                let activities = store.activities_of(order.id).await.unwrap();
                assert_eq!(
                    activities,
                    vec![record(1, "Inspeccion"), record(2, "Reparacion")]
                );
                assert_eq!(store.activities_of(other.id).await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_duplicate_attach_then_detach() {
                let store = $factory;
                store.seed_activity(1, "Inspeccion").await.unwrap();
                store.seed_activity(2, "Reparacion").await.unwrap();
                let order = store.create(order_input("Calle 1", "Cali")).await.unwrap();

                store.attach_activity(order.id, 1).await.unwrap();
                store.attach_activity(order.id, 1).await.unwrap();
                store.attach_activity(order.id, 2).await.unwrap();
                assert_eq!(store.activities_of(order.id).await.unwrap().len(), 3);

                store.detach_activity(order.id, 1).await.unwrap();
                assert_eq!(
                    store.activities_of(order.id).await.unwrap(),
                    vec![record(2, "Reparacion")]
                );
            }

            #[tokio::test]
            async fn test_detach_missing_pair_is_noop() {
                let store = $factory;
                store.seed_activity(1, "Inspeccion").await.unwrap();
                store.seed_activity(2, "Reparacion").await.unwrap();
                let order = store.create(order_input("Calle 1", "Cali")).await.unwrap();
                store.attach_activity(order.id, 1).await.unwrap();

                store.detach_activity(order.id, 2).await.unwrap();
                assert_eq!(store.activities_of(order.id).await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_delete_cascades_to_activities() {
                let store = $factory;
                store.seed_activity(1, "Inspeccion").await.unwrap();
                let order = store.create(order_input("Calle 1", "Cali")).await.unwrap();
                store.attach_activity(order.id, 1).await.unwrap();

                store.delete(order.id).await.unwrap();

                assert!(store.activities_of(order.id).await.unwrap().is_empty());
                // The activity itself is untouched
                assert!(store.get_activity(1).await.unwrap().is_some());
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_creates() {
                let store = $factory;
                let mut handles = Vec::new();
                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store
                            .create(order_input(&format!("Calle {}", i), "Cali"))
                            .await
                            .unwrap()
                    }));
                }

                let mut ids = HashSet::new();
                for handle in handles {
                    ids.insert(handle.await.unwrap().id);
                }
                assert_eq!(ids.len(), 10);
                assert_eq!(store.list().await.unwrap().len(), 10);
            }
        }
    };
}
