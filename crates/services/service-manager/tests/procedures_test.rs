//! Integration tests for the service procedures.
//!
//! Run against in-memory fakes of the store and the cache backend, so no
//! PostgreSQL or Redis is needed.

mod support;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tokio_test::{assert_err, assert_ok};

use common::AppError;
use domain::{CreateServiceInput, Service, ServiceStatus, UpdateServiceInput};
use service_manager_lib::cache::{ServiceCache, ALL_SERVICES_KEY};
use service_manager_lib::procedures::{ServiceManager, ServiceProcedures};

use support::{acme_input, status_change, FailingRepository, Harness};

// =============================================================================
// CRUD behaviour
// =============================================================================

#[tokio::test]
async fn test_acme_lifecycle() {
    let harness = Harness::new();
    let procedures = &harness.procedures;

    let created = assert_ok!(procedures.create(acme_input()).await);
    assert_eq!(created.id, 1);
    assert_eq!(created.status, ServiceStatus::Pending);

    let fetched = assert_ok!(procedures.get_by_id(1).await);
    assert_eq!(fetched, created);

    let updated = assert_ok!(procedures.update(1, status_change("completed")).await);
    assert_eq!(updated.status, ServiceStatus::Completed);
    assert_eq!(updated.customer_name, "Acme");

    let ack = assert_ok!(procedures.delete(1).await);
    assert!(ack.success);
    assert_eq!(ack.message, "Service deleted successfully");

    let err = assert_err!(procedures.get_by_id(1).await);
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_returns_input_fields_and_fresh_id() {
    let harness = Harness::new();

    let first = assert_ok!(harness.procedures.create(acme_input()).await);
    let second = assert_ok!(harness.procedures.create(acme_input()).await);

    assert!(first.id > 0);
    assert_ne!(first.id, second.id);
    assert_eq!(first.customer_name, "Acme");
    assert_eq!(first.service_type, "Repair");
    assert_eq!(
        first.scheduled_at,
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
    );
    assert_eq!(first.price, 150.0);
}

#[tokio::test]
async fn test_invalid_create_persists_nothing() {
    let harness = Harness::new();

    let input = CreateServiceInput {
        customer_name: Some(String::new()),
        price: Some(-10.0),
        ..acme_input()
    };

    match harness.procedures.create(input).await {
        Err(AppError::Validation(errors)) => {
            assert!(errors.contains("customerName"));
            assert!(errors.contains("price"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(harness.repo.len().await, 0);
}

#[tokio::test]
async fn test_unstorable_price_is_rejected_before_store() {
    let harness = Harness::new();
    let created = assert_ok!(harness.procedures.create(acme_input()).await);

    let input = CreateServiceInput {
        price: Some(0.004),
        ..acme_input()
    };
    let err = assert_err!(harness.procedures.create(input).await);
    assert!(matches!(err, AppError::Validation(_)));

    let change = UpdateServiceInput {
        price: Some(1e9),
        ..Default::default()
    };
    let err = assert_err!(harness.procedures.update(i64::from(created.id), change).await);
    assert!(matches!(err, AppError::Validation(_)));

    assert_eq!(harness.repo.len().await, 1);
    assert_eq!(assert_ok!(harness.procedures.get_by_id(1).await).price, 150.0);
}

#[tokio::test]
async fn test_unknown_id_is_not_found_everywhere() {
    let harness = Harness::new();

    assert!(assert_err!(harness.procedures.get_by_id(42).await).is_not_found());
    assert!(assert_err!(harness.procedures.update(42, status_change("cancelled")).await).is_not_found());
    assert!(assert_err!(harness.procedures.delete(42).await).is_not_found());
}

#[tokio::test]
async fn test_second_delete_is_not_found() {
    let harness = Harness::new();
    let created = assert_ok!(harness.procedures.create(acme_input()).await);

    assert_ok!(harness.procedures.delete(i64::from(created.id)).await);
    let err = assert_err!(harness.procedures.delete(i64::from(created.id)).await);

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_empty_update_returns_entity_unchanged() {
    let harness = Harness::new();
    let created = assert_ok!(harness.procedures.create(acme_input()).await);

    let updated = assert_ok!(
        harness
            .procedures
            .update(i64::from(created.id), UpdateServiceInput::default())
            .await
    );

    assert_eq!(updated, created);
}

#[tokio::test]
async fn test_update_changes_only_supplied_fields() {
    let harness = Harness::new();
    let created = assert_ok!(harness.procedures.create(acme_input()).await);

    let input = UpdateServiceInput {
        price: Some(99.5),
        scheduled_at: Some("2024-03-01T09:00:00Z".to_string()),
        ..Default::default()
    };
    let updated = assert_ok!(harness.procedures.update(i64::from(created.id), input).await);

    assert_eq!(updated.price, 99.5);
    assert_eq!(
        updated.scheduled_at,
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    );
    assert_eq!(updated.customer_name, created.customer_name);
    assert_eq!(updated.service_type, created.service_type);
    assert_eq!(updated.status, created.status);
}

#[tokio::test]
async fn test_list_orders_latest_schedule_first() {
    let harness = Harness::new();
    let early = acme_input();
    let late = CreateServiceInput {
        scheduled_at: Some("2024-06-01T10:00:00Z".to_string()),
        ..acme_input()
    };

    assert_ok!(harness.procedures.create(early).await);
    assert_ok!(harness.procedures.create(late).await);

    let services = assert_ok!(harness.procedures.list().await);
    let ids: Vec<i32> = services.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_list_is_cached_after_first_read() {
    let harness = Harness::new();
    assert_ok!(harness.procedures.create(acme_input()).await);

    let first = assert_ok!(harness.procedures.list().await);
    let second = assert_ok!(harness.procedures.list().await);

    assert_eq!(first, second);
    assert_eq!(harness.repo.list_calls(), 1);
    assert!(harness.store.contains(ALL_SERVICES_KEY).await);
    assert_eq!(harness.store.ttl(ALL_SERVICES_KEY).await, Some(300));
}

#[tokio::test]
async fn test_get_is_cached_after_first_read() {
    let harness = Harness::new();
    assert_ok!(harness.procedures.create(acme_input()).await);

    assert_ok!(harness.procedures.get_by_id(1).await);
    assert_ok!(harness.procedures.get_by_id(1).await);

    assert_eq!(harness.repo.find_calls(), 1);
    assert!(harness.store.contains("service:1").await);
}

#[tokio::test]
async fn test_not_found_is_never_cached() {
    let harness = Harness::new();

    assert_err!(harness.procedures.get_by_id(5).await);

    assert!(!harness.store.contains("service:5").await);
}

#[tokio::test]
async fn test_create_invalidates_list_and_entity_keys() {
    let harness = Harness::new();
    assert_ok!(harness.procedures.create(acme_input()).await);
    assert_ok!(harness.procedures.list().await);
    assert_ok!(harness.procedures.get_by_id(1).await);

    assert_ok!(harness.procedures.create(acme_input()).await);

    assert!(!harness.store.contains(ALL_SERVICES_KEY).await);
    assert!(!harness.store.contains("service:1").await);

    let services = assert_ok!(harness.procedures.list().await);
    assert_eq!(services.len(), 2);
}

#[tokio::test]
async fn test_update_invalidates_its_key_and_list_only() {
    let harness = Harness::new();
    assert_ok!(harness.procedures.create(acme_input()).await);
    assert_ok!(harness.procedures.create(acme_input()).await);
    assert_ok!(harness.procedures.list().await);
    assert_ok!(harness.procedures.get_by_id(1).await);
    assert_ok!(harness.procedures.get_by_id(2).await);

    assert_ok!(harness.procedures.update(1, status_change("cancelled")).await);

    assert!(!harness.store.contains(ALL_SERVICES_KEY).await);
    assert!(!harness.store.contains("service:1").await);
    assert!(harness.store.contains("service:2").await);

    let fetched = assert_ok!(harness.procedures.get_by_id(1).await);
    assert_eq!(fetched.status, ServiceStatus::Cancelled);
}

#[tokio::test]
async fn test_delete_invalidates_cached_entity() {
    let harness = Harness::new();
    assert_ok!(harness.procedures.create(acme_input()).await);
    assert_ok!(harness.procedures.get_by_id(1).await);
    assert_ok!(harness.procedures.list().await);

    assert_ok!(harness.procedures.delete(1).await);

    assert!(assert_err!(harness.procedures.get_by_id(1).await).is_not_found());
    assert!(assert_ok!(harness.procedures.list().await).is_empty());
}

#[tokio::test]
async fn test_corrupt_cache_entry_falls_back_to_store() {
    let harness = Harness::new();
    assert_ok!(harness.procedures.create(acme_input()).await);
    harness.store.put_raw(ALL_SERVICES_KEY, "{not json").await;

    let services = assert_ok!(harness.procedures.list().await);

    assert_eq!(services.len(), 1);
    assert_eq!(harness.repo.list_calls(), 1);
}

#[tokio::test]
async fn test_cache_outage_changes_no_outcome() {
    let harness = Harness::with_failing_cache();
    let procedures = &harness.procedures;

    let created = assert_ok!(procedures.create(acme_input()).await);
    assert_eq!(assert_ok!(procedures.list().await), vec![created.clone()]);
    assert_eq!(assert_ok!(procedures.get_by_id(1).await), created);

    let updated = assert_ok!(procedures.update(1, status_change("completed")).await);
    assert_eq!(updated.status, ServiceStatus::Completed);

    assert_ok!(procedures.delete(1).await);
    assert!(assert_err!(procedures.get_by_id(1).await).is_not_found());
    assert!(assert_ok!(procedures.list().await).is_empty());
}

#[tokio::test]
async fn test_disabled_cache_reads_through() {
    let repo = Arc::new(support::InMemoryRepository::new());
    let procedures = ServiceManager::new(repo.clone(), ServiceCache::disabled());

    assert_ok!(procedures.create(acme_input()).await);
    assert_ok!(procedures.list().await);
    assert_ok!(procedures.list().await);

    assert_eq!(repo.list_calls(), 2);
}

// =============================================================================
// Store failures
// =============================================================================

#[tokio::test]
async fn test_store_failures_are_generic_internal_errors() {
    let cache = ServiceCache::disabled();
    let procedures = ServiceManager::new(Arc::new(FailingRepository), cache);

    let cases: Vec<(AppError, &str)> = vec![
        (assert_err!(procedures.list().await), "Failed to fetch services"),
        (assert_err!(procedures.get_by_id(1).await), "Failed to fetch service"),
        (assert_err!(procedures.create(acme_input()).await), "Failed to create service"),
        (
            assert_err!(procedures.update(1, UpdateServiceInput::default()).await),
            "Failed to update service",
        ),
        (assert_err!(procedures.delete(1).await), "Failed to delete service"),
    ];

    for (err, message) in cases {
        assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn test_service_json_round_trip_keeps_timestamp() {
    let service = Service {
        id: 3,
        customer_name: "Acme".to_string(),
        service_type: "Repair".to_string(),
        scheduled_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
        price: 150.0,
        status: ServiceStatus::Completed,
    };

    let json = serde_json::to_value(&service).unwrap();
    assert_eq!(json["scheduledAt"], "2024-01-15T10:00:00Z");

    let decoded: Service = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, service);
}
