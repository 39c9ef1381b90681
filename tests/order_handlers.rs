//! Handler-level tests against the in-memory order store

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::IntoResponse;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, registry};

use orders_api::gateway::handlers::{
    BusinessDaysQuery, health_check, list_recent_orders,
    list_recent_orders_excluding_non_business_days, submit_order,
};
use orders_api::gateway::state::AppState;
use orders_api::{InMemoryOrderRepository, Order, OrderRepository, OrderService};

// ============================================================================
// Helpers
// ============================================================================

fn app() -> (Arc<InMemoryOrderRepository>, Arc<AppState>) {
    let repo = Arc::new(InMemoryOrderRepository::new());
    let state = Arc::new(AppState::new(repo.clone()));
    (repo, state)
}

fn order_at(name: &str, entry_date: DateTime<Utc>) -> Order {
    Order::new(Some(name.into()), Some(format!("{} description", name)), entry_date)
}

async fn read(response: impl IntoResponse) -> (StatusCode, HeaderMap, Value) {
    let response = response.into_response();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, headers, json)
}

/// Counts ERROR-level events seen on the current thread
struct ErrorCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn count_errors() -> (Arc<AtomicUsize>, tracing::subscriber::DefaultGuard) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = registry().with(ErrorCounter(count.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (count, guard)
}

// ============================================================================
// GET /orders/recent
// ============================================================================

#[tokio::test]
async fn list_recent_returns_recent_non_deleted_orders_newest_first() {
    let (repo, state) = app();
    let now = Utc::now();
    let older = order_at("older", now - Duration::hours(3));
    let newer = order_at("newer", now - Duration::minutes(1));
    let mut deleted = order_at("deleted", now);
    deleted.deleted = true;
    repo.insert_raw(older.clone());
    repo.insert_raw(deleted);
    repo.insert_raw(newer.clone());
    repo.insert_raw(order_at("stale", now - Duration::days(2)));

    let (status, _, body) = read(list_recent_orders(State(state)).await).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![newer.id(), older.id()]);
}

#[tokio::test]
async fn list_recent_twice_returns_identical_results() {
    let (repo, state) = app();
    let now = Utc::now();
    for i in 0..5 {
        repo.insert_raw(order_at(&format!("o{}", i), now - Duration::minutes(i)));
    }

    let (_, _, first) = read(list_recent_orders(State(state.clone())).await).await;
    let (_, _, second) = read(list_recent_orders(State(state)).await).await;

    assert_eq!(first, second);
    assert_eq!(first.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn list_recent_storage_failure_is_server_error() {
    let (repo, state) = app();
    repo.fail_next_with("Repository error");

    let (status, _, body) = read(list_recent_orders(State(state)).await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Store unavailable: Repository error");
}

// ============================================================================
// POST /orders/submit
// ============================================================================

#[tokio::test]
async fn submit_without_body_is_bad_request() {
    let (repo, state) = app();

    for body in [&b""[..], &b"null"[..]] {
        let (status, _, json) =
            read(submit_order(State(state.clone()), Bytes::from_static(body)).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, "Order data is missing");
    }
    assert!(repo.is_empty());
}

#[tokio::test]
async fn submit_missing_name_or_description_is_bad_request() {
    let (repo, state) = app();

    for body in [
        r#"{"name":"","description":"Test Description"}"#,
        r#"{"name":"Test Order"}"#,
        r#"{}"#,
    ] {
        let (status, _, json) =
            read(submit_order(State(state.clone()), Bytes::from(body)).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(json, "Order name and description are required");
    }
    assert!(repo.is_empty());
}

#[tokio::test]
async fn submit_overlong_name_is_bad_request() {
    let (_, state) = app();
    let body = serde_json::json!({ "name": "n".repeat(101), "description": "d" }).to_string();

    let (status, _, json) = read(submit_order(State(state), Bytes::from(body)).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, "Name must be at most 100 characters");
}

#[tokio::test]
async fn submit_valid_order_is_created_and_stored() {
    let (repo, state) = app();
    let body = r#"{"name":"Test Order","description":"Test Description"}"#;

    let (status, headers, json) = read(submit_order(State(state), Bytes::from(body)).await).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers[header::LOCATION], "/orders/recent");
    assert_eq!(json["name"], "Test Order");
    assert_eq!(json["description"], "Test Description");
    assert_eq!(json["invoiced"], true);
    assert_eq!(json["deleted"], false);

    let id = json["id"].as_str().unwrap();
    assert!(!id.is_empty());

    let stored = repo.get_recent_orders().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id(), id);
}

#[tokio::test]
async fn submit_storage_failure_is_server_error_logged_once() {
    let (repo, state) = app();
    repo.fail_next_with("Repository error");
    let (errors, _guard) = count_errors();

    let body = r#"{"name":"test","description":"test"}"#;
    let (status, _, json) = read(submit_order(State(state), Bytes::from(body)).await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, "Store unavailable: Repository error");
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn submit_validation_failure_is_not_logged_as_error() {
    let (_, state) = app();
    let (errors, _guard) = count_errors();

    let (status, _, _) = read(submit_order(State(state), Bytes::from_static(b"null")).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

// ============================================================================
// GET /orders/recent/excludenonbusinessdays
// ============================================================================

#[tokio::test]
async fn business_day_listing_uses_widened_window() {
    // Wednesday: 7 business days ahead ends on the Friday after next
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let repo = Arc::new(InMemoryOrderRepository::new());
    let in_past = order_at("past", now - Duration::days(6));
    let ahead = order_at("ahead", now + Duration::days(9));
    repo.insert_raw(order_at("too-old", now - Duration::days(8)));
    repo.insert_raw(order_at("too-far", now + Duration::days(10)));
    repo.insert_raw(in_past.clone());
    repo.insert_raw(ahead.clone());
    let state = Arc::new(AppState::with_service(OrderService::with_clock(
        repo,
        move || now,
    )));

    let (status, _, body) = read(
        list_recent_orders_excluding_non_business_days(
            State(state),
            Ok(Query(BusinessDaysQuery { days: 7 })),
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![ahead.id(), in_past.id()]);
}

#[tokio::test]
async fn business_day_listing_storage_failure_is_server_error() {
    let (repo, state) = app();
    repo.fail_next_with("Service error");

    let (status, _, body) = read(
        list_recent_orders_excluding_non_business_days(
            State(state),
            Ok(Query(BusinessDaysQuery { days: 7 })),
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Store unavailable: Service error");
}

#[tokio::test]
async fn business_day_listing_with_zero_days_is_empty_window() {
    let (repo, state) = app();
    repo.insert_raw(order_at("recent", Utc::now() - Duration::minutes(1)));

    let (status, _, body) = read(
        list_recent_orders_excluding_non_business_days(
            State(state),
            Ok(Query(BusinessDaysQuery { days: 0 })),
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn business_day_listing_rejects_huge_windows() {
    let (_, state) = app();

    let (status, _, _) = read(
        list_recent_orders_excluding_non_business_days(
            State(state),
            Ok(Query(BusinessDaysQuery { days: i32::MAX })),
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn business_day_listing_bad_days_is_json_bad_request() {
    let (_, state) = app();

    for uri in [
        "/orders/recent/excludenonbusinessdays",
        "/orders/recent/excludenonbusinessdays?days=abc",
    ] {
        let query = Query::<BusinessDaysQuery>::try_from_uri(&uri.parse::<Uri>().unwrap());
        assert!(query.is_err(), "uri {}", uri);

        let (status, headers, body) = read(
            list_recent_orders_excluding_non_business_days(State(state.clone()), query).await,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert!(body.as_str().is_some_and(|reason| !reason.is_empty()));
    }
}

// ============================================================================
// GET /health
// ============================================================================

#[tokio::test]
async fn health_reports_store_state() {
    let (repo, state) = app();

    let (status, _, body) = read(health_check(State(state.clone())).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    repo.fail_next_with("down");
    let (status, _, body) = read(health_check(State(state)).await).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
}
