//! In-process HTTP tests for the submission API.
//!
//! Each test builds the router over an in-memory table and a manual clock
//! and drives it with `oneshot`, so no sockets are opened.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use commission_core::codec::header_row;
use commission_core::{AdminPolicy, ManualClock, RateLimiter, SubmissionStore};
use commission_server::{build_router, AppState};
use commission_storage::MemoryTable;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use time::macros::datetime;
use tower::ServiceExt;

const ADMIN_SECRET: &str = "test-admin-secret";

struct TestApp {
    router: Router,
    table: Arc<MemoryTable>,
}

fn app_with(policy: AdminPolicy, max_per_window: usize) -> TestApp {
    let table = Arc::new(MemoryTable::with_rows(vec![header_row()]));
    let clock = Arc::new(ManualClock::new(datetime!(2026-10-15 08:30:00 UTC)));
    let state = AppState::new(
        SubmissionStore::new(table.clone(), clock.clone()),
        RateLimiter::new(max_per_window, 60, clock),
        policy,
    );
    TestApp {
        router: build_router(state),
        table,
    }
}

fn app() -> TestApp {
    app_with(
        AdminPolicy::Enforced {
            secret: ADMIN_SECRET.to_string(),
        },
        20,
    )
}

fn intake_body() -> Value {
    json!({
        "jobName": "Lobby retrofit",
        "siteAddress": "12 Main St",
        "purchaseOrder": "PO-7731",
        "contactName": "Dana Reyes",
        "contactEmail": "dana@example.com",
        "contactPhone": "555-0100",
        "fixturesOperable": "yes",
        "dmxAccessAvailable": false
    })
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn submit(body: &Value, client: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/submit")
        .header("content-type", "application/json")
        .header("x-forwarded-for", client)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-admin-key", ADMIN_SECRET)
        .body(Body::empty())
        .unwrap()
}

fn admin_patch(id: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(format!("/api/submissions/{id}"))
        .header("content-type", "application/json")
        .header("x-admin-key", ADMIN_SECRET)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_open() {
    let app = app();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = app();
    let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
}

#[tokio::test]
async fn intake_rejects_bad_fixture_answer() {
    let app = app();
    let mut body = intake_body();
    body["fixturesOperable"] = json!("maybe");
    let (status, response) = send(&app.router, submit(&body, "203.0.113.9")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].as_str().unwrap().contains("fixturesOperable"));
    assert_eq!(app.table.append_count(), 0);
}

#[tokio::test]
async fn intake_rejects_malformed_json() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/submit")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, response) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].is_string());
}

#[tokio::test]
async fn intake_round_trips_through_admin_list() {
    let app = app();
    let (status, response) = send(&app.router, submit(&intake_body(), "203.0.113.9")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["ok"], true);
    let id = response["submissionId"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let (status, listing) = send(&app.router, admin_get("/api/submissions")).await;
    assert_eq!(status, StatusCode::OK);
    let submissions = listing["submissions"].as_array().unwrap();
    assert_eq!(submissions.len(), 1);
    let stored = &submissions[0];
    assert_eq!(stored["submissionId"], id.as_str());
    assert_eq!(stored["timestamp"], "2026-10-15T08:30:00.000Z");
    assert_eq!(stored["jobName"], "Lobby retrofit");
    assert_eq!(stored["purchaseOrder"], "PO-7731");
    assert_eq!(stored["fixturesOperable"], "Yes");
    assert_eq!(stored["dmxAccessAvailable"], "No");
    assert_eq!(stored["status"], "new");
    assert_eq!(stored["reviewedAt"], "");
}

#[tokio::test]
async fn review_then_regress_is_rejected() {
    let app = app();
    let (_, response) = send(&app.router, submit(&intake_body(), "203.0.113.9")).await;
    let id = response["submissionId"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app.router,
        admin_patch(&id, json!({ "status": "reviewed", "reviewedBy": "Alex" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "reviewed");
    assert_eq!(updated["reviewedBy"], "Alex");
    assert_eq!(updated["reviewedAt"], "2026-10-15T08:30:00.000Z");
    assert_eq!(updated["closedAt"], "");

    let (status, error) = send(&app.router, admin_patch(&id, json!({ "status": "new" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error["error"],
        "Invalid status transition from \"reviewed\" to \"new\". Allowed: closed."
    );
    assert_eq!(app.table.write_count(), 1);
}

#[tokio::test]
async fn list_filters_by_status() {
    let app = app();
    let mut ids = Vec::new();
    for _ in 0..3 {
        let (_, response) = send(&app.router, submit(&intake_body(), "203.0.113.9")).await;
        ids.push(response["submissionId"].as_str().unwrap().to_string());
    }
    send(&app.router, admin_patch(&ids[1], json!({ "status": "closed" }))).await;

    let (_, closed) = send(&app.router, admin_get("/api/submissions?status=CLOSED")).await;
    let closed = closed["submissions"].as_array().unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0]["submissionId"], ids[1].as_str());
    assert_eq!(closed[0]["completedOn"], closed[0]["closedAt"]);

    let (_, all) = send(&app.router, admin_get("/api/submissions?status=archived")).await;
    let order: Vec<&str> = all["submissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["submissionId"].as_str().unwrap())
        .collect();
    assert_eq!(order, ids.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn patch_unknown_id_is_404() {
    let app = app();
    let (status, error) = send(
        &app.router,
        admin_patch("missing", json!({ "status": "reviewed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"], "Submission not found");
}

#[tokio::test]
async fn legacy_rows_are_addressable() {
    let app = app();
    let mut legacy = vec![String::new(); 21];
    legacy[2] = "Old job".to_string();
    legacy[13] = "new".to_string();
    send(&app.router, submit(&intake_body(), "203.0.113.9")).await;
    commission_storage::TabularStore::append_row(app.table.as_ref(), legacy)
        .await
        .unwrap();

    let (status, updated) = send(
        &app.router,
        admin_patch("legacy-3", json!({ "internalNotes": "migrated" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["submissionId"], "legacy-3");
    assert_eq!(updated["jobName"], "Old job");
    assert_eq!(updated["internalNotes"], "migrated");
    assert_eq!(app.table.snapshot().await[2][0], "");
}

#[tokio::test]
async fn admin_routes_require_key() {
    let app = app();
    let request = Request::builder()
        .uri("/api/submissions")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let request = Request::builder()
        .method("PATCH")
        .uri("/api/submissions/anything")
        .header("content-type", "application/json")
        .header("x-admin-key", "wrong")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn disabled_policy_admits_everyone() {
    let app = app_with(AdminPolicy::Disabled, 20);
    let request = Request::builder()
        .uri("/api/submissions")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submissions"], json!([]));
}

#[tokio::test]
async fn intake_is_rate_limited_per_client() {
    let app = app_with(AdminPolicy::Disabled, 2);
    for _ in 0..2 {
        let (status, _) = send(&app.router, submit(&intake_body(), "198.51.100.7")).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(&app.router, submit(&intake_body(), "198.51.100.7, 10.0.0.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Too many submissions. Try again later.");
    assert_eq!(body["retry_after"], 60);

    let (status, _) = send(&app.router, submit(&intake_body(), "198.51.100.8")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.table.append_count(), 3);
}

#[tokio::test]
async fn admin_routes_are_not_rate_limited() {
    let app = app_with(AdminPolicy::Disabled, 1);
    for _ in 0..5 {
        let (status, _) = send(&app.router, admin_get("/api/submissions")).await;
        assert_eq!(status, StatusCode::OK);
    }
}
