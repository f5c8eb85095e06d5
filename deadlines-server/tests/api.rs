//! Router tests against the in-memory store

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;

use deadlines_server::db::StoreFault;
use deadlines_server::models::DeadlineList;
use deadlines_server::{build_router, AppState, FixedClock, MemoryDeadlineStore, ServerConfig};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Router whose "today" is 2024-06-01, plus a handle on its store.
fn app() -> (Router, MemoryDeadlineStore) {
    app_on(date(2024, 6, 1))
}

fn app_on(today: NaiveDate) -> (Router, MemoryDeadlineStore) {
    let store = MemoryDeadlineStore::new();
    let state = AppState::with_clock(store.clone(), FixedClock(today));
    (build_router(state, &ServerConfig::default()), store)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn list(app: &Router, uri: &str) -> DeadlineList {
    let (status, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK, "{uri}: {body}");
    serde_json::from_value(body).unwrap()
}

async fn add(app: &Router, user: &str, task: &str, deadline: &str) {
    let (status, body) = post(
        app,
        "/add_deadline",
        json!({"username": user, "task": task, "deadline": deadline}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!("Deadline added successfully"));
}

fn tasks(list: &DeadlineList) -> Vec<&str> {
    list.entries.iter().map(|e| e.task.as_str()).collect()
}

#[tokio::test]
async fn add_then_list_all_round_trips() {
    let (app, _) = app();
    add(&app, "u1", "Write report", "2024-01-09").await;

    let all = list(&app, "/all_deadlines?username=u1").await;
    assert_eq!(all.entries.len(), 1);
    let entry = &all.entries[0];
    assert_eq!(entry.id, 1);
    assert_eq!(entry.task, "Write report");
    assert_eq!(entry.date, "09/01/2024");
    assert!(!entry.completed);
}

#[tokio::test]
async fn list_all_only_returns_the_users_deadlines() {
    let (app, _) = app();
    add(&app, "u1", "mine", "2024-07-01").await;
    add(&app, "u2", "theirs", "2024-07-01").await;
    add(&app, "u1", "also mine", "2023-07-01").await;

    let all = list(&app, "/all_deadlines?username=u1").await;
    assert_eq!(tasks(&all), ["mine", "also mine"]);

    let all = list(&app, "/all_deadlines?username=u2").await;
    assert_eq!(tasks(&all), ["theirs"]);
}

#[tokio::test]
async fn missing_username_lists_nothing() {
    let (app, _) = app();
    add(&app, "u1", "T1", "2024-07-01").await;

    for uri in ["/all_deadlines", "/past_deadlines", "/current_deadlines?username="] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"entries": []}));
    }
}

#[tokio::test]
async fn add_requires_every_field() {
    let (app, store) = app();

    for body in [
        json!({"task": "T1", "deadline": "2024-01-01"}),
        json!({"username": "u1", "deadline": "2024-01-01"}),
        json!({"username": "u1", "task": "T1"}),
        json!({"username": "", "task": "T1", "deadline": "2024-01-01"}),
    ] {
        let (status, message) = post(&app, "/add_deadline", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, json!("Missing data"));
    }

    assert!(store.get(1).await.is_none());
}

#[tokio::test]
async fn add_rejects_non_iso_date() {
    let (app, _) = app();
    let (status, _) = post(
        &app,
        "/add_deadline",
        json!({"username": "u1", "task": "T1", "deadline": "01/01/2024"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn validation_happens_before_store_access() {
    let (app, store) = app();
    store.set_fault(Some(StoreFault::Connect)).await;

    let (status, _) = post(&app, "/add_deadline", json!({"username": "u1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(&app, "/complete_deadline", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Missing deadline ID"));
}

#[tokio::test]
async fn scenario_complete_unknown_then_overdue_is_not_current() {
    let (app, _) = app_on(date(2024, 6, 1));
    add(&app, "u1", "T1", "2024-01-01").await;

    let (status, body) = post(&app, "/complete_deadline", json!({"id": 999})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("No such deadline found"));

    let current = list(&app, "/current_deadlines?username=u1").await;
    assert!(current.entries.is_empty());

    let past = list(&app, "/past_deadlines?username=u1").await;
    assert_eq!(tasks(&past), ["T1"]);
}

#[tokio::test]
async fn past_and_current_views_are_ordered() {
    let (app, _) = app_on(date(2024, 6, 1));
    add(&app, "u1", "jan", "2024-01-01").await;
    add(&app, "u1", "dec", "2023-12-01").await;
    add(&app, "u1", "sep", "2024-09-01").await;
    add(&app, "u1", "today", "2024-06-01").await;
    add(&app, "u1", "jul", "2024-07-01").await;

    let past = list(&app, "/past_deadlines?username=u1").await;
    assert_eq!(tasks(&past), ["jan", "dec"]);

    let current = list(&app, "/current_deadlines?username=u1").await;
    assert_eq!(tasks(&current), ["today", "jul", "sep"]);
}

#[tokio::test]
async fn completing_moves_a_deadline_to_past() {
    let (app, _) = app_on(date(2024, 6, 1));
    add(&app, "u1", "due today", "2024-06-01").await;
    add(&app, "u1", "next month", "2024-07-01").await;

    let (status, body) = post(&app, "/complete_deadline", json!({"id": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Deadline marked as completed"));

    let past = list(&app, "/past_deadlines?username=u1").await;
    assert_eq!(tasks(&past), ["due today"]);
    assert!(past.entries[0].completed);

    let current = list(&app, "/current_deadlines?username=u1").await;
    assert_eq!(tasks(&current), ["next month"]);

    let (status, body) = post(&app, "/mark_incomplete", json!({"id": "1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Deadline marked as incomplete"));

    let current = list(&app, "/current_deadlines?username=u1").await;
    assert_eq!(tasks(&current), ["due today", "next month"]);
}

#[tokio::test]
async fn completing_twice_succeeds() {
    let (app, store) = app();
    add(&app, "u1", "T1", "2024-07-01").await;

    for _ in 0..2 {
        let (status, _) = post(&app, "/complete_deadline", json!({"id": 1})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(store.get(1).await.unwrap().completed);
    }
}

#[tokio::test]
async fn mark_incomplete_unknown_is_404() {
    let (app, _) = app();
    let (status, body) = post(&app, "/mark_incomplete", json!({"id": 5})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!("No such deadline found"));
}

#[tokio::test]
async fn delete_removes_and_ignores_unknown_ids() {
    let (app, store) = app();
    add(&app, "u1", "T1", "2024-07-01").await;

    let (status, body) = post(&app, "/delete_deadline", json!({"id": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Deadline deleted"));
    assert!(store.get(1).await.is_none());

    // Deleting a nonexistent id still reports success
    let (status, body) = post(&app, "/delete_deadline", json!({"id": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Deadline deleted"));
}

#[tokio::test]
async fn delete_does_not_check_ownership() {
    let (app, store) = app();
    add(&app, "u1", "T1", "2024-07-01").await;

    // No username is involved; any caller can delete any id
    let (status, _) = post(&app, "/delete_deadline", json!({"id": 1, "username": "u2"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(store.get(1).await.is_none());
}

#[tokio::test]
async fn delete_requires_id() {
    let (app, _) = app();
    for body in [json!({}), json!({"id": null}), json!({"id": 0}), json!({"id": ""})] {
        let (status, message) = post(&app, "/delete_deadline", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, json!("Missing deadline ID"));
    }
}

#[tokio::test]
async fn update_date_only_keeps_task() {
    let (app, store) = app();
    add(&app, "u1", "Original", "2024-07-01").await;

    let (status, body) = post(
        &app,
        "/update_deadline",
        json!({"id": 1, "date": "2024-08-15"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Updated deadline"));

    let row = store.get(1).await.unwrap();
    assert_eq!(row.task, "Original");
    assert_eq!(row.deadline_date, date(2024, 8, 15));

    let all = list(&app, "/all_deadlines?username=u1").await;
    assert_eq!(all.entries[0].date, "15/08/2024");
}

#[tokio::test]
async fn update_task_only_keeps_date() {
    let (app, store) = app();
    add(&app, "u1", "Original", "2024-07-01").await;

    let (status, _) = post(&app, "/update_deadline", json!({"id": 1, "task": "Renamed"})).await;
    assert_eq!(status, StatusCode::OK);

    let row = store.get(1).await.unwrap();
    assert_eq!(row.task, "Renamed");
    assert_eq!(row.deadline_date, date(2024, 7, 1));
}

#[tokio::test]
async fn update_without_fields_still_succeeds() {
    let (app, store) = app();
    add(&app, "u1", "Original", "2024-07-01").await;

    let (status, body) = post(&app, "/update_deadline", json!({"id": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Updated deadline"));
    assert_eq!(store.get(1).await.unwrap().task, "Original");
}

#[tokio::test]
async fn update_requires_id() {
    let (app, _) = app();
    let (status, body) = post(&app, "/update_deadline", json!({"task": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Missing deadline ID"));
}

#[tokio::test]
async fn connection_failure_is_500() {
    let (app, store) = app();
    store.set_fault(Some(StoreFault::Connect)).await;

    let (status, body) = get(&app, "/all_deadlines?username=u1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!("Failed to connect to the database"));

    let (status, body) = post(
        &app,
        "/add_deadline",
        json!({"username": "u1", "task": "T1", "deadline": "2024-01-01"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!("Failed to connect to the database"));
}

#[tokio::test]
async fn query_failures_name_the_operation() {
    let (app, store) = app();
    store.set_fault(Some(StoreFault::Query)).await;

    let cases = [
        ("/add_deadline", json!({"username": "u1", "task": "T", "deadline": "2024-01-01"}), "Failed to add deadline"),
        ("/delete_deadline", json!({"id": 1}), "Failed to delete deadline"),
        ("/update_deadline", json!({"id": 1, "task": "T"}), "Failed to update deadline"),
        ("/complete_deadline", json!({"id": 1}), "Failed to mark deadline as completed"),
        ("/mark_incomplete", json!({"id": 1}), "Failed to mark deadline as incomplete"),
    ];
    for (uri, body, expected) in cases {
        let (status, message) = post(&app, uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(message, json!(expected), "{uri}");
    }

    for (uri, expected) in [
        ("/all_deadlines?username=u1", "Failed to retrieve deadlines"),
        ("/past_deadlines?username=u1", "Failed to retrieve past deadlines"),
        ("/current_deadlines?username=u1", "Failed to retrieve current deadlines"),
    ] {
        let (status, message) = get(&app, uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(message, json!(expected), "{uri}");
    }
}

async fn post_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }

    let response = app
        .clone()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn is_malformed(message: &Value) -> bool {
    message
        .as_str()
        .is_some_and(|m| m.starts_with("Malformed request"))
}

#[tokio::test]
async fn wrongly_typed_add_fields_are_400_json() {
    let (app, store) = app();

    for body in [
        json!({"username": "u1", "task": 5, "deadline": "2024-01-01"}),
        json!({"username": 7, "task": "T1", "deadline": "2024-01-01"}),
        json!({"username": "u1", "task": "T1", "deadline": ["2024-01-01"]}),
    ] {
        let (status, message) = post(&app, "/add_deadline", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(is_malformed(&message), "{message}");
    }

    assert!(store.get(1).await.is_none());
}

#[tokio::test]
async fn wrongly_typed_update_fields_are_400_json() {
    let (app, store) = app();
    add(&app, "u1", "Original", "2024-07-01").await;

    for body in [
        json!({"id": 1, "task": ["x"]}),
        json!({"id": 1, "date": 20240701}),
    ] {
        let (status, message) = post(&app, "/update_deadline", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(is_malformed(&message), "{message}");
    }

    assert_eq!(store.get(1).await.unwrap().task, "Original");
}

#[tokio::test]
async fn invalid_json_is_400_json() {
    let (app, _) = app();
    let (status, message) =
        post_raw(&app, "/complete_deadline", Some("application/json"), "{\"id\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(is_malformed(&message), "{message}");
}

#[tokio::test]
async fn missing_content_type_is_415_json() {
    let (app, _) = app();
    let (status, message) = post_raw(&app, "/delete_deadline", None, r#"{"id": 1}"#).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(message.is_string());
}

#[tokio::test]
async fn undecodable_query_is_400_json() {
    let (app, _) = app();
    let (status, message) = get(&app, "/all_deadlines?username=u1&username=u2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(is_malformed(&message), "{message}");
}

#[tokio::test]
async fn whole_float_ids_are_accepted() {
    let (app, store) = app();
    add(&app, "u1", "T1", "2024-07-01").await;

    let (status, _) = post(&app, "/complete_deadline", json!({"id": 1.0})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(store.get(1).await.unwrap().completed);

    let (status, body) = post(&app, "/mark_incomplete", json!({"id": 0.0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!("Missing deadline ID"));
}
