mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use lecture_scheduler::api::router;
use lecture_scheduler::models::{CourseFormat, TeachingDay};
use lecture_scheduler::services::StaticEnrollments;
use lecture_scheduler::state::AppState;

use common::{service, spec};

async fn app() -> Router {
    let recorded = spec("rec", CourseFormat::Recorded, TeachingDay::Monday, &["slot1", "slot2"], "2099-01-01", 4, 4);
    let live = spec("live", CourseFormat::Live, TeachingDay::Tuesday, &["slot1"], "2099-01-01", 2, 2);
    let enrollments = StaticEnrollments::new().with("u1", "rec");
    let svc = service(vec![recorded, live], enrollments).await;
    router(AppState { service: Arc::new(svc) })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok_once_slots_exist() {
    let app = app().await;
    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn generate_and_list() {
    let app = app().await;

    let (status, body) = send(&app, "POST", "/courses/rec/schedule", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.as_array().unwrap().len(), 4);
    assert_eq!(body[0]["is_demo"], json!(true));

    let (status, _) = send(&app, "POST", "/courses/rec/schedule", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "GET", "/courses/rec/occurrences", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 4);
    assert_eq!(listed[0]["id"], json!("rec-001"));
    assert_eq!(listed[0]["course_title"], json!("Course rec"));
    assert_eq!(listed[0]["format"], json!("recorded"));
    assert_eq!(listed[0]["start_time"], json!("09:00:00"));

    let (status, body) = send(&app, "GET", "/users/u1/upcoming?limit=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, _) = send(&app, "GET", "/courses/missing/occurrences", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn access_endpoint_fails_locked() {
    let app = app().await;
    send(&app, "POST", "/courses/rec/schedule", None).await;

    let (_, body) = send(&app, "GET", "/occurrences/rec-001/access", None).await;
    assert_eq!(body, json!({ "accessible": true }));

    let (_, body) = send(&app, "GET", "/occurrences/rec-002/access", None).await;
    assert_eq!(body, json!({ "accessible": false }));

    let (status, body) = send(&app, "GET", "/occurrences/ghost/access", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "accessible": false }));
}

#[tokio::test]
async fn reschedule_maps_errors_to_statuses() {
    let app = app().await;
    let (_, generated) = send(&app, "POST", "/courses/rec/schedule", None).await;
    send(&app, "POST", "/courses/live/schedule", None).await;

    // rec-003 sits on the second Monday in slot1, rec-004 next to it in slot2.
    let monday = generated[2]["scheduled_date"].as_str().unwrap().to_string();
    let first = chrono::NaiveDate::parse_from_str(&monday, "%Y-%m-%d").unwrap();
    let saturday = (first + chrono::Days::new(5)).to_string();
    let tuesday = (first + chrono::Days::new(1)).to_string();
    let wednesday = (first + chrono::Days::new(2)).to_string();

    let (status, body) = send(&app, "PATCH", "/occurrences/rec-003", Some(json!({ "date": saturday, "slot_id": "slot1" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], json!("weekends not allowed"));

    let (status, body) = send(&app, "PATCH", "/occurrences/rec-003", Some(json!({ "date": monday, "slot_id": "slot2" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], json!("slot already occupied"));

    let (status, _) = send(&app, "PATCH", "/occurrences/live-002", Some(json!({ "date": wednesday, "slot_id": "slot1" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PATCH", "/occurrences/nope", Some(json!({ "date": wednesday, "slot_id": "slot1" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "PATCH", "/occurrences/rec-003", Some(json!({ "date": tuesday, "slot_id": "slot2" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_rescheduled"], json!(true));
    assert_eq!(body["scheduled_date"], json!(tuesday));
}

#[tokio::test]
async fn delete_course_removes_schedule() {
    let app = app().await;
    send(&app, "POST", "/courses/rec/schedule", None).await;

    let (status, _) = send(&app, "DELETE", "/courses/rec", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", "/courses/rec/occurrences", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/courses/rec", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
