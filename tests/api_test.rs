//! HTTP 라우터 통합 테스트
//!
//! `app()` 전체 라우터에 요청을 보내 인증/권한/응답 형식을 검증합니다.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Response, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use campus_event_server::app;
use campus_event_server::domain::event::entity::event::EventStatus;
use campus_event_server::domain::user::entity::user::UserRole;

use common::{bearer, empty_request, json_request, seed_event, seed_user, setup, EventSeed};

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_should_report_database_status() {
    let ctx = setup().await;

    let response = app(ctx.state.clone())
        .oneshot(empty_request(Method::GET, "/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], true);
}

#[tokio::test]
async fn protected_route_without_token_should_return_401() {
    let ctx = setup().await;

    let response = app(ctx.state.clone())
        .oneshot(empty_request(Method::GET, "/api/v1/registrations/me", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["isSuccess"], false);
    assert_eq!(body["code"], "AUTH4001");
}

#[tokio::test]
async fn student_should_not_reach_admin_routes() {
    let ctx = setup().await;
    let student = seed_user(&ctx.state, "alice", UserRole::Student).await;

    let response = app(ctx.state.clone())
        .oneshot(empty_request(
            Method::GET,
            "/api/v1/admin/dashboard",
            Some(&bearer(&student)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "COMMON403");
}

#[tokio::test]
async fn anonymous_event_list_should_hide_drafts() {
    let ctx = setup().await;
    seed_event(&ctx.state, EventSeed::default()).await;
    seed_event(
        &ctx.state,
        EventSeed {
            title: "Draft Only",
            status: EventStatus::Draft,
            ..Default::default()
        },
    )
    .await;

    let response = app(ctx.state.clone())
        .oneshot(empty_request(Method::GET, "/api/v1/events?page=1&size=10", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["total"], 1);
    assert_eq!(body["result"]["events"][0]["title"], "Rust Workshop");
}

#[tokio::test]
async fn register_endpoint_should_return_201_then_409_on_duplicate() {
    let ctx = setup().await;
    let student = seed_user(&ctx.state, "alice", UserRole::Student).await;
    let event = seed_event(&ctx.state, EventSeed::default()).await;
    let uri = format!("/api/v1/events/{}/registrations", event.event_id);
    let token = bearer(&student);

    let created = app(ctx.state.clone())
        .oneshot(empty_request(Method::POST, &uri, Some(&token)))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = body_json(created).await;
    assert_eq!(body["code"], "COMMON201");
    assert_eq!(body["result"]["status"], "pending");

    let duplicate = app(ctx.state.clone())
        .oneshot(empty_request(Method::POST, &uri, Some(&token)))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    let body = body_json(duplicate).await;
    assert_eq!(body["code"], "REG4091");
}

#[tokio::test]
async fn invalid_feedback_should_return_field_errors() {
    let ctx = setup().await;
    let student = seed_user(&ctx.state, "alice", UserRole::Student).await;
    let event = seed_event(&ctx.state, EventSeed::default()).await;

    let response = app(ctx.state.clone())
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/events/{}/feedback", event.event_id),
            Some(&bearer(&student)),
            r#"{"rating": 9, "comments": "too good"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "COMMON400");
    assert_eq!(body["result"][0]["field"], "rating");
}

#[tokio::test]
async fn malformed_json_should_return_400() {
    let ctx = setup().await;
    let admin = seed_user(&ctx.state, "admin", UserRole::Admin).await;

    let response = app(ctx.state.clone())
        .oneshot(json_request(
            Method::POST,
            "/api/v1/venues",
            Some(&bearer(&admin)),
            "{not json",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["isSuccess"], false);
}

#[tokio::test]
async fn export_should_return_csv_attachment() {
    let ctx = setup().await;
    let admin = seed_user(&ctx.state, "admin", UserRole::Admin).await;
    let student = seed_user(&ctx.state, "alice", UserRole::Student).await;
    let event = seed_event(&ctx.state, EventSeed::default()).await;

    let register = app(ctx.state.clone())
        .oneshot(empty_request(
            Method::POST,
            &format!("/api/v1/events/{}/registrations", event.event_id),
            Some(&bearer(&student)),
        ))
        .await
        .unwrap();
    assert_eq!(register.status(), StatusCode::CREATED);

    let response = app(ctx.state.clone())
        .oneshot(empty_request(
            Method::GET,
            &format!("/api/v1/events/{}/registrations/export", event.event_id),
            Some(&bearer(&admin)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Rust Workshop_registrations.csv\""
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("Roll Number,Name,Email,Department,Status,Registration Date"));
    assert!(csv.contains("alice,alice Kim,alice@college.edu,,pending,"));
}

#[tokio::test]
async fn audit_log_should_list_admin_actions_newest_first() {
    let ctx = setup().await;
    let admin = seed_user(&ctx.state, "admin", UserRole::Admin).await;
    let token = bearer(&admin);

    let created = app(ctx.state.clone())
        .oneshot(json_request(
            Method::POST,
            "/api/v1/departments",
            Some(&token),
            r#"{"name": "Computer Science", "code": "cs"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let dashboard = app(ctx.state.clone())
        .oneshot(empty_request(Method::GET, "/api/v1/admin/dashboard", Some(&token)))
        .await
        .unwrap();
    assert_eq!(dashboard.status(), StatusCode::OK);

    let response = app(ctx.state.clone())
        .oneshot(empty_request(Method::GET, "/api/v1/admin/audit-logs", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["result"]["total"], 2);
    assert_eq!(body["result"]["logs"][0]["entityType"], "Dashboard");
    assert_eq!(body["result"]["logs"][1]["entityType"], "Department");
}
