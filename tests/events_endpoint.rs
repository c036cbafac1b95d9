//! The Slack Events API webhook served through axum

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{FakeSheet, FakeSource, settings};
use slack2sheets::pipeline::Pipeline;
use slack2sheets::slack::{EventState, events_router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(sheet: Arc<FakeSheet>) -> axum::Router {
    let source = FakeSource::default()
        .user("U1", "Alice")
        .channel("C1", "general", Vec::new());
    let pipeline = Arc::new(Pipeline::new(Arc::new(source), sheet, &settings(&["general"])));
    events_router(EventState::new(pipeline))
}

async fn post(app: axum::Router, json: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri("/slack/events")
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_url_verification_echoes_challenge() {
    let (status, body) = post(
        app(Arc::new(FakeSheet::default())),
        r#"{"token":"t","challenge":"3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P","type":"url_verification"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P");
}

#[tokio::test]
async fn test_unknown_type_is_acknowledged() {
    let (status, body) = post(app(Arc::new(FakeSheet::default())), r#"{"type":"app_rate_limited"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_message_event_writes_a_row() {
    let sheet = Arc::new(FakeSheet::default());
    let (status, body) = post(
        app(sheet.clone()),
        r#"{"type":"event_callback","event":{"type":"message","channel":"C1","user":"U1","text":"standup moved to 10am","ts":"1735689600.000100"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let mut rows = Vec::new();
    for _ in 0..50 {
        rows = sheet.rows("project summary");
        if rows.len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(rows[0][0], "Meeting Cadence");
    assert_eq!(rows[1][0], "2025-01-01 00:00:00");
    assert_eq!(rows[1][1], "Alice: standup moved to 10am");
}

#[tokio::test]
async fn test_bot_message_is_ignored() {
    let sheet = Arc::new(FakeSheet::default());
    let (status, _) = post(
        app(sheet.clone()),
        r#"{"type":"event_callback","event":{"type":"message","subtype":"bot_message","bot_id":"B1","channel":"C1","text":"deploy done","ts":"1735689600.000100"}}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(sheet.rows("project summary").is_empty());
}
