// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::clock::RecordingClock;
use crate::error::Error;
use crate::test_helpers::{mount_get, test_api};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};


#[tokio::test]
async fn fetch_user_returns_identity() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/client/user",
        json!({"metadata": {"name": "alice"}, "agent_address": "0xA11CE"}),
    )
    .await;

    let api = test_api(&server, Arc::new(RecordingClock::new()));
    let identity = api.fetch_user().await.unwrap();

    assert_eq!(identity.username, "alice");
    assert_eq!(identity.agent_address, "0xA11CE");
}

#[tokio::test]
async fn fetch_user_with_missing_address_is_incomplete() {
    let server = MockServer::start().await;
    mount_get(&server, "/client/user", json!({"metadata": {"name": "alice"}})).await;

    let clock = Arc::new(RecordingClock::new());
    let api = test_api(&server, clock.clone());
    let err = api.fetch_user().await.unwrap_err();

    assert!(matches!(err, Error::IncompleteData(_)));
    assert!(clock.sleeps().is_empty(), "schema errors are not retried");
}

#[tokio::test]
async fn fetch_user_unauthorized_is_retried_then_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/client/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"})))
        .expect(3)
        .mount(&server)
        .await;

    let clock = Arc::new(RecordingClock::new());
    let api = test_api(&server, clock.clone());
    let err = api.fetch_user().await.unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert_eq!(clock.sleeps().len(), 2);
}

#[tokio::test]
async fn public_ip_reads_ip_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip": "203.0.113.7"})))
        .mount(&server)
        .await;

    let api = test_api(&server, Arc::new(RecordingClock::new()));
    assert_eq!(api.public_ip().await.unwrap(), "203.0.113.7");
}

#[tokio::test]
async fn public_ip_without_field_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let api = test_api(&server, Arc::new(RecordingClock::new()));
    assert_eq!(api.public_ip().await.unwrap(), "Unknown");
}

#[tokio::test]
async fn public_ip_does_not_send_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip": "198.51.100.1"})))
        .mount(&server)
        .await;

    let api = test_api(&server, Arc::new(RecordingClock::new()));
    api.public_ip().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn completed_ids_are_collected() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/client/user-tasks/completed",
        json!([{"task_id": "a"}, {"task_id": "b"}, {"other": 1}]),
    )
    .await;

    let api = test_api(&server, Arc::new(RecordingClock::new()));
    let ids = api.fetch_completed_ids().await.unwrap();

    assert_eq!(ids.len(), 2);
    assert!(ids.contains("a"));
    assert!(ids.contains("b"));
}

#[tokio::test]
async fn verify_posts_to_task_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/client/user-tasks/verify/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"status": "completed"}})))
        .expect(1)
        .mount(&server)
        .await;

    let api = test_api(&server, Arc::new(RecordingClock::new()));
    let poll = api.verify_task("t1").await.unwrap();
    assert_eq!(poll.status.as_deref(), Some("completed"));
}
