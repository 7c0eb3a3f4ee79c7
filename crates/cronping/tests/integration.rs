#![allow(deprecated)] // httpmock renamed assert_hits_async -> assert_calls_async

use cronping::{AttemptError, HeartbeatClient, HeartbeatRequest, Monitor, Outcome};
use httpmock::prelude::*;
use std::time::Duration;

fn request(url: &str, max_attempts: u32) -> HeartbeatRequest {
    HeartbeatRequest::builder(url)
        .max_attempts(max_attempts)
        .timeout(Duration::from_secs(2))
        .backoff_unit(Duration::from_millis(10))
        .build()
        .unwrap()
}

/// A loopback URL nothing is listening on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/ping/abc123")
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------
#[tokio::test]
async fn delivers_on_200() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/ping/abc123");
            then.status(200).body("OK");
        })
        .await;

    let client = HeartbeatClient::new().unwrap();
    let outcome = client.send(&request(&server.url("/ping/abc123"), 3)).await;

    assert_eq!(outcome, Outcome::Delivered { attempts: 1 });
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn sends_user_agent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/ping/abc123")
                .header("user-agent", concat!("cronping/", env!("CARGO_PKG_VERSION")));
            then.status(200);
        })
        .await;

    let client = HeartbeatClient::new().unwrap();
    let outcome = client.send(&request(&server.url("/ping/abc123"), 1)).await;

    assert!(outcome.is_delivered(), "got: {outcome:?}");
    mock.assert_hits_async(1).await;
}

// ---------------------------------------------------------------------------
// Failures are retried and reported, never raised
// ---------------------------------------------------------------------------
#[tokio::test]
async fn server_error_exhausts_attempts() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/ping/abc123");
            then.status(500);
        })
        .await;

    let client = HeartbeatClient::new().unwrap();
    let outcome = client.send(&request(&server.url("/ping/abc123"), 3)).await;

    assert_eq!(
        outcome,
        Outcome::Undelivered {
            attempts: 3,
            reason: AttemptError::Status(500),
        }
    );
    mock.assert_hits_async(3).await;
}

#[tokio::test]
async fn not_found_is_a_failed_attempt() {
    let server = MockServer::start_async().await;

    let client = HeartbeatClient::new().unwrap();
    let outcome = client.send(&request(&server.url("/ping/unknown"), 2)).await;

    assert_eq!(
        outcome,
        Outcome::Undelivered {
            attempts: 2,
            reason: AttemptError::Status(404),
        }
    );
}

#[tokio::test]
async fn connection_refused_is_undelivered() {
    let client = HeartbeatClient::new().unwrap();
    let outcome = client.send(&request(&closed_port_url(), 3)).await;

    match outcome {
        Outcome::Undelivered {
            attempts: 3,
            reason: AttemptError::Transport(msg),
        } => assert!(!msg.contains("abc123"), "token leaked into error: {msg}"),
        other => panic!("expected transport failure after 3 attempts, got: {other:?}"),
    }
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ping/abc123");
            then.status(200).delay(Duration::from_secs(2));
        })
        .await;

    let request = HeartbeatRequest::builder(server.url("/ping/abc123"))
        .max_attempts(2)
        .timeout(Duration::from_millis(100))
        .backoff_unit(Duration::from_millis(10))
        .build()
        .unwrap();

    let client = HeartbeatClient::new().unwrap();
    let outcome = client.send(&request).await;

    assert_eq!(
        outcome,
        Outcome::Undelivered {
            attempts: 2,
            reason: AttemptError::Timeout(Duration::from_millis(100)),
        }
    );
}

// ---------------------------------------------------------------------------
// Wrap-and-ping against a live server
// ---------------------------------------------------------------------------
#[tokio::test]
async fn wrap_pings_only_on_success() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/ping/job-token");
            then.status(200);
        })
        .await;

    let monitor = Monitor::builder()
        .token("job-token")
        .base_url(server.base_url())
        .backoff_unit(Duration::from_millis(10))
        .build()
        .unwrap();

    let failed: Result<(), String> = monitor.wrap(|| async { Err("disk full".to_string()) }).await;
    assert_eq!(failed, Err("disk full".to_string()));
    mock.assert_hits_async(0).await;

    let done: Result<&str, String> = monitor.wrap(|| async { Ok("backup done") }).await;
    assert_eq!(done, Ok("backup done"));
    mock.assert_hits_async(1).await;
}
