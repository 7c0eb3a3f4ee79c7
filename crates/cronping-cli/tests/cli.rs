#![allow(deprecated)] // httpmock renamed assert_hits -> assert_calls

use httpmock::prelude::*;
use std::process::{Command, Output};

/// Run the `cronping` binary with a clean `CRONPING_*` environment.
fn cronping(args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cronping"));
    for (key, _) in std::env::vars() {
        if key.starts_with("CRONPING_") {
            cmd.env_remove(key);
        }
    }
    cmd.args(args).output().unwrap()
}

fn ping_mock(server: &MockServer, status: u16) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/ping/cli-token");
        then.status(status);
    })
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------
#[test]
fn run_success_pings_and_exits_zero() {
    let server = MockServer::start();
    let mock = ping_mock(&server, 200);
    let base = server.base_url();

    let output = cronping(&[
        "run", "--token", "cli-token", "--base-url", base.as_str(), "--", "sh", "-c", "echo hello",
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hello\n");
    mock.assert_hits(1);
}

#[test]
fn run_failure_forwards_exit_code_without_ping() {
    let server = MockServer::start();
    let mock = ping_mock(&server, 200);
    let base = server.base_url();

    let output = cronping(&[
        "--token", "cli-token", "--base-url", base.as_str(), "run", "sh", "-c", "exit 4",
    ]);

    assert_eq!(output.status.code(), Some(4));
    mock.assert_hits(0);
}

#[test]
fn run_keeps_zero_when_heartbeat_fails() {
    let server = MockServer::start();
    let mock = ping_mock(&server, 500);
    let base = server.base_url();

    let output = cronping(&[
        "run", "--token", "cli-token", "--base-url", base.as_str(), "--retries", "2", "--backoff-ms", "1",
        "--", "true",
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("heartbeat undelivered"),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    mock.assert_hits(2);
}

#[test]
fn run_without_target_is_a_config_error() {
    let output = cronping(&["run", "--", "true"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no ping target"));
}

#[test]
fn run_reads_target_from_config_file() {
    let server = MockServer::start();
    let mock = ping_mock(&server, 200);

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("cronping.yaml");
    std::fs::write(
        &config,
        format!("url: {}\nretries: 1\n", server.url("/ping/cli-token")),
    )
    .unwrap();

    let output = cronping(&["run", "--config", config.to_str().unwrap(), "--", "true"]);

    assert_eq!(output.status.code(), Some(0));
    mock.assert_hits(1);
}

// ---------------------------------------------------------------------------
// ping
// ---------------------------------------------------------------------------
#[test]
fn ping_exit_code_reflects_delivery() {
    let server = MockServer::start();
    let mock = ping_mock(&server, 200);
    let url = server.url("/ping/cli-token");

    let output = cronping(&["ping", "--url", url.as_str()]);

    assert_eq!(output.status.code(), Some(0));
    mock.assert_hits(1);

    let output = cronping(&[
        "ping", "--url", server.url("/ping/missing").as_str(), "--retries", "1",
    ]);
    assert_eq!(output.status.code(), Some(1));
}
