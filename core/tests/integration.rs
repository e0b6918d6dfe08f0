//! User lifecycle and wire checks against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `UserClient` and
//! `RequestExecutor` over real HTTP through `UreqTransport`. The `/echo`
//! route reports what actually went over the wire.

use std::io::{Read, Write};

use api_core::{
    to_payload, ClientConfig, Host, HttpMethod, Outcome, Payload, RequestDescriptor,
    RequestExecutor, UserAttributes, UserClient,
};
use serde_json::{json, Value};

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Serve one canned raw HTTP/1.1 response, then close the connection.
fn serve_raw_once(status_line: &str, body: Vec<u8>) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let mut response = format!(
        "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(&body);

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        // Drain the request head before answering.
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        stream.write_all(&response).unwrap();
    });

    format!("http://{addr}")
}

fn executor(base: &str, token: Option<&str>) -> RequestExecutor {
    RequestExecutor::with_config(ClientConfig::new(
        Host::custom(base),
        token.map(str::to_string),
    ))
}

fn attrs(name: &str) -> Payload {
    to_payload(&UserAttributes {
        name: Some(name.to_string()),
        email: None,
    })
    .unwrap()
}

fn echo(exec: &RequestExecutor, descriptor: &RequestDescriptor) -> Value {
    exec.perform_request(descriptor).unwrap().into_data().unwrap()
}

#[test]
fn user_lifecycle() {
    let base = start_server();
    let users = UserClient::new(executor(&base, Some("secret")));

    // Step 1: create.
    let created = users.create(&attrs("Ana")).unwrap();
    let data = created.data().cloned().unwrap();
    assert_eq!(data["name"], "Ana");
    let id = data["id"].as_u64().unwrap();

    // Step 2: get returns the same record.
    let fetched = users.get(id).unwrap();
    assert_eq!(fetched, Outcome::Success { data: data.clone() });

    // Step 3: update.
    let update = to_payload(&json!({"email": "ana@example.com"})).unwrap();
    let updated = users.update(id, &update).unwrap().into_data().unwrap();
    assert_eq!(updated["name"], "Ana");
    assert_eq!(updated["email"], "ana@example.com");

    // Step 4: delete answers 200 with a null body.
    let deleted = users.delete(id).unwrap();
    assert_eq!(deleted, Outcome::Success { data: Value::Null });

    // Step 5: get after delete is a failure outcome with the raw body.
    let missing = users.get(id).unwrap();
    assert_eq!(
        missing,
        Outcome::Failure {
            error: "Not Found".to_string(),
            details: mock_server::USER_NOT_FOUND.to_string(),
        }
    );

    // Step 6: delete again is also a failure outcome, not an error.
    assert!(!users.delete(id).unwrap().is_success());
}

#[test]
fn invalid_create_is_unprocessable_entity() {
    let base = start_server();
    let users = UserClient::new(executor(&base, None));

    let outcome = users.create(&attrs("   ")).unwrap();
    assert_eq!(
        outcome,
        Outcome::Failure {
            error: "Unprocessable Entity".to_string(),
            details: mock_server::INVALID_NAME.to_string(),
        }
    );
}

#[test]
fn wire_headers_follow_token_and_overrides() {
    let base = start_server();

    let with_token = executor(&base, Some("abc"));
    let seen = echo(&with_token, &RequestDescriptor::new(HttpMethod::Get, "/echo"));
    assert_eq!(seen["method"], "GET");
    assert_eq!(seen["headers"]["authorization"], "Bearer abc");
    assert_eq!(seen["headers"]["content-type"], "application/json");
    assert_eq!(seen["body"], Value::Null);

    let without_token = executor(&base, None);
    let seen = echo(&without_token, &RequestDescriptor::new(HttpMethod::Get, "/echo"));
    assert!(seen["headers"].get("authorization").is_none());

    let overridden = RequestDescriptor::new(HttpMethod::Get, "/echo")
        .header("Content-Type", "text/plain")
        .header("Authorization", "Basic xyz");
    let seen = echo(&with_token, &overridden);
    assert_eq!(seen["headers"]["content-type"], "text/plain");
    assert_eq!(seen["headers"]["authorization"], "Basic xyz");
}

#[test]
fn wire_body_only_for_non_empty_payload() {
    let base = start_server();
    let exec = executor(&base, None);

    let seen = echo(&exec, &RequestDescriptor::new(HttpMethod::Post, "/echo"));
    assert_eq!(seen["method"], "POST");
    assert_eq!(seen["body"], Value::Null);

    let descriptor = RequestDescriptor::new(HttpMethod::Put, "/echo").payload(attrs("Bob"));
    let seen = echo(&exec, &descriptor);
    assert_eq!(seen["method"], "PUT");
    assert_eq!(seen["body"], r#"{"name":"Bob"}"#);

    let descriptor = RequestDescriptor::new(HttpMethod::Delete, "/echo").payload(attrs("Bob"));
    let seen = echo(&exec, &descriptor);
    assert_eq!(seen["method"], "DELETE");
    assert_eq!(seen["body"], r#"{"name":"Bob"}"#);
}

#[test]
fn unknown_method_goes_out_as_get() {
    let base = start_server();
    let exec = executor(&base, None);

    let seen = echo(&exec, &RequestDescriptor::with_method_name("patch", "/echo"));
    assert_eq!(seen["method"], "GET");
}

#[test]
fn connection_failure_is_an_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let users = UserClient::new(executor(&format!("http://{addr}"), None));

    let err = users.get(1).unwrap_err();
    assert!(matches!(err, api_core::ApiError::Transport(_)));
}

#[test]
fn failure_body_that_is_not_utf8_is_a_failure_outcome() {
    let base = serve_raw_once("HTTP/1.1 500 Internal Server Error", vec![0xff, 0xfe, b'x']);
    let users = UserClient::new(executor(&base, None));

    let outcome = users.get(1).unwrap();
    assert_eq!(
        outcome,
        Outcome::Failure {
            error: "Internal Server Error".to_string(),
            details: "\u{FFFD}\u{FFFD}x".to_string(),
        }
    );
}

#[test]
fn failure_body_over_ten_mebibytes_is_kept_whole() {
    let body = vec![b'e'; 11 * 1024 * 1024];
    let base = serve_raw_once("HTTP/1.1 500 Internal Server Error", body);
    let users = UserClient::new(executor(&base, None));

    match users.get(1).unwrap() {
        Outcome::Failure { error, details } => {
            assert_eq!(error, "Internal Server Error");
            assert_eq!(details.len(), 11 * 1024 * 1024);
        }
        other => panic!("expected failure, got success: {other:?}"),
    }
}

#[test]
fn success_body_over_ten_mebibytes_is_parsed() {
    let text = "a".repeat(11 * 1024 * 1024);
    let body = serde_json::to_vec(&json!({ "blob": text })).unwrap();
    let base = serve_raw_once("HTTP/1.1 200 OK", body);
    let users = UserClient::new(executor(&base, None));

    let data = users.get(1).unwrap().into_data().unwrap();
    assert_eq!(data["blob"].as_str().map(str::len), Some(11 * 1024 * 1024));
}

#[test]
fn unnamed_status_reports_its_code() {
    let base = serve_raw_once("HTTP/1.1 499 Client Closed", b"x".to_vec());
    let users = UserClient::new(executor(&base, None));

    let outcome = users.get(1).unwrap();
    assert_eq!(
        outcome,
        Outcome::Failure {
            error: "499".to_string(),
            details: "x".to_string(),
        }
    );
}
