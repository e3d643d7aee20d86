//! Integration tests for the `commission serve` HTTP API.
//!
//! Each test starts the server as a child process on a unique port backed
//! by the in-memory table, makes HTTP requests, and verifies the responses.

use std::io::Read;
use std::net::TcpStream;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

const ADMIN_SECRET: &str = "integration-admin-secret";

/// Atomic port counter to avoid port conflicts between parallel tests.
/// Base port is derived from process ID so parallel `cargo test --workspace` runs
/// (which spawn separate test binaries) don't collide on the same port range.
static NEXT_PORT: AtomicU16 = AtomicU16::new(0);
static PORT_INIT: std::sync::Once = std::sync::Once::new();

fn next_port() -> u16 {
    PORT_INIT.call_once(|| {
        let base = 20000 + (std::process::id() as u16 % 20000);
        NEXT_PORT.store(base, Ordering::SeqCst);
    });
    NEXT_PORT.fetch_add(1, Ordering::SeqCst)
}

/// Kills the server when a test finishes, including on assertion failure.
struct Server(Child);

impl Drop for Server {
    fn drop(&mut self) {
        self.0.kill().ok();
        self.0.wait().ok();
    }
}

/// Helper: start `commission serve --memory` on the given port.
fn start_server(port: u16) -> Server {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_commission"));
    cmd.arg("serve")
        .arg("--memory")
        .arg("--port")
        .arg(port.to_string())
        .env("ADMIN_SECRET", ADMIN_SECRET)
        .env("RUST_LOG", "warn")
        .env_remove("COMMISSION_RATE_LIMIT");
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::null());

    let child = cmd.spawn().expect("failed to start commission serve");
    // Wait for server to be ready by polling the port
    for _ in 0..50 {
        if TcpStream::connect(format!("127.0.0.1:{}", port)).is_ok() {
            return Server(child);
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    Server(child)
}

/// Helper: send one request and return (status, response_headers, body).
fn http_request(
    port: u16,
    method: &str,
    path: &str,
    extra_headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = TcpStream::connect(format!("127.0.0.1:{}", port)).expect("failed to connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .unwrap();

    let mut header_lines = String::new();
    for (name, value) in extra_headers {
        header_lines.push_str(&format!("{}: {}\r\n", name, value));
    }
    if let Some(body) = body {
        header_lines.push_str(&format!(
            "Content-Type: application/json\r\nContent-Length: {}\r\n",
            body.len()
        ));
    }

    let request = format!(
        "{} {} HTTP/1.1\r\nHost: localhost:{}\r\n{}Connection: close\r\n\r\n{}",
        method,
        path,
        port,
        header_lines,
        body.unwrap_or("")
    );
    std::io::Write::write_all(&mut stream, request.as_bytes()).expect("failed to write");

    let mut response = String::new();
    let _ = stream.read_to_string(&mut response);

    parse_http_response_full(&response)
}

fn http_get(port: u16, path: &str, extra_headers: &[(&str, &str)]) -> (u16, String) {
    let (status, _, body) = http_request(port, "GET", path, extra_headers, None);
    (status, body)
}

fn http_post(port: u16, path: &str, body: &str) -> (u16, String) {
    let (status, _, body) = http_request(port, "POST", path, &[], Some(body));
    (status, body)
}

fn http_patch(port: u16, path: &str, body: &str) -> (u16, String) {
    let (status, _, body) = http_request(
        port,
        "PATCH",
        path,
        &[("x-admin-key", ADMIN_SECRET)],
        Some(body),
    );
    (status, body)
}

/// Extract a header value from raw headers string.
fn extract_header<'a>(headers: &'a str, name: &str) -> Option<&'a str> {
    let name_lower = name.to_lowercase();
    for line in headers.lines() {
        if let Some((key, value)) = line.split_once(':') {
            if key.trim().to_lowercase() == name_lower {
                return Some(value.trim());
            }
        }
    }
    None
}

/// Parse an HTTP response into (status_code, headers_string, body).
fn parse_http_response_full(response: &str) -> (u16, String, String) {
    let parts: Vec<&str> = response.splitn(2, "\r\n\r\n").collect();
    let headers = parts.first().unwrap_or(&"").to_string();
    let body = parts.get(1).unwrap_or(&"").to_string();

    let status_line = headers.lines().next().unwrap_or("");
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(0);

    // Handle chunked transfer encoding
    let body = if headers.to_lowercase().contains("transfer-encoding: chunked") {
        decode_chunked(&body)
    } else {
        body
    };

    (status, headers, body)
}

/// Decode chunked transfer encoding.
fn decode_chunked(data: &str) -> String {
    let mut result = String::new();
    let mut remaining = data;

    while let Some(line_end) = remaining.find("\r\n") {
        let size_str = &remaining[..line_end];
        let size = match usize::from_str_radix(size_str.trim(), 16) {
            Ok(s) => s,
            Err(_) => break,
        };
        if size == 0 {
            break;
        }
        let chunk_start = line_end + 2;
        let chunk_end = chunk_start + size;
        if chunk_end > remaining.len() {
            result.push_str(&remaining[chunk_start..]);
            break;
        }
        result.push_str(&remaining[chunk_start..chunk_end]);
        remaining = if chunk_end + 2 <= remaining.len() {
            &remaining[chunk_end + 2..]
        } else {
            ""
        };
    }

    result
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("invalid JSON ({e}): {body}"))
}

const VALID_SUBMISSION: &str = r#"{
    "jobName": "Lobby retrofit",
    "siteAddress": "12 Main St",
    "purchaseOrder": "PO-7731",
    "contactName": "Dana Reyes",
    "contactEmail": "dana@example.com",
    "contactPhone": "555-0100",
    "fixturesOperable": "no",
    "dmxAccessAvailable": true
}"#;

#[test]
fn health_returns_200_with_version() {
    let port = next_port();
    let _server = start_server(port);

    let (status, body) = http_get(port, "/health", &[]);
    assert_eq!(status, 200);
    let json = json(&body);
    assert_eq!(json["status"], "ok");
    assert!(json.get("version").is_some(), "version field must be present");
}

#[test]
fn not_found_returns_404() {
    let port = next_port();
    let _server = start_server(port);

    let (status, body) = http_get(port, "/nonexistent", &[]);
    assert_eq!(status, 404);
    assert_eq!(json(&body)["error"], "not found");
}

#[test]
fn submission_lifecycle_over_http() {
    let port = next_port();
    let _server = start_server(port);

    let (status, body) = http_post(port, "/api/submit", VALID_SUBMISSION);
    assert_eq!(status, 200, "body: {body}");
    let id = json(&body)["submissionId"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let (status, body) = http_get(
        port,
        "/api/submissions?status=new",
        &[("x-admin-key", ADMIN_SECRET)],
    );
    assert_eq!(status, 200);
    let listing = json(&body);
    let submissions = listing["submissions"].as_array().unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0]["fixturesOperable"], "No");
    assert_eq!(submissions[0]["dmxAccessAvailable"], "Yes");

    let path = format!("/api/submissions/{id}");
    let (status, body) = http_patch(port, &path, r#"{"status":"reviewed","reviewedBy":"Alex"}"#);
    assert_eq!(status, 200, "body: {body}");
    let updated = json(&body);
    assert_eq!(updated["status"], "reviewed");
    assert_eq!(updated["reviewedBy"], "Alex");
    assert!(updated["reviewedAt"].as_str().unwrap().ends_with('Z'));

    let (status, body) = http_patch(port, &path, r#"{"status":"new"}"#);
    assert_eq!(status, 400);
    assert!(json(&body)["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid status transition from \"reviewed\" to \"new\""));
}

#[test]
fn invalid_submission_returns_400() {
    let port = next_port();
    let _server = start_server(port);

    let body = VALID_SUBMISSION.replace("\"no\"", "\"maybe\"");
    let (status, body) = http_post(port, "/api/submit", &body);
    assert_eq!(status, 400);
    assert_eq!(
        json(&body)["error"],
        "Field \"fixturesOperable\" must be \"yes\" or \"no\"."
    );
}

#[test]
fn admin_list_requires_key() {
    let port = next_port();
    let _server = start_server(port);

    let (status, body) = http_get(port, "/api/submissions", &[]);
    assert_eq!(status, 401);
    assert_eq!(json(&body)["error"], "Unauthorized");

    let (status, _) = http_get(port, "/api/submissions", &[("x-admin-key", "wrong")]);
    assert_eq!(status, 401);
}

#[test]
fn cors_preflight_allows_any_origin() {
    let port = next_port();
    let _server = start_server(port);

    let (status, headers, _) = http_request(
        port,
        "OPTIONS",
        "/api/submit",
        &[
            ("Origin", "https://shop.example.com"),
            ("Access-Control-Request-Method", "POST"),
            ("Access-Control-Request-Headers", "content-type"),
        ],
        None,
    );
    assert_eq!(status, 200);
    assert_eq!(
        extract_header(&headers, "access-control-allow-origin"),
        Some("*")
    );
    let methods = extract_header(&headers, "access-control-allow-methods").unwrap_or("");
    assert!(methods.contains("PATCH"), "allowed methods: {methods}");
}
