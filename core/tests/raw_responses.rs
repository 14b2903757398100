//! Responses written byte-for-byte over a plain socket.
//!
//! The mock backend always sends well-formed UTF-8 JSON or text. These tests
//! cover what it never sends: binary error bodies, large payloads and bodies
//! cut short by the server.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread;

use fishcatch_core::{ApiClient, ApiConfig, ApiError, Endpoint, Outcome, RequestOptions, UreqTransport};

/// Serve exactly one connection with `head` followed by `body`, then close.
fn serve_once(head: String, body: Vec<u8>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(&body);
        let _ = stream.flush();
    });

    addr
}

fn respond(status_line: &str, content_type: &str, body: Vec<u8>) -> SocketAddr {
    let head = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    serve_once(head, body)
}

fn get(addr: SocketAddr) -> Result<Outcome, ApiError> {
    let client = ApiClient::new(ApiConfig::default(), UreqTransport::new());
    let endpoint = Endpoint::new("CATCH_ENDPOINT", format!("http://{addr}/api/catch"));
    client.request(&endpoint, "", RequestOptions::get())
}

#[test]
fn binary_error_body_keeps_http_status() {
    let addr = respond(
        "500 Internal Server Error",
        "application/octet-stream",
        vec![0xff, 0xfe, 0x00, 0x41],
    );

    match get(addr).unwrap_err() {
        ApiError::HttpStatus { status, url, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(url, format!("http://{addr}/api/catch"));
            assert!(body.ends_with('A'));
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[test]
fn large_json_list_is_read_whole() {
    let items = vec!["\"abcdefghij\""; 1_000_000];
    let body = format!("[{}]", items.join(",")).into_bytes();
    assert!(body.len() > 10 * 1024 * 1024);
    let addr = respond("200 OK", "application/json", body);

    match get(addr).unwrap() {
        Outcome::Json(serde_json::Value::Array(values)) => {
            assert_eq!(values.len(), 1_000_000);
            assert_eq!(values[0], "abcdefghij");
        }
        other => panic!("expected a JSON array, got {other:?}"),
    }
}

#[test]
fn truncated_error_body_keeps_http_status() {
    let head = "HTTP/1.1 502 Bad Gateway\r\nContent-Type: text/plain\r\nContent-Length: 1000\r\nConnection: close\r\n\r\n";
    let addr = serve_once(head.to_string(), b"upstream went".to_vec());

    let err = get(addr).unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert!(!matches!(err, ApiError::Network { .. }));
}

#[test]
fn truncated_success_body_is_not_network_error() {
    let head = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 1000\r\nConnection: close\r\n\r\n";
    let addr = serve_once(head.to_string(), b"[1,2,".to_vec());

    let err = get(addr).unwrap_err();
    assert!(matches!(err, ApiError::Deserialization(_)), "{err:?}");
    assert_eq!(err.url(), None);
    assert!(err.to_string().contains(&format!("http://{addr}/api/catch")));
}

#[test]
fn relative_base_without_origin_is_configuration_error() {
    let client = ApiClient::new(ApiConfig::default(), UreqTransport::new());
    let endpoint = Endpoint::new("CATCH_ENDPOINT", "/api/catch");

    let err = client.request(&endpoint, "", RequestOptions::get()).unwrap_err();
    assert!(err.is_configuration(), "{err:?}");
    assert!(matches!(err, ApiError::MissingProxyOrigin { .. }));
}
