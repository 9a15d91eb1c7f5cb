//! Integration tests for the default fetcher against a throwaway local server.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use feed_fetch::{Fetch, FetchConfig, FetchError, FetchErrorKind, Fetcher};
use feed_model::{Location, ResourceDescriptor, TextEncoding, Transfer};

/// Serves one canned response and returns the request line it received.
fn serve_once(status_line: &str, body: &[u8]) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let mut response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let n = stream.read(&mut buf).unwrap_or(0);
        stream.write_all(&response).unwrap();
        let request = String::from_utf8_lossy(&buf[..n]).to_string();
        request.lines().next().unwrap_or_default().to_string()
    });

    (format!("http://{addr}"), handle)
}

fn fetcher() -> Fetcher {
    Fetcher::new(FetchConfig::default()).unwrap()
}

#[test]
fn test_fetch_url_success() {
    let (base, server) = serve_once("200 OK", "Código;Ação\n1;2\n".as_bytes());
    let descriptor = ResourceDescriptor::new("local", Location::Url(format!("{base}/feed.csv")))
        .with_encoding(TextEncoding::latin_1());

    let payload = fetcher().fetch(&descriptor).unwrap();

    assert_eq!(payload.resource, "local");
    assert_eq!(payload.bytes, "Código;Ação\n1;2\n".as_bytes());
    assert_eq!(payload.encoding, TextEncoding::latin_1());
    assert_eq!(payload.transfer, Transfer::Plain);
    assert_eq!(server.join().unwrap(), "GET /feed.csv HTTP/1.1");
}

#[test]
fn test_fetch_object_uses_endpoint_template() {
    let (base, server) = serve_once("200 OK", b"a,b\n1,2\n");
    let fetcher = Fetcher::new(
        FetchConfig::default().with_object_endpoint(format!("{base}/{{bucket}}/{{key}}")),
    )
    .unwrap();
    let descriptor = ResourceDescriptor::new(
        "athletes",
        Location::Object {
            bucket: "postech-data-running".to_string(),
            key: "model/out.csv".to_string(),
        },
    );

    let payload = fetcher.fetch(&descriptor).unwrap();

    assert_eq!(payload.location, "s3://postech-data-running/model/out.csv");
    assert_eq!(payload.bytes, b"a,b\n1,2\n");
    assert_eq!(
        server.join().unwrap(),
        "GET /postech-data-running/model/out.csv HTTP/1.1"
    );
}

#[test]
fn test_fetch_status_error() {
    let (base, server) = serve_once("503 Service Unavailable", b"");
    let descriptor = ResourceDescriptor::new("down", Location::Url(format!("{base}/x.csv")));

    let err = fetcher().fetch(&descriptor).unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 503, .. }));
    assert!(err.is_retryable());
    server.join().unwrap();
}

#[test]
fn test_fetch_not_found_is_not_retryable() {
    let (base, server) = serve_once("404 Not Found", b"");
    let descriptor = ResourceDescriptor::new("gone", Location::Url(format!("{base}/x.csv")));

    let err = fetcher().fetch(&descriptor).unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::Status);
    assert!(!err.is_retryable());
    server.join().unwrap();
}

#[test]
fn test_fetch_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = thread::spawn(move || {
        let (_stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(3));
    });
    let descriptor = ResourceDescriptor::new("slow", Location::Url(format!("http://{addr}/x.csv")))
        .with_timeout(Duration::from_millis(200));

    let err = fetcher().fetch(&descriptor).unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::Timeout);
    assert!(err.is_retryable());
    assert_eq!(err.resource(), Some("slow"));
}

#[test]
fn test_fetch_connection_refused() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let descriptor = ResourceDescriptor::new("closed", Location::Url(format!("http://{addr}/x.csv")));

    let err = fetcher().fetch(&descriptor).unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::Unreachable);
    assert!(err.is_retryable());
}

#[test]
fn test_fetch_local_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("projection.csv");
    std::fs::write(&path, b"Date,Mediana\n2025-01-01,31.5\n").unwrap();
    let descriptor = ResourceDescriptor::new("projection", Location::Path(path.clone()));

    let payload = fetcher().fetch(&descriptor).unwrap();

    assert_eq!(payload.location, path.display().to_string());
    assert_eq!(payload.len(), 29);
}

#[test]
fn test_fetch_missing_local_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let descriptor = ResourceDescriptor::new("missing", Location::Path(dir.path().join("nope.csv")));

    let err = fetcher().fetch(&descriptor).unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::Unreachable);
}
