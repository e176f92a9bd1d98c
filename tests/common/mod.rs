//! Shared utilities for connection and server tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream};

use lantern::config::{HandlerConfig, RouteTable};
use lantern::http::connection::Connection;
use lantern::routing::Router;

/// A response as the client saw it on the wire.
#[derive(Debug)]
pub struct WireResponse {
    pub status: u16,
    pub reason: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl WireResponse {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Minimal HTTP client that keeps unread bytes between responses.
pub struct TestClient<S> {
    stream: S,
    buf: Vec<u8>,
}

impl<S> TestClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buf: Vec::new(),
        }
    }

    pub async fn send(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).await.unwrap();
        self.stream.flush().await.unwrap();
    }

    pub async fn next_response(&mut self) -> WireResponse {
        loop {
            if let Some(response) = self.take_response() {
                return response;
            }

            let mut chunk = [0u8; 4096];
            let n = tokio::time::timeout(Duration::from_secs(5), self.stream.read(&mut chunk))
                .await
                .expect("timed out waiting for a response")
                .unwrap();
            assert!(n > 0, "connection closed before a full response arrived");
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Closes the client's write side.
    pub async fn shutdown(&mut self) {
        self.stream.shutdown().await.unwrap();
    }

    /// Asserts that nothing arrives from the server within `wait`.
    pub async fn assert_no_response(&mut self, wait: Duration) {
        let mut chunk = [0u8; 1024];
        let res = tokio::time::timeout(wait, self.stream.read(&mut chunk)).await;
        assert!(res.is_err(), "server sent data unexpectedly: {:?}", res);
    }

    /// Asserts that the server closed the connection.
    pub async fn assert_closed(&mut self) {
        let mut chunk = [0u8; 1024];
        let n = tokio::time::timeout(Duration::from_secs(5), self.stream.read(&mut chunk))
            .await
            .expect("timed out waiting for close")
            .unwrap();
        assert_eq!(n, 0);
    }

    fn take_response(&mut self) -> Option<WireResponse> {
        let end = self.buf.windows(4).position(|w| w == b"\r\n\r\n")?;
        let head = String::from_utf8_lossy(&self.buf[..end]).into_owned();
        let mut lines = head.split("\r\n");

        let mut status_line = lines.next()?.splitn(3, ' ');
        let _version = status_line.next()?;
        let status = status_line.next()?.parse().ok()?;
        let reason = status_line.next().unwrap_or_default().to_string();

        let headers: HashMap<String, String> = lines
            .filter_map(|line| line.split_once(": "))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let length: usize = headers
            .get("Content-Length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let total = end + 4 + length;
        if self.buf.len() < total {
            return None;
        }

        let raw: Vec<u8> = self.buf.drain(..total).collect();
        Some(WireResponse {
            status,
            reason,
            headers,
            body: raw[end + 4..].to_vec(),
        })
    }
}

/// Routes used by most connection tests.
pub fn default_routes() -> RouteTable {
    RouteTable::new()
        .with_route("/health", HandlerConfig::new("HealthHandler"))
        .with_route("/echo", HandlerConfig::new("EchoHandler"))
        .with_route("/api", HandlerConfig::new("CrudHandler"))
}

/// Runs a connection over an in-memory pipe and returns the client end.
pub fn spawn_connection(routes: RouteTable) -> TestClient<DuplexStream> {
    let (client, server) = tokio::io::duplex(64 * 1024);
    let router = Arc::new(Router::new(routes));

    tokio::spawn(async move {
        let mut conn = Connection::new(server, None, router);
        let _ = conn.run().await;
    });

    TestClient::new(client)
}
