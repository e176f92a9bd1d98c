//! HTTP protocol implementation.
//!
//! This module implements the HTTP/1.1 subset the server speaks, with
//! keep-alive connections and strictly sequential requests per connection.
//!
//! # Architecture
//!
//! - **`connection`**: the per-connection state machine
//! - **`framer`**: decides whether buffered bytes hold a complete request
//! - **`parser`**: turns request bytes into a [`request::Request`]
//! - **`request`**: HTTP request representation and validity checks
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for the end of the header block
//!        └──────┬──────┘
//!               │ Header block framed
//!               ▼                         bad Content-Length
//!        ┌──────────────────┐  ──────────────────────────────┐
//!        │  AwaitingBody    │ ← Wait for Content-Length bytes │
//!        └──────┬───────────┘  ───────────────┐              │
//!               │ Frame complete and valid    │ invalid      │
//!               ▼                             │ request      │
//!        ┌──────────────────┐                 │              │
//!        │   Dispatching    │ ← Route, handle │              │
//!        └──────┬───────────┘                 │              │
//!               │ Response ready              ▼              ▼
//!        ┌──────────────────┐           400 Bad Request response
//!        │    Writing       │ ◄─────────────────────────────────
//!        └──────┬───────────┘
//!               │ Response sent
//!               └─ Reading (same connection)
//!
//! Only the peer closing its side, or an I/O error, ends a connection.
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lantern::config::{HandlerConfig, RouteTable};
//! use lantern::http::connection::Connection;
//! use lantern::routing::Router;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let routes = RouteTable::new().with_route("/health", HandlerConfig::new("HealthHandler"));
//!     let router = Arc::new(Router::new(routes));
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, addr) = listener.accept().await?;
//!         let router = Arc::clone(&router);
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, Some(addr), router);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod framer;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
