//! Lantern - a small prefix-routed HTTP server
//!
//! Core library: connection pipeline, routing and the built-in handlers.

pub mod config;
pub mod handlers;
pub mod http;
pub mod routing;
pub mod server;
pub mod store;
