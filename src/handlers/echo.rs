use crate::handlers::Handler;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

/// Replies with the request exactly as it was received.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoHandler;

impl Handler for EchoHandler {
    fn handle(&self, request: &Request) -> Response {
        Response::text(StatusCode::Ok, request.raw.clone())
    }

    fn name(&self) -> &'static str {
        "EchoHandler"
    }
}
