use crate::handlers::Handler;
use crate::http::request::Request;
use crate::http::response::Response;

#[derive(Debug, Default, Clone, Copy)]
pub struct HealthHandler;

impl Handler for HealthHandler {
    fn handle(&self, _request: &Request) -> Response {
        Response::ok("OK")
    }

    fn name(&self) -> &'static str {
        "HealthHandler"
    }
}
