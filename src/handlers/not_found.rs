use crate::handlers::Handler;
use crate::http::request::Request;
use crate::http::response::Response;

/// Serves unmatched paths and routes with an unknown handler type.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotFoundHandler;

impl Handler for NotFoundHandler {
    fn handle(&self, _request: &Request) -> Response {
        Response::not_found()
    }

    fn name(&self) -> &'static str {
        "NotFoundHandler"
    }
}
