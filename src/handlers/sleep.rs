use std::time::Duration;

use crate::handlers::Handler;
use crate::http::request::Request;
use crate::http::response::Response;

pub const DEFAULT_SLEEP_SECONDS: u64 = 5;

/// Blocks the calling thread before answering. Used to observe how the server
/// behaves while a worker is tied up.
#[derive(Debug, Clone, Copy)]
pub struct SleepHandler {
    seconds: u64,
}

impl SleepHandler {
    pub fn new(seconds: u64) -> Self {
        Self { seconds }
    }
}

impl Default for SleepHandler {
    fn default() -> Self {
        Self::new(DEFAULT_SLEEP_SECONDS)
    }
}

impl Handler for SleepHandler {
    fn handle(&self, _request: &Request) -> Response {
        std::thread::sleep(Duration::from_secs(self.seconds));
        Response::ok(format!("Slept for {} seconds", self.seconds))
    }

    fn name(&self) -> &'static str {
        "SleepHandler"
    }
}
