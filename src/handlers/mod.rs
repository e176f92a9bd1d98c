//! Request handlers.
//!
//! A handler turns one validated [`Request`] into one [`Response`]. Handlers
//! are built per request by the [`HandlerFactory`](crate::routing::factory::HandlerFactory)
//! and run synchronously on the connection's task; one that blocks holds a
//! runtime worker for as long as it blocks.

pub mod crud;
pub mod echo;
pub mod health;
pub mod not_found;
pub mod sleep;
pub mod static_files;

use crate::http::request::Request;
use crate::http::response::Response;

pub use crud::CrudHandler;
pub use echo::EchoHandler;
pub use health::HealthHandler;
pub use not_found::NotFoundHandler;
pub use sleep::SleepHandler;
pub use static_files::StaticFileHandler;

pub trait Handler: Send + Sync {
    fn handle(&self, request: &Request) -> Response;

    /// Name recorded in the per-request log line.
    fn name(&self) -> &'static str;
}
