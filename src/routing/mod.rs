//! Request routing.
//!
//! - **`router`**: picks the most specific configured prefix for a path
//! - **`factory`**: turns the chosen [`HandlerConfig`](crate::config::HandlerConfig)
//!   into a handler

pub mod factory;
pub mod router;

pub use factory::{FactoryError, HandlerFactory, HandlerKind};
pub use router::{RouteMatch, Router};
