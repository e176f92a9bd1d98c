use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::config::HandlerConfig;
use crate::handlers::sleep::DEFAULT_SLEEP_SECONDS;
use crate::handlers::static_files::RootError;
use crate::handlers::{
    CrudHandler, EchoHandler, Handler, HealthHandler, NotFoundHandler, SleepHandler,
    StaticFileHandler,
};
use crate::store::{EntityStore, MemoryStore};

/// The closed set of handler types a route can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Echo,
    Health,
    Static,
    Crud,
    Sleep,
    NotFound,
}

impl HandlerKind {
    /// Resolves a configured type name. Unknown names fall back to `NotFound`.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "EchoHandler" => HandlerKind::Echo,
            "HealthHandler" => HandlerKind::Health,
            "StaticHandler" => HandlerKind::Static,
            "CrudHandler" => HandlerKind::Crud,
            "SleepHandler" => HandlerKind::Sleep,
            _ => HandlerKind::NotFound,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            HandlerKind::Echo => "EchoHandler",
            HandlerKind::Health => "HealthHandler",
            HandlerKind::Static => "StaticHandler",
            HandlerKind::Crud => "CrudHandler",
            HandlerKind::Sleep => "SleepHandler",
            HandlerKind::NotFound => "NotFoundHandler",
        }
    }
}

/// A route whose settings cannot produce a handler.
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("{handler} requires the {setting:?} setting")]
    MissingSetting {
        handler: &'static str,
        setting: &'static str,
    },
    #[error("{handler} setting {setting:?} has invalid value {value:?}")]
    InvalidSetting {
        handler: &'static str,
        setting: &'static str,
        value: String,
    },
    #[error(transparent)]
    StaticRoot(#[from] RootError),
}

/// Builds handlers from route configuration.
///
/// Every CRUD handler built by one factory shares the factory's store.
#[derive(Clone)]
pub struct HandlerFactory {
    store: Arc<dyn EntityStore>,
}

impl Default for HandlerFactory {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}

impl HandlerFactory {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Builds the handler `config` describes, mounted at `mount`.
    pub fn build(
        &self,
        config: &HandlerConfig,
        mount: &str,
    ) -> Result<Box<dyn Handler>, FactoryError> {
        let handler: Box<dyn Handler> = match HandlerKind::from_type_name(&config.kind) {
            HandlerKind::Echo => Box::new(EchoHandler),
            HandlerKind::Health => Box::new(HealthHandler),
            HandlerKind::NotFound => Box::new(NotFoundHandler),
            HandlerKind::Crud => Box::new(CrudHandler::new(mount, Arc::clone(&self.store))),
            HandlerKind::Sleep => Box::new(SleepHandler::new(sleep_seconds(config)?)),
            HandlerKind::Static => {
                let root = config.setting("root").ok_or(FactoryError::MissingSetting {
                    handler: "StaticHandler",
                    setting: "root",
                })?;
                let handler = match config.setting("supported_extensions") {
                    Some(list) => {
                        StaticFileHandler::with_extensions(root, mount, parse_extensions(list))?
                    }
                    None => StaticFileHandler::new(root, mount)?,
                };
                Box::new(handler)
            }
        };
        Ok(handler)
    }
}

fn sleep_seconds(config: &HandlerConfig) -> Result<u64, FactoryError> {
    match config.setting("sleep_seconds") {
        None => Ok(DEFAULT_SLEEP_SECONDS),
        Some(value) => value.trim().parse().map_err(|_| FactoryError::InvalidSetting {
            handler: "SleepHandler",
            setting: "sleep_seconds",
            value: value.to_string(),
        }),
    }
}

/// Parses a comma-separated extension list into lower-case, dot-prefixed entries.
///
/// # Example
///
/// ```
/// # use lantern::routing::factory::parse_extensions;
/// let exts = parse_extensions("html, .CSS,,js");
/// assert!(exts.contains(".html"));
/// assert!(exts.contains(".css"));
/// assert!(exts.contains(".js"));
/// assert_eq!(exts.len(), 3);
/// ```
pub fn parse_extensions(list: &str) -> HashSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            if ext.starts_with('.') {
                ext
            } else {
                format!(".{}", ext)
            }
        })
        .collect()
}
