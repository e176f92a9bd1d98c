use tracing::debug;

use crate::config::{HandlerConfig, RouteTable};
use crate::handlers::Handler;
use crate::routing::factory::{FactoryError, HandlerFactory, HandlerKind};

/// The route selected for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// Winning prefix, or the path itself when nothing matched
    pub prefix: &'a str,
    pub config: &'a HandlerConfig,
    /// False when the not-found fallback was synthesized
    pub matched: bool,
}

/// Longest-prefix router over an immutable route table.
///
/// Routing only reads the table, so one router is shared by reference across
/// every connection.
pub struct Router {
    routes: RouteTable,
    factory: HandlerFactory,
    fallback: HandlerConfig,
}

impl Router {
    pub fn new(routes: RouteTable) -> Self {
        Self::with_factory(routes, HandlerFactory::default())
    }

    pub fn with_factory(routes: RouteTable, factory: HandlerFactory) -> Self {
        Self {
            routes,
            factory,
            fallback: HandlerConfig::new(HandlerKind::NotFound.type_name()),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Finds the longest configured prefix of `path`, compared byte-wise.
    ///
    /// Among equally long matches the first in table order wins.
    pub fn resolve<'a>(&'a self, path: &'a str) -> RouteMatch<'a> {
        let mut best: Option<(&str, &HandlerConfig)> = None;

        for (prefix, config) in self.routes.iter() {
            if !path.starts_with(prefix) {
                continue;
            }
            if best.is_none_or(|(current, _)| prefix.len() > current.len()) {
                best = Some((prefix, config));
            }
        }

        match best {
            Some((prefix, config)) => RouteMatch {
                prefix,
                config,
                matched: true,
            },
            None => RouteMatch {
                prefix: path,
                config: &self.fallback,
                matched: false,
            },
        }
    }

    /// Selects and builds the handler for `path`.
    pub fn match_handler(&self, path: &str) -> Result<Box<dyn Handler>, FactoryError> {
        let route = self.resolve(path);
        debug!(
            path,
            prefix = route.prefix,
            handler = %route.config.kind,
            matched = route.matched,
            "Resolved route"
        );
        self.factory.build(route.config, route.prefix)
    }
}
