//! Server configuration.
//!
//! The configuration file is YAML:
//!
//! ```yaml
//! port: 8080
//! routes:
//!   - path: /health
//!     handler: HealthHandler
//!   - path: /static
//!     handler: StaticHandler
//!     settings:
//!       root: ./public
//!       supported_extensions: html,css,js
//! ```
//!
//! Each route maps a path prefix to a [`HandlerConfig`]; the ordered set of
//! them forms the [`RouteTable`] the router reads for the server's lifetime.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("port must be between 1 and 65535")]
    MissingPort,
    #[error("configuration defines no routes")]
    NoRoutes,
    #[error("setting {setting:?} of route {path:?} must be a string, number or boolean")]
    InvalidSetting { path: String, setting: String },
}

/// Top-level configuration as it appears in the file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// One `routes` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    pub path: String,
    pub handler: String,
    #[serde(default)]
    pub settings: BTreeMap<String, Value>,
}

/// Declarative description of a handler: its type name and opaque settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerConfig {
    pub kind: String,
    pub settings: BTreeMap<String, String>,
}

impl HandlerConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            settings: BTreeMap::new(),
        }
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(|v| v.as_str())
    }
}

/// Path prefixes mapped to handler configurations, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<(String, HandlerConfig)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route. A prefix that is already present keeps its position and
    /// takes the new configuration.
    pub fn insert(&mut self, prefix: impl Into<String>, config: HandlerConfig) {
        let prefix = prefix.into();
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = config,
            None => self.entries.push((prefix, config)),
        }
    }

    pub fn with_route(mut self, prefix: impl Into<String>, config: HandlerConfig) -> Self {
        self.insert(prefix, config);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HandlerConfig)> {
        self.entries.iter().map(|(p, c)| (p.as_str(), c))
    }
}

impl Config {
    /// Reads, parses and checks a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::MissingPort);
        }
        if self.routes.is_empty() {
            return Err(ConfigError::NoRoutes);
        }
        for route in &self.routes {
            for (key, value) in &route.settings {
                if scalar_to_string(value).is_none() {
                    return Err(ConfigError::InvalidSetting {
                        path: route.path.clone(),
                        setting: key.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Builds the route table handed to the router.
    pub fn route_table(&self) -> RouteTable {
        let mut table = RouteTable::new();
        for route in &self.routes {
            let settings = route
                .settings
                .iter()
                .filter_map(|(k, v)| scalar_to_string(v).map(|v| (k.clone(), v)))
                .collect();
            table.insert(
                route.path.clone(),
                HandlerConfig {
                    kind: route.handler.clone(),
                    settings,
                },
            );
        }
        table
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
