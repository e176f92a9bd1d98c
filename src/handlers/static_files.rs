//! Static file serving.
//!
//! A request for `<mount>/a/b.html` is served from `<root>/a/b.html`. The part
//! after the mount prefix is reduced to plain path segments before it is
//! joined to the root, so `.` and `..` can never leave the root directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::handlers::Handler;
use crate::http::mime;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

/// Extensions served when a route does not configure its own set.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".html", ".htm", ".css", ".js", ".json", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".txt",
    ".xml", ".pdf", ".ico", ".zip",
];

#[derive(Debug, Error)]
pub enum RootError {
    #[error("root path does not exist: {0}")]
    Missing(PathBuf),
    #[error("root path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct StaticFileHandler {
    root: PathBuf,
    mount: String,
    extensions: HashSet<String>,
}

impl StaticFileHandler {
    /// Serves files below `root` for requests under `mount`, limited to the
    /// default extensions.
    pub fn new(root: impl Into<PathBuf>, mount: impl Into<String>) -> Result<Self, RootError> {
        let extensions = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
        Self::with_extensions(root, mount, extensions)
    }

    /// `extensions` are expected lower-case with their leading dot.
    pub fn with_extensions(
        root: impl Into<PathBuf>,
        mount: impl Into<String>,
        extensions: HashSet<String>,
    ) -> Result<Self, RootError> {
        let root = root.into();
        if !root.exists() {
            return Err(RootError::Missing(root));
        }
        if !root.is_dir() {
            return Err(RootError::NotADirectory(root));
        }

        Ok(Self {
            root,
            mount: mount.into(),
            extensions,
        })
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        mime::extension_of(path).is_some_and(|ext| self.extensions.contains(&ext))
    }

    /// Maps a request path onto a file below the root.
    pub fn resolve(&self, request_path: &str) -> PathBuf {
        let relative = request_path.strip_prefix(self.mount.as_str()).unwrap_or("");
        self.root.join(sanitize(relative))
    }
}

impl Handler for StaticFileHandler {
    fn handle(&self, request: &Request) -> Response {
        let full_path = self.resolve(&request.base_path);

        if !full_path.is_file() {
            return Response::not_found();
        }

        if !self.is_supported(&full_path) {
            return Response::text(
                StatusCode::UnsupportedMediaType,
                "415 - Unsupported file type",
            );
        }

        match std::fs::read(&full_path) {
            Ok(contents) => {
                Response::with_content(StatusCode::Ok, mime::from_path(&full_path), contents)
            }
            Err(e) => {
                warn!(path = %full_path.display(), error = %e, "Could not read file");
                Response::internal_error("500 - Could not read file")
            }
        }
    }

    fn name(&self) -> &'static str {
        "StaticHandler"
    }
}

/// Drops empty, `.` and `..` segments.
fn sanitize(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_traversal() {
        assert_eq!(sanitize("/../../etc/passwd"), "etc/passwd");
        assert_eq!(sanitize("/a/./b//c.txt"), "a/b/c.txt");
        assert_eq!(sanitize("/"), "");
    }
}
