use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// HTTP request methods.
///
/// Only GET, POST, PUT and DELETE are served. Any other token on the request
/// line is kept verbatim in `Other` so the request can still be parsed and
/// logged before it is rejected as invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// Anything else, including an empty token
    Other(String),
}

impl Method {
    /// Returns the method token as it appears on the request line.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::request::Method;
    /// assert_eq!(Method::from("PUT").as_str(), "PUT");
    /// assert_eq!(Method::from("PATCH").as_str(), "PATCH");
    /// ```
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::Other(token) => token,
        }
    }

    /// Whether the server accepts requests with this method.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Method::Other(_))
    }
}

impl From<&str> for Method {
    /// Case-sensitive, like the request line itself.
    fn from(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            other => Method::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a parsed request is refused before routing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRequest {
    #[error("request line is missing method, path or version")]
    MissingRequestLine,
    #[error("unsupported HTTP version {0:?}")]
    UnsupportedVersion(String),
    #[error("unsupported method {0:?}")]
    UnsupportedMethod(String),
    #[error("path must start with '/'")]
    RelativePath,
    #[error("path contains a space")]
    SpaceInPath,
    #[error("header block is not terminated")]
    MissingTerminator,
}

/// Represents a parsed HTTP request from a client.
///
/// Built once per complete frame by the parser and handed to the handler by
/// shared reference; nothing downstream mutates it.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The full request target, query string included (e.g. "/search?q=rust")
    pub path: String,
    /// The request target with the query string removed
    pub base_path: String,
    /// Decoded query parameters; the first occurrence of a key is kept
    pub query: HashMap<String, String>,
    /// HTTP version (expected to be "HTTP/1.1")
    pub version: String,
    /// Request headers as received; use [`Request::header`] for lookups
    pub headers: HashMap<String, String>,
    /// Request body, exactly `Content-Length` bytes when framed by a connection
    pub body: Vec<u8>,
    /// The raw bytes of the request as received
    pub raw: Vec<u8>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
    raw: Option<Vec<u8>>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
            body: Vec::new(),
            raw: None,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        insert_header(&mut self.headers, key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Overrides the raw bytes; by default they are rendered from the other fields.
    pub fn raw(mut self, raw: impl Into<Vec<u8>>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let method = self.method.ok_or("method missing")?;
        let path = self.path.ok_or("path missing")?;
        let version = self.version.unwrap_or_else(|| "HTTP/1.1".to_string());

        let raw = match self.raw {
            Some(raw) => raw,
            None => render(&method, &path, &version, &self.headers, &self.body),
        };
        let (base_path, query) = split_target(&path);

        Ok(Request {
            method,
            path,
            base_path,
            query,
            version,
            headers: self.headers,
            body: self.body,
            raw,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring ASCII case.
    ///
    /// # Arguments
    ///
    /// * `key` - Header name to look up
    ///
    /// # Returns
    ///
    /// `Some(&str)` with the header value if present, `None` otherwise.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_header(&self, key: &str) -> bool {
        self.header(key).is_some()
    }

    /// Retrieves a decoded query parameter.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(|v| v.as_str())
    }

    /// Checks the fields a handler relies on.
    ///
    /// This is the second validation stage: the framer only decides that a
    /// header block is present, this decides whether its contents are usable.
    pub fn validate(&self) -> Result<(), InvalidRequest> {
        if self.method.as_str().is_empty() || self.path.is_empty() || self.version.is_empty() {
            return Err(InvalidRequest::MissingRequestLine);
        }
        if self.version != "HTTP/1.1" {
            return Err(InvalidRequest::UnsupportedVersion(self.version.clone()));
        }
        if !self.method.is_supported() {
            return Err(InvalidRequest::UnsupportedMethod(self.method.to_string()));
        }
        if !self.path.starts_with('/') {
            return Err(InvalidRequest::RelativePath);
        }
        if self.path.contains(' ') {
            return Err(InvalidRequest::SpaceInPath);
        }
        // Framed requests always carry a terminator; this catches requests
        // built by `parse_request` or `RequestBuilder::raw` without framing.
        if !crate::http::framer::detect_boundary(&self.raw) {
            return Err(InvalidRequest::MissingTerminator);
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Inserts a header, replacing any existing entry whose name differs only in case.
pub(crate) fn insert_header(headers: &mut HashMap<String, String>, key: String, value: String) {
    headers.retain(|name, _| !name.eq_ignore_ascii_case(&key));
    headers.insert(key, value);
}

/// Splits a request target into its base path and query parameters.
pub(crate) fn split_target(target: &str) -> (String, HashMap<String, String>) {
    let Some((base, query_string)) = target.split_once('?') else {
        return (target.to_string(), HashMap::new());
    };

    let mut query = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
        query.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }

    (base.to_string(), query)
}

fn render(
    method: &Method,
    path: &str,
    version: &str,
    headers: &HashMap<String, String>,
    body: &[u8],
) -> Vec<u8> {
    let mut raw = format!("{} {} {}\r\n", method, path, version).into_bytes();
    for (k, v) in headers {
        raw.extend_from_slice(format!("{}: {}\r\n", k, v).as_bytes());
    }
    raw.extend_from_slice(b"\r\n");
    raw.extend_from_slice(body);
    raw
}
