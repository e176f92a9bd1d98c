use std::collections::BTreeMap;

/// HTTP status codes produced by the server.
///
/// - `Ok` (200): Request successful
/// - `Created` (201): Resource created successfully
/// - `BadRequest` (400): Malformed request
/// - `NotFound` (404): Resource not found
/// - `UnsupportedMediaType` (415): File type not served
/// - `InternalServerError` (500): Server error
/// - `NotImplemented` (501): Method not handled by the handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 415 Unsupported Media Type
    UnsupportedMediaType,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::UnsupportedMediaType => 415,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::UnsupportedMediaType => "Unsupported Media Type",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// `Content-Length` always reflects the body: it is computed when the
/// response is built and recomputed by [`Response::set_body`]. Only
/// [`Response::set_header`] can put a different value there.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP version written on the status line
    pub version: String,
    /// The HTTP status code
    pub status: StatusCode,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use lantern::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// assert_eq!(response.header("Content-Length"), Some("2"));
/// ```
pub struct ResponseBuilder {
    version: String,
    status: StatusCode,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: "HTTP/1.1".to_string(),
            status,
            headers: BTreeMap::new(),
            body: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Adds or replaces a header.
    ///
    /// Names are compared without regard to ASCII case. A `Content-Length`
    /// given here is overwritten by [`ResponseBuilder::build`].
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, key.into(), value.into());
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the final Response with `Content-Length` derived from the body.
    pub fn build(self) -> Response {
        let mut response = Response {
            version: self.version,
            status: self.status,
            headers: self.headers,
            body: Vec::new(),
        };
        response.set_body(self.body);
        response
    }
}

impl Response {
    /// Creates an empty response with `Content-Length: 0`.
    pub fn new(status: StatusCode) -> Self {
        ResponseBuilder::new(status).build()
    }

    /// Creates a response with a single `Content-Type` header.
    pub fn with_content(
        status: StatusCode,
        content_type: &str,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", content_type)
            .body(body)
            .build()
    }

    /// Creates a plain-text response.
    pub fn text(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self::with_content(status, "text/plain", body)
    }

    /// Creates a JSON response.
    pub fn json(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self::with_content(status, "application/json", body)
    }

    /// Creates a 200 OK plain-text response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::text(StatusCode::Ok, body)
    }

    /// Creates the 404 Not Found page.
    pub fn not_found() -> Self {
        Self::with_content(StatusCode::NotFound, "text/html", "<h1>404 Not Found</h1>")
    }

    /// Creates a 400 Bad Request response with a plain-text explanation.
    pub fn bad_request(reason: &str) -> Self {
        Self::text(StatusCode::BadRequest, reason)
    }

    /// Creates a 500 Internal Server Error response with a plain-text explanation.
    pub fn internal_error(reason: &str) -> Self {
        Self::text(StatusCode::InternalServerError, reason)
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn reason_phrase(&self) -> &'static str {
        self.status.reason_phrase()
    }

    /// Looks up a header, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over headers in serialization order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Adds or replaces a header verbatim, `Content-Length` included.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        set_header(&mut self.headers, key.into(), value.into());
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replaces the body and recomputes `Content-Length`.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
        let length = self.body.len().to_string();
        set_header(&mut self.headers, "Content-Length".to_string(), length);
    }

    /// Serializes the response into wire format.
    pub fn to_bytes(&self) -> Vec<u8> {
        crate::http::writer::serialize_response(self)
    }
}

fn set_header(headers: &mut BTreeMap<String, String>, key: String, value: String) {
    headers.retain(|name, _| !name.eq_ignore_ascii_case(&key));
    headers.insert(key, value);
}
