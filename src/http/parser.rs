use std::collections::HashMap;

use thiserror::Error;

use crate::http::framer::{self, BodyProgress, Classification, FrameError};
use crate::http::request::{InvalidRequest, Method, Request, insert_header, split_target};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("request is incomplete")]
    Incomplete,
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Invalid(#[from] InvalidRequest),
}

/// Frames, parses and validates the first request in `buf`.
///
/// Returns the request and the number of bytes it occupies; anything after
/// that belongs to the next request. This is the one-shot entry point for
/// callers holding a whole buffer; a [`Connection`] runs the same steps one
/// state at a time as bytes arrive.
///
/// [`Connection`]: crate::http::connection::Connection
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let header_len = match framer::classify(buf) {
        Classification::Terminated { header_len } => header_len,
        Classification::Empty | Classification::NoHeaderTerminator => {
            return Err(ParseError::Incomplete);
        }
    };

    let head = parse_head(&buf[..header_len]);
    let declared = framer::declared_length(&head)?.unwrap_or(0);

    let frame_len = match framer::body_progress(buf, header_len, declared) {
        BodyProgress::Complete { frame_len } => frame_len,
        BodyProgress::Incomplete { .. } => return Err(ParseError::Incomplete),
    };

    let request = complete(head, &buf[..frame_len], header_len);
    request.validate()?;
    Ok((request, frame_len))
}

/// Parses request bytes without framing: everything after the header block is
/// taken as the body. Never fails; an unusable request line leaves the method,
/// path and version empty so that validation rejects it.
pub fn parse_request(bytes: &[u8]) -> Request {
    match framer::header_block_len(bytes) {
        Some(header_len) => complete(parse_head(&bytes[..header_len]), bytes, header_len),
        None => parse_head(bytes),
    }
}

/// Parses the request line and headers; the body is left empty.
pub fn parse_head(head: &[u8]) -> Request {
    let text = String::from_utf8_lossy(head);
    let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));

    let mut tokens = lines.next().unwrap_or_default().split_whitespace();
    let (method, path, version) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(m), Some(p), Some(v)) => (m, p, v),
        _ => ("", "", ""),
    };

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        // Lines without a colon carry nothing usable.
        if let Some((key, value)) = line.split_once(':') {
            insert_header(&mut headers, key.trim().to_string(), value.trim().to_string());
        }
    }

    let (base_path, query) = split_target(path);

    Request {
        method: Method::from(method),
        path: path.to_string(),
        base_path,
        query,
        version: version.to_string(),
        headers,
        body: Vec::new(),
        raw: head.to_vec(),
    }
}

/// Attaches the body and raw bytes of a fully buffered frame to its parsed head.
pub fn complete(mut head: Request, frame: &[u8], header_len: usize) -> Request {
    head.body = frame[header_len.min(frame.len())..].to_vec();
    head.raw = frame.to_vec();
    head
}
