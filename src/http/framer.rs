//! Request framing.
//!
//! Decides, from the bytes buffered so far on a connection, whether a request
//! is still arriving or can be parsed. Framing only
//! looks for the end of the header block and counts body bytes. Whether the
//! header block makes sense is decided later by [`Request::validate`].
//!
//! [`Request::validate`]: crate::http::request::Request::validate

use thiserror::Error;

use crate::http::request::Request;

const CRLF_TERMINATOR: &[u8] = b"\r\n\r\n";
const LF_TERMINATOR: &[u8] = b"\n\n";

/// What the buffered bytes look like before any parsing happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Nothing has been received yet.
    Empty,
    /// Bytes are present but the header block has not ended.
    NoHeaderTerminator,
    /// A header terminator is present; `header_len` covers the head including it.
    Terminated { header_len: usize },
}

/// How much of a declared body has been buffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyProgress {
    Incomplete { received: usize, declared: usize },
    /// The request occupies the first `frame_len` bytes of the buffer.
    Complete { frame_len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("invalid Content-Length header {0:?}")]
    InvalidContentLength(String),
}

pub fn classify(buf: &[u8]) -> Classification {
    if buf.is_empty() {
        return Classification::Empty;
    }
    match header_block_len(buf) {
        Some(header_len) => Classification::Terminated { header_len },
        None => Classification::NoHeaderTerminator,
    }
}

/// True once a header terminator appears anywhere in `buf`.
pub fn detect_boundary(buf: &[u8]) -> bool {
    find_terminator(buf).is_some()
}

/// Length of the header block, terminator included.
pub fn header_block_len(buf: &[u8]) -> Option<usize> {
    find_terminator(buf).map(|(start, len)| start + len)
}

/// The body length a request announces through `Content-Length`.
///
/// `Ok(None)` when the header is absent. A value that is not a plain decimal
/// number can never be satisfied by reading more, so it is an error.
pub fn declared_length(request: &Request) -> Result<Option<usize>, FrameError> {
    let Some(value) = request.header("Content-Length") else {
        return Ok(None);
    };

    let digits = value.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FrameError::InvalidContentLength(value.to_string()));
    }

    digits
        .parse::<usize>()
        .map(Some)
        .map_err(|_| FrameError::InvalidContentLength(value.to_string()))
}

pub fn body_progress(buf: &[u8], header_len: usize, declared: usize) -> BodyProgress {
    let received = buf.len().saturating_sub(header_len);
    if received < declared {
        BodyProgress::Incomplete { received, declared }
    } else {
        BodyProgress::Complete {
            frame_len: header_len + declared,
        }
    }
}

/// Earliest terminator as `(start, length)`; bare LF line endings are tolerated.
fn find_terminator(buf: &[u8]) -> Option<(usize, usize)> {
    let crlf = find(buf, CRLF_TERMINATOR);
    let lf = find(buf, LF_TERMINATOR);

    match (crlf, lf) {
        (Some(c), Some(l)) if l < c => Some((l, LF_TERMINATOR.len())),
        (Some(c), _) => Some((c, CRLF_TERMINATOR.len())),
        (None, Some(l)) => Some((l, LF_TERMINATOR.len())),
        (None, None) => None,
    }
}

fn find(buf: &[u8], needle: &[u8]) -> Option<usize> {
    buf.windows(needle.len()).position(|w| w == needle)
}
