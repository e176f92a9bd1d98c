use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tracing::{debug, info, warn};

use crate::http::framer::{self, BodyProgress, Classification};
use crate::http::parser;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::routing::Router;

const READ_CHUNK: usize = 1024;

/// Handler name logged for requests rejected before routing.
const MALFORMED_REQUEST: &str = "MalformedRequest";
/// Handler name logged when the matched route cannot build its handler.
const MISCONFIGURED_ROUTE: &str = "MisconfiguredRoute";

/// One client connection: owns the socket and the bytes buffered from it.
///
/// Requests on a connection are strictly sequential. Bytes of a following
/// request that arrive early stay in the buffer and are looked at only once the
/// current response has been written.
pub struct Connection<S> {
    stream: S,
    peer: Option<SocketAddr>,
    router: Arc<Router>,
    buffer: BytesMut,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    AwaitingBody(PendingRequest),
    Dispatching(Request),
    Writing(ResponseWriter),
    Closed,
}

/// A request whose header block has been parsed but whose body is still arriving.
pub struct PendingRequest {
    head: Request,
    header_len: usize,
    body_len: usize,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: Option<SocketAddr>, router: Arc<Router>) -> Self {
        Self {
            stream,
            peer,
            router,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Reading,
        }
    }

    /// Serves requests until the peer closes the connection.
    ///
    /// Request headers never end the connection; only end of stream does.
    ///
    /// Any I/O error ends the connection and is returned to the caller.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => self.read_head().await?,

                ConnectionState::AwaitingBody(pending) => self.read_body(pending).await?,

                ConnectionState::Dispatching(request) => self.dispatch(request),

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    ConnectionState::Reading // go back for next request
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    async fn read_head(&mut self) -> anyhow::Result<ConnectionState> {
        let header_len = match framer::classify(&self.buffer) {
            Classification::Terminated { header_len } => header_len,
            Classification::Empty | Classification::NoHeaderTerminator => {
                return self.read_more(ConnectionState::Reading).await;
            }
        };

        let head = parser::parse_head(&self.buffer[..header_len]);

        match framer::declared_length(&head) {
            Ok(declared) => Ok(ConnectionState::AwaitingBody(PendingRequest {
                head,
                header_len,
                body_len: declared.unwrap_or(0),
            })),
            Err(e) => {
                debug!(error = %e, "Rejecting request");
                // The frame end is unknown, so nothing buffered can be trusted.
                self.buffer.clear();
                let response = Response::bad_request("Invalid Content-Length header");
                Ok(self.respond(&head, response, MALFORMED_REQUEST))
            }
        }
    }

    async fn read_body(&mut self, pending: PendingRequest) -> anyhow::Result<ConnectionState> {
        match framer::body_progress(&self.buffer, pending.header_len, pending.body_len) {
            BodyProgress::Incomplete { received, declared } => {
                debug!(received, declared, "Waiting for complete body");
                self.read_more(ConnectionState::AwaitingBody(pending)).await
            }
            BodyProgress::Complete { frame_len } => {
                let frame = self.buffer.split_to(frame_len);
                let request = parser::complete(pending.head, &frame, pending.header_len);

                if let Err(e) = request.validate() {
                    debug!(error = %e, path = %request.path, "Received malformed HTTP request");
                    let response = Response::bad_request("Malformed HTTP request");
                    return Ok(self.respond(&request, response, MALFORMED_REQUEST));
                }

                Ok(ConnectionState::Dispatching(request))
            }
        }
    }

    fn dispatch(&mut self, request: Request) -> ConnectionState {
        let (response, handler_name) = match self.router.match_handler(&request.base_path) {
            Ok(handler) => {
                debug!(
                    path = %request.path,
                    handler = handler.name(),
                    "Request is being handled"
                );
                (handler.handle(&request), handler.name())
            }
            Err(e) => {
                warn!(path = %request.path, error = %e, "Misconfigured route");
                (Response::internal_error("Misconfigured route"), MISCONFIGURED_ROUTE)
            }
        };

        self.respond(&request, response, handler_name)
    }

    /// Logs the outcome and moves to writing `response`.
    fn respond(&self, request: &Request, response: Response, handler: &str) -> ConnectionState {
        info!(
            status = response.status_code(),
            path = %request.path,
            handler,
            client = %self.client_ip(),
            "Response ready"
        );

        ConnectionState::Writing(ResponseWriter::new(&response))
    }

    /// Reads whatever the peer sends next, then continues in `next`.
    ///
    /// The peer closing its side ends the connection; a partially received
    /// request is dropped with it.
    async fn read_more(&mut self, next: ConnectionState) -> anyhow::Result<ConnectionState> {
        self.buffer.reserve(READ_CHUNK);
        let n = self.stream.read_buf(&mut self.buffer).await?;

        if n == 0 {
            if !self.buffer.is_empty() {
                debug!(buffered = self.buffer.len(), "Peer closed mid-request");
            }
            return Ok(ConnectionState::Closed);
        }

        Ok(next)
    }

    fn client_ip(&self) -> String {
        self.peer
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
