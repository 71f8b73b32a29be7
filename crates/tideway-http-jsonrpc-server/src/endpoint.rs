//! Inbound call handling for a matched route

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Method, Request, Response};
use tracing::{debug, warn};

use tideway_jsonrpc::{DispatchReply, JsonRpcError, RequestDispatcher};

use crate::response;
use crate::server::ServerConfig;

/// Handle one inbound call: collect the body, then run [`respond`].
pub(crate) async fn handle(
    dispatcher: &RequestDispatcher,
    config: &ServerConfig,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    let method = req.method().clone();

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            // A half-read body is indistinguishable from a malformed one
            // at the protocol level.
            warn!(%err, "failed to read request body");
            Bytes::new()
        }
    };

    respond(dispatcher, config, &method, &body).await
}

/// The endpoint pipeline on raw parts, separated from the hyper plumbing
/// so it can be exercised without a live connection.
///
/// The HTTP method gate runs before any JSON-RPC processing. Past it,
/// every outcome is HTTP 200: unreadable and oversized bodies degrade to
/// a Parse error envelope, exactly like unparseable JSON.
pub(crate) async fn respond(
    dispatcher: &RequestDispatcher,
    config: &ServerConfig,
    method: &Method,
    body: &[u8],
) -> Response<Full<Bytes>> {
    if method != Method::POST && method != Method::GET {
        return response::method_not_allowed_response();
    }

    if body.len() > config.max_body_size {
        warn!(bytes = body.len(), "request body exceeds configured maximum");
        return parse_error_response();
    }

    let Ok(text) = std::str::from_utf8(body) else {
        return parse_error_response();
    };

    debug!(request = %text, "inbound JSON-RPC call");
    let reply = dispatcher.dispatch(text).await;
    response::reply_response(&reply)
}

fn parse_error_response() -> Response<Full<Bytes>> {
    response::reply_response(&DispatchReply::Single(JsonRpcError::parse_error().into()))
}
