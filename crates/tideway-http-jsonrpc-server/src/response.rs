//! HTTP response builders for the JSON-RPC endpoint
//!
//! Everything that reached the dispatcher is answered 200 with envelope
//! bodies; only the transport-level gates (unknown route, disallowed HTTP
//! method) use other status codes.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode, header};
use tracing::error;

use tideway_jsonrpc::DispatchReply;

/// HTTP body type for JSON-RPC responses
type JsonRpcBody = Full<Bytes>;

/// Encode a dispatch reply as an HTTP 200 response.
pub fn reply_response(reply: &DispatchReply) -> Response<JsonRpcBody> {
    let body = serde_json::to_vec(reply).unwrap_or_else(|err| {
        error!(%err, "failed to serialize JSON-RPC reply");
        b"{}".to_vec()
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// 405 for HTTP methods the endpoint does not serve.
pub fn method_not_allowed_response() -> Response<JsonRpcBody> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(header::ALLOW, "GET, POST")
        .body(Full::new(Bytes::from("Method not allowed")))
        .unwrap()
}

/// 404 for paths outside the listen set.
pub fn not_found_response() -> Response<JsonRpcBody> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Full::new(Bytes::from("Not Found")))
        .unwrap()
}
