//! # HTTP JSON-RPC Server
//!
//! This crate binds the transport-agnostic [`tideway_jsonrpc`] dispatcher
//! to an HTTP endpoint: a hyper `http1` accept loop, route matching
//! against the configured listen set, and the HTTP-level contract of the
//! protocol.
//!
//! The HTTP method gate (405 for anything but POST/GET) runs before any
//! JSON-RPC processing. Everything that passes it is answered with HTTP
//! 200 and one or more response envelopes, protocol errors included; the
//! error taxonomy lives inside the body, not in the status line.

pub mod response;
pub mod server;

mod endpoint;

#[cfg(test)]
mod tests;

// Re-export main types
pub use server::{JsonRpcHttpServer, JsonRpcHttpServerBuilder, ServerConfig};

// Re-export foundational types
pub use tideway_jsonrpc::{
    ApplicationError, DispatchReply, JsonRpcRequest, ParamsPolicy, RequestDispatcher, RpcHandler,
};

/// Result type for HTTP server operations
pub type Result<T> = std::result::Result<T, HttpServerError>;

/// HTTP server specific errors
#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
