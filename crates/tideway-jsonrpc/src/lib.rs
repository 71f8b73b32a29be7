//! # JSON-RPC 2.0 Protocol Core
//!
//! A pure, transport-agnostic JSON-RPC 2.0 implementation: envelope types,
//! the fixed error taxonomy, and the server-side dispatch state machine.
//! Transports (HTTP client and server bindings) live in sibling crates and
//! consume this one.
//!
//! ## Features
//! - Full JSON-RPC 2.0 envelope model with single/batch discrimination
//! - Fixed protocol error codes plus pass-through application errors
//! - Startup-built handler registry with async handlers
//! - Batch responses positionally correlated with their requests

pub mod dispatch;
pub mod error;
pub mod request;
pub mod response;
pub mod types;

pub mod prelude;

// Re-export main types
pub use dispatch::{FunctionHandler, ParamsPolicy, RequestDispatcher, RpcHandler};
pub use error::{ApplicationError, JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject};
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{DispatchReply, JsonRpcResponse, ResponseEnvelope};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
