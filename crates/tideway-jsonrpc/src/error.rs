use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::types::{JsonRpcVersion, RequestId};

/// The fixed JSON-RPC 2.0 protocol error codes.
/// Application errors carry arbitrary caller-chosen codes and are not part
/// of this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError,
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => -32700,
            JsonRpcErrorCode::InvalidRequest => -32600,
            JsonRpcErrorCode::MethodNotFound => -32601,
            JsonRpcErrorCode::InvalidParams => -32602,
            JsonRpcErrorCode::InternalError => -32603,
            JsonRpcErrorCode::ServerError => -32000,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
            JsonRpcErrorCode::ServerError => "Server error",
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// The `error` member of an error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    pub fn protocol(code: JsonRpcErrorCode) -> Self {
        Self {
            code: code.code(),
            message: code.message().to_string(),
            data: None,
        }
    }

    pub fn application(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// A JSON-RPC error response envelope.
///
/// `id` is always serialized, `null` where the protocol demands it. The
/// constructors below are the only producers of protocol errors; handlers
/// can only surface application errors through [`ApplicationError`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub error: JsonRpcErrorObject,
    pub id: Option<RequestId>,
}

impl JsonRpcError {
    pub fn new(id: Option<RequestId>, error: JsonRpcErrorObject) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            error,
            id,
        }
    }

    /// Parse error (-32700). The request was never intelligible, so `id`
    /// is always `null`.
    pub fn parse_error() -> Self {
        Self::new(None, JsonRpcErrorObject::protocol(JsonRpcErrorCode::ParseError))
    }

    /// Invalid Request (-32600), `id: null`.
    pub fn invalid_request() -> Self {
        Self::new(
            None,
            JsonRpcErrorObject::protocol(JsonRpcErrorCode::InvalidRequest),
        )
    }

    /// Method not found (-32601), id echoed when the request carried one.
    pub fn method_not_found(id: Option<RequestId>) -> Self {
        Self::new(
            id,
            JsonRpcErrorObject::protocol(JsonRpcErrorCode::MethodNotFound),
        )
    }

    /// Invalid params (-32602), id echoed.
    pub fn invalid_params(id: Option<RequestId>) -> Self {
        Self::new(
            id,
            JsonRpcErrorObject::protocol(JsonRpcErrorCode::InvalidParams),
        )
    }

    /// Internal error (-32603), id echoed.
    pub fn internal_error(id: Option<RequestId>) -> Self {
        Self::new(
            id,
            JsonRpcErrorObject::protocol(JsonRpcErrorCode::InternalError),
        )
    }

    /// Server error (-32000), id echoed.
    pub fn server_error(id: Option<RequestId>) -> Self {
        Self::new(
            id,
            JsonRpcErrorObject::protocol(JsonRpcErrorCode::ServerError),
        )
    }

    /// Application error with a handler-chosen code and message, id echoed.
    pub fn application_error(
        id: Option<RequestId>,
        code: i64,
        message: impl Into<String>,
    ) -> Self {
        Self::new(id, JsonRpcErrorObject::application(code, message))
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JSON-RPC error {}: {}",
            self.error.code, self.error.message
        )
    }
}

impl std::error::Error for JsonRpcError {}

/// A failure signalled by application handler logic, surfaced verbatim in
/// the response's error field. Distinct from protocol errors: the code and
/// message are the handler's to choose.
#[derive(Debug, Clone, Error)]
#[error("application error {code}: {message}")]
pub struct ApplicationError {
    pub code: i64,
    pub message: String,
}

impl ApplicationError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Default for ApplicationError {
    fn default() -> Self {
        Self {
            code: 0,
            message: "Unknown error".to_string(),
        }
    }
}

impl From<ApplicationError> for JsonRpcErrorObject {
    fn from(err: ApplicationError) -> Self {
        JsonRpcErrorObject::application(err.code, err.message)
    }
}
