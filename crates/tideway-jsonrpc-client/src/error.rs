//! Error types for client-side JSON-RPC operations

use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures a call can surface on the client side.
///
/// The four transport variants classify the HTTP status before any body
/// parsing happens; `Rpc` carries an error object a server answered with;
/// `InvalidResponse` covers bodies the protocol contract cannot account
/// for. Connection-level failures (DNS, refused, timeout) arrive as
/// `Http` and are equivalent to an uninterpretable response.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Internal JSON-RPC informational error {0}")]
    TransportInformational(u16),

    #[error("Internal JSON-RPC redirection error {0}")]
    TransportRedirection(u16),

    #[error("Internal JSON-RPC client error {0}")]
    TransportClient(u16),

    #[error("Internal JSON-RPC server error {0}")]
    TransportServer(u16),

    /// An error object returned by the server, surfaced verbatim
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The body was not a recognizable JSON-RPC response
    #[error("Internal JSON-RPC response error")]
    InvalidResponse,

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// The HTTP status a transport-classified failure carries.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::TransportInformational(status)
            | ClientError::TransportRedirection(status)
            | ClientError::TransportClient(status)
            | ClientError::TransportServer(status) => Some(*status),
            _ => None,
        }
    }

    /// The protocol-level error code, if the server answered with one.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            ClientError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.status().is_some() || matches!(self, ClientError::Http(_))
    }
}
