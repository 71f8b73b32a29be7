//! # Client Prelude
//!
//! Convenient re-exports of the most commonly used client types.
//!
//! ```rust
//! use tideway_jsonrpc_client::prelude::*;
//! ```

pub use crate::builder::RequestBuilder;
pub use crate::error::{ClientError, ClientResult};
pub use crate::http::{
    BasicCredentials, CallOptions, HttpTransport, JsonRpcClient, RequestPayload, UriParts,
};
pub use crate::interpret::{RpcOutcome, interpret};

pub use tideway_jsonrpc::{JsonRpcRequest, RequestId, RequestParams};
