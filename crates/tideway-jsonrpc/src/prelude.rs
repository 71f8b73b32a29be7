//! # Protocol Core Prelude
//!
//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use tideway_jsonrpc::prelude::*;
//! ```

pub use crate::dispatch::{FunctionHandler, ParamsPolicy, RequestDispatcher, RpcHandler};
pub use crate::error::{ApplicationError, JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject};
pub use crate::request::{JsonRpcRequest, RequestParams};
pub use crate::response::{DispatchReply, JsonRpcResponse, ResponseEnvelope};
pub use crate::types::{JsonRpcVersion, RequestId};

// Standard error codes
pub use crate::error_codes::*;
