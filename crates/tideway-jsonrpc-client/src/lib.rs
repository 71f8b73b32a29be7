//! # JSON-RPC 2.0 HTTP Client
//!
//! The calling side of the protocol: build request envelopes with
//! monotonically increasing ids, send them over HTTP, and interpret the
//! status and body that come back.
//!
//! The protocol contract only applies to 2xx exchanges; any other status
//! class is classified into a transport failure before the body is even
//! parsed. See [`interpret::interpret`] for the exact ladder.
//!
//! ```no_run
//! use serde_json::json;
//! use tideway_jsonrpc_client::prelude::*;
//!
//! # async fn run() -> ClientResult<()> {
//! let client = JsonRpcClient::new(
//!     UriParts::host("localhost").with_port(8000).with_path("/rpc"),
//! )?;
//! let params = RequestParams::Array(vec![json!(2), json!(3)]);
//! let result = client.call("add", Some(params)).await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod http;
pub mod interpret;

pub mod prelude;

// Re-export main types
pub use builder::RequestBuilder;
pub use error::{ClientError, ClientResult};
pub use http::{BasicCredentials, CallOptions, HttpTransport, JsonRpcClient, RequestPayload, UriParts};
pub use interpret::{RpcOutcome, interpret};
