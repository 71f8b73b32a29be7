//! Outgoing request construction

use std::sync::atomic::{AtomicI64, Ordering};

use tracing::debug;

use tideway_jsonrpc::{JsonRpcRequest, RequestParams};

/// Builds request envelopes with a strictly increasing id, starting at 1,
/// scoped to the builder instance.
///
/// The increment is atomic so one builder can be shared across concurrent
/// callers. `build` never fails: an empty method name is a caller bug, and
/// only incoming calls go through validation (on the dispatcher side).
#[derive(Debug)]
pub struct RequestBuilder {
    counter: AtomicI64,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            counter: AtomicI64::new(1),
        }
    }

    /// Construct a request envelope, consuming the next id.
    pub fn build(
        &self,
        method: impl Into<String>,
        params: Option<RequestParams>,
    ) -> JsonRpcRequest {
        let method = method.into();
        debug_assert!(!method.is_empty(), "method name must be non-empty");

        let id = self.counter.fetch_add(1, Ordering::SeqCst);
        debug!(
            id,
            method = %method,
            params = %params
                .as_ref()
                .map(|p| p.to_value().to_string())
                .unwrap_or_else(|| "null".to_string()),
            "built JSON-RPC request"
        );

        JsonRpcRequest::new(id, method, params)
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
