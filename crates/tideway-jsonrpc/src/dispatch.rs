//! Request dispatch: parse, validate, route and answer inbound calls.
//!
//! The pipeline per inbound call is
//! `Received -> Parsed -> {Validated -> Invoked -> ResponseBuilt}* -> Sent`:
//! no element escapes without exactly one corresponding response envelope.
//! Validation failures are local to their batch slot; handler failures are
//! converted to application error envelopes and never abort the loop.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

use crate::JSONRPC_VERSION;
use crate::error::{ApplicationError, JsonRpcError};
use crate::request::{JsonRpcRequest, RequestParams};
use crate::response::{DispatchReply, ResponseEnvelope};
use crate::types::{JsonRpcVersion, RequestId};

/// A named, callable operation in the handler registry.
///
/// The full request envelope is the handler's single argument. The return
/// value becomes the response's `result`; a returned [`ApplicationError`]
/// is surfaced verbatim in the response's error field. Handler diagnostics
/// belong on the `tracing` channel, which never reaches the response body.
#[async_trait]
pub trait RpcHandler: Send + Sync {
    async fn call(&self, request: &JsonRpcRequest) -> Result<Value, ApplicationError>;
}

/// A closure-based handler for registrations that don't warrant a type.
pub struct FunctionHandler<F>
where
    F: Fn(JsonRpcRequest) -> BoxFuture<'static, Result<Value, ApplicationError>> + Send + Sync,
{
    handler_fn: F,
}

impl<F> FunctionHandler<F>
where
    F: Fn(JsonRpcRequest) -> BoxFuture<'static, Result<Value, ApplicationError>> + Send + Sync,
{
    pub fn new(handler_fn: F) -> Self {
        Self { handler_fn }
    }
}

#[async_trait]
impl<F> RpcHandler for FunctionHandler<F>
where
    F: Fn(JsonRpcRequest) -> BoxFuture<'static, Result<Value, ApplicationError>> + Send + Sync,
{
    async fn call(&self, request: &JsonRpcRequest) -> Result<Value, ApplicationError> {
        (self.handler_fn)(request.clone()).await
    }
}

/// Whether `params` must be present on every request.
///
/// Historical server variants disagree on this, so it is an explicit
/// switch rather than a silently picked behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamsPolicy {
    /// `params` may be absent (the surviving variant's behavior).
    #[default]
    Optional,
    /// A request without `params` is answered with Invalid params.
    Required,
}

/// Routes validated requests to registered handlers and builds one response
/// envelope per inbound element, single or batch.
///
/// The registry is built at startup and read-only afterwards; dispatch
/// itself is stateless across calls.
pub struct RequestDispatcher {
    handlers: HashMap<String, Arc<dyn RpcHandler>>,
    params_policy: ParamsPolicy,
}

impl RequestDispatcher {
    pub fn new() -> Self {
        Self::with_params_policy(ParamsPolicy::default())
    }

    pub fn with_params_policy(params_policy: ParamsPolicy) -> Self {
        Self {
            handlers: HashMap::new(),
            params_policy,
        }
    }

    pub fn params_policy(&self) -> ParamsPolicy {
        self.params_policy
    }

    /// Change the params policy. Startup configuration only; the
    /// dispatcher is immutable once serving.
    pub fn set_params_policy(&mut self, params_policy: ParamsPolicy) {
        self.params_policy = params_policy;
    }

    /// Register a handler for a single method name.
    pub fn register_method<H>(&mut self, method: impl Into<String>, handler: H)
    where
        H: RpcHandler + 'static,
    {
        self.handlers.insert(method.into(), Arc::new(handler));
    }

    /// Register one handler under several method names.
    pub fn register_methods<H>(&mut self, methods: Vec<String>, handler: H)
    where
        H: RpcHandler + 'static,
    {
        let handler = Arc::new(handler);
        for method in methods {
            self.handlers.insert(method, handler.clone());
        }
    }

    /// Resolve a method name to its handler. `None` is the first-class
    /// Method-not-found outcome, not an exceptional condition.
    pub fn resolve(&self, method: &str) -> Option<Arc<dyn RpcHandler>> {
        self.handlers.get(method).cloned()
    }

    pub fn registered_methods(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    /// Process one raw inbound call end to end.
    ///
    /// The top-level shape is discriminated exactly once: an object is a
    /// single request, an array a batch (empty batches are themselves an
    /// Invalid Request), anything else one Parse error.
    pub async fn dispatch(&self, raw: &str) -> DispatchReply {
        let data: Value = match serde_json::from_str(raw.trim()) {
            Ok(value) => value,
            Err(err) => {
                debug!(%err, "inbound body is not valid JSON");
                return DispatchReply::Single(JsonRpcError::parse_error().into());
            }
        };

        match data {
            Value::Object(_) => DispatchReply::Single(self.process_element(&data).await),
            Value::Array(elements) => {
                if elements.is_empty() {
                    return DispatchReply::Single(JsonRpcError::invalid_request().into());
                }
                let mut responses = Vec::with_capacity(elements.len());
                for element in &elements {
                    responses.push(self.process_element(element).await);
                }
                DispatchReply::Batch(responses)
            }
            _ => DispatchReply::Single(JsonRpcError::parse_error().into()),
        }
    }

    /// Validate and invoke a single element. Failures here are local to
    /// the slot; a batch continues regardless of the outcome.
    async fn process_element(&self, element: &Value) -> ResponseEnvelope {
        let Some(obj) = element.as_object() else {
            return JsonRpcError::parse_error().into();
        };

        let id = obj.get("id").and_then(RequestId::from_value);

        match obj.get("jsonrpc") {
            Some(Value::String(version)) if version == JSONRPC_VERSION => {}
            _ => return JsonRpcError::invalid_request().into(),
        }

        let method = match obj.get("method") {
            Some(Value::String(method)) => method.clone(),
            _ => return JsonRpcError::method_not_found(id).into(),
        };
        let Some(handler) = self.resolve(&method) else {
            return JsonRpcError::method_not_found(id).into();
        };

        let params = match obj.get("params") {
            None => {
                if self.params_policy == ParamsPolicy::Required {
                    return JsonRpcError::invalid_params(id).into();
                }
                None
            }
            Some(value) => match RequestParams::from_value(value) {
                Some(params) => Some(params),
                None => return JsonRpcError::invalid_params(id).into(),
            },
        };

        let request = JsonRpcRequest {
            version: JsonRpcVersion::V2_0,
            method,
            params,
            id: id.clone(),
        };

        match handler.call(&request).await {
            Ok(result) => ResponseEnvelope::success(id, result),
            Err(err) => {
                debug!(method = %request.method, code = err.code, "handler reported an application error");
                JsonRpcError::application_error(id, err.code, err.message).into()
            }
        }
    }
}

impl Default for RequestDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Sums positional numeric params.
    struct AddHandler;

    #[async_trait]
    impl RpcHandler for AddHandler {
        async fn call(&self, request: &JsonRpcRequest) -> Result<Value, ApplicationError> {
            let params = request
                .params
                .as_ref()
                .ok_or_else(|| ApplicationError::new(1, "missing params"))?;
            match params {
                RequestParams::Array(values) => {
                    let sum: i64 = values.iter().filter_map(|v| v.as_i64()).sum();
                    Ok(json!(sum))
                }
                RequestParams::Object(_) => Err(ApplicationError::new(2, "expected array params")),
            }
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl RpcHandler for FailingHandler {
        async fn call(&self, _request: &JsonRpcRequest) -> Result<Value, ApplicationError> {
            Err(ApplicationError::new(-32050, "boom"))
        }
    }

    struct DefaultErrorHandler;

    #[async_trait]
    impl RpcHandler for DefaultErrorHandler {
        async fn call(&self, _request: &JsonRpcRequest) -> Result<Value, ApplicationError> {
            Err(ApplicationError::default())
        }
    }

    fn dispatcher() -> RequestDispatcher {
        let mut dispatcher = RequestDispatcher::new();
        dispatcher.register_method("add", AddHandler);
        dispatcher.register_method("fail", FailingHandler);
        dispatcher.register_method("vague", DefaultErrorHandler);
        dispatcher
    }

    #[tokio::test]
    async fn test_valid_single_request() {
        let reply = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"add","params":[2,3],"id":1}"#)
            .await;

        assert_eq!(
            reply.to_json(),
            r#"{"jsonrpc":"2.0","result":5,"id":1}"#
        );
    }

    #[tokio::test]
    async fn test_method_not_found_echoes_id() {
        let reply = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"missing","id":7}"#)
            .await;

        assert_eq!(
            reply.to_json(),
            r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":7}"#
        );
    }

    #[tokio::test]
    async fn test_unparseable_body_is_one_parse_error() {
        let reply = dispatcher().dispatch("not-json-at-all").await;

        assert_eq!(
            reply.to_json(),
            r#"{"jsonrpc":"2.0","error":{"code":-32700,"message":"Parse error"},"id":null}"#
        );
    }

    #[tokio::test]
    async fn test_batch_with_non_object_slot() {
        let reply = dispatcher()
            .dispatch(r#"[{"jsonrpc":"2.0","method":"add","params":[1,1],"id":1}, 123]"#)
            .await;

        let batch = reply.as_batch().unwrap();
        assert_eq!(batch.len(), 2);
        assert!(!batch[0].is_error());
        assert_eq!(batch[0].id(), Some(&RequestId::Number(1)));
        assert_eq!(batch[1].error_code(), Some(-32700));
        assert_eq!(batch[1].id(), None);
    }

    #[tokio::test]
    async fn test_batch_preserves_input_order() {
        let reply = dispatcher()
            .dispatch(
                r#"[
                    {"jsonrpc":"2.0","method":"add","params":[1,1],"id":10},
                    {"jsonrpc":"2.0","method":"missing","id":11},
                    {"jsonrpc":"2.0","method":"add","params":[2,2],"id":12}
                ]"#,
            )
            .await;

        let batch = reply.as_batch().unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].id(), Some(&RequestId::Number(10)));
        assert_eq!(batch[1].error_code(), Some(-32601));
        assert_eq!(batch[1].id(), Some(&RequestId::Number(11)));
        assert_eq!(batch[2].id(), Some(&RequestId::Number(12)));
    }

    #[tokio::test]
    async fn test_wrong_version_is_invalid_request_with_null_id() {
        for body in [
            r#"{"jsonrpc":"1.0","method":"add","params":[1,2],"id":5}"#,
            r#"{"method":"add","params":[1,2],"id":5}"#,
            r#"{"jsonrpc":2.0,"method":"add","params":[1,2],"id":5}"#,
        ] {
            let reply = dispatcher().dispatch(body).await;
            let envelope = reply.as_single().unwrap();
            assert_eq!(envelope.error_code(), Some(-32600));
            assert_eq!(envelope.id(), None);
        }
    }

    #[tokio::test]
    async fn test_scalar_params_is_invalid_params() {
        let reply = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"add","params":5,"id":3}"#)
            .await;

        let envelope = reply.as_single().unwrap();
        assert_eq!(envelope.error_code(), Some(-32602));
        assert_eq!(envelope.id(), Some(&RequestId::Number(3)));
    }

    #[tokio::test]
    async fn test_params_required_policy() {
        let mut dispatcher = RequestDispatcher::with_params_policy(ParamsPolicy::Required);
        dispatcher.register_method("add", AddHandler);

        let reply = dispatcher
            .dispatch(r#"{"jsonrpc":"2.0","method":"add","id":4}"#)
            .await;
        assert_eq!(reply.as_single().unwrap().error_code(), Some(-32602));

        // The default policy lets the handler decide.
        let reply = self::dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"add","id":4}"#)
            .await;
        assert_eq!(reply.as_single().unwrap().error_code(), Some(1));
    }

    #[tokio::test]
    async fn test_empty_batch_is_invalid_request() {
        let reply = dispatcher().dispatch("[]").await;
        let envelope = reply.as_single().unwrap();
        assert_eq!(envelope.error_code(), Some(-32600));
        assert_eq!(envelope.id(), None);
    }

    #[tokio::test]
    async fn test_top_level_scalar_is_parse_error() {
        for body in ["123", r#""text""#, "true"] {
            let reply = dispatcher().dispatch(body).await;
            assert_eq!(reply.as_single().unwrap().error_code(), Some(-32700));
        }
    }

    #[tokio::test]
    async fn test_application_error_is_surfaced_verbatim() {
        let reply = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"fail","id":9}"#)
            .await;

        match reply.as_single().unwrap() {
            ResponseEnvelope::Error(err) => {
                assert_eq!(err.error.code, -32050);
                assert_eq!(err.error.message, "boom");
                assert_eq!(err.id, Some(RequestId::Number(9)));
            }
            other => panic!("expected error envelope, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_application_error_defaults() {
        let reply = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"vague","id":2}"#)
            .await;

        match reply.as_single().unwrap() {
            ResponseEnvelope::Error(err) => {
                assert_eq!(err.error.code, 0);
                assert_eq!(err.error.message, "Unknown error");
            }
            other => panic!("expected error envelope, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_request_without_id_still_gets_a_response() {
        let reply = dispatcher()
            .dispatch(r#"{"jsonrpc":"2.0","method":"add","params":[3,4]}"#)
            .await;

        let json = reply.to_json();
        assert_eq!(json, r#"{"jsonrpc":"2.0","result":7,"id":null}"#);
    }

    #[tokio::test]
    async fn test_handler_failure_does_not_abort_batch() {
        let reply = dispatcher()
            .dispatch(
                r#"[
                    {"jsonrpc":"2.0","method":"fail","id":1},
                    {"jsonrpc":"2.0","method":"add","params":[1,2],"id":2}
                ]"#,
            )
            .await;

        let batch = reply.as_batch().unwrap();
        assert_eq!(batch[0].error_code(), Some(-32050));
        assert!(!batch[1].is_error());
    }

    #[tokio::test]
    async fn test_function_handler() {
        use futures::FutureExt;

        let mut dispatcher = RequestDispatcher::new();
        dispatcher.register_method(
            "echo",
            FunctionHandler::new(|request: JsonRpcRequest| {
                async move {
                    Ok(request
                        .params
                        .map(|p| p.to_value())
                        .unwrap_or(Value::Null))
                }
                .boxed()
            }),
        );

        let reply = dispatcher
            .dispatch(r#"{"jsonrpc":"2.0","method":"echo","params":[1,2],"id":1}"#)
            .await;
        assert_eq!(reply.to_json(), r#"{"jsonrpc":"2.0","result":[1,2],"id":1}"#);
    }

    #[tokio::test]
    async fn test_register_methods_shares_handler() {
        let mut dispatcher = RequestDispatcher::new();
        dispatcher.register_methods(vec!["sum".to_string(), "plus".to_string()], AddHandler);

        assert!(dispatcher.resolve("sum").is_some());
        assert!(dispatcher.resolve("plus").is_some());
        assert!(dispatcher.resolve("minus").is_none());

        let mut methods = dispatcher.registered_methods();
        methods.sort();
        assert_eq!(methods, vec!["plus", "sum"]);
    }
}
