//! Calculator JSON-RPC server
//!
//! Serves `add` and `subtract` on http://127.0.0.1:8000/rpc. Try it with:
//!
//! ```text
//! curl -s -X POST http://127.0.0.1:8000/rpc \
//!   -d '{"jsonrpc":"2.0","method":"add","params":[2,3],"id":1}'
//! ```

use async_trait::async_trait;
use serde_json::{Value, json};
use tideway_http_jsonrpc_server::{
    ApplicationError, JsonRpcHttpServer, JsonRpcRequest, RpcHandler,
};

struct CalculatorHandler;

#[async_trait]
impl RpcHandler for CalculatorHandler {
    async fn call(&self, request: &JsonRpcRequest) -> Result<Value, ApplicationError> {
        let params = request
            .params
            .as_ref()
            .ok_or_else(|| ApplicationError::new(1, "missing parameters"))?;
        let a = params
            .get_index(0)
            .and_then(Value::as_f64)
            .ok_or_else(|| ApplicationError::new(2, "first operand must be a number"))?;
        let b = params
            .get_index(1)
            .and_then(Value::as_f64)
            .ok_or_else(|| ApplicationError::new(2, "second operand must be a number"))?;

        match request.method.as_str() {
            "add" => Ok(json!(a + b)),
            "subtract" => Ok(json!(a - b)),
            other => Err(ApplicationError::new(3, format!("unknown operation: {other}"))),
        }
    }
}

#[tokio::main]
async fn main() -> tideway_http_jsonrpc_server::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let server = JsonRpcHttpServer::builder()
        .listen("/rpc")
        .register_methods(
            vec!["add".to_string(), "subtract".to_string()],
            CalculatorHandler,
        )
        .build();

    server.run().await
}
