//! Simple Calculator JSON-RPC Example
//!
//! Demonstrates the dispatch pipeline end to end on raw request bodies:
//! registration, validation, invocation and error shaping, for both single
//! and batch calls.

use async_trait::async_trait;
use serde_json::{Value, json};
use tideway_jsonrpc::prelude::*;

/// Calculator handler implementing basic arithmetic over positional params
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
            .and_then(|v| v.as_f64())
            .ok_or_else(|| ApplicationError::new(2, "first operand must be a number"))?;
        let b = params
            .get_index(1)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| ApplicationError::new(2, "second operand must be a number"))?;

        match request.method.as_str() {
            "add" => Ok(json!(a + b)),
            "subtract" => Ok(json!(a - b)),
            other => Err(ApplicationError::new(3, format!("unknown operation: {other}"))),
        }
    }
}

#[tokio::main]
async fn main() {
    let mut dispatcher = RequestDispatcher::new();
    dispatcher.register_methods(
        vec!["add".to_string(), "subtract".to_string()],
        CalculatorHandler,
    );

    let calls = [
        r#"{"jsonrpc":"2.0","method":"add","params":[5,3],"id":1}"#,
        r#"{"jsonrpc":"2.0","method":"subtract","params":[10,4],"id":2}"#,
        r#"{"jsonrpc":"2.0","method":"multiply","params":[2,3],"id":3}"#,
        r#"{"jsonrpc":"2.0","method":"add","params":["invalid",5],"id":4}"#,
        r#"[{"jsonrpc":"2.0","method":"add","params":[1,1],"id":5}, 123]"#,
        "not-json-at-all",
    ];

    for call in calls {
        println!("--> {call}");
        let reply = dispatcher.dispatch(call).await;
        println!("<-- {}", reply.to_json());
    }
}
