//! Response interpretation: HTTP status classification and body decoding

use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// What a successfully interpreted exchange yields: one result value, or
/// the raw, uninterpreted envelopes of a batch reply (correlating by id is
/// the caller's concern).
#[derive(Debug, Clone, PartialEq)]
pub enum RpcOutcome {
    Single(Value),
    Batch(Vec<Value>),
}

impl RpcOutcome {
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            RpcOutcome::Single(value) => Some(value),
            RpcOutcome::Batch(_) => None,
        }
    }

    pub fn as_batch(&self) -> Option<&[Value]> {
        match self {
            RpcOutcome::Single(_) => None,
            RpcOutcome::Batch(values) => Some(values),
        }
    }
}

/// Interpret a raw HTTP exchange as a JSON-RPC reply.
///
/// The status is classified before any parsing: outside the 2xx range the
/// body's shape is contractually undefined, so it is never touched and the
/// failure carries the status code instead. Status 0 means "no status
/// available" and falls through to body interpretation.
pub fn interpret(status: u16, body: &str) -> ClientResult<RpcOutcome> {
    match status {
        1..=199 => return Err(ClientError::TransportInformational(status)),
        300..=399 => return Err(ClientError::TransportRedirection(status)),
        400..=499 => return Err(ClientError::TransportClient(status)),
        500.. => return Err(ClientError::TransportServer(status)),
        _ => {}
    }

    match serde_json::from_str::<Value>(body.trim()).ok() {
        Some(Value::Array(items)) if !items.is_empty() => Ok(RpcOutcome::Batch(items)),
        Some(Value::Object(map)) => {
            if let Some(error) = map.get("error") {
                Err(ClientError::Rpc {
                    code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
                    message: error
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
            } else {
                Ok(RpcOutcome::Single(
                    map.get("result").cloned().unwrap_or(Value::Null),
                ))
            }
        }
        _ => {
            debug!(body, "unrecognizable JSON-RPC response body");
            Err(ClientError::InvalidResponse)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tideway_jsonrpc::JsonRpcResponse;

    #[test]
    fn test_status_classification_short_circuits() {
        // The body is garbage on purpose: non-2xx statuses must fail
        // before any parsing happens.
        assert!(matches!(
            interpret(101, "garbage"),
            Err(ClientError::TransportInformational(101))
        ));
        assert!(matches!(
            interpret(301, "garbage"),
            Err(ClientError::TransportRedirection(301))
        ));
        assert!(matches!(
            interpret(404, "garbage"),
            Err(ClientError::TransportClient(404))
        ));
        assert!(matches!(
            interpret(503, "garbage"),
            Err(ClientError::TransportServer(503))
        ));
    }

    #[test]
    fn test_success_result_is_returned() {
        let outcome = interpret(200, r#"{"jsonrpc":"2.0","result":5,"id":1}"#).unwrap();
        assert_eq!(outcome, RpcOutcome::Single(json!(5)));
    }

    #[test]
    fn test_zero_status_falls_through_to_body() {
        let outcome = interpret(0, r#"{"jsonrpc":"2.0","result":"ok","id":1}"#).unwrap();
        assert_eq!(outcome, RpcOutcome::Single(json!("ok")));
    }

    #[test]
    fn test_error_object_becomes_rpc_failure() {
        let err = interpret(
            200,
            r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":7}"#,
        )
        .unwrap_err();

        match err {
            ClientError::Rpc { code, message } => {
                assert_eq!(code, -32601);
                assert_eq!(message, "Method not found");
            }
            other => panic!("expected Rpc error, got {other:?}"),
        }
    }

    #[test]
    fn test_batch_is_returned_raw() {
        let body = r#"[{"jsonrpc":"2.0","result":1,"id":1},{"jsonrpc":"2.0","result":2,"id":2}]"#;
        let outcome = interpret(200, body).unwrap();

        let batch = outcome.as_batch().unwrap();
        assert_eq!(batch.len(), 2);
        // Envelopes come back uninterpreted.
        assert_eq!(batch[0]["result"], json!(1));
        assert_eq!(batch[1]["id"], json!(2));
    }

    #[test]
    fn test_unrecognizable_bodies() {
        for body in ["", "not json", "[]", "5", r#""text""#] {
            assert!(matches!(
                interpret(200, body),
                Err(ClientError::InvalidResponse)
            ));
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let outcome = interpret(200, "  \n {\"jsonrpc\":\"2.0\",\"result\":true,\"id\":1} \n").unwrap();
        assert_eq!(outcome, RpcOutcome::Single(json!(true)));
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let values = [
            json!("a string"),
            json!(42),
            json!(2.5),
            json!(true),
            json!(null),
            json!([1, "two", {"three": 3}]),
            json!({"nested": {"deep": [null, false]}}),
        ];

        for value in values {
            let body =
                serde_json::to_string(&JsonRpcResponse::success(1, value.clone())).unwrap();
            let outcome = interpret(200, &body).unwrap();
            assert_eq!(outcome, RpcOutcome::Single(value));
        }
    }

    #[test]
    fn test_missing_result_field_yields_null() {
        let outcome = interpret(200, r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert_eq!(outcome, RpcOutcome::Single(Value::Null));
    }

    #[test]
    fn test_error_with_malformed_fields_uses_defaults() {
        let err = interpret(200, r#"{"jsonrpc":"2.0","error":{},"id":1}"#).unwrap_err();
        match err {
            ClientError::Rpc { code, message } => {
                assert_eq!(code, 0);
                assert_eq!(message, "");
            }
            other => panic!("expected Rpc error, got {other:?}"),
        }
    }
}
