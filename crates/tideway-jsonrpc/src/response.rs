use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JsonRpcError;
use crate::types::{JsonRpcVersion, RequestId};

/// A successful JSON-RPC response envelope.
///
/// `id` is always serialized: a request that carried no id is still
/// answered, with `id: null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub result: Value,
    pub id: Option<RequestId>,
}

impl JsonRpcResponse {
    pub fn new(id: Option<RequestId>, result: Value) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            result,
            id,
        }
    }

    pub fn success(id: impl Into<RequestId>, result: Value) -> Self {
        Self::new(Some(id.into()), result)
    }
}

/// A single response envelope: exactly one of result or error, enforced by
/// the type rather than by convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Success(JsonRpcResponse),
    Error(JsonRpcError),
}

impl ResponseEnvelope {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        ResponseEnvelope::Success(JsonRpcResponse::new(id, result))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResponseEnvelope::Error(_))
    }

    /// The id the envelope will echo back, if any.
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            ResponseEnvelope::Success(resp) => resp.id.as_ref(),
            ResponseEnvelope::Error(err) => err.id.as_ref(),
        }
    }

    pub fn error_code(&self) -> Option<i64> {
        match self {
            ResponseEnvelope::Success(_) => None,
            ResponseEnvelope::Error(err) => Some(err.error.code),
        }
    }
}

impl From<JsonRpcResponse> for ResponseEnvelope {
    fn from(response: JsonRpcResponse) -> Self {
        ResponseEnvelope::Success(response)
    }
}

impl From<JsonRpcError> for ResponseEnvelope {
    fn from(error: JsonRpcError) -> Self {
        ResponseEnvelope::Error(error)
    }
}

/// What a dispatched call produces: a single envelope for a single request,
/// a positionally-correlated array for a batch. The variant is decided once
/// at parse time by the shape of the inbound payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DispatchReply {
    Single(ResponseEnvelope),
    Batch(Vec<ResponseEnvelope>),
}

impl DispatchReply {
    /// Serialize to the wire body. Envelope types cannot fail to serialize;
    /// the fallback mirrors the transport layer's defensive encoding.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn as_single(&self) -> Option<&ResponseEnvelope> {
        match self {
            DispatchReply::Single(envelope) => Some(envelope),
            DispatchReply::Batch(_) => None,
        }
    }

    pub fn as_batch(&self) -> Option<&[ResponseEnvelope]> {
        match self {
            DispatchReply::Single(_) => None,
            DispatchReply::Batch(envelopes) => Some(envelopes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_string};

    #[test]
    fn test_response_serialization() {
        let response = JsonRpcResponse::success(1, json!({"status": "ok"}));

        let json_str = to_string(&response).unwrap();
        let parsed: JsonRpcResponse = from_str(&json_str).unwrap();

        assert_eq!(parsed.id, Some(RequestId::Number(1)));
        assert_eq!(parsed.result, json!({"status": "ok"}));
    }

    #[test]
    fn test_response_without_id_serializes_null() {
        let response = JsonRpcResponse::new(None, json!(5));
        let json_str = to_string(&response).unwrap();
        assert!(json_str.contains("\"id\":null"));
    }

    #[test]
    fn test_envelope_discrimination() {
        let success: ResponseEnvelope =
            from_str(r#"{"jsonrpc":"2.0","result":5,"id":1}"#).unwrap();
        assert!(!success.is_error());
        assert_eq!(success.id(), Some(&RequestId::Number(1)));

        let error: ResponseEnvelope = from_str(
            r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":7}"#,
        )
        .unwrap();
        assert!(error.is_error());
        assert_eq!(error.error_code(), Some(-32601));
    }

    #[test]
    fn test_reply_shapes() {
        let single = DispatchReply::Single(ResponseEnvelope::success(None, json!(1)));
        assert!(single.as_single().is_some());
        assert!(single.as_batch().is_none());
        assert!(single.to_json().starts_with('{'));

        let batch = DispatchReply::Batch(vec![
            ResponseEnvelope::success(Some(RequestId::Number(1)), json!(1)),
            ResponseEnvelope::Error(JsonRpcError::parse_error()),
        ]);
        assert_eq!(batch.as_batch().unwrap().len(), 2);
        assert!(batch.to_json().starts_with('['));
    }
}
