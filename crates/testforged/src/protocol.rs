//! Line-delimited JSON request/response contract.
//!
//! The envelope is the public boundary between the service and its
//! clients: one JSON object per line on stdin, one response object per
//! line on stdout. Stderr carries logs only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unknown method.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Parameters missing or of the wrong shape.
pub const INVALID_PARAMS: i64 = -32602;
/// Fault inside the service while handling a well-formed request.
pub const INTERNAL_ERROR: i64 = -32603;

/// One incoming request line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Client correlation id; echoed back verbatim.
    #[serde(default)]
    pub id: Value,

    pub method: String,

    #[serde(default)]
    pub params: Value,
}

/// One outgoing response line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseError {
    pub code: i64,
    pub message: String,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            id,
            result: None,
            error: Some(ResponseError {
                code,
                message: message.into(),
            }),
        }
    }
}
