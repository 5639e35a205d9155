use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body posted to the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// Shorthand for a 200 response with a JSON body
    pub fn json(value: &Value) -> Self {
        Self::new(200, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fields the endpoint may set on a reply object
///
/// Both fields are optional. Values that would count as "missing" to a browser script (null, false,
/// empty string, zero) are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatReply {
    pub response: Option<String>,
    pub error: Option<String>,
}

impl ChatReply {
    /// Read `response` and `error` from a JSON object; `None` for any other JSON value
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            response: object.get("response").and_then(present_text),
            error: object.get("error").and_then(present_text),
        })
    }
}

/// Text for a field value, or `None` when the value counts as absent
pub(crate) fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        other => Some(other.to_string()),
    }
}
