use serde_json::Value;

use crate::adapter::BackendError;
use crate::types::{ChatReply, RawResponse, present_text};

/// What a non-2xx response body told us
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpFailure {
    /// JSON body carrying an `error` message
    ErrorField(String),
    /// JSON body without a usable `error` field; a `null` body is classified as malformed instead
    NoErrorField,
    /// Body was not JSON at all
    Unparseable,
}

/// Terminal result of one request/response cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// 2xx with a `response` field
    Reply(String),
    /// 2xx with an `error` field (takes precedence over `response`)
    AppError(String),
    /// 2xx with neither field
    Empty,
    /// 2xx whose body could not be read as a reply
    Malformed,
    /// Non-2xx status
    HttpError { status: u16, failure: HttpFailure },
    /// The request never completed
    NetworkFailure,
}

impl ReplyOutcome {
    /// Classify a completed exchange
    pub fn classify(response: &RawResponse) -> Self {
        let parsed = serde_json::from_str::<Value>(&response.body);

        if !response.is_success() {
            let failure = match parsed {
                Ok(Value::Null) => return ReplyOutcome::Malformed,
                Ok(value) => match value.get("error").and_then(present_text) {
                    Some(message) => HttpFailure::ErrorField(message),
                    None => HttpFailure::NoErrorField,
                },
                Err(_) => HttpFailure::Unparseable,
            };
            return ReplyOutcome::HttpError { status: response.status, failure };
        }

        let value = match parsed {
            Ok(Value::Null) | Err(_) => return ReplyOutcome::Malformed,
            Ok(value) => value,
        };

        match ChatReply::from_value(&value) {
            Some(ChatReply { error: Some(error), .. }) => ReplyOutcome::AppError(error),
            Some(ChatReply { response: Some(response), .. }) => ReplyOutcome::Reply(response),
            _ => ReplyOutcome::Empty,
        }
    }

    /// Classify the result of a backend call, including transport failures
    pub fn from_result(result: Result<RawResponse, BackendError>) -> Self {
        match result {
            Ok(response) => Self::classify(&response),
            Err(_) => ReplyOutcome::NetworkFailure,
        }
    }

    /// Short label for log events
    pub fn kind(&self) -> &'static str {
        match self {
            ReplyOutcome::Reply(_) => "reply",
            ReplyOutcome::AppError(_) => "app_error",
            ReplyOutcome::Empty => "empty",
            ReplyOutcome::Malformed => "malformed",
            ReplyOutcome::HttpError { .. } => "http_error",
            ReplyOutcome::NetworkFailure => "network_failure",
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, ReplyOutcome::Reply(_) | ReplyOutcome::Empty)
    }
}

/// Canonical reason phrase for a status code, e.g. `Not Found` for 404
pub fn status_reason(status: u16) -> Option<&'static str> {
    reqwest::StatusCode::from_u16(status).ok().and_then(|code| code.canonical_reason())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(status: u16, body: &str) -> ReplyOutcome {
        ReplyOutcome::classify(&RawResponse::new(status, body))
    }

    #[test]
    fn test_classify_reply() {
        assert_eq!(classify(200, r#"{"response": "hi"}"#), ReplyOutcome::Reply("hi".to_string()));
    }

    #[test]
    fn test_classify_error_takes_precedence() {
        assert_eq!(
            classify(200, r#"{"response": "hi", "error": "quota exceeded"}"#),
            ReplyOutcome::AppError("quota exceeded".to_string())
        );
    }

    #[test]
    fn test_classify_empty() {
        assert_eq!(classify(200, "{}"), ReplyOutcome::Empty);
        assert_eq!(classify(200, r#"{"response": ""}"#), ReplyOutcome::Empty);
        assert_eq!(classify(200, r#""text""#), ReplyOutcome::Empty);
    }

    #[test]
    fn test_classify_malformed() {
        assert_eq!(classify(200, "<html>oops</html>"), ReplyOutcome::Malformed);
        assert_eq!(classify(200, ""), ReplyOutcome::Malformed);
        assert_eq!(classify(200, "null"), ReplyOutcome::Malformed);
    }

    #[test]
    fn test_classify_http_error_with_error_field() {
        assert_eq!(
            classify(400, r#"{"error": "message too long"}"#),
            ReplyOutcome::HttpError { status: 400, failure: HttpFailure::ErrorField("message too long".to_string()) }
        );
    }

    #[test]
    fn test_classify_http_error_without_error_field() {
        assert_eq!(
            classify(503, r#"{"detail": "down"}"#),
            ReplyOutcome::HttpError { status: 503, failure: HttpFailure::NoErrorField }
        );
    }

    #[test]
    fn test_classify_http_error_with_null_body() {
        assert_eq!(classify(500, "null"), ReplyOutcome::Malformed);
        assert_eq!(
            classify(502, "42"),
            ReplyOutcome::HttpError { status: 502, failure: HttpFailure::NoErrorField }
        );
    }

    #[test]
    fn test_classify_http_error_unparseable() {
        assert_eq!(
            classify(500, "Internal Server Error"),
            ReplyOutcome::HttpError { status: 500, failure: HttpFailure::Unparseable }
        );
    }

    #[test]
    fn test_from_result_transport_failure() {
        let outcome = ReplyOutcome::from_result(Err(BackendError::Transport("refused".to_string())));
        assert_eq!(outcome, ReplyOutcome::NetworkFailure);
        assert!(outcome.is_failure());
        assert_eq!(outcome.kind(), "network_failure");
    }

    #[test]
    fn test_is_failure() {
        assert!(!ReplyOutcome::Reply("x".to_string()).is_failure());
        assert!(!ReplyOutcome::Empty.is_failure());
        assert!(ReplyOutcome::AppError("x".to_string()).is_failure());
        assert!(ReplyOutcome::Malformed.is_failure());
    }

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(404), Some("Not Found"));
        assert_eq!(status_reason(500), Some("Internal Server Error"));
        assert_eq!(status_reason(599), None);
    }
}
