pub mod adapter;
pub mod mock;
pub mod outcome;
pub mod types;

pub use adapter::{BackendError, ChatBackend, HttpBackend};
pub use mock::{MockBackend, MockResponse};
pub use outcome::{HttpFailure, ReplyOutcome, status_reason};
pub use types::{ChatReply, ChatRequest, RawResponse};

pub use chatpane_core::{Error, Result};

/// Send one message and classify whatever came back
pub async fn exchange(backend: &dyn ChatBackend, request: &ChatRequest) -> ReplyOutcome {
    let result = backend.send(request).await;
    if let Err(err) = &result {
        tracing::warn!(endpoint = backend.endpoint(), error = %err, "chat request failed");
    }
    ReplyOutcome::from_result(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exchange_classifies_reply() {
        let backend = MockBackend::new(vec![MockResponse::Text { content: "hi".to_string() }]);
        let outcome = exchange(&backend, &ChatRequest::new("hello")).await;
        assert_eq!(outcome, ReplyOutcome::Reply("hi".to_string()));
    }

    #[tokio::test]
    async fn test_exchange_classifies_network_failure() {
        let backend = MockBackend::new(vec![MockResponse::NetworkFailure { message: "down".to_string() }]);
        let outcome = exchange(&backend, &ChatRequest::new("hello")).await;
        assert_eq!(outcome, ReplyOutcome::NetworkFailure);
    }

    #[tokio::test]
    async fn test_exchange_classifies_http_error() {
        let backend = MockBackend::new(vec![MockResponse::Reply { status: 500, body: "oops".to_string() }]);
        let outcome = exchange(&backend, &ChatRequest::new("hello")).await;
        assert_eq!(outcome, ReplyOutcome::HttpError { status: 500, failure: HttpFailure::Unparseable });
    }
}
