use std::fmt;
use std::sync::Arc;

use chatpane_core::{MessagesConfig, PrivacyConfig, redact_content};
use chatpane_providers::{ChatBackend, ChatRequest, HttpFailure, ReplyOutcome, exchange, status_reason};

use crate::renderer::Renderer;
use crate::transcript::{EntryId, Sender};
use crate::view::ChatView;

/// Sequence number of a request, increasing per controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    Sending {
        seq: RequestSeq,
    },
}

/// A request that has been started but not yet completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    seq: RequestSeq,
    request: ChatRequest,
}

impl PendingRequest {
    pub fn seq(&self) -> RequestSeq {
        self.seq
    }

    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// Why a submit did not start a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    /// Input was empty after trimming
    Empty,
    /// Another request is in flight
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to send
    Ignored,
    /// A request is already in flight
    Busy,
    /// The reply (or failure) was rendered as `entry`
    Completed { entry: EntryId, outcome: ReplyOutcome },
    /// The request was superseded and its result discarded
    Stale,
}

impl From<Rejected> for SubmitOutcome {
    fn from(rejected: Rejected) -> Self {
        match rejected {
            Rejected::Empty => SubmitOutcome::Ignored,
            Rejected::Busy => SubmitOutcome::Busy,
        }
    }
}

/// Drives one send/receive cycle against a [`ChatView`]
pub struct Controller {
    backend: Arc<dyn ChatBackend>,
    renderer: Renderer,
    messages: MessagesConfig,
    assistant_name: String,
    privacy: PrivacyConfig,
    state: ControllerState,
    last_seq: u64,
}

impl Controller {
    pub fn new(
        backend: Arc<dyn ChatBackend>, renderer: Renderer, messages: MessagesConfig, assistant_name: impl Into<String>,
        privacy: PrivacyConfig,
    ) -> Self {
        Self {
            backend,
            renderer,
            messages,
            assistant_name: assistant_name.into(),
            privacy,
            state: ControllerState::Idle,
            last_seq: 0,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.state, ControllerState::Sending { .. })
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Read the input, echo it as a user entry, lock the controls and show the placeholder
    pub fn begin(&mut self, view: &mut dyn ChatView) -> Result<PendingRequest, Rejected> {
        let message = view.input_value().trim().to_string();
        if message.is_empty() {
            return Err(Rejected::Empty);
        }
        if let ControllerState::Sending { seq } = self.state {
            tracing::debug!(%seq, "submit while a request is in flight");
            return Err(Rejected::Busy);
        }

        self.last_seq += 1;
        let seq = RequestSeq(self.last_seq);
        self.state = ControllerState::Sending { seq };

        self.renderer.render(view.transcript_mut(), Sender::User, &message);
        view.clear_input();
        view.set_controls_enabled(false);
        view.transcript_mut().insert_placeholder(self.messages.thinking.as_str());

        tracing::info!(%seq, chars = message.chars().count(), message = %redact_content(&message, &self.privacy), "sending message");
        Ok(PendingRequest { seq, request: ChatRequest::new(message) })
    }

    /// Render the outcome of `pending` and unlock the controls
    ///
    /// Returns `None` without touching the view when `pending` is not the request in flight.
    pub fn complete(
        &mut self, view: &mut dyn ChatView, pending: &PendingRequest, outcome: &ReplyOutcome,
    ) -> Option<EntryId> {
        if self.state != (ControllerState::Sending { seq: pending.seq }) {
            tracing::warn!(seq = %pending.seq, state = ?self.state, "discarding stale reply");
            return None;
        }

        view.transcript_mut().remove_placeholder();
        let text = self.reply_text(outcome);
        let entry = self.renderer.render(view.transcript_mut(), Sender::Assistant, &text);

        self.state = ControllerState::Idle;
        view.set_controls_enabled(true);
        view.focus_input();

        if outcome.is_failure() {
            tracing::warn!(seq = %pending.seq, outcome = outcome.kind(), "request finished with an error");
        } else {
            tracing::info!(seq = %pending.seq, outcome = outcome.kind(), reply = %redact_content(&text, &self.privacy), "request finished");
        }
        Some(entry)
    }

    /// Full cycle: begin, call the backend, complete
    pub async fn submit(&mut self, view: &mut dyn ChatView) -> SubmitOutcome {
        let pending = match self.begin(view) {
            Ok(pending) => pending,
            Err(rejected) => return rejected.into(),
        };

        let backend = Arc::clone(&self.backend);
        let outcome = exchange(backend.as_ref(), pending.request()).await;

        match self.complete(view, &pending, &outcome) {
            Some(entry) => SubmitOutcome::Completed { entry, outcome },
            None => SubmitOutcome::Stale,
        }
    }

    /// Text of the assistant entry for an outcome
    pub fn reply_text(&self, outcome: &ReplyOutcome) -> String {
        let name = &self.assistant_name;
        let messages = &self.messages;
        match outcome {
            ReplyOutcome::Reply(text) | ReplyOutcome::AppError(text) => format!("{}: {}", name, text),
            ReplyOutcome::Empty => format!("{}: {}", name, messages.no_response),
            ReplyOutcome::Malformed | ReplyOutcome::NetworkFailure => messages.connection_error.clone(),
            ReplyOutcome::HttpError { status, failure } => {
                let detail = match failure {
                    HttpFailure::ErrorField(error) => error.clone(),
                    HttpFailure::NoErrorField => match status_reason(*status) {
                        Some(reason) => reason.to_string(),
                        None => messages.status_error_for(*status),
                    },
                    HttpFailure::Unparseable => messages.status_error_for(*status),
                };
                format!("{}{}", messages.error_prefix, detail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxHighlighter;
    use crate::view::Page;
    use chatpane_core::ProseMarkup;
    use chatpane_providers::{MockBackend, MockResponse};

    fn controller(responses: Vec<MockResponse>) -> Controller {
        let renderer = Renderer::new(Arc::new(SyntaxHighlighter::new()), ProseMarkup::Escape);
        Controller::new(
            Arc::new(MockBackend::new(responses)),
            renderer,
            MessagesConfig::default(),
            "NBFDEV AI",
            PrivacyConfig::default(),
        )
    }

    fn last_text(page: &Page) -> String {
        page.transcript().last().map(|e| e.to_html()).unwrap_or_default()
    }

    #[test]
    fn test_reply_text_mapping() {
        let c = controller(vec![]);
        let http = |status, failure| ReplyOutcome::HttpError { status, failure };

        assert_eq!(c.reply_text(&ReplyOutcome::Reply("hi".to_string())), "NBFDEV AI: hi");
        assert_eq!(c.reply_text(&ReplyOutcome::AppError("quota".to_string())), "NBFDEV AI: quota");
        assert_eq!(c.reply_text(&ReplyOutcome::Empty), "NBFDEV AI: No response from the server");
        assert_eq!(
            c.reply_text(&ReplyOutcome::NetworkFailure),
            "Could not connect to the server. Please check your internet connection."
        );
        assert_eq!(c.reply_text(&ReplyOutcome::Malformed), c.reply_text(&ReplyOutcome::NetworkFailure));
        assert_eq!(c.reply_text(&http(422, HttpFailure::ErrorField("bad".to_string()))), "Error: bad");
        assert_eq!(c.reply_text(&http(404, HttpFailure::NoErrorField)), "Error: Not Found");
        assert_eq!(c.reply_text(&http(599, HttpFailure::NoErrorField)), "Error: Server responded with status 599");
        assert_eq!(c.reply_text(&http(500, HttpFailure::Unparseable)), "Error: Server responded with status 500");
    }

    #[test]
    fn test_empty_input_is_ignored() {
        let mut c = controller(vec![]);
        let mut page = Page::new("chat");
        page.set_input("   \n ");

        let outcome = tokio_test::block_on(c.submit(&mut page));
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(page.transcript().is_empty());
        assert!(page.controls_enabled());
        assert_eq!(c.state(), ControllerState::Idle);
    }

    #[test]
    fn test_begin_locks_view_and_shows_placeholder() {
        let mut c = controller(vec![]);
        let mut page = Page::new("chat");
        page.set_input("  hello  ");

        let pending = c.begin(&mut page).unwrap();
        assert_eq!(pending.request(), &ChatRequest::new("hello"));
        assert_eq!(c.state(), ControllerState::Sending { seq: pending.seq() });
        assert_eq!(page.input_value(), "");
        assert!(!page.controls_enabled());
        assert_eq!(page.transcript().placeholder().unwrap().text, "Thinking...");
        assert!(last_text(&page).contains("user-message"));
    }

    #[test]
    fn test_begin_while_sending_is_busy() {
        let mut c = controller(vec![]);
        let mut page = Page::new("chat");
        page.set_input("first");
        c.begin(&mut page).unwrap();

        page.set_input("second");
        assert_eq!(c.begin(&mut page), Err(Rejected::Busy));
        assert_eq!(page.transcript().len(), 1);
    }

    #[test]
    fn test_complete_renders_reply() {
        let mut c = controller(vec![]);
        let mut page = Page::new("chat");
        page.set_input("hello");
        let pending = c.begin(&mut page).unwrap();

        let entry = c.complete(&mut page, &pending, &ReplyOutcome::Reply("hi".to_string())).unwrap();
        assert_eq!(page.transcript().last().unwrap().id, entry);
        assert!(last_text(&page).contains("NBFDEV AI: hi"));
        assert!(page.transcript().placeholder().is_none());
        assert!(page.controls_enabled());
        assert!(page.input().focused);
        assert_eq!(c.state(), ControllerState::Idle);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut c = controller(vec![]);
        let mut page = Page::new("chat");
        page.set_input("one");
        let first = c.begin(&mut page).unwrap();
        c.complete(&mut page, &first, &ReplyOutcome::Empty).unwrap();

        page.set_input("two");
        let second = c.begin(&mut page).unwrap();
        assert!(second.seq() > first.seq());

        let before = page.transcript().clone();
        assert_eq!(c.complete(&mut page, &first, &ReplyOutcome::Reply("late".to_string())), None);
        assert_eq!(page.transcript(), &before);
        assert!(page.transcript().placeholder().is_some());
        assert_eq!(c.state(), ControllerState::Sending { seq: second.seq() });
    }

    #[test]
    fn test_submit_round_trip() {
        let mut c = controller(vec![MockResponse::Text { content: "hi".to_string() }]);
        let mut page = Page::new("chat");
        page.set_input("hello");

        let outcome = tokio_test::block_on(c.submit(&mut page));
        assert!(matches!(outcome, SubmitOutcome::Completed { outcome: ReplyOutcome::Reply(ref r), .. } if r == "hi"));
        assert_eq!(page.transcript().len(), 2);
        assert!(page.controls_enabled());
    }
}
