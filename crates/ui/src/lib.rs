pub mod app;
pub mod controller;
pub mod event_handler;
pub mod renderer;
pub mod sanitize;
pub mod segment;
pub mod syntax;
pub mod transcript;
pub mod view;
pub mod welcome;

pub use app::App;
pub use controller::{Controller, ControllerState, PendingRequest, Rejected, RequestSeq, SubmitOutcome};
pub use event_handler::{Action, ClickTarget, EventKind, Handler, Key, ListenerHandle, Listeners, PageEvent};
pub use renderer::Renderer;
pub use sanitize::{escape_html, sanitize_fragment};
pub use segment::{Fragment, FragmentKind, Segment, fragments, segments};
pub use syntax::SyntaxHighlighter;
pub use transcript::{Block, EntryId, PlaceholderEntry, ScrollTarget, Sender, Transcript, TranscriptEntry};
pub use view::{ChatView, InputState, Page};
pub use welcome::{StartupModal, WelcomeBanner};
