use crate::sanitize::escape_html;
use crate::transcript::Transcript;
use crate::welcome::{StartupModal, WelcomeBanner};

/// The page surface the controller drives
///
/// Mirrors the handful of element operations a chat page needs: the message container, the text
/// input and the submit control.
pub trait ChatView {
    fn transcript(&self) -> &Transcript;

    fn transcript_mut(&mut self) -> &mut Transcript;

    /// Current text of the input control
    fn input_value(&self) -> &str;

    fn clear_input(&mut self);

    /// Enable or disable both the input and the submit control
    fn set_controls_enabled(&mut self, enabled: bool);

    fn controls_enabled(&self) -> bool;

    fn focus_input(&mut self);
}

/// State of the text input control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub buffer: String,
    pub enabled: bool,
    pub focused: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self { buffer: String::new(), enabled: true, focused: true }
    }
}

/// Base layout for standalone documents
const PAGE_CSS: &str = "\
body { font-family: sans-serif; margin: 0; background: #f4f4f9; }
.chat-container { max-width: 760px; margin: 0 auto; display: flex; flex-direction: column; height: 100vh; }
#chatbox { flex: 1; overflow-y: auto; padding: 1rem; }
.message { margin: 0.5rem 0; padding: 0.6rem 0.9rem; border-radius: 8px; white-space: normal; }
.user-message { background: #d1e7ff; margin-left: 20%; }
.ai-message { background: #ffffff; margin-right: 20%; }
.welcome-message { text-align: center; color: #666; padding: 1rem; }
.code-message pre { overflow-x: auto; padding: 0.6rem; border-radius: 6px; }
.input-area { display: flex; gap: 0.5rem; padding: 1rem; }
#userInput { flex: 1; resize: none; }
.modal { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.4); }
.modal-content { background: #fff; margin: 15% auto; padding: 1rem; width: 80%; max-width: 480px; }
.close { float: right; cursor: pointer; font-size: 1.4rem; }
";

/// In-memory chat page: transcript container, input, submit control, banner and modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    title: String,
    transcript: Transcript,
    input: InputState,
    submit_enabled: bool,
    banner: Option<WelcomeBanner>,
    modal: Option<StartupModal>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            transcript: Transcript::new(),
            input: InputState::default(),
            submit_enabled: true,
            banner: None,
            modal: None,
        }
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Replace the input text, as typing would
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input.buffer = text.into();
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn show_banner(&mut self, banner: WelcomeBanner) {
        self.banner = Some(banner);
    }

    pub fn banner(&self) -> Option<&WelcomeBanner> {
        self.banner.as_ref()
    }

    /// Remove the banner; false if there was none
    pub fn remove_banner(&mut self) -> bool {
        self.banner.take().is_some()
    }

    /// Attach the modal and make it visible
    pub fn show_modal(&mut self, mut modal: StartupModal) {
        modal.show();
        self.modal = Some(modal);
    }

    pub fn modal(&self) -> Option<&StartupModal> {
        self.modal.as_ref()
    }

    pub fn modal_visible(&self) -> bool {
        self.modal.as_ref().is_some_and(StartupModal::is_visible)
    }

    /// Hide the modal; false if none was visible
    pub fn hide_modal(&mut self) -> bool {
        self.modal.as_mut().is_some_and(StartupModal::hide)
    }

    /// Markup of the chat container: banner, entries, placeholder
    pub fn chatbox_html(&self) -> String {
        let mut html = String::from("<div id=\"chatbox\">\n");
        if let Some(banner) = &self.banner {
            html.push_str(&banner.to_html());
            html.push('\n');
        }
        let transcript = self.transcript.to_html();
        if !transcript.is_empty() {
            html.push_str(&transcript);
            html.push('\n');
        }
        html.push_str("</div>");
        html
    }

    /// Standalone HTML document of the page, with `stylesheet` inlined after the base layout
    pub fn to_document(&self, stylesheet: &str) -> String {
        let disabled = |enabled: bool| if enabled { "" } else { " disabled" };
        let autofocus = if self.input.focused { " autofocus" } else { "" };
        let modal = self.modal.as_ref().map(StartupModal::to_html).unwrap_or_default();

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
             <style>\n{base}{highlight}</style>\n</head>\n<body>\n{modal}\n\
             <div class=\"chat-container\">\n{chatbox}\n<div class=\"input-area\">\n\
             <textarea id=\"userInput\"{input_disabled}{autofocus}>{buffer}</textarea>\n\
             <button id=\"sendButton\"{submit_disabled}>Send</button>\n</div>\n</div>\n</body>\n</html>\n",
            title = escape_html(&self.title),
            base = PAGE_CSS,
            highlight = stylesheet,
            modal = modal,
            chatbox = self.chatbox_html(),
            input_disabled = disabled(self.input.enabled),
            autofocus = autofocus,
            buffer = escape_html(&self.input.buffer),
            submit_disabled = disabled(self.submit_enabled),
        )
    }
}

impl ChatView for Page {
    fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    fn input_value(&self) -> &str {
        &self.input.buffer
    }

    fn clear_input(&mut self) {
        self.input.buffer.clear();
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.input.enabled = enabled;
        self.submit_enabled = enabled;
        if !enabled {
            self.input.focused = false;
        }
    }

    fn controls_enabled(&self) -> bool {
        self.input.enabled && self.submit_enabled
    }

    fn focus_input(&mut self) {
        if self.input.enabled {
            self.input.focused = true;
        }
    }
}
