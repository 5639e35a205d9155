use crate::sanitize::escape_html;

/// Greeting shown in the transcript area until the user starts typing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeBanner {
    text: String,
}

impl WelcomeBanner {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn greeting(&self) -> String {
        format!("Hello {}", self.text)
    }

    pub fn to_html(&self) -> String {
        format!("<div class=\"welcome-message\">{}</div>", escape_html(&self.greeting()))
    }
}

/// One-time dialog shown at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupModal {
    text: String,
    visible: bool,
}

impl StartupModal {
    /// Create a hidden modal
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), visible: false }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hide the modal; false if it was already hidden
    pub fn hide(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    pub fn to_html(&self) -> String {
        let display = if self.visible { "block" } else { "none" };
        let text = escape_html(&self.text).replace('\n', "<br/>");
        format!(
            "<div id=\"welcomeModal\" class=\"modal\" style=\"display: {}\"><div class=\"modal-content\">\
             <span class=\"close\">&times;</span><p id=\"welcomeMessageText\">{}</p></div></div>",
            display, text
        )
    }
}
