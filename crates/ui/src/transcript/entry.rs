use std::fmt;
use std::str::FromStr;

use crate::sanitize::escape_html;
use crate::segment::Segment;

/// Fixed element id of the in-flight placeholder
pub const PLACEHOLDER_ID: &str = "loading-indicator";

/// Monotonic identifier of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub(crate) u64);

impl EntryId {
    pub fn get(self) -> u64 {
        self.0
    }

    /// Element id used in serialized markup
    pub fn dom_id(self) -> String {
        format!("entry-{}", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who authored an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Style class distinguishing the two sides of the conversation
    pub fn class_name(&self) -> &'static str {
        match self {
            Sender::User => "user-message",
            Sender::Assistant => "ai-message",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "assistant" | "ai" => Ok(Sender::Assistant),
            other => Err(format!("Unknown sender '{}'. Expected user or assistant", other)),
        }
    }
}

/// Rendered markup for one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Complete `<div>` holding the prose
    Prose { html: String },
    /// Code block; `markup` is the sanitized `<pre><code>` element, `highlighted` its highlighted
    /// replacement once the highlight pass has run
    Code { language: String, content: String, markup: String, highlighted: Option<String> },
}

impl Block {
    pub fn is_highlighted(&self) -> bool {
        matches!(self, Block::Code { highlighted: Some(_), .. })
    }

    pub fn to_html(&self) -> String {
        match self {
            Block::Prose { html } => html.clone(),
            Block::Code { markup, highlighted, .. } => {
                format!("<div class=\"code-message\">{}</div>", highlighted.as_deref().unwrap_or(markup))
            }
        }
    }
}

/// One rendered message in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub sender: Sender,
    pub segments: Vec<Segment>,
    pub blocks: Vec<Block>,
}

impl TranscriptEntry {
    /// Value of the `class` attribute
    pub fn class_attr(&self) -> String {
        format!("message {}", self.sender.class_name())
    }

    /// True when the source text had nothing visible to render
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn to_html(&self) -> String {
        let mut html = format!("<div class=\"{}\" id=\"{}\">", self.class_attr(), self.id.dom_id());
        for block in &self.blocks {
            html.push_str(&block.to_html());
        }
        html.push_str("</div>");
        html
    }
}

/// Transient "thinking" entry shown while a request is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderEntry {
    pub text: String,
}

impl PlaceholderEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Text is inserted verbatim, never parsed for fences or markup
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"message {}\" id=\"{}\">{}</div>",
            Sender::Assistant.class_name(),
            PLACEHOLDER_ID,
            escape_html(&self.text)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_classes() {
        assert_eq!(Sender::User.class_name(), "user-message");
        assert_eq!(Sender::Assistant.class_name(), "ai-message");
    }

    #[test]
    fn test_sender_from_str() {
        assert_eq!("user".parse::<Sender>().unwrap(), Sender::User);
        assert_eq!("Assistant".parse::<Sender>().unwrap(), Sender::Assistant);
        assert_eq!("ai".parse::<Sender>().unwrap(), Sender::Assistant);
        assert!("robot".parse::<Sender>().is_err());
    }

    #[test]
    fn test_code_block_prefers_highlighted_markup() {
        let mut block = Block::Code {
            language: "js".to_string(),
            content: "x".to_string(),
            markup: "<pre><code class=\"language-js\">x</code></pre>".to_string(),
            highlighted: None,
        };
        assert_eq!(block.to_html(), "<div class=\"code-message\"><pre><code class=\"language-js\">x</code></pre></div>");
        assert!(!block.is_highlighted());

        if let Block::Code { highlighted, .. } = &mut block {
            *highlighted = Some("<pre class=\"highlighted\">x</pre>".to_string());
        }
        assert_eq!(block.to_html(), "<div class=\"code-message\"><pre class=\"highlighted\">x</pre></div>");
        assert!(block.is_highlighted());
    }

    #[test]
    fn test_entry_html() {
        let entry = TranscriptEntry {
            id: EntryId(3),
            sender: Sender::User,
            segments: vec![Segment::prose("hi")],
            blocks: vec![Block::Prose { html: "<div>hi</div>".to_string() }],
        };
        assert_eq!(entry.to_html(), "<div class=\"message user-message\" id=\"entry-3\"><div>hi</div></div>");
        assert!(!entry.is_empty());
    }

    #[test]
    fn test_placeholder_text_is_not_markup() {
        let placeholder = PlaceholderEntry::new("<b>Thinking</b> `js\nx`");
        let html = placeholder.to_html();
        assert!(html.starts_with("<div class=\"message ai-message\" id=\"loading-indicator\">"));
        assert!(html.contains("&lt;b&gt;Thinking&lt;/b&gt; `js\nx`"));
        assert!(!html.contains("code-message"));
    }
}
