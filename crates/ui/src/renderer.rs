use std::sync::Arc;

use chatpane_core::ProseMarkup;

use crate::sanitize::{escape_html, sanitize_fragment};
use crate::segment::{Segment, segments};
use crate::syntax::SyntaxHighlighter;
use crate::transcript::{Block, EntryId, ScrollAnchor, Sender, Transcript, TranscriptEntry};

/// Turns raw message text into transcript entries
pub struct Renderer {
    highlighter: Arc<SyntaxHighlighter>,
    prose_markup: ProseMarkup,
}

impl Renderer {
    pub fn new(highlighter: Arc<SyntaxHighlighter>, prose_markup: ProseMarkup) -> Self {
        Self { highlighter, prose_markup }
    }

    pub fn highlighter(&self) -> &SyntaxHighlighter {
        &self.highlighter
    }

    pub fn prose_markup(&self) -> ProseMarkup {
        self.prose_markup
    }

    /// Append `raw` as a new entry, scroll it into view and highlight the transcript
    ///
    /// Whitespace-only input still produces an entry, just one without blocks.
    pub fn render(&self, transcript: &mut Transcript, sender: Sender, raw: &str) -> EntryId {
        let segments = segments(raw);
        let blocks = segments.iter().map(|segment| self.block_for(segment)).collect();

        let id = transcript.allocate_id();
        let segment_count = segments.len();
        transcript.append(TranscriptEntry { id, sender, segments, blocks });
        transcript.scroll_into_view(ScrollAnchor::Entry(id));

        let highlighted = transcript.highlight_all(&self.highlighter);
        tracing::debug!(entry = %id, %sender, segments = segment_count, highlighted, "rendered entry");
        id
    }

    fn block_for(&self, segment: &Segment) -> Block {
        match segment {
            Segment::Prose { text } => Block::Prose { html: format!("<div>{}</div>", self.prose_html(text)) },
            Segment::Code { language, content } => Block::Code {
                language: language.clone(),
                content: content.clone(),
                markup: code_markup(language, content),
                highlighted: None,
            },
        }
    }

    /// Inner markup of a prose block with line breaks turned into `<br/>`
    pub fn prose_html(&self, text: &str) -> String {
        match self.prose_markup {
            ProseMarkup::Escape => line_breaks(&escape_html(text)),
            ProseMarkup::Sanitize => sanitize_fragment(&line_breaks(text)),
        }
    }
}

/// Sanitized `<pre><code>` element for a code segment, content escaped first
pub fn code_markup(language: &str, content: &str) -> String {
    let html = format!("<pre><code class=\"language-{}\">{}</code></pre>", language, escape_html(content));
    sanitize_fragment(&html)
}

fn line_breaks(text: &str) -> String {
    text.replace("\r\n", "<br/>").replace('\r', "<br/>").replace('\n', "<br/>")
}
