use crate::sanitize::sanitize_fragment;
use crate::syntax::SyntaxHighlighter;
use crate::transcript::entry::{Block, EntryId, PlaceholderEntry, TranscriptEntry};

/// How the container scrolls to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
}

/// Which edge of the target is aligned with the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBlock {
    #[default]
    End,
}

/// Element the container last scrolled into view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAnchor {
    Entry(EntryId),
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTarget {
    pub anchor: ScrollAnchor,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

/// The scrollable message container
///
/// Entries are append-only. The placeholder, when present, always sits after the last entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    placeholder: Option<PlaceholderEntry>,
    next_id: u64,
    scroll_target: Option<ScrollTarget>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the id for the next entry
    pub fn allocate_id(&mut self) -> EntryId {
        self.next_id += 1;
        EntryId(self.next_id)
    }

    /// Add an entry after all existing ones
    pub fn append(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// Show the placeholder, replacing any existing one
    pub fn insert_placeholder(&mut self, text: impl Into<String>) {
        self.placeholder = Some(PlaceholderEntry::new(text));
        self.scroll_into_view(ScrollAnchor::Placeholder);
    }

    /// Remove the placeholder; false if there was none
    pub fn remove_placeholder(&mut self) -> bool {
        self.placeholder.take().is_some()
    }

    pub fn placeholder(&self) -> Option<&PlaceholderEntry> {
        self.placeholder.as_ref()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&TranscriptEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Smooth-scroll so the bottom of `anchor` is visible
    pub fn scroll_into_view(&mut self, anchor: ScrollAnchor) {
        self.scroll_target =
            Some(ScrollTarget { anchor, behavior: ScrollBehavior::Smooth, block: ScrollBlock::End });
    }

    pub fn scroll_target(&self) -> Option<ScrollTarget> {
        self.scroll_target
    }

    /// Highlight every code block that has not been highlighted yet
    ///
    /// Returns the number of blocks highlighted by this call. Running it again without new
    /// entries changes nothing.
    pub fn highlight_all(&mut self, highlighter: &SyntaxHighlighter) -> usize {
        let mut count = 0;
        for entry in &mut self.entries {
            for block in &mut entry.blocks {
                if let Block::Code { language, content, highlighted, .. } = block
                    && highlighted.is_none()
                {
                    let spans = highlighter.highlight_html(content, language);
                    let html = format!(
                        "<pre class=\"highlighted\"><code class=\"language-{}\">{}</code></pre>",
                        language, spans
                    );
                    *highlighted = Some(sanitize_fragment(&html));
                    count += 1;
                }
            }
        }
        count
    }

    /// Markup of the whole container content
    pub fn to_html(&self) -> String {
        let mut parts: Vec<String> = self.entries.iter().map(TranscriptEntry::to_html).collect();
        if let Some(placeholder) = &self.placeholder {
            parts.push(placeholder.to_html());
        }
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;
    use crate::transcript::Sender;

    fn code_entry(transcript: &mut Transcript, language: &str, content: &str) -> EntryId {
        let id = transcript.allocate_id();
        transcript.append(TranscriptEntry {
            id,
            sender: Sender::Assistant,
            segments: vec![Segment::code(language, content)],
            blocks: vec![Block::Code {
                language: language.to_string(),
                content: content.to_string(),
                markup: format!("<pre><code class=\"language-{}\">{}</code></pre>", language, content),
                highlighted: None,
            }],
        });
        id
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut transcript = Transcript::new();
        let a = transcript.allocate_id();
        let b = transcript.allocate_id();
        assert!(b > a);
    }

    #[test]
    fn test_placeholder_lifecycle() {
        let mut transcript = Transcript::new();
        assert!(!transcript.remove_placeholder());

        transcript.insert_placeholder("Thinking...");
        transcript.insert_placeholder("Still thinking...");
        assert_eq!(transcript.placeholder().unwrap().text, "Still thinking...");
        assert_eq!(transcript.scroll_target().unwrap().anchor, ScrollAnchor::Placeholder);
        assert_eq!(transcript.to_html().matches("loading-indicator").count(), 1);

        assert!(transcript.remove_placeholder());
        assert!(transcript.placeholder().is_none());
        assert!(!transcript.to_html().contains("loading-indicator"));
    }

    #[test]
    fn test_placeholder_renders_after_entries() {
        let mut transcript = Transcript::new();
        transcript.insert_placeholder("wait");
        code_entry(&mut transcript, "js", "x");
        let html = transcript.to_html();
        assert!(html.find("entry-1").unwrap() < html.find("loading-indicator").unwrap());
    }

    #[test]
    fn test_highlight_all_is_idempotent() {
        let highlighter = SyntaxHighlighter::new();
        let mut transcript = Transcript::new();
        code_entry(&mut transcript, "rust", "fn main() {}");

        assert_eq!(transcript.highlight_all(&highlighter), 1);
        let once = transcript.to_html();
        assert!(once.contains("<pre class=\"highlighted\"><code class=\"language-rust\">"));

        assert_eq!(transcript.highlight_all(&highlighter), 0);
        assert_eq!(transcript.to_html(), once);
    }

    #[test]
    fn test_highlight_all_only_new_blocks() {
        let highlighter = SyntaxHighlighter::new();
        let mut transcript = Transcript::new();
        code_entry(&mut transcript, "py", "print(1)");
        transcript.highlight_all(&highlighter);

        code_entry(&mut transcript, "sh", "ls");
        assert_eq!(transcript.highlight_all(&highlighter), 1);
        assert!(transcript.entries().iter().flat_map(|e| &e.blocks).all(Block::is_highlighted));
    }

    #[test]
    fn test_highlighted_code_keeps_markup_inert() {
        let highlighter = SyntaxHighlighter::new();
        let mut transcript = Transcript::new();
        code_entry(&mut transcript, "html", "<script>alert(1)</script>");
        transcript.highlight_all(&highlighter);
        assert!(!transcript.to_html().contains("<script"));
    }

    #[test]
    fn test_cpp_highlight_classes_survive() {
        let highlighter = SyntaxHighlighter::new();
        let mut transcript = Transcript::new();
        code_entry(&mut transcript, "cpp", "int main() { return 0; }");
        transcript.highlight_all(&highlighter);

        let html = transcript.to_html();
        assert!(html.contains("hl-c++"));
        assert!(html.contains(">main</span>"));
        assert!(!html.contains("<span>main</span>"));
    }
}
