//! Splitting raw reply text into prose and fenced-code segments.
//!
//! A fence is a backtick, a language token of ASCII word characters, a line feed, then any content
//! (line feeds included) up to the next backtick:
//!
//! ```text
//! hello `js
//! console.log(1)` bye
//! ```
//!
//! [`fragments`] walks the text lazily and yields every piece, whitespace-only prose included, so
//! the source spans always tile the input. [`segments`] is the materialized view the renderer uses,
//! with blank prose dropped.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([A-Za-z0-9_]+)\n((?s:.*?))`").expect("fence pattern compiles"));

/// One atomic unit of a rendered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Prose { text: String },
    Code { language: String, content: String },
}

impl Segment {
    pub fn prose(text: impl Into<String>) -> Self {
        Segment::Prose { text: text.into() }
    }

    pub fn code(language: impl Into<String>, content: impl Into<String>) -> Self {
        Segment::Code { language: language.into(), content: content.into() }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Segment::Code { .. })
    }
}

/// Borrowed piece of the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind<'a> {
    Prose(&'a str),
    Code { language: &'a str, content: &'a str },
}

/// A piece of the source together with the byte range it came from
///
/// For code, `span` covers the whole fence: delimiters, language token and line feed included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub span: Range<usize>,
    pub kind: FragmentKind<'a>,
}

impl<'a> Fragment<'a> {
    /// Prose consisting only of whitespace
    pub fn is_blank(&self) -> bool {
        matches!(self.kind, FragmentKind::Prose(text) if text.trim().is_empty())
    }

    pub fn to_segment(&self) -> Segment {
        match self.kind {
            FragmentKind::Prose(text) => Segment::prose(text),
            FragmentKind::Code { language, content } => Segment::code(language, content),
        }
    }
}

/// Lazy iterator over the fragments of a text
///
/// Holds only the input and a read position; cloning it or calling [`fragments`] again replays
/// the exact same sequence.
#[derive(Debug, Clone)]
pub struct Fragments<'a> {
    text: &'a str,
    pos: usize,
    pending: Option<Fragment<'a>>,
}

/// Walk `text` left to right, yielding prose and code fragments
pub fn fragments(text: &str) -> Fragments<'_> {
    Fragments { text, pos: 0, pending: None }
}

/// Segments of `text`, with whitespace-only prose dropped
pub fn segments(text: &str) -> Vec<Segment> {
    fragments(text).filter(|f| !f.is_blank()).map(|f| f.to_segment()).collect()
}

impl<'a> Iterator for Fragments<'a> {
    type Item = Fragment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(code) = self.pending.take() {
            return Some(code);
        }

        if self.pos >= self.text.len() {
            return None;
        }

        let start = self.pos;
        let Some(caps) = FENCE.captures_at(self.text, start) else {
            self.pos = self.text.len();
            return Some(Fragment { span: start..self.text.len(), kind: FragmentKind::Prose(&self.text[start..]) });
        };

        let (Some(whole), Some(language), Some(content)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            self.pos = self.text.len();
            return None;
        };

        self.pos = whole.end();
        let code = Fragment {
            span: whole.range(),
            kind: FragmentKind::Code { language: language.as_str(), content: content.as_str() },
        };

        if whole.start() > start {
            self.pending = Some(code);
            return Some(Fragment {
                span: start..whole.start(),
                kind: FragmentKind::Prose(&self.text[start..whole.start()]),
            });
        }

        Some(code)
    }
}
