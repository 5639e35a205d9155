use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};

use crate::sanitize::escape_html;
use chatpane_core::{Error, Result};

/// Theme used when none is configured
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Class prefix keeps highlight classes from colliding with page styles
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Syntax highlighter for code blocks
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    theme_name: String,
}

impl SyntaxHighlighter {
    /// Create a new syntax highlighter with the default theme
    pub fn new() -> Self {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set.themes.remove(DEFAULT_THEME).unwrap_or_default();
        Self { syntax_set: SyntaxSet::load_defaults_newlines(), theme, theme_name: DEFAULT_THEME.to_string() }
    }

    /// Create a highlighter for one of syntect's bundled themes
    pub fn with_theme(name: &str) -> Result<Self> {
        let mut theme_set = ThemeSet::load_defaults();
        let Some(theme) = theme_set.themes.remove(name) else {
            let mut available: Vec<_> = theme_set.themes.keys().cloned().collect();
            available.sort();
            return Err(Error::Config(format!("Unknown theme '{}'. Available: {}", name, available.join(", "))));
        };
        Ok(Self { syntax_set: SyntaxSet::load_defaults_newlines(), theme, theme_name: name.to_string() })
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Resolve a fence language to a syntax, falling back to plain text
    fn find_syntax(&self, lang: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_name(lang))
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Highlight a code block into class-based `<span>` markup
    ///
    /// Text is escaped by syntect. If parsing fails midway the whole source comes back escaped
    /// and unhighlighted.
    pub fn highlight_html(&self, code: &str, lang: &str) -> String {
        let syntax = self.find_syntax(lang);
        let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);

        for line in LinesWithEndings::from(code) {
            if let Err(err) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::debug!(lang, error = %err, "highlighting failed, using plain text");
                return escape_html(code);
            }
        }

        generator.finalize()
    }

    /// CSS rules for the classes emitted by [`highlight_html`](Self::highlight_html)
    pub fn stylesheet(&self) -> String {
        match css_for_theme_with_class_style(&self.theme, CLASS_STYLE) {
            Ok(css) => css,
            Err(err) => {
                tracing::warn!(theme = %self.theme_name, error = %err, "failed to build highlight stylesheet");
                String::new()
            }
        }
    }

    /// Highlight a code block with 24-bit ANSI colors for terminal output
    pub fn highlight_terminal(&self, code: &str, lang: &str) -> String {
        let syntax = self.find_syntax(lang);
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut out = String::with_capacity(code.len() * 2);

        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => out.push_str(&as_24_bit_terminal_escaped(&ranges[..], false)),
                Err(_) => out.push_str(line),
            }
        }

        out.push_str("\x1b[0m");
        out
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
