//! HTML escaping and allow-list sanitization for transcript markup.

/// Tags that survive sanitization
const ALLOWED_TAGS: &[&str] =
    &["pre", "code", "span", "div", "br", "p", "b", "strong", "i", "em", "ul", "ol", "li", "blockquote"];

/// Tags removed together with everything inside them
const DROPPED_WITH_CONTENT: &[&str] =
    &["script", "style", "iframe", "object", "embed", "noscript", "template", "textarea", "title", "xmp"];

/// Escape text so it is inert inside element content or a quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Keep allowed tags with a safe `class` only; strip everything that could run or load.
///
/// Unknown tags are removed but their text is kept. Script-like elements are removed with their
/// content. A `<` that does not open a tag is escaped.
///
/// The result is balanced: a closing tag with no matching open element is dropped, and elements
/// still open at the end are closed, so the fragment cannot close markup that wraps it.
pub fn sanitize_fragment(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut open: Vec<String> = Vec::new();
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let markup = &rest[lt..];

        match parse_markup(markup) {
            Markup::Skip(len) => rest = &markup[len..],
            Markup::Tag(tag) => {
                let after = &markup[tag.len..];
                if !tag.closing && DROPPED_WITH_CONTENT.contains(&tag.name.as_str()) {
                    rest = skip_element(after, &tag.name);
                    continue;
                }
                if ALLOWED_TAGS.contains(&tag.name.as_str()) {
                    if !tag.closing {
                        tag.write_to(&mut out);
                        if tag.name != "br" {
                            open.push(tag.name);
                        }
                    } else if let Some(depth) = open.iter().rposition(|name| *name == tag.name) {
                        for name in open.drain(depth..).rev() {
                            close_tag(&name, &mut out);
                        }
                    }
                }
                rest = after;
            }
            Markup::Text => {
                out.push_str("&lt;");
                rest = &markup[1..];
            }
        }
    }

    out.push_str(rest);
    for name in open.into_iter().rev() {
        close_tag(&name, &mut out);
    }
    out
}

fn close_tag(name: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

enum Markup {
    /// Comment, doctype or processing instruction of the given byte length
    Skip(usize),
    Tag(Tag),
    /// Not markup at all
    Text,
}

struct Tag {
    name: String,
    closing: bool,
    class: Option<String>,
    /// Bytes consumed, `<` through `>`
    len: usize,
}

impl Tag {
    /// Opening form only; closers are emitted from the open-element stack
    fn write_to(&self, out: &mut String) {
        if self.name == "br" {
            out.push_str("<br/>");
            return;
        }

        out.push('<');
        out.push_str(&self.name);
        if let Some(class) = &self.class {
            out.push_str(" class=\"");
            out.push_str(class);
            out.push('"');
        }
        out.push('>');
    }
}

/// `s` starts with `<`
fn parse_markup(s: &str) -> Markup {
    if let Some(body) = s.strip_prefix("<!--") {
        return match body.find("-->") {
            Some(end) => Markup::Skip(4 + end + 3),
            None => Markup::Skip(s.len()),
        };
    }

    if s.starts_with("<!") || s.starts_with("<?") {
        return match s.find('>') {
            Some(end) => Markup::Skip(end + 1),
            None => Markup::Text,
        };
    }

    let bytes = s.as_bytes();
    let closing = bytes.get(1) == Some(&b'/');
    let name_start = if closing { 2 } else { 1 };
    let name_end = name_start + bytes[name_start..].iter().take_while(|b| b.is_ascii_alphanumeric()).count();
    if name_end == name_start || !bytes[name_start].is_ascii_alphabetic() {
        return Markup::Text;
    }

    let Some(gt) = find_tag_end(bytes, name_end) else {
        return Markup::Text;
    };

    let name = s[name_start..name_end].to_ascii_lowercase();
    let class = attributes(&s[name_end..gt])
        .into_iter()
        .find(|(key, _)| key == "class")
        .and_then(|(_, value)| safe_class(value));

    Markup::Tag(Tag { name, closing, class, len: gt + 1 })
}

/// Index of the `>` closing a tag, ignoring any inside quoted attribute values
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }
    None
}

/// Lowercased attribute names with their raw values
fn attributes(s: &str) -> Vec<(String, &str)> {
    let bytes = s.as_bytes();
    let mut attrs = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() || bytes[i] == b'/' {
            i += 1;
            continue;
        }

        let key_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !matches!(bytes[i], b'=' | b'/') {
            i += 1;
        }
        let key = s[key_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'=' {
            attrs.push((key, ""));
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = match bytes.get(i) {
            Some(&q) if q == b'"' || q == b'\'' => {
                let start = i + 1;
                let end = bytes[start..].iter().position(|&b| b == q).map_or(bytes.len(), |p| start + p);
                i = (end + 1).min(bytes.len());
                &s[start..end]
            }
            _ => {
                let start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                &s[start..i]
            }
        };
        attrs.push((key, value));
    }

    attrs
}

/// Class tokens that are inert inside a quoted attribute; unsafe tokens are dropped one by one
fn safe_class(value: &str) -> Option<String> {
    let tokens: Vec<&str> = value
        .split_ascii_whitespace()
        .filter(|token| token.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'+' | b'#')))
        .collect();
    (!tokens.is_empty()).then(|| tokens.join(" "))
}

/// Remainder of `s` after the closing tag of `name`; empty if it never closes
fn skip_element<'a>(s: &'a str, name: &str) -> &'a str {
    let lower = s.to_ascii_lowercase();
    let needle = format!("</{}", name);
    let mut from = 0;

    while let Some(pos) = lower[from..].find(&needle) {
        let start = from + pos;
        let after_name = start + needle.len();
        let boundary = lower.as_bytes().get(after_name).is_none_or(|b| !b.is_ascii_alphanumeric());
        if boundary && let Some(gt) = lower[after_name..].find('>') {
            return &s[after_name + gt + 1..];
        }
        from = after_name;
    }

    ""
}
