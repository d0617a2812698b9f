//! Linear HTML tag processor.
//!
//! Walks the opening tags of a document in order and edits the document in
//! place: attributes, the text directly inside the current tag, or the whole
//! current element. Edits are applied to the underlying string immediately,
//! so [`TagProcessor::html`] always reflects every change made so far.
//!
//! This is not a full HTML parser. It understands comments, doctypes,
//! quoted attribute values, void elements and raw-text elements, which is
//! enough to locate and rewrite the elements templates emit.

use super::text::{decode_entities, escape_attribute, escape_text};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "AREA", "BASE", "BR", "COL", "EMBED", "HR", "IMG", "INPUT", "LINK", "META", "SOURCE",
    "TRACK", "WBR",
];

/// Elements whose content is text up to the matching closer.
const RAW_TEXT_ELEMENTS: &[&str] = &["SCRIPT", "STYLE", "TEXTAREA", "TITLE"];

#[derive(Debug, Clone)]
struct Attribute {
    name: String,
    start: usize,
    end: usize,
    value: Option<(usize, usize)>,
}

#[derive(Debug, Clone)]
struct Tag {
    name: String,
    start: usize,
    end: usize,
    name_end: usize,
    attributes: Vec<Attribute>,
    self_closing: bool,
}

enum Token {
    Open(Tag),
    Close { name: String, end: usize },
    Skip { end: usize },
}

/// Cursor over the opening tags of an HTML document.
///
/// ```
/// use trellis::html::TagProcessor;
///
/// let mut p = TagProcessor::new("<html><body><h1>Hi</h1></body></html>");
/// assert!(p.next_tag_named("h1"));
/// p.set_attribute("class", "title");
/// assert_eq!(p.breadcrumbs(), vec!["HTML", "BODY", "H1"]);
/// assert_eq!(p.html(), "<html><body><h1 class=\"title\">Hi</h1></body></html>");
/// ```
#[derive(Debug, Clone)]
pub struct TagProcessor {
    html: String,
    cursor: usize,
    current: Option<Tag>,
    open: Vec<String>,
}

impl TagProcessor {
    /// Create a processor positioned before the first tag.
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            cursor: 0,
            current: None,
            open: Vec::new(),
        }
    }

    /// The document with every edit applied.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Consume the processor and return the edited document.
    pub fn into_html(self) -> String {
        self.html
    }

    /// Advance to the next opening tag. Returns `false` at end of document.
    pub fn next_tag(&mut self) -> bool {
        self.leave_current();

        while let Some(offset) = self.html[self.cursor..].find('<') {
            let at = self.cursor + offset;
            match self.scan_token(at) {
                Some(Token::Open(tag)) => {
                    self.cursor = tag.end;
                    self.current = Some(tag);
                    return true;
                }
                Some(Token::Close { name, end }) => {
                    if let Some(pos) = self.open.iter().rposition(|n| *n == name) {
                        self.open.truncate(pos);
                    }
                    self.cursor = end;
                }
                Some(Token::Skip { end }) => self.cursor = end,
                None => self.cursor = at + 1,
            }
        }

        self.cursor = self.html.len();
        false
    }

    /// Advance to the next opening tag named `name` (case-insensitive).
    pub fn next_tag_named(&mut self, name: &str) -> bool {
        let wanted = name.to_ascii_uppercase();
        while self.next_tag() {
            if self.tag() == Some(wanted.as_str()) {
                return true;
            }
        }
        false
    }

    /// Upper-case name of the current tag.
    pub fn tag(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.name.as_str())
    }

    /// Names of the open elements enclosing the current tag, outermost
    /// first, ending with the current tag.
    pub fn breadcrumbs(&self) -> Vec<String> {
        let mut crumbs = self.open.clone();
        if let Some(tag) = &self.current {
            crumbs.push(tag.name.clone());
        }
        crumbs
    }

    /// Decoded value of an attribute on the current tag. A boolean
    /// attribute yields an empty string.
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        let tag = self.current.as_ref()?;
        let attr = find_attribute(tag, name)?;
        Some(match attr.value {
            Some((start, end)) => decode_entities(&self.html[start..end]),
            None => String::new(),
        })
    }

    /// Set an attribute on the current tag. Returns `false` with no current
    /// tag or an invalid attribute name.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> bool {
        let Some(tag) = &self.current else {
            return false;
        };
        if !is_valid_attribute_name(name) {
            return false;
        }

        let rendered = format!("{}=\"{}\"", name.to_ascii_lowercase(), escape_attribute(value));
        let start = tag.start;
        match find_attribute(tag, name) {
            Some(attr) => {
                let range = attr.start..attr.end;
                self.html.replace_range(range, &rendered);
            }
            None => {
                let at = tag.name_end;
                self.html.insert_str(at, &format!(" {}", rendered));
            }
        }
        self.reparse_current(start);
        true
    }

    /// Remove an attribute from the current tag. Returns `false` when it was
    /// not present.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let Some(tag) = &self.current else {
            return false;
        };
        let Some(attr) = find_attribute(tag, name) else {
            return false;
        };

        let mut from = attr.start;
        while from > tag.name_end && self.html.as_bytes()[from - 1].is_ascii_whitespace() {
            from -= 1;
        }
        let start = tag.start;
        self.html.replace_range(from..attr.end, "");
        self.reparse_current(start);
        true
    }

    /// Text directly inside the current tag.
    ///
    /// For raw-text elements this is the whole content up to the closing
    /// tag. For other elements it is the text before the next tag.
    pub fn modifiable_text(&self) -> Option<String> {
        let tag = self.current.as_ref()?;
        let (start, end) = self.text_range(tag)?;
        let raw = &self.html[start..end];
        Some(if tag.name == "SCRIPT" || tag.name == "STYLE" {
            raw.to_string()
        } else {
            decode_entities(raw)
        })
    }

    /// Replace the text directly inside the current tag.
    ///
    /// Returns `false` when there is no current tag, the tag is void, or the
    /// text would close a SCRIPT or STYLE element early.
    pub fn set_modifiable_text(&mut self, text: &str) -> bool {
        let Some(tag) = self.current.clone() else {
            return false;
        };
        let Some((start, end)) = self.text_range(&tag) else {
            return false;
        };

        let replacement = if tag.name == "SCRIPT" || tag.name == "STYLE" {
            let closer = format!("</{}", tag.name.to_ascii_lowercase());
            if text.to_ascii_lowercase().contains(&closer) {
                return false;
            }
            text.to_string()
        } else {
            escape_text(text)
        };

        self.html.replace_range(start..end, &replacement);
        true
    }

    /// Remove the current element, its content and its closing tag.
    ///
    /// The processor moves to just before whatever followed the element.
    pub fn remove_element(&mut self) -> bool {
        self.replace_element("")
    }

    /// Replace the current element, its content and its closing tag with
    /// `html`. Scanning resumes after the inserted markup.
    pub fn replace_element(&mut self, html: &str) -> bool {
        let Some(tag) = self.current.take() else {
            return false;
        };
        let end = self.element_end(&tag);
        self.html.replace_range(tag.start..end, html);
        self.cursor = tag.start + html.len();
        true
    }

    fn leave_current(&mut self) {
        let Some(tag) = self.current.take() else {
            return;
        };
        if is_raw_text(&tag.name) {
            self.cursor = self
                .find_closer(&tag.name, tag.end)
                .map(|(_, end)| end)
                .unwrap_or(self.html.len());
        } else if !tag.self_closing && !is_void(&tag.name) {
            self.open.push(tag.name);
        }
    }

    fn reparse_current(&mut self, start: usize) {
        match self.scan_token(start) {
            Some(Token::Open(tag)) => {
                self.cursor = tag.end;
                self.current = Some(tag);
            }
            _ => self.current = None,
        }
    }

    fn text_range(&self, tag: &Tag) -> Option<(usize, usize)> {
        if is_void(&tag.name) || tag.self_closing {
            return None;
        }
        if is_raw_text(&tag.name) {
            let end = self
                .find_closer(&tag.name, tag.end)
                .map(|(start, _)| start)
                .unwrap_or(self.html.len());
            return Some((tag.end, end));
        }
        let end = self.html[tag.end..]
            .find('<')
            .map(|i| tag.end + i)
            .unwrap_or(self.html.len());
        Some((tag.end, end))
    }

    // End offset of the element opened by `tag`, closing tag included.
    fn element_end(&self, tag: &Tag) -> usize {
        if is_void(&tag.name) || tag.self_closing {
            return tag.end;
        }
        if is_raw_text(&tag.name) {
            return self
                .find_closer(&tag.name, tag.end)
                .map(|(_, end)| end)
                .unwrap_or(self.html.len());
        }

        let mut depth = 0usize;
        let mut pos = tag.end;
        while let Some(offset) = self.html[pos..].find('<') {
            let at = pos + offset;
            match self.scan_token(at) {
                Some(Token::Open(inner)) => {
                    pos = inner.end;
                    if is_raw_text(&inner.name) {
                        pos = self
                            .find_closer(&inner.name, inner.end)
                            .map(|(_, end)| end)
                            .unwrap_or(self.html.len());
                    } else if inner.name == tag.name && !inner.self_closing {
                        depth += 1;
                    }
                }
                Some(Token::Close { name, end }) => {
                    pos = end;
                    if name == tag.name {
                        if depth == 0 {
                            return end;
                        }
                        depth -= 1;
                    }
                }
                Some(Token::Skip { end }) => pos = end,
                None => pos = at + 1,
            }
        }

        // Unclosed element: only the tag itself is replaced.
        tag.end
    }

    // Find `</name ...>` at or after `from`, case-insensitive.
    fn find_closer(&self, name: &str, from: usize) -> Option<(usize, usize)> {
        let needle = format!("</{}", name.to_ascii_lowercase());
        let haystack = self.html[from..].to_ascii_lowercase();
        let mut search = 0;
        while let Some(offset) = haystack[search..].find(&needle) {
            let start = search + offset;
            let after = start + needle.len();
            let terminated = haystack[after..]
                .chars()
                .next()
                .is_none_or(|c| c == '>' || c == '/' || c.is_ascii_whitespace());
            if terminated {
                let end = haystack[after..]
                    .find('>')
                    .map(|i| after + i + 1)
                    .unwrap_or(haystack.len());
                return Some((from + start, from + end));
            }
            search = after;
        }
        None
    }

    fn scan_token(&self, at: usize) -> Option<Token> {
        let rest = &self.html[at..];
        let bytes = rest.as_bytes();

        if rest.starts_with("<!--") {
            let end = rest[4..]
                .find("-->")
                .map(|i| at + 4 + i + 3)
                .unwrap_or(self.html.len());
            return Some(Token::Skip { end });
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = rest.find('>').map(|i| at + i + 1).unwrap_or(self.html.len());
            return Some(Token::Skip { end });
        }
        if rest.starts_with("</") {
            if !bytes.get(2).is_some_and(|b| b.is_ascii_alphabetic()) {
                return None;
            }
            let name_len = rest[2..]
                .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
                .unwrap_or(rest.len() - 2);
            let name = rest[2..2 + name_len].to_ascii_uppercase();
            let end = rest.find('>').map(|i| at + i + 1).unwrap_or(self.html.len());
            return Some(Token::Close { name, end });
        }
        if !bytes.get(1).is_some_and(|b| b.is_ascii_alphabetic()) {
            return None;
        }

        self.scan_open_tag(at).map(Token::Open)
    }

    fn scan_open_tag(&self, at: usize) -> Option<Tag> {
        let bytes = self.html.as_bytes();
        let len = bytes.len();

        let mut i = at + 1;
        while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'/' && bytes[i] != b'>' {
            i += 1;
        }
        let name = self.html[at + 1..i].to_ascii_uppercase();
        let name_end = i;

        let mut attributes = Vec::new();
        let mut self_closing = false;
        loop {
            while i < len && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
                self_closing = bytes[i] == b'/';
                i += 1;
            }
            if i >= len {
                return None;
            }
            if bytes[i] == b'>' {
                return Some(Tag {
                    name,
                    start: at,
                    end: i + 1,
                    name_end,
                    attributes,
                    self_closing,
                });
            }
            self_closing = false;

            let attr_start = i;
            while i < len
                && !bytes[i].is_ascii_whitespace()
                && !matches!(bytes[i], b'=' | b'>' | b'/')
            {
                i += 1;
            }
            // A stray `=` with no name is consumed as a one-byte name.
            if i == attr_start {
                i += 1;
            }
            let attr_name = self.html[attr_start..i].to_ascii_lowercase();

            let mut j = i;
            while j < len && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            let mut value = None;
            if j < len && bytes[j] == b'=' {
                j += 1;
                while j < len && bytes[j].is_ascii_whitespace() {
                    j += 1;
                }
                if j < len && (bytes[j] == b'"' || bytes[j] == b'\'') {
                    let quote = bytes[j];
                    let value_start = j + 1;
                    let close = self.html[value_start..].find(quote as char)?;
                    value = Some((value_start, value_start + close));
                    i = value_start + close + 1;
                } else {
                    let value_start = j;
                    while j < len && !bytes[j].is_ascii_whitespace() && bytes[j] != b'>' {
                        j += 1;
                    }
                    value = Some((value_start, j));
                    i = j;
                }
            }

            attributes.push(Attribute {
                name: attr_name,
                start: attr_start,
                end: i,
                value,
            });
        }
    }
}

fn find_attribute<'a>(tag: &'a Tag, name: &str) -> Option<&'a Attribute> {
    tag.attributes
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(name))
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}

fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '='))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_opening_tags_in_order() {
        let mut p = TagProcessor::new("<!DOCTYPE html><!-- <b> --><html><p>x</p><br></html>");
        let mut names = Vec::new();
        while p.next_tag() {
            names.push(p.tag().unwrap().to_string());
        }
        assert_eq!(names, vec!["HTML", "P", "BR"]);
    }

    #[test]
    fn reads_quoted_unquoted_and_boolean_attributes() {
        let mut p = TagProcessor::new(r#"<input type=text value='a &amp; b' disabled data-x="1>2">"#);
        assert!(p.next_tag());
        assert_eq!(p.get_attribute("type").as_deref(), Some("text"));
        assert_eq!(p.get_attribute("VALUE").as_deref(), Some("a & b"));
        assert_eq!(p.get_attribute("disabled").as_deref(), Some(""));
        assert_eq!(p.get_attribute("data-x").as_deref(), Some("1>2"));
        assert_eq!(p.get_attribute("missing"), None);
    }

    #[test]
    fn set_attribute_replaces_existing_value() {
        let mut p = TagProcessor::new("<html lang='en'><head></head></html>");
        assert!(p.next_tag_named("html"));
        assert!(p.set_attribute("lang", "es"));
        assert_eq!(p.get_attribute("lang").as_deref(), Some("es"));
        assert_eq!(p.html(), "<html lang=\"es\"><head></head></html>");

        assert!(p.next_tag());
        assert_eq!(p.tag(), Some("HEAD"));
    }

    #[test]
    fn set_attribute_escapes_value() {
        let mut p = TagProcessor::new("<a>link</a>");
        p.next_tag();
        p.set_attribute("title", "say \"hi\" & bye");
        assert_eq!(p.html(), "<a title=\"say &quot;hi&quot; &amp; bye\">link</a>");
    }

    #[test]
    fn remove_attribute_drops_leading_space() {
        let mut p = TagProcessor::new("<div id=\"a\" class=\"b\"></div>");
        p.next_tag();
        assert!(p.remove_attribute("class"));
        assert!(!p.remove_attribute("class"));
        assert_eq!(p.html(), "<div id=\"a\"></div>");
    }

    #[test]
    fn title_text_is_raw_content() {
        let mut p = TagProcessor::new("<title>Hello &amp; <b>World</b></title><p>after</p>");
        assert!(p.next_tag_named("title"));
        assert_eq!(p.modifiable_text().as_deref(), Some("Hello & <b>World</b>"));
        assert!(p.set_modifiable_text("Saludo"));
        assert!(p.next_tag());
        assert_eq!(p.tag(), Some("P"));
        assert_eq!(p.html(), "<title>Saludo</title><p>after</p>");
    }

    #[test]
    fn style_text_cannot_close_element() {
        let mut p = TagProcessor::new("<style>a{}</style>");
        p.next_tag();
        assert!(!p.set_modifiable_text("</style><script>"));
        assert_eq!(p.modifiable_text().as_deref(), Some("a{}"));
    }

    #[test]
    fn heading_text_is_text_before_next_tag() {
        let mut p = TagProcessor::new("<h1>Hello World!</h1>");
        p.next_tag();
        assert_eq!(p.modifiable_text().as_deref(), Some("Hello World!"));
        p.set_modifiable_text("¡Hola, mundo!");
        assert_eq!(p.html(), "<h1>¡Hola, mundo!</h1>");
    }

    #[test]
    fn breadcrumbs_track_nesting() {
        let html = "<html><head><link rel=stylesheet></head><body><main><p>x</p></main></body></html>";
        let mut p = TagProcessor::new(html);
        assert!(p.next_tag_named("link"));
        assert_eq!(p.breadcrumbs(), vec!["HTML", "HEAD", "LINK"]);
        assert!(p.next_tag_named("p"));
        assert_eq!(p.breadcrumbs(), vec!["HTML", "BODY", "MAIN", "P"]);
    }

    #[test]
    fn raw_text_contents_are_not_tags() {
        let mut p = TagProcessor::new("<script>if (a<b) { x = '<div>'; }</script><span></span>");
        assert!(p.next_tag());
        assert_eq!(p.tag(), Some("SCRIPT"));
        assert!(p.next_tag());
        assert_eq!(p.tag(), Some("SPAN"));
        assert!(!p.next_tag());
    }

    #[test]
    fn remove_nested_element() {
        let mut p = TagProcessor::new("<div><div>inner</div></div><p>keep</p>");
        assert!(p.next_tag());
        assert!(p.remove_element());
        assert!(p.next_tag());
        assert_eq!(p.tag(), Some("P"));
        assert_eq!(p.html(), "<p>keep</p>");
    }

    #[test]
    fn remove_void_and_raw_elements() {
        let html = "<body><link id='x'><style id='y'>a{}</style><em>z</em></body>";
        let mut p = TagProcessor::new(html);
        assert!(p.next_tag_named("link"));
        assert!(p.remove_element());
        assert!(p.next_tag_named("style"));
        assert!(p.remove_element());
        assert!(p.next_tag());
        assert_eq!(p.breadcrumbs(), vec!["BODY", "EM"]);
        assert_eq!(p.html(), "<body><em>z</em></body>");
    }

    #[test]
    fn replace_element_skips_inserted_markup() {
        let mut p = TagProcessor::new("<style id=\"ph\"></style><i></i>");
        p.next_tag();
        assert!(p.replace_element("<style id=\"new\"></style>"));
        assert!(p.next_tag());
        assert_eq!(p.tag(), Some("I"));
        assert_eq!(p.html(), "<style id=\"new\"></style><i></i>");
    }

    #[test]
    fn operations_without_current_tag_fail() {
        let mut p = TagProcessor::new("plain text");
        assert!(!p.next_tag());
        assert!(!p.set_attribute("a", "b"));
        assert!(!p.remove_element());
        assert_eq!(p.modifiable_text(), None);
        assert_eq!(p.into_html(), "plain text");
    }

    #[test]
    fn literal_less_than_is_text() {
        let mut p = TagProcessor::new("1 < 2 <b>bold</b>");
        assert!(p.next_tag());
        assert_eq!(p.tag(), Some("B"));
    }
}
