//! Tag-soup tree builder.
//!
//! A single forward scan over the source. Start tags push onto an open
//! element stack; end tags pop to the nearest case-insensitive match and
//! implicitly close anything left open in between. All offsets the scanner
//! stops at are positions of ASCII bytes, so slicing stays on char
//! boundaries.

use calque_dom::{is_raw_text_tag, is_void_tag, Document, NodeId, NodeType};
use compact_str::CompactString;
use tracing::debug;

/// Parse template source into a document tree. Never fails.
pub fn parse(input: &str) -> Document {
    TreeBuilder::new(input).run()
}

struct TreeBuilder<'s> {
    src: &'s str,
    pos: usize,
    doc: Document,
    /// Open elements, innermost last, with their lower-cased tag names.
    stack: Vec<(NodeId, CompactString)>,
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':' || b == b'.'
}

fn is_space_byte(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}

impl<'s> TreeBuilder<'s> {
    fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            doc: Document::new(),
            stack: Vec::new(),
        }
    }

    /// The unconsumed input. Slices borrow the source, not the builder.
    fn remaining(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn run(mut self) -> Document {
        while self.pos < self.src.len() {
            let rest = self.remaining();
            match rest.find('<') {
                None => {
                    self.append_text(rest);
                    self.pos = self.src.len();
                }
                Some(lt) => {
                    if lt > 0 {
                        let text = &rest[..lt];
                        self.append_text(text);
                        self.pos += lt;
                    }
                    self.markup();
                }
            }
        }
        self.doc
    }

    fn current_parent(&self) -> NodeId {
        self.stack
            .last()
            .map_or_else(|| self.doc.root(), |&(id, _)| id)
    }

    /// Append text to the current parent, merging into a trailing text
    /// sibling so a node's payload stays whole.
    fn append_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let parent = self.current_parent();
        if let Some(&last) = self.doc.children(parent).last() {
            if self.doc.node_type(last) == NodeType::Text {
                let mut merged =
                    CompactString::from(self.doc.text(last).unwrap_or_default());
                merged.push_str(text);
                self.doc.set_text(last, merged);
                return;
            }
        }
        let node = self.doc.create_text(text);
        self.doc.append_child(parent, node);
    }

    /// Dispatch on the markup construct starting at `pos` (a `<`).
    fn markup(&mut self) {
        let rest = self.remaining();
        if let Some(comment) = rest.strip_prefix("<!--") {
            match comment.find("-->") {
                Some(end) => {
                    self.append_comment(&comment[..end]);
                    self.pos += 4 + end + 3;
                }
                None => {
                    // Unterminated comment swallows the rest of the input.
                    self.append_comment(comment);
                    self.pos = self.src.len();
                }
            }
        } else if rest.starts_with("</") {
            self.end_tag();
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            // Doctype, CDATA or processing instruction: dropped.
            debug!("skipping markup declaration");
            self.skip_past_gt();
        } else if rest[1..].bytes().next().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.start_tag();
        } else {
            // A lone '<' is literal text.
            self.append_text("<");
            self.pos += 1;
        }
    }

    fn append_comment(&mut self, content: &str) {
        let parent = self.current_parent();
        let node = self.doc.create_comment(content);
        self.doc.append_child(parent, node);
    }

    /// Advance past the next `>` (inclusive), or to end of input.
    fn skip_past_gt(&mut self) {
        match self.src[self.pos..].find('>') {
            Some(gt) => self.pos += gt + 1,
            None => self.pos = self.src.len(),
        }
    }

    fn read_tag_name(&mut self) -> &'s str {
        let start = self.pos;
        while self.pos < self.src.len() && is_tag_name_byte(self.src.as_bytes()[self.pos]) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn skip_space(&mut self) {
        while self.pos < self.src.len() && is_space_byte(self.src.as_bytes()[self.pos]) {
            self.pos += 1;
        }
    }

    fn start_tag(&mut self) {
        self.pos += 1; // consume '<'
        let name = self.read_tag_name();
        let element = self.doc.create_element(name);
        let lower = CompactString::from(name.to_ascii_lowercase());

        let mut self_closing = false;
        loop {
            self.skip_space();
            let Some(&b) = self.src.as_bytes().get(self.pos) else {
                break; // unterminated tag, implicitly closed at EOF
            };
            match b {
                b'>' => {
                    self.pos += 1;
                    break;
                }
                b'/' => {
                    if self.src.as_bytes().get(self.pos + 1) == Some(&b'>') {
                        self_closing = true;
                        self.pos += 2;
                        break;
                    }
                    // Stray slash between attributes.
                    self.pos += 1;
                }
                _ => self.attribute(element),
            }
        }

        let parent = self.current_parent();
        self.doc.append_child(parent, element);

        if self_closing || is_void_tag(&lower) {
            return;
        }
        if is_raw_text_tag(&lower) {
            self.raw_text(element, &lower);
            return;
        }
        self.stack.push((element, lower));
    }

    /// Parse one attribute at the current position and set it on `element`.
    /// The first occurrence of a name wins, as in HTML.
    fn attribute(&mut self, element: NodeId) {
        let start = self.pos;
        while self.pos < self.src.len() {
            let b = self.src.as_bytes()[self.pos];
            if is_space_byte(b) || b == b'=' || b == b'/' || b == b'>' {
                break;
            }
            self.pos += 1;
        }
        let name = &self.src[start..self.pos];
        if name.is_empty() {
            // Defensive skip so the tag loop always advances.
            self.pos += 1;
            return;
        }

        self.skip_space();
        let value = if self.src.as_bytes().get(self.pos) == Some(&b'=') {
            self.pos += 1;
            self.skip_space();
            self.attribute_value()
        } else {
            ""
        };

        if self.doc.attr(element, name).is_none() {
            self.doc.set_attr(element, name, value);
        }
    }

    fn attribute_value(&mut self) -> &'s str {
        match self.src.as_bytes().get(self.pos) {
            Some(&quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                let start = self.pos;
                match self.src[start..].find(quote as char) {
                    Some(end) => {
                        self.pos = start + end + 1;
                        &self.src[start..start + end]
                    }
                    None => {
                        // Unterminated quote runs to end of input.
                        self.pos = self.src.len();
                        &self.src[start..]
                    }
                }
            }
            _ => {
                let start = self.pos;
                while self.pos < self.src.len() {
                    let b = self.src.as_bytes()[self.pos];
                    if is_space_byte(b) || b == b'>' {
                        break;
                    }
                    self.pos += 1;
                }
                &self.src[start..self.pos]
            }
        }
    }

    fn end_tag(&mut self) {
        self.pos += 2; // consume '</'
        let name = self.read_tag_name();
        let lower = name.to_ascii_lowercase();
        self.skip_past_gt();

        if name.is_empty() {
            return;
        }
        match self.stack.iter().rposition(|(_, tag)| tag.as_str() == lower) {
            // Everything above the match is implicitly closed.
            Some(i) => self.stack.truncate(i),
            None => debug!(tag = %lower, "ignoring unmatched end tag"),
        }
    }

    /// Consume raw-text content for `element` up to its matching end tag.
    fn raw_text(&mut self, element: NodeId, tag: &str) {
        let mut search = self.pos;
        let (content_end, resume) = loop {
            let Some(i) = self.src[search..].find("</") else {
                break (self.src.len(), self.src.len());
            };
            let candidate = search + i;
            let after = &self.src[candidate + 2..];
            let matches_tag = match after.get(..tag.len()) {
                Some(prefix) if prefix.eq_ignore_ascii_case(tag) => after[tag.len()..]
                    .bytes()
                    .next()
                    .is_none_or(|b| b == b'>' || b == b'/' || is_space_byte(b)),
                _ => false,
            };
            if matches_tag {
                let close = &self.src[candidate..];
                let resume = candidate + close.find('>').map_or(close.len(), |p| p + 1);
                break (candidate, resume);
            }
            search = candidate + 2;
        };

        let content = &self.src[self.pos..content_end];
        if !content.is_empty() {
            let text = self.doc.create_text(content);
            self.doc.append_child(element, text);
        }
        self.pos = resume;
    }
}
