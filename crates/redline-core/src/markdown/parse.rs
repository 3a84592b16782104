//! Markdown → document tree
//!
//! Parses with the `markdown` crate into mdast, then lowers mdast into
//! [`DocumentNode`]. The structural engine's limits are enforced twice:
//! container nesting is measured on the raw lines before the markdown crate
//! sees them (it recurses per container level), and again while lowering.
//! Either way the input is reported as [`ParseError`] so callers can route it
//! to the fallback chain.

use super::node::DocumentNode;
use crate::config::ParserConfig;
use crate::error::ParseError;
use markdown::mdast::Node;
use markdown::{ParseOptions, to_mdast};

/// Parse markdown with default parser limits
///
/// # Errors
///
/// Returns `ParseError` if the markdown crate rejects the input or a guard rail trips
pub fn parse(text: &str) -> Result<DocumentNode, ParseError> {
    MarkdownParser::new(ParserConfig::default()).parse(text)
}

/// Configured markdown parser
///
/// Deterministic: identical input always yields an identical tree.
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser {
    config: ParserConfig,
}

impl MarkdownParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse markdown into a `Root` document node
    ///
    /// # Errors
    ///
    /// - `InputTooLarge` if the text exceeds `max_input_bytes`
    /// - `Syntax` if the markdown crate fails
    /// - `TooDeep` if nesting exceeds `max_depth`
    pub fn parse(&self, text: &str) -> Result<DocumentNode, ParseError> {
        if text.len() > self.config.max_input_bytes {
            return Err(ParseError::InputTooLarge {
                len: text.len(),
                limit: self.config.max_input_bytes,
            });
        }

        let nesting = container_depth(text);
        if nesting > self.config.max_depth {
            return Err(ParseError::TooDeep {
                depth: nesting,
                limit: self.config.max_depth,
            });
        }

        let options = if self.config.gfm {
            ParseOptions::gfm()
        } else {
            ParseOptions::default()
        };

        let mdast = to_mdast(text, &options).map_err(|e| ParseError::Syntax(e.to_string()))?;

        self.lower(&mdast, 0)
    }

    fn lower(&self, node: &Node, depth: usize) -> Result<DocumentNode, ParseError> {
        if depth > self.config.max_depth {
            return Err(ParseError::TooDeep {
                depth,
                limit: self.config.max_depth,
            });
        }

        let lowered = match node {
            Node::Root(root) => DocumentNode::Root(self.lower_all(&root.children, depth)?),
            Node::Heading(heading) => DocumentNode::Heading {
                depth: heading.depth,
                children: self.lower_all(&heading.children, depth)?,
            },
            Node::Paragraph(paragraph) => {
                DocumentNode::Paragraph(self.lower_all(&paragraph.children, depth)?)
            }
            Node::List(list) => DocumentNode::List {
                ordered: list.ordered,
                spread: list.spread,
                start: list.start,
                children: self.lower_all(&list.children, depth)?,
            },
            Node::ListItem(item) => DocumentNode::ListItem {
                spread: item.spread,
                checked: item.checked,
                children: self.lower_all(&item.children, depth)?,
            },
            Node::Blockquote(quote) => {
                DocumentNode::Blockquote(self.lower_all(&quote.children, depth)?)
            }
            Node::Strong(strong) => DocumentNode::Strong(self.lower_all(&strong.children, depth)?),
            Node::Emphasis(emphasis) => {
                DocumentNode::Emphasis(self.lower_all(&emphasis.children, depth)?)
            }
            Node::Text(text) => DocumentNode::Text(text.value.clone()),
            // Hard line break inside a paragraph
            Node::Break(_) => DocumentNode::Text("\n".to_string()),
            other => DocumentNode::Other {
                kind: mdast_kind(other).to_string(),
                value: leaf_value(other),
                children: match other.children() {
                    Some(children) => self.lower_all(children, depth)?,
                    None => Vec::new(),
                },
            },
        };

        Ok(lowered)
    }

    fn lower_all(&self, nodes: &[Node], depth: usize) -> Result<Vec<DocumentNode>, ParseError> {
        nodes
            .iter()
            .map(|child| self.lower(child, depth + 1))
            .collect()
    }
}

/// Deepest container prefix of any line
///
/// Each `>` or list marker opens one level. Indentation in front of a marker
/// adds a level per two columns, which is how nested list items are written.
fn container_depth(text: &str) -> usize {
    text.lines().map(line_depth).max().unwrap_or(0)
}

fn line_depth(line: &str) -> usize {
    let bytes = line.as_bytes();
    let mut depth = 0;
    let mut pos = 0;

    loop {
        let mut columns = 0;
        while let Some(&b) = bytes.get(pos) {
            match b {
                b' ' => columns += 1,
                b'\t' => columns += 4,
                _ => break,
            }
            pos += 1;
        }

        match bytes.get(pos) {
            Some(b'>') => pos += 1,
            Some(b'-' | b'*' | b'+') if is_marker_end(bytes, pos + 1) => pos += 1,
            Some(b'0'..=b'9') => {
                let digits = bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
                let delimiter = pos + digits;
                if matches!(bytes.get(delimiter), Some(b'.' | b')'))
                    && is_marker_end(bytes, delimiter + 1)
                {
                    pos = delimiter + 1;
                } else {
                    return depth;
                }
            }
            _ => return depth,
        }

        depth += 1 + columns / 2;
    }
}

fn is_marker_end(bytes: &[u8], pos: usize) -> bool {
    matches!(bytes.get(pos), None | Some(b' ' | b'\t'))
}

/// mdast type name for nodes outside the supported set
fn mdast_kind(node: &Node) -> &'static str {
    match node {
        Node::Code(_) => "code",
        Node::InlineCode(_) => "inlineCode",
        Node::Link(_) => "link",
        Node::LinkReference(_) => "linkReference",
        Node::Image(_) => "image",
        Node::ImageReference(_) => "imageReference",
        Node::Html(_) => "html",
        Node::ThematicBreak(_) => "thematicBreak",
        Node::Table(_) => "table",
        Node::TableRow(_) => "tableRow",
        Node::TableCell(_) => "tableCell",
        Node::Delete(_) => "delete",
        Node::Definition(_) => "definition",
        Node::FootnoteDefinition(_) => "footnoteDefinition",
        Node::FootnoteReference(_) => "footnoteReference",
        Node::Math(_) => "math",
        Node::InlineMath(_) => "inlineMath",
        Node::Yaml(_) => "yaml",
        Node::Toml(_) => "toml",
        _ => "unknown",
    }
}

/// Literal content of leaf nodes that carry text outside `Text` children
fn leaf_value(node: &Node) -> Option<String> {
    match node {
        Node::Code(code) => Some(code.value.clone()),
        Node::InlineCode(code) => Some(code.value.clone()),
        Node::Html(html) => Some(html.value.clone()),
        Node::Math(math) => Some(math.value.clone()),
        Node::InlineMath(math) => Some(math.value.clone()),
        Node::Image(image) => Some(image.alt.clone()),
        _ => None,
    }
}
