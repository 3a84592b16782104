//! Document tree model
//!
//! A closed sum type over the node kinds the structural engine understands.
//! Everything else the markdown parser produces is carried as [`DocumentNode::Other`]
//! so that it can still be aligned (by kind) and shown as an unsupported
//! placeholder instead of vanishing.

use serde::{Deserialize, Serialize};

/// Parsed markdown node
///
/// Parents own their children exclusively; there are no back-references.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    Root(Vec<DocumentNode>),
    Heading {
        depth: u8,
        children: Vec<DocumentNode>,
    },
    Paragraph(Vec<DocumentNode>),
    List {
        ordered: bool,
        spread: bool,
        start: Option<u32>,
        children: Vec<DocumentNode>,
    },
    ListItem {
        spread: bool,
        checked: Option<bool>,
        children: Vec<DocumentNode>,
    },
    Blockquote(Vec<DocumentNode>),
    Strong(Vec<DocumentNode>),
    Emphasis(Vec<DocumentNode>),
    Text(String),
    /// Any construct outside the supported set (code, links, tables, ...)
    Other {
        kind: String,
        value: Option<String>,
        children: Vec<DocumentNode>,
    },
}

/// Node header: type tag plus type-specific attributes, without children
///
/// Serialized with a `type` tag so merged trees read like mdast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeType {
    Root,
    Heading {
        depth: u8,
    },
    Paragraph,
    List {
        ordered: bool,
        spread: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        start: Option<u32>,
    },
    ListItem {
        spread: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
    },
    Blockquote,
    Strong,
    Emphasis,
    Text,
    #[serde(rename = "unsupported")]
    Other {
        kind: String,
    },
}

impl NodeType {
    /// mdast type name (`other` nodes report their own kind)
    pub fn name(&self) -> &str {
        match self {
            NodeType::Root => "root",
            NodeType::Heading { .. } => "heading",
            NodeType::Paragraph => "paragraph",
            NodeType::List { .. } => "list",
            NodeType::ListItem { .. } => "listItem",
            NodeType::Blockquote => "blockquote",
            NodeType::Strong => "strong",
            NodeType::Emphasis => "emphasis",
            NodeType::Text => "text",
            NodeType::Other { kind } => kind,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, NodeType::List { .. })
    }
}

impl DocumentNode {
    pub fn node_type(&self) -> NodeType {
        match self {
            DocumentNode::Root(_) => NodeType::Root,
            DocumentNode::Heading { depth, .. } => NodeType::Heading { depth: *depth },
            DocumentNode::Paragraph(_) => NodeType::Paragraph,
            DocumentNode::List {
                ordered,
                spread,
                start,
                ..
            } => NodeType::List {
                ordered: *ordered,
                spread: *spread,
                start: *start,
            },
            DocumentNode::ListItem {
                spread, checked, ..
            } => NodeType::ListItem {
                spread: *spread,
                checked: *checked,
            },
            DocumentNode::Blockquote(_) => NodeType::Blockquote,
            DocumentNode::Strong(_) => NodeType::Strong,
            DocumentNode::Emphasis(_) => NodeType::Emphasis,
            DocumentNode::Text(_) => NodeType::Text,
            DocumentNode::Other { kind, .. } => NodeType::Other { kind: kind.clone() },
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            DocumentNode::Root(_) => "root",
            DocumentNode::Heading { .. } => "heading",
            DocumentNode::Paragraph(_) => "paragraph",
            DocumentNode::List { .. } => "list",
            DocumentNode::ListItem { .. } => "listItem",
            DocumentNode::Blockquote(_) => "blockquote",
            DocumentNode::Strong(_) => "strong",
            DocumentNode::Emphasis(_) => "emphasis",
            DocumentNode::Text(_) => "text",
            DocumentNode::Other { kind, .. } => kind,
        }
    }

    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Root(children)
            | DocumentNode::Paragraph(children)
            | DocumentNode::Blockquote(children)
            | DocumentNode::Strong(children)
            | DocumentNode::Emphasis(children)
            | DocumentNode::Heading { children, .. }
            | DocumentNode::List { children, .. }
            | DocumentNode::ListItem { children, .. }
            | DocumentNode::Other { children, .. } => children,
            DocumentNode::Text(_) => &[],
        }
    }

    /// Leaf text carried by the node itself
    pub fn value(&self) -> Option<&str> {
        match self {
            DocumentNode::Text(value) => Some(value),
            DocumentNode::Other { value, .. } => value.as_deref(),
            _ => None,
        }
    }

    /// Flattened text: every leaf value in document order, concatenated
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(value) = self.value() {
            out.push_str(value);
        }
        for child in self.children() {
            child.collect_text(out);
        }
    }

    /// Height of the subtree (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(DocumentNode::depth)
            .max()
            .unwrap_or(0)
    }
}
