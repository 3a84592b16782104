//! Redline rendering
//!
//! Turns any [`DiffResult`] into a presentation-only [`RenderNode`] tree:
//! blocks, styled spans, badges and placeholders. Nothing about diff
//! statuses or edit scripts survives past this boundary, only marks.
//! Rendering never fails; node kinds without a dedicated block become a
//! visible [`RenderNode::Unsupported`] placeholder.

mod char_only;
mod html;
mod line_aware;
mod structural;

pub use html::HtmlCompositor;

use crate::fallback::DiffResult;
use serde::Serialize;

/// Visual treatment of a block or span
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    #[default]
    Unchanged,
    Inserted,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockKind {
    Document,
    Paragraph,
    Heading { level: u8 },
    List { ordered: bool },
    ListItem,
    Blockquote,
    /// A whole new paragraph in char-only output
    NewContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum RenderNode {
    Block {
        kind: BlockKind,
        mark: Mark,
        children: Vec<RenderNode>,
    },
    Span {
        text: String,
        mark: Mark,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        strong: bool,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        emphasis: bool,
    },
    Badge {
        label: String,
    },
    Unsupported {
        kind: String,
        mark: Mark,
        children: Vec<RenderNode>,
    },
}

impl RenderNode {
    pub fn block(kind: BlockKind, mark: Mark, children: Vec<RenderNode>) -> Self {
        RenderNode::Block {
            kind,
            mark,
            children,
        }
    }

    pub fn span(text: impl Into<String>, mark: Mark) -> Self {
        RenderNode::Span {
            text: text.into(),
            mark,
            strong: false,
            emphasis: false,
        }
    }

    pub fn children(&self) -> &[RenderNode] {
        match self {
            RenderNode::Block { children, .. } | RenderNode::Unsupported { children, .. } => {
                children
            }
            RenderNode::Span { .. } | RenderNode::Badge { .. } => &[],
        }
    }

    /// Concatenated span text carrying one of `marks`
    pub fn text_marked(&self, marks: &[Mark]) -> String {
        let mut out = String::new();
        self.collect_text(marks, &mut out);
        out
    }

    /// Text as it reads after the edit (deletions skipped)
    pub fn new_text(&self) -> String {
        self.text_marked(&[Mark::Unchanged, Mark::Inserted])
    }

    /// Text as it read before the edit (insertions skipped)
    pub fn old_text(&self) -> String {
        self.text_marked(&[Mark::Unchanged, Mark::Deleted])
    }

    fn collect_text(&self, marks: &[Mark], out: &mut String) {
        if let RenderNode::Span { text, mark, .. } = self
            && marks.contains(mark)
        {
            out.push_str(text);
        }
        for child in self.children() {
            child.collect_text(marks, out);
        }
    }

    /// Visit the node and all descendants, depth first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a RenderNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

/// Dispatches on the result shape
#[derive(Debug, Clone, Copy, Default)]
pub struct RedlineRenderer;

impl RedlineRenderer {
    pub fn render(&self, result: &DiffResult) -> RenderNode {
        match result {
            DiffResult::Structural { merged_tree } => structural::render_tree(merged_tree),
            DiffResult::LineAware { segments, .. } => line_aware::render_segments(segments),
            DiffResult::CharOnly { segments } => char_only::render_segments(segments),
        }
    }
}

/// Render with the default renderer
pub fn render(result: &DiffResult) -> RenderNode {
    RedlineRenderer.render(result)
}
