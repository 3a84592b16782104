//! Render tree → HTML fragment

use super::{BlockKind, Mark, RenderNode};
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Writes a render tree as an HTML fragment
///
/// Insertions become `<ins class="diff-added">`, deletions
/// `<del class="diff-removed">`. Blocks whose whole content was added or
/// removed carry `diff-added-block` / `diff-removed-block`.
#[derive(Debug, Clone, Default)]
pub struct HtmlCompositor {
    out: String,
}

impl HtmlCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compose(mut self, node: &RenderNode) -> String {
        self.node(node);
        self.out
    }

    fn node(&mut self, node: &RenderNode) {
        match node {
            RenderNode::Block {
                kind,
                mark,
                children,
            } => self.block(*kind, *mark, children),
            RenderNode::Span {
                text,
                mark,
                strong,
                emphasis,
            } => self.span(text, *mark, *strong, *emphasis),
            RenderNode::Badge { label } => {
                self.out.push_str(r#"<span class="diff-new-badge">"#);
                self.out.push_str(&encode_text(label));
                self.out.push_str("</span>");
            }
            RenderNode::Unsupported {
                kind,
                mark,
                children,
            } => {
                self.out.push_str(r#"<div class="unsupported-ast-node"#);
                self.mark_class(*mark);
                self.out.push_str(r#"" data-kind=""#);
                self.out.push_str(&encode_double_quoted_attribute(kind));
                self.out.push_str(r#"">"#);
                self.children(children);
                self.out.push_str("</div>");
            }
        }
    }

    fn block(&mut self, kind: BlockKind, mark: Mark, children: &[RenderNode]) {
        let (tag, class) = match kind {
            BlockKind::Document => ("div".to_string(), Some("redline")),
            BlockKind::Paragraph => ("p".to_string(), None),
            BlockKind::Heading { level } => (format!("h{}", level.clamp(1, 6)), None),
            BlockKind::List { ordered: true } => ("ol".to_string(), None),
            BlockKind::List { ordered: false } => ("ul".to_string(), None),
            BlockKind::ListItem => ("li".to_string(), None),
            BlockKind::Blockquote => ("blockquote".to_string(), None),
            BlockKind::NewContent => ("div".to_string(), Some("diff-new-content")),
        };

        self.out.push('<');
        self.out.push_str(&tag);
        if class.is_some() || mark != Mark::Unchanged {
            self.out.push_str(r#" class=""#);
            if let Some(class) = class {
                self.out.push_str(class);
            }
            self.mark_class(mark);
            self.out.push('"');
        }
        self.out.push('>');
        self.children(children);
        self.out.push_str("</");
        self.out.push_str(&tag);
        self.out.push('>');
    }

    fn mark_class(&mut self, mark: Mark) {
        let class = match mark {
            Mark::Unchanged => return,
            Mark::Inserted => "diff-added-block",
            Mark::Deleted => "diff-removed-block",
        };
        if !self.out.ends_with('"') {
            self.out.push(' ');
        }
        self.out.push_str(class);
    }

    fn children(&mut self, children: &[RenderNode]) {
        for child in children {
            self.node(child);
        }
    }

    fn span(&mut self, text: &str, mark: Mark, strong: bool, emphasis: bool) {
        let mut close: Vec<&str> = Vec::new();
        match mark {
            Mark::Inserted => {
                self.out.push_str(r#"<ins class="diff-added">"#);
                close.push("</ins>");
            }
            Mark::Deleted => {
                self.out.push_str(r#"<del class="diff-removed">"#);
                close.push("</del>");
            }
            Mark::Unchanged => {}
        }
        if strong {
            self.out.push_str("<strong>");
            close.push("</strong>");
        }
        if emphasis {
            self.out.push_str("<em>");
            close.push("</em>");
        }

        let escaped = encode_text(text);
        self.out.push_str(&escaped.replace('\n', "<br>"));

        for tag in close.iter().rev() {
            self.out.push_str(tag);
        }
    }
}
