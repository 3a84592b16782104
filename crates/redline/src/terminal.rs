//! Render tree → ANSI text
//!
//! Insertions are green, deletions red and struck through. Without color
//! (`NO_COLOR`, pipes) they fall back to `{+inserted+}` and `[-deleted-]`.

use colored::{ColoredString, Colorize};
use redline_core::render::{BlockKind, Mark, RenderNode};

pub fn paint(node: &RenderNode) -> String {
    paint_with(node, colored::control::SHOULD_COLORIZE.should_colorize())
}

fn paint_with(node: &RenderNode, color: bool) -> String {
    Painter { color }.node(node)
}

struct Painter {
    color: bool,
}

impl Painter {
    fn node(&self, node: &RenderNode) -> String {
        match node {
            RenderNode::Block { kind, children, .. } => self.block(*kind, children),
            RenderNode::Span {
                text,
                mark,
                strong,
                emphasis,
            } => self.span(text, *mark, *strong, *emphasis),
            RenderNode::Badge { label } => {
                let badge = format!("[{}]", label);
                if self.color {
                    badge.yellow().bold().to_string()
                } else {
                    badge
                }
            }
            RenderNode::Unsupported { kind, children, .. } => {
                let tag = format!("[unsupported: {}]", kind);
                let tag = if self.color {
                    tag.dimmed().to_string()
                } else {
                    tag
                };
                format!("{}\n{}", tag, self.join(children, "\n"))
            }
        }
    }

    fn block(&self, kind: BlockKind, children: &[RenderNode]) -> String {
        match kind {
            BlockKind::Document => self.join(children, "\n\n"),
            BlockKind::Paragraph | BlockKind::ListItem => self.join(children, "\n"),
            BlockKind::Heading { level } => {
                format!("{} {}", "#".repeat(level as usize), self.join(children, " "))
            }
            BlockKind::List { ordered } => children
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let bullet = if ordered {
                        format!("{}. ", index + 1)
                    } else {
                        "- ".to_string()
                    };
                    indent(&self.node(item), &bullet, &" ".repeat(bullet.len()))
                })
                .collect::<Vec<_>>()
                .join("\n"),
            BlockKind::Blockquote => indent(&self.join(children, "\n"), "> ", "> "),
            BlockKind::NewContent => self.join(children, " "),
        }
    }

    /// Inline children run together; block children are separated by `separator`
    fn join(&self, children: &[RenderNode], separator: &str) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut inline = String::new();

        for child in children {
            match child {
                RenderNode::Span { .. } | RenderNode::Badge { .. } => {
                    inline.push_str(&self.node(child))
                }
                RenderNode::Block { .. } | RenderNode::Unsupported { .. } => {
                    if !inline.is_empty() {
                        parts.push(std::mem::take(&mut inline));
                    }
                    parts.push(self.node(child));
                }
            }
        }
        if !inline.is_empty() {
            parts.push(inline);
        }
        parts.join(separator)
    }

    fn span(&self, text: &str, mark: Mark, strong: bool, emphasis: bool) -> String {
        if !self.color {
            return match mark {
                Mark::Unchanged => text.to_string(),
                Mark::Inserted => format!("{{+{}+}}", text),
                Mark::Deleted => format!("[-{}-]", text),
            };
        }

        let mut styled: ColoredString = text.normal();
        if strong {
            styled = styled.bold();
        }
        if emphasis {
            styled = styled.italic();
        }
        match mark {
            Mark::Unchanged => styled,
            Mark::Inserted => styled.green(),
            Mark::Deleted => styled.red().strikethrough(),
        }
        .to_string()
    }
}

/// Prefix the first line with `first` and the rest with `rest`
fn indent(text: &str, first: &str, rest: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(index, line)| {
            let prefix = if index == 0 { first } else { rest };
            format!("{}{}", prefix, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
