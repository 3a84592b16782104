//! Markdown document model and parser

mod node;
mod parse;

pub use node::{DocumentNode, NodeType};
pub use parse::{MarkdownParser, parse};
