//! Structure-aware redlines for markdown documents
//!
//! Two versions of a document are parsed into trees, sibling blocks are
//! aligned with an LCS over fuzzy equality, and matched blocks whose text
//! changed get a character-level edit script. When the structural engine
//! cannot handle a pair of documents the [`fallback::FallbackChain`] drops
//! to a line-aware diff and finally to a plain character diff, so a caller
//! always gets something to render.
//!
//! ```
//! use redline_core::{compute_diff, render};
//!
//! let result = compute_diff("# Title\n\nHello world.", "# Title\n\nHello brave world.");
//! let tree = render(&result);
//! assert_eq!(tree.new_text(), "TitleHello brave world.");
//! ```

// Core modules
pub mod align;
pub mod chardiff;
pub mod config;
pub mod error;
pub mod fallback;
pub mod line_aware;
pub mod markdown;
pub mod merge;
pub mod normalize;
pub mod render;
pub mod stats;
pub mod versions;

// Re-export commonly used types
pub use config::{DiffConfig, Engine};
pub use error::{DiffError, ParseError, Result};
pub use fallback::{DiffOutcome, DiffResult, FallbackChain, compute_diff, diff_documents};
pub use render::{HtmlCompositor, RedlineRenderer, RenderNode, render};
pub use stats::DiffStats;
pub use versions::{Comparison, VersionSet, VersionSlot, compare_texts};
