//! Fallback chain: structural → line-aware → char diff
//!
//! Each stage either produces a [`DiffResult`] or a typed error. An error is
//! recorded as a [`StageFailure`] and the next stage runs; the char diff at
//! the end cannot fail, so [`FallbackChain::run`] always returns something
//! renderable.

use crate::chardiff::{EditOp, diff_chars};
use crate::config::{DiffConfig, Engine};
use crate::error::{DiffError, Result};
use crate::line_aware::{ChangeKind, LineAwareDiffer, Segment};
use crate::markdown::MarkdownParser;
use crate::merge::{DiffMerger, MergedNode};
use crate::normalize::normalize_content;
use crate::stats::DiffStats;
use serde::{Serialize, Serializer};

/// Outcome shape, one per engine
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DiffResult {
    Structural {
        #[serde(rename = "mergedTree")]
        merged_tree: MergedNode,
    },
    LineAware {
        segments: Vec<Segment>,
        #[serde(rename = "usedFallback")]
        used_fallback: bool,
    },
    CharOnly {
        segments: Vec<Segment>,
    },
}

impl DiffResult {
    pub fn stats(&self) -> DiffStats {
        match self {
            DiffResult::Structural { merged_tree } => DiffStats::from_tree(merged_tree),
            DiffResult::LineAware { segments, .. } | DiffResult::CharOnly { segments } => {
                DiffStats::from_segments(segments)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Structural,
    LineAware,
    CharOnly,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Structural => write!(f, "structural"),
            Stage::LineAware => write!(f, "line-aware"),
            Stage::CharOnly => write!(f, "char-only"),
        }
    }
}

/// A stage that failed and was skipped
#[derive(Debug, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    #[serde(serialize_with = "error_message")]
    pub error: DiffError,
}

fn error_message<S: Serializer>(error: &DiffError, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Result of running the chain
#[derive(Debug, Serialize)]
pub struct DiffOutcome {
    pub result: DiffResult,
    pub stats: DiffStats,
    /// Stages that failed before `result` was produced, in order
    pub failures: Vec<StageFailure>,
}

impl DiffOutcome {
    /// Human label for the engine that produced the result
    pub fn label(&self) -> &'static str {
        match &self.result {
            DiffResult::Structural { .. } => "AST diff",
            DiffResult::LineAware {
                used_fallback: false,
                ..
            } if self.failures.is_empty() => "Enhanced formatting",
            DiffResult::LineAware {
                used_fallback: false,
                ..
            } => "Fallback mode (markdown aware)",
            DiffResult::LineAware { .. } | DiffResult::CharOnly { .. } => {
                "Fallback mode (char diff)"
            }
        }
    }

    pub fn used_fallback(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// One fallible step of the chain
pub trait DiffStage {
    fn stage(&self) -> Stage;

    fn run(&self, from: &str, to: &str) -> Result<DiffResult>;
}

/// Parse both documents and merge the trees
#[derive(Debug, Clone, Default)]
pub struct StructuralStage {
    parser: MarkdownParser,
    merger: DiffMerger,
}

impl StructuralStage {
    pub fn new(config: &DiffConfig) -> Self {
        Self {
            parser: MarkdownParser::new(config.parser.clone()),
            merger: DiffMerger::new(config),
        }
    }
}

impl DiffStage for StructuralStage {
    fn stage(&self) -> Stage {
        Stage::Structural
    }

    fn run(&self, from: &str, to: &str) -> Result<DiffResult> {
        let from_tree = self.parser.parse(from)?;
        let to_tree = self.parser.parse(to)?;
        let merged_tree = self.merger.merge(&from_tree, &to_tree)?;
        Ok(DiffResult::Structural { merged_tree })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineAwareStage {
    differ: LineAwareDiffer,
}

impl LineAwareStage {
    pub fn new(config: &DiffConfig) -> Self {
        Self {
            differ: LineAwareDiffer::new(&config.line_aware),
        }
    }
}

impl DiffStage for LineAwareStage {
    fn stage(&self) -> Stage {
        Stage::LineAware
    }

    fn run(&self, from: &str, to: &str) -> Result<DiffResult> {
        let segments = self.differ.diff(from, to)?;
        Ok(DiffResult::LineAware {
            segments,
            used_fallback: false,
        })
    }
}

/// Shape the terminal char diff is reported as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalShape {
    CharOnly,
    /// `LineAware { used_fallback: true }`
    LineAware,
}

/// Infallible last resort: char diff over the raw texts
#[derive(Debug, Clone)]
pub struct CharFallback {
    normalize: bool,
    shape: TerminalShape,
}

impl CharFallback {
    pub fn new(normalize: bool, shape: TerminalShape) -> Self {
        Self { normalize, shape }
    }

    pub fn run(&self, from: &str, to: &str) -> DiffResult {
        let segments = if self.normalize {
            char_segments(&normalize_content(from), &normalize_content(to))
        } else {
            char_segments(from, to)
        };

        match self.shape {
            TerminalShape::CharOnly => DiffResult::CharOnly { segments },
            TerminalShape::LineAware => DiffResult::LineAware {
                segments,
                used_fallback: true,
            },
        }
    }
}

/// Plain segments straight from the char differ
pub fn char_segments(from: &str, to: &str) -> Vec<Segment> {
    diff_chars(from, to)
        .into_edits()
        .into_iter()
        .map(|edit| {
            let change = match edit.op {
                EditOp::Equal => ChangeKind::Unchanged,
                EditOp::Insert => ChangeKind::Added,
                EditOp::Delete => ChangeKind::Removed,
            };
            Segment::text(change, edit.text)
        })
        .collect()
}

/// Ordered stages plus the terminal char diff
pub struct FallbackChain {
    stages: Vec<Box<dyn DiffStage>>,
    terminal: CharFallback,
}

impl FallbackChain {
    /// Chain for the configured engine
    pub fn new(config: &DiffConfig) -> Self {
        Self::for_engine(config.engine, config)
    }

    /// Chain entered at `engine`
    ///
    /// Entering at the structural engine ends in a `CharOnly` result;
    /// entering at the line-aware engine ends in `LineAware { used_fallback: true }`.
    pub fn for_engine(engine: Engine, config: &DiffConfig) -> Self {
        let line_aware: Box<dyn DiffStage> = Box::new(LineAwareStage::new(config));
        let normalize = config.line_aware.normalize;

        match engine {
            Engine::Structural => Self::with_stages(
                vec![Box::new(StructuralStage::new(config)), line_aware],
                CharFallback::new(normalize, TerminalShape::CharOnly),
            ),
            Engine::LineAware => Self::with_stages(
                vec![line_aware],
                CharFallback::new(normalize, TerminalShape::LineAware),
            ),
        }
    }

    pub fn with_stages(stages: Vec<Box<dyn DiffStage>>, terminal: CharFallback) -> Self {
        Self { stages, terminal }
    }

    /// Run stages in order until one succeeds
    pub fn run(&self, from: &str, to: &str) -> DiffOutcome {
        let mut failures = Vec::new();

        for stage in &self.stages {
            log::debug!("Trying {} diff", stage.stage());
            match stage.run(from, to) {
                Ok(result) => return outcome(result, failures),
                Err(error) => {
                    log::warn!("{} diff failed, falling back: {}", stage.stage(), error);
                    failures.push(StageFailure {
                        stage: stage.stage(),
                        error,
                    });
                }
            }
        }

        outcome(self.terminal.run(from, to), failures)
    }
}

fn outcome(result: DiffResult, failures: Vec<StageFailure>) -> DiffOutcome {
    DiffOutcome {
        stats: result.stats(),
        result,
        failures,
    }
}

/// Diff two documents with the given configuration
pub fn diff_documents(from: &str, to: &str, config: &DiffConfig) -> DiffOutcome {
    FallbackChain::new(config).run(from, to)
}

/// Diff two documents with default settings
pub fn compute_diff(from: &str, to: &str) -> DiffResult {
    diff_documents(from, to, &DiffConfig::default()).result
}
