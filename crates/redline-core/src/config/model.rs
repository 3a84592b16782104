use super::consts;
use crate::error::{DiffError, Result};
use serde::{Deserialize, Serialize};

/// redline.toml schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffConfig {
    #[serde(default)]
    pub engine: Engine,
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub alignment: AlignmentConfig,
    #[serde(default)]
    pub line_aware: LineAwareConfig,
}

/// Preferred entry point of the fallback chain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    #[default]
    Structural,
    LineAware,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    #[serde(default = "default_exact_match_below")]
    pub exact_match_below: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Pair removed/added siblings of the same type that resemble each other
    #[serde(default = "default_pair_replacements")]
    pub pair_replacements: bool,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            exact_match_below: consts::similarity::EXACT_MATCH_BELOW,
            threshold: consts::similarity::THRESHOLD,
            pair_replacements: true,
        }
    }
}

fn default_exact_match_below() -> usize {
    consts::similarity::EXACT_MATCH_BELOW
}

fn default_threshold() -> f64 {
    consts::similarity::THRESHOLD
}

fn default_pair_replacements() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
    /// Recognise GFM constructs (tables, strikethrough) instead of reading them as text
    #[serde(default = "default_gfm")]
    pub gfm: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: consts::parser::MAX_DEPTH,
            max_input_bytes: consts::parser::MAX_INPUT_BYTES,
            gfm: true,
        }
    }
}

fn default_max_depth() -> usize {
    consts::parser::MAX_DEPTH
}

fn default_max_input_bytes() -> usize {
    consts::parser::MAX_INPUT_BYTES
}

fn default_gfm() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    #[serde(default = "default_max_cells")]
    pub max_cells: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            max_cells: consts::alignment::MAX_CELLS,
        }
    }
}

fn default_max_cells() -> usize {
    consts::alignment::MAX_CELLS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAwareConfig {
    #[serde(default)]
    pub unmapped: UnmappedPolicy,
    /// Apply content normalization before line and char diffing
    #[serde(default = "default_normalize")]
    pub normalize: bool,
}

impl Default for LineAwareConfig {
    fn default() -> Self {
        Self {
            unmapped: UnmappedPolicy::Strict,
            normalize: true,
        }
    }
}

fn default_normalize() -> bool {
    true
}

/// What the line-aware engine does with a fragment it cannot place on a line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedPolicy {
    /// Fail the stage so the chain falls through to the char diff
    #[default]
    Strict,
    /// Log and drop the fragment
    Lenient,
}

impl DiffConfig {
    /// Load redline.toml
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DiffError::Config(format!("{}: {}", path.as_ref().display(), e)))?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DiffConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity.threshold) {
            return Err(DiffError::ConfigInvalidValue {
                field: "similarity.threshold".to_string(),
                reason: format!("{} is outside 0.0..=1.0", self.similarity.threshold),
            });
        }
        if self.parser.max_depth == 0 {
            return Err(DiffError::ConfigInvalidValue {
                field: "parser.max_depth".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
