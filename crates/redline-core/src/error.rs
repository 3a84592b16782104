use thiserror::Error;

/// Which document a line-aware fragment was being mapped onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    From,
    To,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::From => write!(f, "from"),
            Side::To => write!(f, "to"),
        }
    }
}

/// Markdown could not be turned into a document tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("PARSE_SYNTAX: {0}")]
    Syntax(String),

    #[error("PARSE_TOO_DEEP: nesting depth {depth} exceeds limit {limit}")]
    TooDeep { depth: usize, limit: usize },

    #[error("PARSE_INPUT_TOO_LARGE: {len} bytes exceeds limit {limit}")]
    InputTooLarge { len: usize, limit: usize },
}

#[derive(Error, Debug)]
pub enum DiffError {
    // Structural engine
    #[error("PARSE_ERROR: {0}")]
    Parse(#[from] ParseError),

    #[error("ALIGNMENT_ERROR: {0}")]
    Alignment(String),

    #[error("DIFF_COMPUTATION_ERROR: {0}")]
    Computation(String),

    // Line-aware engine
    #[error("UNMAPPABLE_SEGMENT: {side} fragment {fragment:?} does not map onto any line")]
    UnmappableSegment { side: Side, fragment: String },

    #[error("LINE_AWARE_ERROR: {0}")]
    LineAware(String),

    // Config
    #[error("CONFIG_PARSE_ERROR: {0}")]
    Config(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },
}

impl From<toml::de::Error> for DiffError {
    fn from(err: toml::de::Error) -> Self {
        DiffError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DiffError>;
