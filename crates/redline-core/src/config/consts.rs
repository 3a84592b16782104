//! Tunable policy constants for the diff engines

/// Sibling matching thresholds
pub mod similarity {
    /// Texts shorter than this (in chars) must match exactly to be the same node
    pub const EXACT_MATCH_BELOW: usize = 40;

    /// Jaro-Winkler score above which longer texts are the same node
    pub const THRESHOLD: f64 = 0.8;
}

/// Parser guard rails
pub mod parser {
    /// Maximum block/inline nesting before the structural engine gives up
    pub const MAX_DEPTH: usize = 32;

    /// Maximum markdown input size per document (2MB)
    pub const MAX_INPUT_BYTES: usize = 2 * 1024 * 1024;
}

/// Alignment limits
pub mod alignment {
    /// Upper bound on the LCS table size (from siblings x to siblings)
    pub const MAX_CELLS: usize = 1_000_000;
}
