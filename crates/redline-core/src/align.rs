//! Sibling alignment (LCS over node sequences)
//!
//! [`Aligner::align`] runs the classic longest-common-subsequence dynamic
//! program over two sibling lists with a caller-supplied equality predicate.
//! [`FuzzyMatcher`] is the predicate the merger uses: text-bearing blocks are
//! compared by flattened text, exactly when short and by Jaro-Winkler
//! similarity when long, so a lightly edited paragraph stays "the same" node.

use crate::config::{AlignmentConfig, SimilarityConfig};
use crate::error::{DiffError, Result};
use crate::markdown::DocumentNode;
use serde::Serialize;

/// Classification of one alignment entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Common,
    Added,
    Removed,
}

/// One entry of an alignment, in document order
///
/// `Common` has both indices, `Added` only `to`, `Removed` only `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignmentMatch {
    pub from: Option<usize>,
    pub to: Option<usize>,
    pub status: MatchStatus,
}

impl AlignmentMatch {
    pub fn common(from: usize, to: usize) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            status: MatchStatus::Common,
        }
    }

    pub fn added(to: usize) -> Self {
        Self {
            from: None,
            to: Some(to),
            status: MatchStatus::Added,
        }
    }

    pub fn removed(from: usize) -> Self {
        Self {
            from: Some(from),
            to: None,
            status: MatchStatus::Removed,
        }
    }
}

/// LCS aligner with a cap on the DP matrix size
#[derive(Debug, Clone)]
pub struct Aligner {
    max_cells: usize,
}

impl Default for Aligner {
    fn default() -> Self {
        Self::new(&AlignmentConfig::default())
    }
}

impl Aligner {
    pub fn new(config: &AlignmentConfig) -> Self {
        Self {
            max_cells: config.max_cells,
        }
    }

    /// Align two sibling sequences
    ///
    /// Ties during backtracking prefer `Common`, then `Added`, then `Removed`
    /// (walking from the end), which puts removals before additions in the
    /// emitted order.
    ///
    /// # Errors
    ///
    /// Returns `DiffError::Alignment` if the DP matrix would exceed `max_cells`
    pub fn align<T, F>(&self, from: &[T], to: &[T], eq: F) -> Result<Vec<AlignmentMatch>>
    where
        F: Fn(&T, &T) -> bool,
    {
        let m = from.len();
        let n = to.len();

        let cells = (m + 1).saturating_mul(n + 1);
        if cells > self.max_cells {
            return Err(DiffError::Alignment(format!(
                "{}x{} siblings needs {} cells, limit is {}",
                m, n, cells, self.max_cells
            )));
        }
        log::debug!("aligning {} x {} siblings", m, n);

        // Predicate results are reused by the backtrack
        let equal: Vec<Vec<bool>> = from
            .iter()
            .map(|a| to.iter().map(|b| eq(a, b)).collect())
            .collect();

        let mut dp = vec![vec![0usize; n + 1]; m + 1];
        for i in 1..=m {
            for j in 1..=n {
                dp[i][j] = if equal[i - 1][j - 1] {
                    dp[i - 1][j - 1] + 1
                } else {
                    dp[i - 1][j].max(dp[i][j - 1])
                };
            }
        }

        let mut matches = Vec::with_capacity(m.max(n));
        let (mut i, mut j) = (m, n);
        while i > 0 || j > 0 {
            if i > 0 && j > 0 && equal[i - 1][j - 1] {
                matches.push(AlignmentMatch::common(i - 1, j - 1));
                i -= 1;
                j -= 1;
            } else if j > 0 && (i == 0 || dp[i][j - 1] >= dp[i - 1][j]) {
                matches.push(AlignmentMatch::added(j - 1));
                j -= 1;
            } else {
                matches.push(AlignmentMatch::removed(i - 1));
                i -= 1;
            }
        }

        matches.reverse();
        Ok(matches)
    }
}

/// Node equality strategy used for alignment
pub trait NodeMatcher {
    fn matches(&self, a: &DocumentNode, b: &DocumentNode) -> bool;

    /// Whether an unmatched removed node reads as an edit of an unmatched added one
    fn resembles(&self, _a: &DocumentNode, _b: &DocumentNode) -> bool {
        false
    }
}

/// Type-aware fuzzy equality
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    exact_below: usize,
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(&SimilarityConfig::default())
    }
}

impl FuzzyMatcher {
    pub fn new(config: &SimilarityConfig) -> Self {
        Self {
            exact_below: config.exact_match_below,
            threshold: config.threshold,
        }
    }

    /// Compare flattened block text
    ///
    /// Both shorter than the cutoff: exact. Otherwise Jaro-Winkler above the threshold.
    pub fn text_matches(&self, a: &str, b: &str) -> bool {
        let a = a.trim();
        let b = b.trim();
        if a.is_empty() && b.is_empty() {
            return true;
        }
        if a.chars().count() < self.exact_below && b.chars().count() < self.exact_below {
            return a == b;
        }
        strsim::jaro_winkler(a, b) > self.threshold
    }

    /// Similarity used to pair a removed block with an added one
    pub fn text_resembles(&self, a: &str, b: &str) -> bool {
        let a = a.trim();
        let b = b.trim();
        !a.is_empty() && !b.is_empty() && strsim::jaro_winkler(a, b) > self.threshold
    }
}

impl NodeMatcher for FuzzyMatcher {
    fn matches(&self, a: &DocumentNode, b: &DocumentNode) -> bool {
        use DocumentNode::*;

        match (a, b) {
            (List { ordered: x, .. }, List { ordered: y, .. }) => x == y,
            (Paragraph(_), Paragraph(_))
            | (Heading { .. }, Heading { .. })
            | (ListItem { .. }, ListItem { .. }) => self.text_matches(&a.text(), &b.text()),
            (Other { kind: x, .. }, Other { kind: y, .. }) => x == y,
            // Anything else: same type is enough
            _ => a.type_name() == b.type_name(),
        }
    }

    fn resembles(&self, a: &DocumentNode, b: &DocumentNode) -> bool {
        use DocumentNode::*;

        match (a, b) {
            (Paragraph(_), Paragraph(_))
            | (Heading { .. }, Heading { .. })
            | (ListItem { .. }, ListItem { .. })
            | (Blockquote(_), Blockquote(_)) => self.text_resembles(&a.text(), &b.text()),
            _ => false,
        }
    }
}
