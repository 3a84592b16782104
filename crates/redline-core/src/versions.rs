//! Press-release version set
//!
//! Four named snapshots filled in as the drafting workflow completes each
//! stage. A slot is written once; comparisons pick two slots by their
//! 1-based number.

use crate::config::DiffConfig;
use crate::fallback::{DiffOutcome, diff_documents};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VersionError {
    #[error("VERSION_ALREADY_CAPTURED: {0} is read-only once captured")]
    AlreadyCaptured(VersionSlot),

    #[error("VERSION_INVALID_INDEX: {0} is not between 1 and 4")]
    InvalidIndex(usize),

    #[error("VERSION_PARSE_ERROR: {0}")]
    Json(String),
}

/// One stage of the press release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionSlot {
    Draft,
    Refined,
    Validated,
    Final,
}

impl VersionSlot {
    pub const ALL: [VersionSlot; 4] = [
        VersionSlot::Draft,
        VersionSlot::Refined,
        VersionSlot::Validated,
        VersionSlot::Final,
    ];

    /// Slot for a 1-based version number
    pub fn from_number(number: usize) -> Result<Self, VersionError> {
        number
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(VersionError::InvalidIndex(number))
    }

    pub fn number(self) -> usize {
        match self {
            VersionSlot::Draft => 1,
            VersionSlot::Refined => 2,
            VersionSlot::Validated => 3,
            VersionSlot::Final => 4,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            VersionSlot::Draft => "v1_draft",
            VersionSlot::Refined => "v2_refined",
            VersionSlot::Validated => "v3_validated",
            VersionSlot::Final => "v4_final",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VersionSlot::Draft => "Initial Draft",
            VersionSlot::Refined => "VP Refined",
            VersionSlot::Validated => "Customer Validated",
            VersionSlot::Final => "Final",
        }
    }
}

impl std::fmt::Display for VersionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v1_draft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v2_refined: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v3_validated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v4_final: Option<String>,
}

/// What a comparison of two versions shows
#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Comparison {
    /// Plain text of the target version
    Clean(String),
    /// One of the versions has not been captured or is blank
    NoContent,
    Redline(DiffOutcome),
}

impl VersionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON the drafting backend emits
    pub fn from_json(json: &str) -> Result<Self, VersionError> {
        serde_json::from_str(json).map_err(|e| VersionError::Json(e.to_string()))
    }

    fn slot(&self, slot: VersionSlot) -> &Option<String> {
        match slot {
            VersionSlot::Draft => &self.v1_draft,
            VersionSlot::Refined => &self.v2_refined,
            VersionSlot::Validated => &self.v3_validated,
            VersionSlot::Final => &self.v4_final,
        }
    }

    fn slot_mut(&mut self, slot: VersionSlot) -> &mut Option<String> {
        match slot {
            VersionSlot::Draft => &mut self.v1_draft,
            VersionSlot::Refined => &mut self.v2_refined,
            VersionSlot::Validated => &mut self.v3_validated,
            VersionSlot::Final => &mut self.v4_final,
        }
    }

    /// Store a snapshot; each slot can be captured once
    pub fn capture(&mut self, slot: VersionSlot, content: impl Into<String>) -> Result<(), VersionError> {
        let entry = self.slot_mut(slot);
        if entry.is_some() {
            return Err(VersionError::AlreadyCaptured(slot));
        }
        *entry = Some(content.into());
        log::debug!("captured {}", slot);
        Ok(())
    }

    pub fn get(&self, slot: VersionSlot) -> Option<&str> {
        self.slot(slot).as_deref()
    }

    /// Content by 1-based version number
    pub fn select(&self, number: usize) -> Result<Option<&str>, VersionError> {
        Ok(self.get(VersionSlot::from_number(number)?))
    }

    /// Slots holding content, in workflow order
    pub fn available(&self) -> Vec<VersionSlot> {
        VersionSlot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot).is_some())
            .collect()
    }

    /// Compare two versions by 1-based number
    ///
    /// The same version on both sides is shown as is. A slot that has not
    /// been captured yet leaves nothing to compare against.
    pub fn compare(
        &self,
        from: usize,
        to: usize,
        show_redlines: bool,
        config: &DiffConfig,
    ) -> Result<Comparison, VersionError> {
        let from_text = self.select(from)?.unwrap_or_default();
        let to_text = self.select(to)?.unwrap_or_default();

        if from == to || !show_redlines {
            return Ok(clean(to_text));
        }
        if is_blank(from_text) || is_blank(to_text) {
            return Ok(Comparison::NoContent);
        }
        Ok(compare_texts(from_text, to_text, show_redlines, config))
    }
}

/// Compare two documents, or show the "to" document when redlines are off
///
/// A blank side is an empty document: everything on the other side is
/// inserted or removed. Only two blank documents give `NoContent`.
pub fn compare_texts(from: &str, to: &str, show_redlines: bool, config: &DiffConfig) -> Comparison {
    if !show_redlines {
        return clean(to);
    }
    if is_blank(from) && is_blank(to) {
        return Comparison::NoContent;
    }
    Comparison::Redline(diff_documents(from, to, config))
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn clean(text: &str) -> Comparison {
    if is_blank(text) {
        Comparison::NoContent
    } else {
        Comparison::Clean(text.to_string())
    }
}
