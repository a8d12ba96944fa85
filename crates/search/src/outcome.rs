//! Match classification for a single field comparison.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a requested value relates to an available one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Identical after normalization
    Exact,
    /// Numeric difference within the field tolerance
    Close,
    /// Terms belong to the same synonym group
    Synonym,
    /// Substring relationship, or half of the requested items credited
    Partial,
    /// Edit-distance similarity above the threshold
    Fuzzy,
    /// Every requested item present
    Complete,
    /// At least 80% of requested items present
    Good,
    /// Some, but under half, of requested items present
    Weak,
    /// Nothing in common
    None,
    /// Nothing was requested
    NoRequirement,
}

impl MatchKind {
    /// Wire name of the classification
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Close => "close",
            MatchKind::Synonym => "synonym",
            MatchKind::Partial => "partial",
            MatchKind::Fuzzy => "fuzzy",
            MatchKind::Complete => "complete",
            MatchKind::Good => "good",
            MatchKind::Weak => "weak",
            MatchKind::None => "none",
            MatchKind::NoRequirement => "no_requirement",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of comparing one field: classification plus a 0-100 score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub kind: MatchKind,
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MatchOutcome {
    pub(crate) fn new(kind: MatchKind, score: u8) -> Self {
        Self {
            kind,
            score: score.min(100),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn exact() -> Self {
        Self::new(MatchKind::Exact, 100)
    }

    pub fn none() -> Self {
        Self::new(MatchKind::None, 0)
    }

    pub fn no_requirement() -> Self {
        Self::new(MatchKind::NoRequirement, 100)
    }

    /// True unless the comparison found nothing in common.
    pub fn is_match(&self) -> bool {
        self.kind != MatchKind::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(MatchOutcome::exact().score, 100);
        assert_eq!(MatchOutcome::none().score, 0);
        assert!(!MatchOutcome::none().is_match());
        assert!(MatchOutcome::no_requirement().is_match());
    }

    #[test]
    fn test_score_is_capped() {
        assert_eq!(MatchOutcome::new(MatchKind::Fuzzy, 140).score, 100);
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&MatchOutcome::no_requirement()).unwrap();
        assert_eq!(json, r#"{"kind":"no_requirement","score":100}"#);
    }
}
