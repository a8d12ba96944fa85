//! Final search result.

use crate::level::MatchLevel;
use serde::Serialize;

/// Outcome of one fallback search.
///
/// Built once per invocation; `count` always equals the number of
/// properties and `score` is the fixed confidence of `match_level`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<R> {
    properties: Vec<R>,
    match_level: MatchLevel,
    relaxed_constraints: Vec<String>,
    message: String,
    count: usize,
    score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    expanded_location: Option<String>,
}

impl<R> SearchResult<R> {
    pub(crate) fn new(
        properties: Vec<R>,
        match_level: MatchLevel,
        relaxed_constraints: Vec<String>,
        message: String,
        expanded_location: Option<String>,
    ) -> Self {
        let relaxed_constraints = if match_level == MatchLevel::Exact {
            Vec::new()
        } else {
            relaxed_constraints
        };
        Self {
            count: properties.len(),
            score: match_level.score(),
            properties,
            match_level,
            relaxed_constraints,
            message,
            expanded_location,
        }
    }

    pub fn properties(&self) -> &[R] {
        &self.properties
    }

    pub fn into_properties(self) -> Vec<R> {
        self.properties
    }

    pub fn match_level(&self) -> MatchLevel {
        self.match_level
    }

    /// Wire names of every relaxed field, in the order they were relaxed.
    pub fn relaxed_constraints(&self) -> &[String] {
        &self.relaxed_constraints
    }

    /// User-facing explanation; render this rather than inferring from `count`.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    /// The widened or substituted location, when one was used.
    pub fn expanded_location(&self) -> Option<&str> {
        self.expanded_location.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
