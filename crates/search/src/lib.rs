//! Field matchers for structured listing search.
//!
//! This crate provides:
//! - Numeric matching with per-field tolerances
//! - String/enum matching with synonyms, substrings and fuzzy similarity
//! - List matching with fractional credit per requested item
//! - Levenshtein edit distance and normalized similarity helpers
//!
//! # Example
//!
//! ```
//! use nestfind_search::{FieldMatcher, MatchKind};
//!
//! let matcher = FieldMatcher::default();
//! let outcome = matcher.match_array(&["Gym", "Pool"], &["Gym", "Pool", "Concierge"], "amenities");
//! assert_eq!(outcome.kind, MatchKind::Complete);
//! ```

mod error;
mod fuzzy;
mod matcher;
mod outcome;
mod synonyms;
mod tolerance;

pub use error::{Result, SearchError, SearchErrorCode};
pub use fuzzy::{contains_either, levenshtein_distance, normalize, similarity};
pub use matcher::{FieldMatcher, FuzzySettings};
pub use outcome::{MatchKind, MatchOutcome};
pub use synonyms::SynonymTable;
pub use tolerance::ToleranceTable;
