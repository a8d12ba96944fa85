//! Progressive constraint-relaxation search for property listings.
//!
//! A search runs through six levels in fixed order, from the exact criteria
//! to a handful of popular locations, and stops at the first level whose
//! candidate count reaches the configured target:
//!
//! | level | what is searched | score |
//! |---|---|---|
//! | `EXACT` | the criteria as given | 100 |
//! | `RELAXED` | nice-to-have fields loosened | 85 |
//! | `GEOGRAPHIC_EXPANSION` | location widened one step | 70 |
//! | `CRITICAL_ONLY` | critical fields only, with margins | 60 |
//! | `LOCATION_ONLY` | location only | 40 |
//! | `POPULAR` | well-known locations | 20 |
//!
//! The listing source is injected and may be any
//! `Fn(&SearchCriteria) -> Result<Vec<R>, SourceError>`.
//!
//! # Example
//!
//! ```
//! use nestfind_fallback::{
//!     FallbackSearch, MatchLevel, NumericField, SearchCriteria, SearchResult, SourceError,
//! };
//!
//! let source = |_: &SearchCriteria| -> Result<Vec<u32>, SourceError> { Ok((0..12).collect()) };
//! let search = FallbackSearch::with_defaults(source).unwrap();
//!
//! let criteria = SearchCriteria::new()
//!     .with_location("Toronto")
//!     .with_number(NumericField::Bedrooms, 2.0);
//! let result: SearchResult<u32> = search.search_with_fallback(&criteria);
//!
//! assert_eq!(result.match_level(), MatchLevel::Exact);
//! assert_eq!(result.count(), 12);
//! assert!(result.relaxed_constraints().is_empty());
//! ```

pub mod criteria;
pub mod engine;
pub mod fields;
pub mod level;
pub mod message;
pub mod policy;
pub mod result;
pub mod scoring;
pub mod source;

pub use criteria::{Location, NumericValue, SearchCriteria};
pub use engine::{FallbackSearch, MAX_SEARCH_CALLS};
pub use fields::{BoolField, Field, FieldKind, ListField, NumericField, TextField};
pub use level::{Level, LevelContext, LevelPlan, MatchLevel, Stage};
pub use message::MessageAssembler;
pub use policy::{classify, FieldClass, RelaxationPolicy};
pub use result::SearchResult;
pub use scoring::{AttributeValue, ListingRecord, RecordMatchReport, RecordScorer};
pub use source::{ListingSource, SourceError, SourceErrorCode};
