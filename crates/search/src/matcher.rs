//! Field matchers.
//!
//! Three comparator families, each pure and independent of the fallback
//! pipeline:
//! - [`FieldMatcher::match_numeric`] for counts, prices and measurements
//! - [`FieldMatcher::match_string`] for scalar string/enum fields
//! - [`FieldMatcher::match_array`] for item lists such as amenities

use crate::error::{Result, SearchError};
use crate::fuzzy::{contains_either, normalize, similarity};
use crate::outcome::{MatchKind, MatchOutcome};
use crate::synonyms::SynonymTable;
use crate::tolerance::ToleranceTable;

/// Absorbs float noise when comparing against a tolerance bound.
const EPSILON: f64 = 1e-9;

/// Score for a value sitting exactly on the tolerance bound.
const CLOSE_FLOOR: f64 = 90.0;

/// Fuzzy string matching settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzySettings {
    pub enabled: bool,
    pub threshold: f64,
}

impl Default for FuzzySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.8,
        }
    }
}

/// Matchers bound to their tolerance and synonym tables.
#[derive(Debug, Clone, Default)]
pub struct FieldMatcher {
    tolerances: ToleranceTable,
    scalar_synonyms: SynonymTable,
    array_synonyms: SynonymTable,
    fuzzy: FuzzySettings,
}

impl FieldMatcher {
    /// Create a matcher, validating the fuzzy threshold.
    pub fn new(
        tolerances: ToleranceTable,
        scalar_synonyms: SynonymTable,
        array_synonyms: SynonymTable,
        fuzzy: FuzzySettings,
    ) -> Result<Self> {
        if !(fuzzy.threshold > 0.0 && fuzzy.threshold <= 1.0) {
            return Err(SearchError::InvalidThreshold(fuzzy.threshold));
        }
        Ok(Self {
            tolerances,
            scalar_synonyms,
            array_synonyms,
            fuzzy,
        })
    }

    pub fn tolerances(&self) -> &ToleranceTable {
        &self.tolerances
    }

    pub fn fuzzy(&self) -> FuzzySettings {
        self.fuzzy
    }

    /// Compare two numbers using the field's tolerance.
    ///
    /// Equal values are exact. Within tolerance the score falls linearly
    /// from just under 100 to 90 at the bound; beyond it nothing matches.
    pub fn match_numeric(&self, requested: f64, available: f64, field: &str) -> MatchOutcome {
        if !requested.is_finite() || !available.is_finite() {
            return MatchOutcome::none().with_reason("non-finite value");
        }

        let diff = (requested - available).abs();
        if diff <= EPSILON {
            return MatchOutcome::exact();
        }

        let tolerance = self.tolerances.get(field);
        if tolerance > 0.0 && diff <= tolerance + EPSILON {
            let ratio = (diff / tolerance).min(1.0);
            let score = (100.0 - (100.0 - CLOSE_FLOOR) * ratio)
                .floor()
                .clamp(CLOSE_FLOOR, 99.0);
            return MatchOutcome::new(MatchKind::Close, score as u8).with_reason(format!(
                "{} differs by {} (tolerance {})",
                field, diff, tolerance
            ));
        }

        MatchOutcome::none().with_reason(format!(
            "{} differs by {} (tolerance {})",
            field, diff, tolerance
        ))
    }

    /// Compare two scalar strings: exact, synonym, substring, then fuzzy.
    pub fn match_string(&self, requested: &str, available: &str, field: &str) -> MatchOutcome {
        let wanted = normalize(requested);
        let offered = normalize(available);

        if wanted.is_empty() || offered.is_empty() {
            // Nothing word-like survived normalization, compare the raw text.
            if requested.trim().to_lowercase() == available.trim().to_lowercase() {
                return MatchOutcome::exact();
            }
            return MatchOutcome::none().with_reason("no comparable words");
        }

        if wanted == offered {
            return MatchOutcome::exact();
        }

        if self.scalar_synonyms.are_synonyms(field, &wanted, &offered) {
            return MatchOutcome::new(MatchKind::Synonym, 90)
                .with_reason(format!("'{}' is a synonym of '{}'", available, requested));
        }

        if contains_either(&wanted, &offered) {
            return MatchOutcome::new(MatchKind::Partial, 70)
                .with_reason(format!("'{}' partially matches '{}'", available, requested));
        }

        if self.fuzzy.enabled {
            let score = similarity(&wanted, &offered);
            if score >= self.fuzzy.threshold {
                let percent = (score * 100.0).round().min(99.0) as u8;
                return MatchOutcome::new(MatchKind::Fuzzy, percent).with_reason(format!(
                    "'{}' resembles '{}' ({:.0}% similar)",
                    available,
                    requested,
                    score * 100.0
                ));
            }
        }

        MatchOutcome::none()
    }

    /// Compare requested list items against available ones.
    ///
    /// Each requested item earns 1.0 for a direct or synonym match and 0.5
    /// for a substring relationship; the credited fraction picks the class.
    pub fn match_array<S, T>(&self, requested: &[S], available: &[T], field: &str) -> MatchOutcome
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let wanted: Vec<String> = requested
            .iter()
            .map(|item| normalize(item.as_ref()))
            .filter(|item| !item.is_empty())
            .collect();
        if wanted.is_empty() {
            return MatchOutcome::no_requirement();
        }
        let offered: Vec<String> = available
            .iter()
            .map(|item| normalize(item.as_ref()))
            .filter(|item| !item.is_empty())
            .collect();

        let credits: f64 = wanted
            .iter()
            .map(|item| self.item_credit(item, &offered, field))
            .sum();
        let fraction = credits / wanted.len() as f64;

        let (kind, score) = if fraction >= 1.0 {
            (MatchKind::Complete, 100)
        } else if fraction >= 0.8 {
            (MatchKind::Good, 90)
        } else if fraction >= 0.5 {
            (MatchKind::Partial, 70)
        } else if fraction > 0.0 {
            (MatchKind::Weak, 50)
        } else {
            (MatchKind::None, 0)
        };

        MatchOutcome::new(kind, score).with_reason(format!(
            "{} of {} requested {} matched",
            credits,
            wanted.len(),
            field
        ))
    }

    fn item_credit(&self, item: &str, offered: &[String], field: &str) -> f64 {
        let direct = offered
            .iter()
            .any(|o| o == item || self.array_synonyms.are_synonyms(field, item, o));
        if direct {
            return 1.0;
        }
        if offered.iter().any(|o| contains_either(item, o)) {
            return 0.5;
        }
        0.0
    }
}
