//! Per-field scoring of candidate records.
//!
//! Scores how well one record meets the criteria, field by field, using the
//! field matchers. There is no ranking across records.

use crate::criteria::{Location, NumericValue, SearchCriteria};
use crate::fields::{Field, LOCATION};
use nestfind_search::{FieldMatcher, MatchOutcome};
use serde::Serialize;
use serde_json::Value;

/// An attribute value read from a candidate record.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

/// A candidate record whose attributes are named like criteria fields.
pub trait ListingRecord {
    fn attribute(&self, name: &str) -> Option<AttributeValue>;
}

impl ListingRecord for Value {
    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        match self.get(name)? {
            Value::Bool(b) => Some(AttributeValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(AttributeValue::Number),
            Value::String(s) => Some(AttributeValue::Text(s.clone())),
            Value::Array(items) => Some(AttributeValue::List(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(String::from))
                    .collect(),
            )),
            _ => None,
        }
    }
}

/// Outcome for one requested field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMatch {
    pub field: String,
    pub outcome: MatchOutcome,
}

/// Field-by-field report for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordMatchReport {
    pub fields: Vec<FieldMatch>,
    /// Mean of the field scores; 100 when nothing was requested
    pub score: f64,
}

impl RecordMatchReport {
    /// Requested fields the record does not satisfy at all.
    pub fn unmatched(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| !f.outcome.is_match())
            .map(|f| f.field.as_str())
    }
}

/// Scores records against criteria with a configured [`FieldMatcher`].
#[derive(Debug, Clone, Default)]
pub struct RecordScorer {
    matcher: FieldMatcher,
}

impl RecordScorer {
    pub fn new(matcher: FieldMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &FieldMatcher {
        &self.matcher
    }

    /// Score one record.
    pub fn score<R>(&self, criteria: &SearchCriteria, record: &R) -> RecordMatchReport
    where
        R: ListingRecord + ?Sized,
    {
        let fields: Vec<FieldMatch> = criteria
            .fields()
            .into_iter()
            .map(|field| FieldMatch {
                field: field.as_str().to_string(),
                outcome: self.score_field(criteria, field, record.attribute(field.as_str())),
            })
            .collect();

        let score = if fields.is_empty() {
            100.0
        } else {
            fields.iter().map(|f| f64::from(f.outcome.score)).sum::<f64>() / fields.len() as f64
        };

        RecordMatchReport { fields, score }
    }

    /// Score every record, in input order.
    pub fn score_records<R: ListingRecord + Sync>(
        &self,
        criteria: &SearchCriteria,
        records: &[R],
    ) -> Vec<RecordMatchReport> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            records
                .par_iter()
                .map(|record| self.score(criteria, record))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            records
                .iter()
                .map(|record| self.score(criteria, record))
                .collect()
        }
    }

    fn score_field(
        &self,
        criteria: &SearchCriteria,
        field: Field,
        available: Option<AttributeValue>,
    ) -> MatchOutcome {
        let name = field.as_str();
        match (field, available) {
            (Field::Location, Some(AttributeValue::Text(place))) => match criteria.location() {
                Some(Location::Place(wanted)) => {
                    self.matcher.match_string(wanted, &place, LOCATION)
                }
                Some(Location::Area(cities)) => cities
                    .iter()
                    .map(|city| self.matcher.match_string(city, &place, LOCATION))
                    .max_by_key(|outcome| outcome.score)
                    .unwrap_or_else(MatchOutcome::none),
                None => MatchOutcome::no_requirement(),
            },
            (Field::Bool(f), Some(AttributeValue::Bool(have))) => match criteria.flag(f) {
                Some(wanted) if wanted == have => MatchOutcome::exact(),
                Some(_) => MatchOutcome::none(),
                None => MatchOutcome::no_requirement(),
            },
            (Field::Numeric(f), Some(AttributeValue::Number(have))) => match criteria.number(f) {
                Some(wanted) if wanted.contains(have) => MatchOutcome::exact(),
                Some(wanted @ NumericValue::Range { .. }) => {
                    self.matcher.match_numeric(wanted.nearest(have), have, name)
                }
                Some(NumericValue::Exact(wanted)) => self.matcher.match_numeric(wanted, have, name),
                None => MatchOutcome::no_requirement(),
            },
            (Field::Text(f), Some(AttributeValue::Text(have))) => match criteria.text(f) {
                Some(wanted) => self.matcher.match_string(wanted, &have, name),
                None => MatchOutcome::no_requirement(),
            },
            (Field::List(f), Some(AttributeValue::List(have))) => match criteria.list(f) {
                Some(wanted) => self.matcher.match_array(wanted, have.as_slice(), name),
                None => MatchOutcome::no_requirement(),
            },
            (Field::List(f), Some(AttributeValue::Text(have))) => match criteria.list(f) {
                Some(wanted) => self.matcher.match_array(wanted, std::slice::from_ref(&have), name),
                None => MatchOutcome::no_requirement(),
            },
            (_, None) => MatchOutcome::none().with_reason("attribute missing"),
            (_, Some(_)) => MatchOutcome::none().with_reason("attribute has a different kind"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{BoolField, ListField, NumericField, TextField};
    use nestfind_search::{FuzzySettings, MatchKind, SynonymTable, ToleranceTable};
    use serde_json::json;

    fn scorer() -> RecordScorer {
        let matcher = FieldMatcher::new(
            ToleranceTable::new([("bathrooms", 0.5), ("square_feet", 100.0)]).unwrap(),
            SynonymTable::default(),
            SynonymTable::default(),
            FuzzySettings::default(),
        )
        .unwrap();
        RecordScorer::new(matcher)
    }

    fn record() -> Value {
        json!({
            "location": "Toronto",
            "bedrooms": 2,
            "bathrooms": 1.5,
            "square_feet": 950,
            "gym": true,
            "property_type": "Condo",
            "amenities": ["Gym", "Pool", "Concierge"],
        })
    }

    fn outcome<'a>(report: &'a RecordMatchReport, field: &str) -> &'a MatchOutcome {
        &report
            .fields
            .iter()
            .find(|f| f.field == field)
            .unwrap()
            .outcome
    }

    #[test]
    fn test_full_match_scores_100() {
        let criteria = SearchCriteria::new()
            .with_location("toronto")
            .with_number(NumericField::Bedrooms, 2.0)
            .with_flag(BoolField::Gym, true)
            .with_text(TextField::PropertyType, "condo")
            .with_list(ListField::Amenities, ["gym", "pool"]);

        let report = scorer().score(&criteria, &record());
        assert_eq!(report.fields.len(), 5);
        assert_eq!(report.score, 100.0);
        assert_eq!(report.unmatched().count(), 0);
    }

    #[test]
    fn test_range_contains_is_exact_and_near_miss_is_close() {
        let criteria = SearchCriteria::new()
            .with_range(NumericField::Bedrooms, 1.0, 3.0)
            .with_range(NumericField::SquareFeet, 1000.0, 1200.0);

        let report = scorer().score(&criteria, &record());
        assert_eq!(outcome(&report, "bedrooms").kind, MatchKind::Exact);
        assert_eq!(outcome(&report, "square_feet").kind, MatchKind::Close);
    }

    #[test]
    fn test_missing_attribute_is_unmatched() {
        let criteria = SearchCriteria::new().with_flag(BoolField::Pool, true);
        let report = scorer().score(&criteria, &record());
        assert_eq!(outcome(&report, "pool").kind, MatchKind::None);
        assert_eq!(report.score, 0.0);
        assert_eq!(report.unmatched().collect::<Vec<_>>(), vec!["pool"]);
    }

    #[test]
    fn test_area_takes_best_city() {
        let criteria = SearchCriteria::new().with_area(["Mississauga", "Toronto"]);
        let report = scorer().score(&criteria, &record());
        assert_eq!(outcome(&report, "location").kind, MatchKind::Exact);
    }

    #[test]
    fn test_empty_criteria_scores_100() {
        let report = scorer().score(&SearchCriteria::new(), &record());
        assert!(report.fields.is_empty());
        assert_eq!(report.score, 100.0);
    }

    #[test]
    fn test_score_records_keeps_order() {
        let criteria = SearchCriteria::new().with_number(NumericField::Bedrooms, 2.0);
        let records = vec![record(), json!({"bedrooms": 5}), json!({})];
        let reports = scorer().score_records(&criteria, &records);
        let scores: Vec<f64> = reports.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![100.0, 0.0, 0.0]);
    }
}
