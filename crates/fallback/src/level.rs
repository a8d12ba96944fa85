//! Fallback levels.
//!
//! Each level turns the original criteria and the stage reached by the
//! previous level into a [`LevelPlan`]. Levels never look backwards: the
//! pipeline walks them once, in ascending [`MatchLevel`] order.

use crate::criteria::{Location, SearchCriteria};
use crate::fields::LOCATION;
use crate::policy::{merge_relaxed, RelaxationPolicy};
use nestfind_core::{Error, Result};
use nestfind_geo::{Expansion, GeographicHierarchy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relaxation state, from narrowest to broadest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchLevel {
    Exact,
    Relaxed,
    GeographicExpansion,
    CriticalOnly,
    LocationOnly,
    Popular,
}

impl MatchLevel {
    pub const ALL: [MatchLevel; 6] = [
        MatchLevel::Exact,
        MatchLevel::Relaxed,
        MatchLevel::GeographicExpansion,
        MatchLevel::CriticalOnly,
        MatchLevel::LocationOnly,
        MatchLevel::Popular,
    ];

    /// Lowercase name used in logs, metrics labels and message overrides.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLevel::Exact => "exact",
            MatchLevel::Relaxed => "relaxed",
            MatchLevel::GeographicExpansion => "geographic_expansion",
            MatchLevel::CriticalOnly => "critical_only",
            MatchLevel::LocationOnly => "location_only",
            MatchLevel::Popular => "popular",
        }
    }

    /// Fixed confidence reported with results from this level.
    pub fn score(&self) -> u8 {
        match self {
            MatchLevel::Exact => 100,
            MatchLevel::Relaxed => 85,
            MatchLevel::GeographicExpansion => 70,
            MatchLevel::CriticalOnly => 60,
            MatchLevel::LocationOnly => 40,
            MatchLevel::Popular => 20,
        }
    }

    pub fn next(&self) -> Option<MatchLevel> {
        Self::ALL.iter().copied().find(|level| level > self)
    }

    pub fn from_name(name: &str) -> Option<MatchLevel> {
        Self::ALL.iter().copied().find(|level| level.as_str() == name)
    }
}

impl fmt::Display for MatchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Criteria reached at some level, with the relaxations accumulated so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub criteria: SearchCriteria,
    pub relaxed: Vec<String>,
    /// Display name of a widened or substituted location
    pub expanded_location: Option<String>,
}

impl Stage {
    /// The starting point: unmodified criteria, nothing relaxed.
    pub fn unmodified(criteria: &SearchCriteria) -> Self {
        Self {
            criteria: criteria.clone(),
            relaxed: Vec::new(),
            expanded_location: None,
        }
    }

    /// Every criterion abandoned: what the popular level reports.
    pub fn abandoned(original: &SearchCriteria, previous: &Stage) -> Self {
        Self {
            criteria: SearchCriteria::new(),
            relaxed: merge_relaxed(
                &previous.relaxed,
                original
                    .field_names()
                    .into_iter()
                    .chain(std::iter::once(LOCATION.to_string())),
            ),
            expanded_location: None,
        }
    }
}

/// What a level wants the pipeline to do.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelPlan {
    /// Issue no search; the previous stage carries over.
    Skip { reason: &'static str },
    /// One search with these criteria.
    Search(Stage),
    /// Search each stage in order and finish with the first that yields
    /// candidates, or with nothing once all are exhausted.
    FirstNonEmpty(Vec<Stage>),
}

/// Read-only inputs shared by every level.
#[derive(Debug, Clone)]
pub struct LevelContext {
    pub policy: RelaxationPolicy,
    pub hierarchy: GeographicHierarchy,
    pub popular_locations: Vec<String>,
    pub location_only_cap: usize,
    pub popular_cap: usize,
}

impl Default for LevelContext {
    fn default() -> Self {
        Self {
            policy: RelaxationPolicy::default(),
            hierarchy: GeographicHierarchy::default(),
            popular_locations: vec!["Toronto".to_string()],
            location_only_cap: 20,
            popular_cap: 10,
        }
    }
}

/// One step of the fallback pipeline.
pub trait Level: Send + Sync + fmt::Debug {
    fn match_level(&self) -> MatchLevel;

    /// Derive this level's search from the original criteria and the last
    /// stage that issued a search.
    fn plan(&self, original: &SearchCriteria, previous: &Stage, ctx: &LevelContext) -> LevelPlan;

    /// Maximum number of candidates returned from this level.
    fn result_cap(&self, _ctx: &LevelContext) -> Option<usize> {
        None
    }
}

/// Unmodified criteria.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactLevel;

impl Level for ExactLevel {
    fn match_level(&self) -> MatchLevel {
        MatchLevel::Exact
    }

    fn plan(&self, original: &SearchCriteria, _previous: &Stage, _ctx: &LevelContext) -> LevelPlan {
        LevelPlan::Search(Stage::unmodified(original))
    }
}

/// Nice-to-have fields loosened.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelaxedLevel;

impl Level for RelaxedLevel {
    fn match_level(&self) -> MatchLevel {
        MatchLevel::Relaxed
    }

    fn plan(&self, _original: &SearchCriteria, previous: &Stage, ctx: &LevelContext) -> LevelPlan {
        let relaxation = ctx.policy.relax_nice_to_have(&previous.criteria);
        if relaxation.relaxed.is_empty() {
            return LevelPlan::Skip {
                reason: "no nice-to-have fields to relax",
            };
        }
        LevelPlan::Search(Stage {
            criteria: relaxation.criteria,
            relaxed: merge_relaxed(&previous.relaxed, relaxation.relaxed),
            expanded_location: previous.expanded_location.clone(),
        })
    }
}

/// Location widened one step up the hierarchy.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeographicExpansionLevel;

impl Level for GeographicExpansionLevel {
    fn match_level(&self) -> MatchLevel {
        MatchLevel::GeographicExpansion
    }

    fn plan(&self, original: &SearchCriteria, previous: &Stage, ctx: &LevelContext) -> LevelPlan {
        let expansion = match previous.criteria.location() {
            Some(Location::Place(place)) => ctx.hierarchy.expand(place),
            _ => None,
        };

        let Some(expansion) = expansion else {
            if previous.criteria == *original {
                return LevelPlan::Skip {
                    reason: "no geographic expansion and nothing relaxed",
                };
            }
            return LevelPlan::Search(previous.clone());
        };

        let mut criteria = previous.criteria.clone();
        let display_name = expansion.display_name();
        criteria.set_location(match expansion {
            Expansion::City(city) => Location::Place(city),
            Expansion::Metro { cities, .. } => Location::Area(cities),
        });

        LevelPlan::Search(Stage {
            criteria,
            relaxed: merge_relaxed(&previous.relaxed, [LOCATION.to_string()]),
            expanded_location: Some(display_name),
        })
    }
}

/// Only critical fields, with numeric tolerances widened.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalOnlyLevel;

impl Level for CriticalOnlyLevel {
    fn match_level(&self) -> MatchLevel {
        MatchLevel::CriticalOnly
    }

    fn plan(&self, original: &SearchCriteria, previous: &Stage, ctx: &LevelContext) -> LevelPlan {
        let relaxation = ctx.policy.critical_only(&previous.criteria);
        if relaxation.criteria == *original || relaxation.criteria == previous.criteria {
            return LevelPlan::Skip {
                reason: "criteria already critical-only",
            };
        }
        LevelPlan::Search(Stage {
            criteria: relaxation.criteria,
            relaxed: merge_relaxed(&previous.relaxed, relaxation.relaxed),
            expanded_location: previous.expanded_location.clone(),
        })
    }
}

/// Only the location.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationOnlyLevel;

impl Level for LocationOnlyLevel {
    fn match_level(&self) -> MatchLevel {
        MatchLevel::LocationOnly
    }

    fn plan(&self, original: &SearchCriteria, previous: &Stage, ctx: &LevelContext) -> LevelPlan {
        let Some(relaxation) = ctx.policy.location_only(&previous.criteria) else {
            return LevelPlan::Skip {
                reason: "no location supplied",
            };
        };
        if relaxation.criteria == *original || relaxation.criteria == previous.criteria {
            return LevelPlan::Skip {
                reason: "criteria already location-only",
            };
        }
        LevelPlan::Search(Stage {
            criteria: relaxation.criteria,
            relaxed: merge_relaxed(&previous.relaxed, relaxation.relaxed),
            expanded_location: previous.expanded_location.clone(),
        })
    }

    fn result_cap(&self, ctx: &LevelContext) -> Option<usize> {
        Some(ctx.location_only_cap)
    }
}

/// Well-known locations, ignoring every criterion.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopularLevel;

impl Level for PopularLevel {
    fn match_level(&self) -> MatchLevel {
        MatchLevel::Popular
    }

    fn plan(&self, original: &SearchCriteria, previous: &Stage, ctx: &LevelContext) -> LevelPlan {
        let abandoned = Stage::abandoned(original, previous);

        LevelPlan::FirstNonEmpty(
            ctx.popular_locations
                .iter()
                .map(|place| Stage {
                    criteria: SearchCriteria::new().with_location(place.as_str()),
                    relaxed: abandoned.relaxed.clone(),
                    expanded_location: Some(place.clone()),
                })
                .collect(),
        )
    }

    fn result_cap(&self, ctx: &LevelContext) -> Option<usize> {
        Some(ctx.popular_cap)
    }
}

/// The six standard levels in order.
pub fn standard_levels() -> Vec<Box<dyn Level>> {
    vec![
        Box::new(ExactLevel),
        Box::new(RelaxedLevel),
        Box::new(GeographicExpansionLevel),
        Box::new(CriticalOnlyLevel),
        Box::new(LocationOnlyLevel),
        Box::new(PopularLevel),
    ]
}

/// Check that levels strictly broaden and end at the popular level.
pub fn validate_levels(levels: &[Box<dyn Level>]) -> Result<()> {
    for pair in levels.windows(2) {
        let (current, next) = (pair[0].match_level(), pair[1].match_level());
        if next <= current {
            return Err(Error::config(format!(
                "fallback level {} cannot follow {}",
                next, current
            )));
        }
    }
    match levels.last().map(|level| level.match_level()) {
        Some(MatchLevel::Popular) => Ok(()),
        _ => Err(Error::config("fallback levels must end with the popular level")
            .with_suggestion("Append PopularLevel so every search terminates with a result")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{BoolField, NumericField};

    fn context() -> LevelContext {
        LevelContext {
            hierarchy: GeographicHierarchy::new(
                [("Yorkville".to_string(), "Toronto".to_string())],
                [(
                    "Toronto".to_string(),
                    vec!["Toronto".to_string(), "Mississauga".to_string()],
                )],
            )
            .unwrap(),
            popular_locations: vec!["Toronto".to_string(), "Vancouver".to_string()],
            ..LevelContext::default()
        }
    }

    fn searched(plan: LevelPlan) -> Stage {
        match plan {
            LevelPlan::Search(stage) => stage,
            other => panic!("expected a search, got {:?}", other),
        }
    }

    #[test]
    fn test_match_level_order_and_scores() {
        for pair in MatchLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].score() > pair[1].score());
        }
        assert_eq!(MatchLevel::Exact.next(), Some(MatchLevel::Relaxed));
        assert_eq!(MatchLevel::Popular.next(), None);
        assert_eq!(MatchLevel::from_name("critical_only"), Some(MatchLevel::CriticalOnly));
    }

    #[test]
    fn test_match_level_serializes_upper_case() {
        let json = serde_json::to_string(&MatchLevel::GeographicExpansion).unwrap();
        assert_eq!(json, "\"GEOGRAPHIC_EXPANSION\"");
    }

    #[test]
    fn test_relaxed_skips_when_nothing_to_relax() {
        let original = SearchCriteria::new().with_location("Toronto");
        let plan = RelaxedLevel.plan(&original, &Stage::unmodified(&original), &context());
        assert!(matches!(plan, LevelPlan::Skip { .. }));
    }

    #[test]
    fn test_geographic_expansion_neighborhood_to_city() {
        let original = SearchCriteria::new()
            .with_location("Yorkville")
            .with_number(NumericField::Bedrooms, 3.0);
        let start = Stage::unmodified(&original);
        let stage = searched(GeographicExpansionLevel.plan(&original, &start, &context()));
        assert_eq!(stage.criteria.location(), Some(&Location::Place("Toronto".into())));
        assert_eq!(stage.relaxed, vec!["location"]);
        assert_eq!(stage.expanded_location.as_deref(), Some("Toronto"));
    }

    #[test]
    fn test_geographic_expansion_city_to_metro() {
        let original = SearchCriteria::new().with_location("toronto");
        let start = Stage::unmodified(&original);
        let stage = searched(GeographicExpansionLevel.plan(&original, &start, &context()));
        assert_eq!(
            stage.criteria.location(),
            Some(&Location::Area(vec!["Toronto".into(), "Mississauga".into()]))
        );
        assert_eq!(stage.expanded_location.as_deref(), Some("the Toronto area"));
    }

    #[test]
    fn test_geographic_expansion_repeats_relaxed_when_unmapped() {
        let original = SearchCriteria::new()
            .with_location("Mars City")
            .with_flag(BoolField::Gym, true);
        let start = Stage::unmodified(&original);
        let relaxed = searched(RelaxedLevel.plan(&original, &start, &context()));
        let stage = searched(GeographicExpansionLevel.plan(&original, &relaxed, &context()));
        assert_eq!(stage, relaxed);
    }

    #[test]
    fn test_geographic_expansion_skips_when_it_would_repeat_exact() {
        let original = SearchCriteria::new().with_location("Mars City");
        let start = Stage::unmodified(&original);
        let plan = GeographicExpansionLevel.plan(&original, &start, &context());
        assert!(matches!(plan, LevelPlan::Skip { .. }));
    }

    #[test]
    fn test_critical_only_keeps_expanded_location() {
        let original = SearchCriteria::new()
            .with_location("Yorkville")
            .with_number(NumericField::Bedrooms, 3.0)
            .with_number(NumericField::Bathrooms, 2.0);
        let ctx = context();
        let start = Stage::unmodified(&original);
        let expanded = searched(GeographicExpansionLevel.plan(&original, &start, &ctx));
        let stage = searched(CriticalOnlyLevel.plan(&original, &expanded, &ctx));

        assert_eq!(stage.criteria.location(), Some(&Location::Place("Toronto".into())));
        assert_eq!(stage.relaxed, vec!["location", "bedrooms", "bathrooms"]);
        assert_eq!(stage.expanded_location.as_deref(), Some("Toronto"));
    }

    #[test]
    fn test_levels_skip_when_they_would_repeat_the_previous_search() {
        let original = SearchCriteria::new().with_location("Yorkville");
        let ctx = context();
        let start = Stage::unmodified(&original);
        let expanded = searched(GeographicExpansionLevel.plan(&original, &start, &ctx));

        let critical = CriticalOnlyLevel.plan(&original, &expanded, &ctx);
        assert!(matches!(critical, LevelPlan::Skip { .. }));
        let location_only = LocationOnlyLevel.plan(&original, &expanded, &ctx);
        assert!(matches!(location_only, LevelPlan::Skip { .. }));
    }

    #[test]
    fn test_location_only_skips_without_location() {
        let original = SearchCriteria::new().with_number(NumericField::Bedrooms, 2.0);
        let plan = LocationOnlyLevel.plan(&original, &Stage::unmodified(&original), &context());
        assert!(matches!(plan, LevelPlan::Skip { reason: "no location supplied" }));
        assert_eq!(LocationOnlyLevel.result_cap(&context()), Some(20));
    }

    #[test]
    fn test_popular_plans_every_location() {
        let original = SearchCriteria::new().with_number(NumericField::Bedrooms, 2.0);
        let plan = PopularLevel.plan(&original, &Stage::unmodified(&original), &context());
        let LevelPlan::FirstNonEmpty(stages) = plan else {
            panic!("expected popular stages");
        };
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[1].expanded_location.as_deref(), Some("Vancouver"));
        assert_eq!(stages[0].relaxed, vec!["bedrooms", "location"]);
    }

    #[test]
    fn test_validate_levels() {
        assert!(validate_levels(&standard_levels()).is_ok());

        let out_of_order: Vec<Box<dyn Level>> =
            vec![Box::new(RelaxedLevel), Box::new(ExactLevel), Box::new(PopularLevel)];
        assert!(validate_levels(&out_of_order).is_err());

        let no_terminal: Vec<Box<dyn Level>> = vec![Box::new(ExactLevel)];
        assert!(validate_levels(&no_terminal).is_err());

        let short: Vec<Box<dyn Level>> = vec![Box::new(ExactLevel), Box::new(PopularLevel)];
        assert!(validate_levels(&short).is_ok());
    }
}
