//! The fallback search pipeline.

use crate::criteria::SearchCriteria;
use crate::fields::Field;
use crate::level::{
    standard_levels, validate_levels, Level, LevelContext, LevelPlan, MatchLevel, Stage,
};
use crate::message::MessageAssembler;
use crate::policy::RelaxationPolicy;
use crate::result::SearchResult;
use crate::scoring::RecordScorer;
use crate::source::ListingSource;
use nestfind_core::config::EngineConfig;
use nestfind_core::validation::Validator;
use nestfind_core::{Error, ErrorCode, Result, ResultExt};
use nestfind_geo::{GeoError, GeographicHierarchy};
use nestfind_search::{FieldMatcher, FuzzySettings, SearchError, SynonymTable, ToleranceTable};
use nestfind_telemetry::{
    record_callback_failure, record_level_attempt, record_outcome, timed_span, Timer,
};
use tracing::{debug, info, warn};

/// Upper bound on listing-source calls per search.
pub const MAX_SEARCH_CALLS: usize = 6;

/// Progressive-relaxation search over an injected listing source.
///
/// Holds only immutable configuration; one instance can serve concurrent
/// searches whenever the source is `Sync`.
#[derive(Debug)]
pub struct FallbackSearch<S> {
    source: S,
    levels: Vec<Box<dyn Level>>,
    context: LevelContext,
    min_results: usize,
    messages: MessageAssembler,
    scorer: RecordScorer,
}

impl<S> FallbackSearch<S> {
    /// Build an engine with the six standard levels.
    pub fn new(source: S, config: &EngineConfig) -> Result<Self> {
        Self::with_levels(source, config, standard_levels())
    }

    /// Build an engine from the built-in configuration.
    pub fn with_defaults(source: S) -> Result<Self> {
        Self::new(source, &EngineConfig::default())
    }

    /// Build an engine with a custom level list.
    ///
    /// Levels must strictly broaden and end with the popular level.
    pub fn with_levels(
        source: S,
        config: &EngineConfig,
        levels: Vec<Box<dyn Level>>,
    ) -> Result<Self> {
        let report = config.check();
        for warning in report.warnings() {
            warn!(field = %warning.field, "{}", warning.message);
        }
        report.to_result_as(ErrorCode::ConfigValidationError)?;
        check_field_names(config)
            .with_suggestion("Key tables by field names from the search field catalog")?;
        validate_levels(&levels)?;

        let tolerances = ToleranceTable::new(config.tolerances.clone()).map_err(table_error)?;
        let scalar_synonyms = SynonymTable::new(&config.synonyms.scalar).map_err(table_error)?;
        let array_synonyms = SynonymTable::new(&config.synonyms.array).map_err(table_error)?;
        let matcher = FieldMatcher::new(
            tolerances,
            scalar_synonyms,
            array_synonyms,
            FuzzySettings {
                enabled: config.fuzzy.enabled,
                threshold: config.fuzzy.threshold,
            },
        )
        .map_err(table_error)?;

        let hierarchy = GeographicHierarchy::new(
            config.geography.neighborhoods.clone(),
            config.geography.metros.clone(),
        )
        .map_err(geo_error)?;

        let messages = MessageAssembler::new(&config.messages)?;

        debug!(
            levels = levels.len(),
            min_results = config.min_results,
            neighborhoods = hierarchy.neighborhood_count(),
            metros = hierarchy.metro_count(),
            "Fallback search configured"
        );

        Ok(Self {
            source,
            levels,
            context: LevelContext {
                policy: RelaxationPolicy::from_config(&config.relaxation),
                hierarchy,
                popular_locations: config.popular_locations.clone(),
                location_only_cap: config.limits.location_only,
                popular_cap: config.limits.popular,
            },
            min_results: config.min_results as usize,
            messages,
            scorer: RecordScorer::new(matcher),
        })
    }

    pub fn min_results(&self) -> usize {
        self.min_results
    }

    /// Configured levels, in visiting order.
    pub fn levels(&self) -> Vec<MatchLevel> {
        self.levels.iter().map(|level| level.match_level()).collect()
    }

    /// Scorer sharing this engine's tolerance and synonym tables.
    pub fn scorer(&self) -> &RecordScorer {
        &self.scorer
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Search, relaxing criteria level by level until enough candidates
    /// are found or the popular level is reached.
    ///
    /// Listing-source failures count as empty levels, so this never fails.
    pub fn search_with_fallback<R>(&self, criteria: &SearchCriteria) -> SearchResult<R>
    where
        S: ListingSource<R>,
    {
        timed_span!("fallback_search", fields = criteria.len());

        let mut previous = Stage::unmodified(criteria);
        // Candidates of the last search, `None` until one has run.
        let mut carried: Option<Vec<R>> = None;
        let mut calls_left = MAX_SEARCH_CALLS;
        let last_index = self.levels.len().saturating_sub(1);

        for (index, level) in self.levels.iter().enumerate() {
            let match_level = level.match_level();
            let terminal = index == last_index;

            match level.plan(criteria, &previous, &self.context) {
                LevelPlan::Skip { reason } => {
                    debug!(level = match_level.as_str(), reason, "Fallback level skipped");
                }
                LevelPlan::Search(stage) => {
                    if calls_left == 0 {
                        warn!(level = match_level.as_str(), "Search budget exhausted");
                        break;
                    }
                    calls_left -= 1;
                    let candidates = self.attempt(match_level, &stage.criteria);

                    if terminal || candidates.len() >= self.min_results {
                        return self.finish(level.as_ref(), criteria, stage, candidates);
                    }
                    previous = stage;
                    carried = Some(candidates);
                }
                LevelPlan::FirstNonEmpty(stages) => {
                    for stage in stages {
                        let candidates = match carried.take() {
                            Some(candidates) if stage.criteria == previous.criteria => {
                                debug!(
                                    level = match_level.as_str(),
                                    "Reusing candidates of the previous search"
                                );
                                candidates
                            }
                            last => {
                                carried = last;
                                if calls_left == 0 {
                                    warn!(level = match_level.as_str(), "Search budget exhausted");
                                    break;
                                }
                                calls_left -= 1;
                                self.attempt(match_level, &stage.criteria)
                            }
                        };
                        if !candidates.is_empty() {
                            return self.finish(level.as_ref(), criteria, stage, candidates);
                        }
                    }
                    let exhausted = Stage::abandoned(criteria, &previous);
                    return self.finish(level.as_ref(), criteria, exhausted, Vec::new());
                }
            }
        }

        // Reached only when the terminal level skips or the call budget runs out.
        let exhausted = Stage::abandoned(criteria, &previous);
        let relaxed = exhausted.relaxed.clone();
        let message = self.messages.render(MatchLevel::Popular, 0, &relaxed, None, None);
        record_outcome(MatchLevel::Popular.as_str());
        SearchResult::new(Vec::new(), MatchLevel::Popular, relaxed, message, None)
    }

    fn attempt<R>(&self, level: MatchLevel, criteria: &SearchCriteria) -> Vec<R>
    where
        S: ListingSource<R>,
    {
        record_level_attempt(level.as_str());
        let timer = Timer::start(level.as_str());
        let outcome = self.source.search(criteria);
        let elapsed = timer.stop();

        match outcome {
            Ok(candidates) => {
                debug!(
                    level = level.as_str(),
                    fields = criteria.len(),
                    candidates = candidates.len(),
                    duration_ms = elapsed.as_millis() as u64,
                    "Fallback level searched"
                );
                candidates
            }
            Err(e) => {
                warn!(
                    level = level.as_str(),
                    code = e.code() as u32,
                    error = %e,
                    "Listing source failed, treating level as empty"
                );
                record_callback_failure(level.as_str());
                Vec::new()
            }
        }
    }

    fn finish<R>(
        &self,
        level: &dyn Level,
        original: &SearchCriteria,
        stage: Stage,
        mut candidates: Vec<R>,
    ) -> SearchResult<R> {
        let match_level = level.match_level();
        let found = candidates.len();
        if let Some(cap) = level.result_cap(&self.context) {
            candidates.truncate(cap);
        }

        let requested = original.location().map(|location| location.to_string());
        let message = self.messages.render(
            match_level,
            candidates.len(),
            &stage.relaxed,
            requested.as_deref(),
            stage.expanded_location.as_deref(),
        );

        info!(
            level = match_level.as_str(),
            found,
            returned = candidates.len(),
            relaxed = stage.relaxed.len(),
            "Fallback search finished"
        );
        record_outcome(match_level.as_str());

        SearchResult::new(
            candidates,
            match_level,
            stage.relaxed,
            message,
            stage.expanded_location,
        )
    }
}

/// Check that every table is keyed by a field of the right kind.
fn check_field_names(config: &EngineConfig) -> Result<()> {
    let mut validator = Validator::new();

    for name in config.tolerances.keys() {
        validator = validator.custom(&format!("tolerances.{}", name), || {
            field_of_kind(name, "tolerances need a numeric one", |field| {
                matches!(field, Field::Numeric(_))
            })
        });
    }
    for name in config.synonyms.scalar.keys() {
        validator = validator.custom(&format!("synonyms.scalar.{}", name), || {
            field_of_kind(name, "scalar synonyms need a text one", |field| {
                matches!(field, Field::Text(_) | Field::Location)
            })
        });
    }
    for name in config.synonyms.array.keys() {
        validator = validator.custom(&format!("synonyms.array.{}", name), || {
            field_of_kind(name, "array synonyms need a list one", |field| {
                matches!(field, Field::List(_))
            })
        });
    }

    validator
        .validate()
        .to_result_as(ErrorCode::ConfigValidationError)
}

/// `None` when `name` is a catalog field accepted by `accepts`.
fn field_of_kind(name: &str, needed: &str, accepts: impl Fn(Field) -> bool) -> Option<String> {
    match name.parse::<Field>() {
        Ok(field) if accepts(field) => None,
        Ok(field) => Some(format!("{} is a {:?} field, {}", field, field.kind(), needed)),
        Err(e) => Some(e.message),
    }
}

fn table_error(err: SearchError) -> Error {
    Error::new(ErrorCode::InvalidConfigValue, err.to_string())
        .with_context(format!("matcher table error {}", err.code() as u32))
        .with_source(err)
}

fn geo_error(err: GeoError) -> Error {
    Error::new(ErrorCode::InvalidConfigValue, err.to_string())
        .with_context(format!("geography table error {}", err.code() as u32))
        .with_source(err)
}
