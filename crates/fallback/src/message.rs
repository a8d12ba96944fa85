//! User-facing result messages.
//!
//! One Handlebars template per match level. Templates see `count`,
//! `location` (empty when none applies), `expanded` (the widened location,
//! empty when the location was not widened), `relaxed` (humanised, joined
//! field names) and `level`, plus a `plural` helper:
//! `{{plural count "property" "properties"}}`.

use crate::level::MatchLevel;
use handlebars::{handlebars_helper, no_escape, Handlebars};
use nestfind_core::{Error, Result};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

handlebars_helper!(plural: |count: u64, one: str, many: str| {
    if count == 1 { one.to_string() } else { many.to_string() }
});

const EXACT: &str = concat!(
    "Found {{count}} {{plural count \"property\" \"properties\"}} matching all of your criteria",
    "{{#if location}} in {{location}}{{/if}}."
);

const RELAXED: &str = concat!(
    "Found {{count}} {{plural count \"property\" \"properties\"}}",
    "{{#if location}} in {{location}}{{/if}} after relaxing {{relaxed}}."
);

const GEOGRAPHIC_EXPANSION: &str = concat!(
    "{{#if expanded}}Nothing matched nearby, so we searched {{expanded}} ",
    "and found {{count}} {{plural count \"property\" \"properties\"}}.",
    "{{else}}Found {{count}} {{plural count \"property\" \"properties\"}} ",
    "after relaxing {{relaxed}}.{{/if}}"
);

const CRITICAL_ONLY: &str = concat!(
    "Found {{count}} {{plural count \"property\" \"properties\"}} ",
    "matching your essential requirements",
    "{{#if location}} in {{location}}{{/if}}. We relaxed {{relaxed}}."
);

const LOCATION_ONLY: &str = concat!(
    "Found {{count}} {{plural count \"property\" \"properties\"}} in {{location}} ",
    "without your other filters."
);

const POPULAR: &str = concat!(
    "{{#if count}}We couldn't find a match, so here {{plural count \"is\" \"are\"}} {{count}} ",
    "popular {{plural count \"listing\" \"listings\"}}{{#if location}} in {{location}}{{/if}}.",
    "{{else}}No properties are available right now. Please try again later.{{/if}}"
);

fn default_template(level: MatchLevel) -> &'static str {
    match level {
        MatchLevel::Exact => EXACT,
        MatchLevel::Relaxed => RELAXED,
        MatchLevel::GeographicExpansion => GEOGRAPHIC_EXPANSION,
        MatchLevel::CriticalOnly => CRITICAL_ONLY,
        MatchLevel::LocationOnly => LOCATION_ONLY,
        MatchLevel::Popular => POPULAR,
    }
}

/// Turn `in_suite_laundry` into `in suite laundry` and join as "a, b and c".
pub fn humanize_fields(fields: &[String]) -> String {
    let names: Vec<String> = fields.iter().map(|f| f.replace('_', " ")).collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn fallback_message(count: usize) -> String {
    if count == 1 {
        "Found 1 property".to_string()
    } else {
        format!("Found {} properties", count)
    }
}

/// Compiled message templates.
pub struct MessageAssembler {
    registry: Handlebars<'static>,
}

impl fmt::Debug for MessageAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageAssembler").finish_non_exhaustive()
    }
}

impl MessageAssembler {
    /// Compile the default templates with `overrides` keyed by level name.
    pub fn new(overrides: &BTreeMap<String, String>) -> Result<Self> {
        let unknown = overrides
            .keys()
            .find(|k| MatchLevel::from_name(k.as_str()).is_none());
        if let Some(unknown) = unknown {
            return Err(Error::invalid_config_value(
                &format!("messages.{}", unknown),
                format!("'{}' is not a match level", unknown),
            ));
        }

        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(no_escape);
        registry.register_helper("plural", Box::new(plural));

        for level in MatchLevel::ALL {
            let name = level.as_str();
            let template = overrides
                .get(name)
                .map(String::as_str)
                .unwrap_or_else(|| default_template(level));
            registry
                .register_template_string(name, template)
                .map_err(|e| Error::invalid_template(name, e.to_string()))?;
        }

        Ok(Self { registry })
    }

    /// Render the message for a result. Never fails.
    ///
    /// `location` is the requested place; `expanded` the widened or
    /// substituted one, which takes precedence when present.
    pub fn render(
        &self,
        level: MatchLevel,
        count: usize,
        relaxed: &[String],
        location: Option<&str>,
        expanded: Option<&str>,
    ) -> String {
        let data = json!({
            "level": level.as_str(),
            "count": count,
            "location": expanded.or(location).unwrap_or(""),
            "expanded": expanded.unwrap_or(""),
            "relaxed": humanize_fields(relaxed),
        });

        match self.registry.render(level.as_str(), &data) {
            Ok(message) => message,
            Err(e) => {
                warn!(level = level.as_str(), error = %e, "Message template failed to render");
                fallback_message(count)
            }
        }
    }
}
