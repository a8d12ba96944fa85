//! Critical-field partition and relaxation rules.
//!
//! Fields fall into three classes (plus location, which only the
//! geographic and popular levels touch):
//! - always-critical booleans, honored verbatim whenever specified
//! - critical numerics that tolerate widening (bedrooms, price, parking)
//! - everything else, which the relaxed level may loosen or drop
//!
//! Every function here takes criteria by reference and returns a new value
//! together with the wire names of the fields it dropped or widened.

use crate::criteria::{NumericValue, SearchCriteria};
use crate::fields::{BoolField, Field, NumericField, TextField};
use nestfind_core::config::RelaxationConfig;
use serde::Serialize;

/// Booleans never dropped by any relaxation.
pub const ALWAYS_CRITICAL: &[BoolField] = &[
    BoolField::WheelchairAccessible,
    BoolField::PetsAllowed,
    BoolField::SmokingAllowed,
];

/// Numerics kept, possibly widened, at the critical-only level.
pub const CRITICAL_NUMERICS: &[NumericField] = &[
    NumericField::Bedrooms,
    NumericField::MinPrice,
    NumericField::MaxPrice,
    NumericField::ParkingSpaces,
];

/// Class of a field under the relaxation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClass {
    Location,
    AlwaysCritical,
    CriticalWithTolerance,
    NiceToHave,
}

/// Classify a field.
pub fn classify(field: Field) -> FieldClass {
    match field {
        Field::Location => FieldClass::Location,
        Field::Bool(f) if ALWAYS_CRITICAL.contains(&f) => FieldClass::AlwaysCritical,
        Field::Numeric(f) if CRITICAL_NUMERICS.contains(&f) => FieldClass::CriticalWithTolerance,
        _ => FieldClass::NiceToHave,
    }
}

/// Criteria derived by one relaxation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation {
    pub criteria: SearchCriteria,
    /// Wire names of fields dropped or widened, in catalog order
    pub relaxed: Vec<String>,
}

/// Relaxation rules with their configured margins.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationPolicy {
    floor_margin: f64,
    fee_multiplier: f64,
    bedroom_margin: f64,
    price_fraction: f64,
}

impl Default for RelaxationPolicy {
    fn default() -> Self {
        Self::from_config(&RelaxationConfig::default())
    }
}

impl RelaxationPolicy {
    pub fn from_config(config: &RelaxationConfig) -> Self {
        Self {
            floor_margin: config.floor_margin,
            fee_multiplier: config.fee_multiplier,
            bedroom_margin: config.bedroom_margin,
            price_fraction: config.price_percent / 100.0,
        }
    }

    /// Loosen nice-to-have fields only.
    ///
    /// Non-critical booleans are dropped, the floor target is widened, view
    /// and exposure are dropped and the maintenance-fee ceiling is scaled.
    /// Other nice-to-have fields are left for the critical-only level.
    pub fn relax_nice_to_have(&self, criteria: &SearchCriteria) -> Relaxation {
        let mut relaxed = criteria.clone();
        let mut names = Vec::new();

        for (field, _) in criteria.flags() {
            if classify(Field::Bool(field)) == FieldClass::NiceToHave {
                relaxed.remove(Field::Bool(field));
                names.push(field.as_str().to_string());
            }
        }

        if let Some(floor) = criteria.number(NumericField::FloorLevel) {
            let widened = floor.widen_by(self.floor_margin);
            if widened != floor {
                relaxed.set_number(NumericField::FloorLevel, widened);
                names.push(NumericField::FloorLevel.as_str().to_string());
            }
        }

        for field in [TextField::View, TextField::Exposure] {
            if relaxed.remove(Field::Text(field)) {
                names.push(field.as_str().to_string());
            }
        }

        if let Some(fee) = criteria.number(NumericField::MaxMaintenanceFee) {
            let widened = fee.scale_upper(self.fee_multiplier);
            if widened != fee {
                relaxed.set_number(NumericField::MaxMaintenanceFee, widened);
                names.push(NumericField::MaxMaintenanceFee.as_str().to_string());
            }
        }

        Relaxation {
            criteria: relaxed,
            relaxed: names,
        }
    }

    /// Keep location, always-critical booleans and widened critical numerics.
    pub fn critical_only(&self, criteria: &SearchCriteria) -> Relaxation {
        let mut kept = SearchCriteria::new();
        if let Some(location) = criteria.location() {
            kept.set_location(location.clone());
        }
        for (field, value) in criteria.flags() {
            if ALWAYS_CRITICAL.contains(&field) {
                kept = kept.with_flag(field, value);
            }
        }
        for (field, value) in criteria.numbers() {
            if let Some(widened) = self.widen_critical(field, value) {
                kept.set_number(field, widened);
            }
        }

        let mut names = Vec::new();
        for field in criteria.fields() {
            let unchanged = match field {
                Field::Numeric(f) => kept.number(f) == criteria.number(f),
                _ => kept.contains(field),
            };
            if !unchanged {
                names.push(field.as_str().to_string());
            }
        }

        Relaxation {
            criteria: kept,
            relaxed: names,
        }
    }

    /// Keep only the location. `None` when there is no location to keep.
    pub fn location_only(&self, criteria: &SearchCriteria) -> Option<Relaxation> {
        let location = criteria.location()?;
        let mut kept = SearchCriteria::new();
        kept.set_location(location.clone());

        let relaxed = criteria
            .fields()
            .into_iter()
            .filter(|f| *f != Field::Location)
            .map(|f| f.as_str().to_string())
            .collect();

        Some(Relaxation {
            criteria: kept,
            relaxed,
        })
    }

    fn widen_critical(&self, field: NumericField, value: NumericValue) -> Option<NumericValue> {
        match field {
            NumericField::Bedrooms => Some(value.widen_by(self.bedroom_margin).clamp_min(0.0)),
            NumericField::MinPrice => Some(value.scale_lower(1.0 - self.price_fraction)),
            NumericField::MaxPrice => Some(value.scale_upper(1.0 + self.price_fraction)),
            NumericField::ParkingSpaces => Some(value),
            _ => None,
        }
    }
}

/// Append names not already present, keeping first-seen order.
pub(crate) fn merge_relaxed(
    previous: &[String],
    added: impl IntoIterator<Item = String>,
) -> Vec<String> {
    let mut merged = previous.to_vec();
    for name in added {
        if !merged.contains(&name) {
            merged.push(name);
        }
    }
    merged
}
