//! Structured search criteria.
//!
//! `SearchCriteria` groups values by field kind so boolean, numeric, string
//! and list fields are checked at compile time. Any subset of the catalog may
//! be present. Criteria are never changed in place by the engine: each
//! fallback level derives a new value.

use crate::fields::{BoolField, Field, ListField, NumericField, TextField, LOCATION};
use nestfind_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Requested location: one place, or an ordered list of places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Place(String),
    Area(Vec<String>),
}

impl Location {
    /// Every place named, in priority order.
    pub fn places(&self) -> Vec<&str> {
        match self {
            Location::Place(place) => vec![place.as_str()],
            Location::Area(places) => places.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Place(place) => f.write_str(place),
            Location::Area(places) => f.write_str(&places.join(", ")),
        }
    }
}

/// A numeric target or an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Exact(f64),
    Range { min: f64, max: f64 },
}

impl NumericValue {
    /// Build a range, swapping reversed bounds.
    pub fn range(a: f64, b: f64) -> Self {
        NumericValue::Range {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// True when `value` satisfies the target or falls inside the range.
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            NumericValue::Exact(target) => target == value,
            NumericValue::Range { min, max } => value >= min && value <= max,
        }
    }

    /// The bound closest to `value` (the target itself for exact values).
    pub fn nearest(&self, value: f64) -> f64 {
        match *self {
            NumericValue::Exact(target) => target,
            NumericValue::Range { min, max } => value.clamp(min, max),
        }
    }

    /// Widen symmetrically: an exact value becomes `[x - margin, x + margin]`.
    pub fn widen_by(&self, margin: f64) -> Self {
        match *self {
            NumericValue::Exact(target) => NumericValue::range(target - margin, target + margin),
            NumericValue::Range { min, max } => NumericValue::range(min - margin, max + margin),
        }
    }

    /// Multiply the lower bound (or the exact target) by `factor`.
    pub fn scale_lower(&self, factor: f64) -> Self {
        match *self {
            NumericValue::Exact(target) => NumericValue::Exact(target * factor),
            NumericValue::Range { min, max } => NumericValue::range(min * factor, max),
        }
    }

    /// Multiply the upper bound (or the exact target) by `factor`.
    pub fn scale_upper(&self, factor: f64) -> Self {
        match *self {
            NumericValue::Exact(target) => NumericValue::Exact(target * factor),
            NumericValue::Range { min, max } => NumericValue::range(min, max * factor),
        }
    }

    /// Raise a lower bound that fell below `floor`.
    pub fn clamp_min(&self, floor: f64) -> Self {
        match *self {
            NumericValue::Exact(target) => NumericValue::Exact(target.max(floor)),
            NumericValue::Range { min, max } => NumericValue::range(min.max(floor), max.max(floor)),
        }
    }
}

/// Any subset of the supported search fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    flags: BTreeMap<BoolField, bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    numbers: BTreeMap<NumericField, NumericValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    texts: BTreeMap<TextField, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    lists: BTreeMap<ListField, Vec<String>>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, place: impl Into<String>) -> Self {
        self.location = Some(Location::Place(place.into()));
        self
    }

    pub fn with_area<I, S>(mut self, places: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.location = Some(Location::Area(places.into_iter().map(Into::into).collect()));
        self
    }

    pub fn with_flag(mut self, field: BoolField, value: bool) -> Self {
        self.flags.insert(field, value);
        self
    }

    pub fn with_number(mut self, field: NumericField, value: f64) -> Self {
        self.numbers.insert(field, NumericValue::Exact(value));
        self
    }

    pub fn with_range(mut self, field: NumericField, min: f64, max: f64) -> Self {
        self.numbers.insert(field, NumericValue::range(min, max));
        self
    }

    pub fn with_text(mut self, field: TextField, value: impl Into<String>) -> Self {
        self.texts.insert(field, value.into());
        self
    }

    pub fn with_list<I, S>(mut self, field: ListField, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists.insert(field, items.into_iter().map(Into::into).collect());
        self
    }

    /// Build criteria from a JSON object of `field -> value`.
    ///
    /// Values may be booleans, numbers, `{"min", "max"}` objects or
    /// `[min, max]` pairs, strings, or string lists. `null` means absent.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::invalid_criteria("criteria must be a JSON object"))?;

        let mut criteria = Self::new();
        for (key, value) in object {
            if value.is_null() {
                continue;
            }
            match key.parse::<Field>()? {
                Field::Location => {
                    let location = Location::deserialize(value).map_err(|_| {
                        Error::field_kind_mismatch(LOCATION, "string or string list")
                    })?;
                    criteria.location = Some(location);
                }
                Field::Bool(field) => {
                    let flag = value
                        .as_bool()
                        .ok_or_else(|| Error::field_kind_mismatch(key, "boolean"))?;
                    criteria.flags.insert(field, flag);
                }
                Field::Numeric(field) => {
                    criteria.numbers.insert(field, parse_numeric(key, value)?);
                }
                Field::Text(field) => {
                    let text = value
                        .as_str()
                        .ok_or_else(|| Error::field_kind_mismatch(key, "string"))?;
                    criteria.texts.insert(field, text.to_string());
                }
                Field::List(field) => {
                    let items = Vec::<String>::deserialize(value)
                        .map_err(|_| Error::field_kind_mismatch(key, "string list"))?;
                    criteria.lists.insert(field, items);
                }
            }
        }
        Ok(criteria)
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn flag(&self, field: BoolField) -> Option<bool> {
        self.flags.get(&field).copied()
    }

    pub fn number(&self, field: NumericField) -> Option<NumericValue> {
        self.numbers.get(&field).copied()
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        self.texts.get(&field).map(String::as_str)
    }

    pub fn list(&self, field: ListField) -> Option<&[String]> {
        self.lists.get(&field).map(Vec::as_slice)
    }

    pub fn flags(&self) -> impl Iterator<Item = (BoolField, bool)> + '_ {
        self.flags.iter().map(|(f, v)| (*f, *v))
    }

    pub fn numbers(&self) -> impl Iterator<Item = (NumericField, NumericValue)> + '_ {
        self.numbers.iter().map(|(f, v)| (*f, *v))
    }

    pub fn texts(&self) -> impl Iterator<Item = (TextField, &str)> + '_ {
        self.texts.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn lists(&self) -> impl Iterator<Item = (ListField, &[String])> + '_ {
        self.lists.iter().map(|(f, v)| (*f, v.as_slice()))
    }

    /// Every present field, location first, then by kind in catalog order.
    pub fn fields(&self) -> Vec<Field> {
        self.location
            .iter()
            .map(|_| Field::Location)
            .chain(self.flags.keys().map(|f| Field::Bool(*f)))
            .chain(self.numbers.keys().map(|f| Field::Numeric(*f)))
            .chain(self.texts.keys().map(|f| Field::Text(*f)))
            .chain(self.lists.keys().map(|f| Field::List(*f)))
            .collect()
    }

    /// Wire names of every present field, in `fields()` order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields().iter().map(|f| f.as_str().to_string()).collect()
    }

    pub fn contains(&self, field: Field) -> bool {
        match field {
            Field::Location => self.location.is_some(),
            Field::Bool(f) => self.flags.contains_key(&f),
            Field::Numeric(f) => self.numbers.contains_key(&f),
            Field::Text(f) => self.texts.contains_key(&f),
            Field::List(f) => self.lists.contains_key(&f),
        }
    }

    pub fn len(&self) -> usize {
        usize::from(self.location.is_some())
            + self.flags.len()
            + self.numbers.len()
            + self.texts.len()
            + self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Derivation helpers, applied to owned copies only.

    pub(crate) fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    pub(crate) fn set_number(&mut self, field: NumericField, value: NumericValue) {
        self.numbers.insert(field, value);
    }

    pub(crate) fn remove(&mut self, field: Field) -> bool {
        match field {
            Field::Location => self.location.take().is_some(),
            Field::Bool(f) => self.flags.remove(&f).is_some(),
            Field::Numeric(f) => self.numbers.remove(&f).is_some(),
            Field::Text(f) => self.texts.remove(&f).is_some(),
            Field::List(f) => self.lists.remove(&f).is_some(),
        }
    }
}

fn parse_numeric(key: &str, value: &Value) -> Result<NumericValue> {
    let number = |v: &Value| v.as_f64().filter(|n| n.is_finite());

    if let Some(n) = number(value) {
        return Ok(NumericValue::Exact(n));
    }
    if let Some([min, max]) = value.as_array().map(Vec::as_slice) {
        if let (Some(min), Some(max)) = (number(min), number(max)) {
            return Ok(NumericValue::range(min, max));
        }
    }
    if let Some(object) = value.as_object() {
        let min = object.get("min").and_then(number);
        let max = object.get("max").and_then(number);
        if let (Some(min), Some(max)) = (min, max) {
            return Ok(NumericValue::range(min, max));
        }
    }
    Err(Error::field_kind_mismatch(key, "number or numeric range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestfind_core::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_builder_and_accessors() {
        let criteria = SearchCriteria::new()
            .with_location("Toronto")
            .with_number(NumericField::Bedrooms, 2.0)
            .with_flag(BoolField::Gym, true)
            .with_text(TextField::PropertyType, "condo")
            .with_list(ListField::Amenities, ["Pool"]);

        assert_eq!(criteria.len(), 5);
        assert_eq!(criteria.location(), Some(&Location::Place("Toronto".into())));
        assert_eq!(criteria.number(NumericField::Bedrooms), Some(NumericValue::Exact(2.0)));
        assert_eq!(criteria.flag(BoolField::Gym), Some(true));
        assert_eq!(criteria.text(TextField::PropertyType), Some("condo"));
        assert_eq!(criteria.list(ListField::Amenities).map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_field_names_order() {
        let criteria = SearchCriteria::new()
            .with_list(ListField::Amenities, ["Pool"])
            .with_flag(BoolField::Rooftop, true)
            .with_flag(BoolField::Gym, true)
            .with_location("Toronto");
        assert_eq!(criteria.field_names(), vec!["location", "gym", "rooftop", "amenities"]);
    }

    #[test]
    fn test_from_json_all_kinds() {
        let criteria = SearchCriteria::from_json(&json!({
            "location": "Yorkville",
            "bedrooms": 3,
            "max_price": {"min": 0, "max": 900000},
            "square_feet": [800, 600],
            "pets_allowed": true,
            "view": "lake",
            "amenities": ["Gym", "Pool"],
            "exposure": null,
        }))
        .unwrap();

        assert_eq!(criteria.len(), 7);
        assert_eq!(
            criteria.number(NumericField::SquareFeet),
            Some(NumericValue::range(600.0, 800.0))
        );
        assert!(!criteria.contains(Field::Text(TextField::Exposure)));
    }

    #[test]
    fn test_from_json_area() {
        let criteria =
            SearchCriteria::from_json(&json!({"location": ["Toronto", "Markham"]})).unwrap();
        assert_eq!(criteria.location().unwrap().places(), vec!["Toronto", "Markham"]);
    }

    #[test]
    fn test_from_json_unknown_field() {
        let err = SearchCriteria::from_json(&json!({"helipad": true})).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownField);
    }

    #[test]
    fn test_from_json_kind_mismatch() {
        let err = SearchCriteria::from_json(&json!({"gym": "yes"})).unwrap_err();
        assert_eq!(err.code, ErrorCode::FieldKindMismatch);
        let err = SearchCriteria::from_json(&json!({"bedrooms": "two"})).unwrap_err();
        assert_eq!(err.code, ErrorCode::FieldKindMismatch);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(SearchCriteria::from_json(&json!(["Toronto"])).is_err());
    }

    #[test]
    fn test_numeric_value_helpers() {
        assert_eq!(NumericValue::Exact(3.0).widen_by(1.0), NumericValue::range(2.0, 4.0));
        assert_eq!(NumericValue::range(5.0, 1.0), NumericValue::Range { min: 1.0, max: 5.0 });
        assert_eq!(
            NumericValue::Exact(0.0).widen_by(1.0).clamp_min(0.0),
            NumericValue::range(0.0, 1.0)
        );
        let range = NumericValue::range(10.0, 20.0);
        assert_eq!(range.scale_upper(2.0), NumericValue::range(10.0, 40.0));
        assert_eq!(range.scale_lower(0.5), NumericValue::range(5.0, 20.0));
        assert_eq!(NumericValue::Exact(10.0).scale_lower(0.5), NumericValue::Exact(5.0));
        assert!(NumericValue::range(2.0, 4.0).contains(3.0));
        assert_eq!(NumericValue::range(2.0, 4.0).nearest(7.0), 4.0);
    }

    #[test]
    fn test_serde_round_trip_keeps_kinds() {
        let criteria = SearchCriteria::new()
            .with_area(["Toronto", "Markham"])
            .with_range(NumericField::Bedrooms, 2.0, 4.0)
            .with_flag(BoolField::PetsAllowed, true);
        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["bedrooms"], serde_json::Value::Null);
        assert_eq!(json["numbers"]["bedrooms"], json!({"min": 2.0, "max": 4.0}));
        let back: SearchCriteria = serde_json::from_value(json).unwrap();
        assert_eq!(back, criteria);
    }

    #[test]
    fn test_remove_on_copy_leaves_original() {
        let original = SearchCriteria::new().with_flag(BoolField::Gym, true);
        let mut derived = original.clone();
        assert!(derived.remove(Field::Bool(BoolField::Gym)));
        assert_eq!(original.len(), 1);
        assert!(derived.is_empty());
    }
}
