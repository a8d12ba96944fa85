//! Per-field numeric tolerances.

use crate::error::{Result, SearchError};
use std::collections::HashMap;

/// Symmetric numeric margin per field; fields without an entry require an
/// exact match.
#[derive(Debug, Clone, Default)]
pub struct ToleranceTable {
    margins: HashMap<String, f64>,
}

impl ToleranceTable {
    /// Build a table, rejecting negative or non-finite margins.
    pub fn new<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut margins = HashMap::new();
        for (field, value) in entries {
            let field = field.into();
            if !value.is_finite() || value < 0.0 {
                return Err(SearchError::InvalidTolerance { field, value });
            }
            margins.insert(field, value);
        }
        Ok(Self { margins })
    }

    /// Margin for `field`, `0.0` when the field has none.
    pub fn get(&self, field: &str) -> f64 {
        self.margins.get(field).copied().unwrap_or(0.0)
    }

    /// Field names that carry a margin.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.margins.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.margins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.margins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_defaults_to_zero() {
        let table = ToleranceTable::new([("bathrooms", 0.5)]).unwrap();
        assert_eq!(table.get("bathrooms"), 0.5);
        assert_eq!(table.get("bedrooms"), 0.0);
    }

    #[test]
    fn test_negative_margin_rejected() {
        let err = ToleranceTable::new([("floor_level", -2.0)]).unwrap_err();
        assert!(matches!(
            err,
            SearchError::InvalidTolerance { ref field, .. } if field == "floor_level"
        ));
    }

    #[test]
    fn test_nan_margin_rejected() {
        assert!(ToleranceTable::new([("square_feet", f64::NAN)]).is_err());
    }
}
