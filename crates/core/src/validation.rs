//! Configuration validation
//!
//! Fluent checks that collect every problem in a configuration before
//! failing, so a malformed file reports all bad keys at once.
//!
//! # Example
//!
//! ```rust
//! use nestfind_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .positive("min_results", 10.0)
//!     .range("fuzzy.threshold", 0.8, 0.0, 1.0)
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use crate::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};

/// Validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Convert to Result type
    pub fn to_result(self) -> Result<()> {
        self.to_result_as(ErrorCode::ValidationError)
    }

    /// Convert to Result type, reporting failures under `code`
    pub fn to_result_as(self, code: ErrorCode) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            Err(Error::new(
                code,
                format!("Validation failed: {}", messages.join("; ")),
            ))
        }
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate that a field is not empty
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("non-empty value".to_string()),
                actual: Some("empty".to_string()),
            });
        }
        self
    }

    /// Validate that a list has at least one entry
    pub fn non_empty<T>(mut self, field: &str, values: &[T]) -> Self {
        if values.is_empty() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Must contain at least one entry".to_string(),
                code: "NON_EMPTY".to_string(),
                expected: Some(">= 1 entries".to_string()),
                actual: Some("0 entries".to_string()),
            });
        }
        self
    }

    /// Validate a numeric range
    pub fn range<T: PartialOrd + std::fmt::Display>(
        mut self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        if value < min || value > max {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be between {} and {}", min, max),
                code: "RANGE".to_string(),
                expected: Some(format!("{} - {}", min, max)),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Validate that a number is strictly greater than zero
    pub fn positive(mut self, field: &str, value: f64) -> Self {
        if !(value > 0.0) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Must be positive".to_string(),
                code: "POSITIVE".to_string(),
                expected: Some("> 0".to_string()),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Validate that a number is zero or greater
    pub fn non_negative(mut self, field: &str, value: f64) -> Self {
        if !(value >= 0.0) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Must not be negative".to_string(),
                code: "NON_NEGATIVE".to_string(),
                expected: Some(">= 0".to_string()),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Add a custom validation
    pub fn custom<F>(mut self, field: &str, f: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        if let Some(message) = f() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message,
                code: "CUSTOM".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Add a warning (non-blocking)
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "WARNING".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_validation() {
        let result = Validator::new().required("name", "  ").validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_non_empty_validation() {
        let empty: Vec<String> = Vec::new();
        let result = Validator::new().non_empty("popular_locations", &empty).validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "NON_EMPTY");
    }

    #[test]
    fn test_range_validation() {
        let result = Validator::new().range("threshold", 1.5, 0.0, 1.0).validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "RANGE");
    }

    #[test]
    fn test_positive_rejects_zero_and_nan() {
        let result = Validator::new()
            .positive("a", 0.0)
            .positive("b", f64::NAN)
            .positive("c", 3.0)
            .validate();
        assert_eq!(result.errors().len(), 2);
    }

    #[test]
    fn test_non_negative_validation() {
        let result = Validator::new().non_negative("tolerance", -1.0).validate();
        assert_eq!(result.errors()[0].code, "NON_NEGATIVE");
    }

    #[test]
    fn test_custom_validation() {
        let result = Validator::new()
            .custom("tolerances.sauna_size", || Some("Unknown field".to_string()))
            .validate();
        assert_eq!(result.errors()[0].to_string(), "tolerances.sauna_size: Unknown field");
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let result = Validator::new().warn_if("fuzzy", true, "ignored").validate();
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn test_to_result_as_uses_code() {
        let err = Validator::new()
            .positive("min_results", -1.0)
            .validate()
            .to_result_as(ErrorCode::ConfigValidationError)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("min_results"));
    }

    #[test]
    fn test_chained_validation() {
        let result = Validator::new()
            .required("name", "Toronto")
            .range("count", 5, 1, 10)
            .positive("cap", 20.0)
            .validate();
        assert!(result.is_valid());
    }
}
