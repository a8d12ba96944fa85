//! Error handling with codes, context and recovery suggestions
//!
//! This module provides structured error types with:
//! - Error codes for programmatic handling
//! - Detailed error context
//! - Recovery suggestions
//! - Serializable error reports

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    Unknown = 1000,
    Internal = 1001,

    // IO errors (2xxx)
    IoError = 2000,
    FileNotFound = 2001,

    // Configuration errors (3xxx)
    ConfigError = 3000,
    ConfigNotFound = 3001,
    ConfigParseError = 3002,
    ConfigValidationError = 3003,
    InvalidConfigValue = 3004,
    InvalidTemplate = 3005,

    // Criteria errors (6xxx)
    ValidationError = 6000,
    InvalidCriteria = 6001,
    UnknownField = 6002,
    FieldKindMismatch = 6003,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            6 => "Criteria",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns true for errors raised while building or validating configuration
    pub fn is_config(&self) -> bool {
        self.code.code() / 1000 == 3
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    // Convenience constructors

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a nestfind.toml file or pass an explicit path")
    }

    pub fn invalid_config_value(key: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfigValue, message).with_context(format!("key: {}", key))
    }

    pub fn invalid_template(name: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidTemplate, message)
            .with_context(format!("template: {}", name))
            .with_suggestion("Check the [messages] section for unbalanced {{ }} blocks")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn invalid_criteria(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidCriteria, message)
    }

    pub fn unknown_field(name: &str) -> Self {
        Self::new(ErrorCode::UnknownField, format!("Unknown search field: {}", name))
    }

    pub fn field_kind_mismatch(name: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::FieldKindMismatch,
            format!("Field {} expects a {} value", name, expected),
        )
    }
}

/// Serializable error report for logging and API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub code_str: String,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::InvalidCriteria, format!("JSON parse error: {}", err))
            .with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::ConfigParseError.to_string(), "E3002");
        assert_eq!(ErrorCode::UnknownField.to_string(), "E6002");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::InvalidConfigValue.category(), "Configuration");
        assert_eq!(ErrorCode::InvalidCriteria.category(), "Criteria");
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::config_not_found("/etc/nestfind.toml")
            .with_context("While loading configuration");

        assert_eq!(err.code, ErrorCode::ConfigNotFound);
        assert!(err.is_config());
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_criteria_errors_are_not_config_errors() {
        assert!(!Error::unknown_field("sauna_size").is_config());
        assert!(Error::invalid_config_value("min_results", "must be positive").is_config());
    }

    #[test]
    fn test_error_report_serialization() {
        let err = Error::invalid_template("exact", "unclosed block")
            .with_context("During engine construction");

        let report = err.to_report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("E3005"));
        assert!(json.contains("Configuration"));
    }

    #[test]
    fn test_result_ext_adds_context() {
        let result: Result<()> = Err(Error::config("bad table"));
        let err = result.context("loading tolerances").unwrap_err();
        assert_eq!(err.context.as_deref(), Some("loading tolerances"));
    }
}
