//! Core utilities shared by the nestfind crates
//!
//! This crate provides:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based engine configuration with defaults
//! - **Validation**: fluent checks that fail fast on malformed tables
//!
//! # Example
//!
//! ```rust
//! use nestfind_core::config::Config;
//!
//! let config = Config::from_toml("min_results = 5").unwrap();
//! assert_eq!(config.schema.min_results, 5);
//! assert_eq!(config.schema.popular_locations[0], "Toronto");
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, EngineConfig};
    pub use crate::error::{Error, ErrorCode, Result, ResultExt};
    pub use crate::validation::{ValidationResult, Validator};
}
