//! Geographic hierarchy for widening location constraints.
//!
//! This crate provides:
//! - Neighborhood -> parent city resolution
//! - City -> ordered metro-area city lists
//! - Case- and whitespace-insensitive lookups
//!
//! # Example
//!
//! ```
//! use nestfind_geo::GeographicHierarchy;
//!
//! let hierarchy = GeographicHierarchy::new(
//!     vec![("Yorkville".to_string(), "Toronto".to_string())],
//!     Vec::<(String, Vec<String>)>::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(hierarchy.resolve("yorkville"), "Toronto");
//! assert_eq!(hierarchy.resolve("Mars City"), "Mars City");
//! ```

mod error;
mod hierarchy;

pub use error::{GeoError, GeoErrorCode, Result};
pub use hierarchy::{fold_key, Expansion, GeographicHierarchy};
