//! Configuration loading and schema definitions
//!
//! Construction-time tables for the fallback engine.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
