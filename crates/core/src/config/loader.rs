//! Configuration file loading

use super::schema::EngineConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: EngineConfig,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults.
    ///
    /// The loaded schema is validated before it is returned.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
            load_config_file(p)?
        } else {
            EngineConfig::default()
        };

        schema.validate()?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let schema: EngineConfig = toml::from_str(content)?;
        schema.validate()?;
        Ok(Self { schema, path: None })
    }

    /// Load with defaults only (no file)
    pub fn default() -> Self {
        Self {
            schema: EngineConfig::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [".nestfind.toml", "nestfind.toml", ".config/nestfind.toml"];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<EngineConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {}: {}", path, e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse config file {}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.min_results, 10);
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
min_results = 5
popular_locations = ["Halifax", "Victoria"]

[fuzzy]
enabled = false

[tolerances]
bathrooms = 1
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.schema.min_results, 5);
        assert!(!config.schema.fuzzy.enabled);
        assert_eq!(config.schema.tolerances["bathrooms"], 1.0);
        assert_eq!(config.schema.popular_locations, vec!["Halifax", "Victoria"]);
        assert_eq!(config.path.as_deref(), Some(path));
    }

    #[test]
    fn test_config_missing_file() {
        let err = Config::load(Some("/definitely/not/here/nestfind.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_invalid_values_fail_fast() {
        let err = Config::from_toml("min_results = 0").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.is_config());
    }

    #[test]
    fn test_config_malformed_table() {
        let err = Config::from_toml("tolerances = \"wide\"").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }
}
