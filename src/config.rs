use crate::cli::{ColorMode, OutputFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Unknown saved filter '{0}'. Define it under [filters] in the config file")]
    UnknownFilter(String),
}

/// Settings read from the TOML config file
///
/// ```toml
/// color = "never"
/// format = "text"
/// line_numbers = true
///
/// [filters]
/// errors = "?ERROR ?FATAL"
/// noisy = "-DEBUG -\"health check\""
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub color: ColorMode,
    pub format: OutputFormat,
    pub line_numbers: bool,
    /// Named filter patterns usable with `--saved NAME`
    pub filters: BTreeMap<String, String>,
}

impl FilterConfig {
    /// Look up a named pattern from the `[filters]` table
    pub fn saved_filter(&self, name: &str) -> Result<&str, ConfigError> {
        self.filters
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::UnknownFilter(name.to_string()))
    }
}

/// Load the config file at `path`, or the defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<FilterConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<FilterConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<FilterConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static FilterConfig {
    static DEFAULT_CONFIG: LazyLock<FilterConfig> = LazyLock::new(FilterConfig::default);
    &DEFAULT_CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg: FilterConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.color, ColorMode::Auto);
        assert_eq!(cfg.format, OutputFormat::Text);
        assert!(!cfg.line_numbers);
        assert!(cfg.filters.is_empty());
    }

    #[test]
    fn test_saved_filters() {
        let cfg: FilterConfig = toml::from_str(
            r#"
            color = "never"
            format = "json"

            [filters]
            errors = "?ERROR ?FATAL"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.color, ColorMode::Never);
        assert_eq!(cfg.format, OutputFormat::Json);
        assert_eq!(cfg.saved_filter("errors").unwrap(), "?ERROR ?FATAL");
        assert!(matches!(
            cfg.saved_filter("missing"),
            Err(ConfigError::UnknownFilter(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let result = toml::from_str::<FilterConfig>(r#"color = "sometimes""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_path_returns_defaults() {
        let cfg = load_config(None).unwrap();
        assert!(cfg.filters.is_empty());
    }
}
