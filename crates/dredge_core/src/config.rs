use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PatternError;
use crate::pattern::Pattern;

/// Project-level configuration loaded from `.dredge.toml`.
///
/// Controls the cache location, diff path exclusions, the rate-limit retry
/// budget, and extra detection patterns appended to the built-in set. All
/// fields are optional and default to permissive values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for per-repository caches. Defaults to the platform
    /// cache directory when unset.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Glob patterns for diff file paths to exclude from scanning.
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Maximum attempts per diff request when rate limited.
    #[serde(default)]
    pub max_retries: Option<u32>,

    /// Extra detection patterns appended to the built-in set.
    #[serde(default)]
    pub patterns: Vec<CustomPattern>,
}

/// A user-defined detection pattern declared in `.dredge.toml`.
///
/// Custom patterns are compiled at startup and participate in scanning
/// after the built-in set, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPattern {
    /// Name reported with findings.
    pub name: String,
    /// Regular expression used to match secrets in added lines.
    pub regex: String,
}

impl CustomPattern {
    /// Compiles this definition into a `Pattern` ready for scanning.
    ///
    /// Returns `PatternError::InvalidRegex` if the regex is malformed.
    pub fn compile(&self) -> Result<Pattern, PatternError> {
        Pattern::compile(&self.name, &self.regex)
    }
}

impl Config {
    /// Creates a default configuration with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a `.dredge.toml` file.
    ///
    /// Returns the default configuration if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Compiles all user-defined patterns into `Pattern` instances.
    ///
    /// Fails on the first pattern whose regex is invalid.
    pub fn compile_custom_patterns(&self) -> Result<Vec<Pattern>, PatternError> {
        self.patterns.iter().map(CustomPattern::compile).collect()
    }
}

/// Errors that can occur when reading or parsing a `.dredge.toml`
/// configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read from disk.
    #[error("failed to read config '{path}': {source}")]
    Read {
        /// Path to the config file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file contained invalid TOML or unexpected values.
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        /// Path to the config file that could not be parsed.
        path: PathBuf,
        /// The underlying TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn config_default_initialises_with_empty_collections() {
        let config = Config::default();
        assert!(config.cache_dir.is_none());
        assert!(config.exclude_paths.is_empty());
        assert!(config.max_retries.is_none());
        assert!(config.patterns.is_empty());
    }

    #[test]
    fn from_toml_parses_cache_dir_and_retries() {
        let config = Config::from_toml(
            r#"
            cache_dir = "/var/cache/dredge"
            max_retries = 8
        "#,
        )
        .unwrap();

        assert_eq!(config.cache_dir, Some(PathBuf::from("/var/cache/dredge")));
        assert_eq!(config.max_retries, Some(8));
    }

    #[test]
    fn from_toml_parses_exclude_paths_array() {
        let config = Config::from_toml(r#"exclude_paths = ["vendor/**", "*.lock"]"#).unwrap();
        assert_eq!(config.exclude_paths, vec!["vendor/**", "*.lock"]);
    }

    #[test]
    fn from_toml_parses_custom_patterns_in_order() {
        let config = Config::from_toml(
            r#"
            [[patterns]]
            name = "internal_token"
            regex = 'INT_[A-Z0-9]{20}'

            [[patterns]]
            name = "legacy_key"
            regex = 'LEG-[0-9]{12}'
        "#,
        )
        .unwrap();

        assert_eq!(config.patterns.len(), 2);
        assert_eq!(config.patterns[0].name, "internal_token");
        assert_eq!(config.patterns[1].name, "legacy_key");
    }

    #[test]
    fn from_toml_returns_defaults_for_empty_string() {
        let config = Config::from_toml("").unwrap();
        assert!(config.patterns.is_empty());
    }

    #[test]
    fn from_toml_rejects_malformed_toml_syntax() {
        assert!(Config::from_toml("this is { not valid toml").is_err());
    }

    #[test]
    fn load_returns_default_config_when_file_not_found() {
        let config = Config::load(Path::new("/nonexistent/path/.dredge.toml")).unwrap();
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn load_parses_existing_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_retries = 3").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.max_retries, Some(3));
    }

    #[test]
    fn compile_custom_patterns_compiles_all_patterns() {
        let config = Config::from_toml(
            r#"
            [[patterns]]
            name = "a"
            regex = 'A'

            [[patterns]]
            name = "b"
            regex = 'B'
        "#,
        )
        .unwrap();

        let patterns = config.compile_custom_patterns().unwrap();
        assert_eq!(patterns.len(), 2);
    }

    #[test]
    fn compile_custom_patterns_fails_fast_on_invalid_regex() {
        let config = Config::from_toml(
            r#"
            [[patterns]]
            name = "valid"
            regex = 'OK'

            [[patterns]]
            name = "invalid"
            regex = '[broken'
        "#,
        )
        .unwrap();

        assert!(config.compile_custom_patterns().is_err());
    }

    #[test]
    fn config_error_includes_path_in_display() {
        let error = ConfigError::Read {
            path: PathBuf::from("/etc/dredge.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        assert!(error.to_string().contains("/etc/dredge.toml"));
    }
}
