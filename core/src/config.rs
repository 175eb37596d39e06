//! Configuration for Green
//!
//! Values are layered, later sources winning:
//! 1. Built-in defaults
//! 2. A TOML file (`green.toml` in the working directory, or an explicit path)
//! 3. Environment variables `GREEN_<SECTION>__<KEY>`, e.g. `GREEN_RUNTIME__MAX_CALL_DEPTH`
//! 4. Explicit overrides passed to the builder

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_FILE: &str = "green";
const ENV_PREFIX: &str = "GREEN";

/// Upper bound accepted for `runtime.max_call_depth`
pub const MAX_CALL_DEPTH: usize = 100_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Maximum nesting of user function calls
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,

    /// Record `@process` events while running
    #[serde(default = "default_trace_process")]
    pub trace_process: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

pub fn default_max_call_depth() -> usize {
    256
}

fn default_trace_process() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_call_depth: default_max_call_depth(),
            trace_process: default_trace_process(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load from the default file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.runtime.max_call_depth == 0 {
            return Err(ConfigError::Invalid(
                "runtime.max_call_depth must be at least 1".to_string(),
            ));
        }
        if self.runtime.max_call_depth > MAX_CALL_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "runtime.max_call_depth must be at most {}",
                MAX_CALL_DEPTH
            )));
        }
        Ok(())
    }
}

/// Builder for loading a [`Config`] with explicit overrides
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    max_call_depth: Option<usize>,
    trace_process: Option<bool>,
    log_level: Option<String>,
    skip_env: bool,
}

impl ConfigBuilder {
    /// Config file to read instead of `green.toml`; the file must exist
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn trace_process(mut self, enabled: Option<bool>) -> Self {
        self.trace_process = enabled;
        self
    }

    pub fn log_level(mut self, level: Option<String>) -> Self {
        self.log_level = level;
        self
    }

    /// Ignore `GREEN_*` environment variables
    pub fn skip_env(mut self, skip: bool) -> Self {
        self.skip_env = skip;
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let defaults = Config::default();

        let mut builder = ::config::Config::builder()
            .set_default("runtime.max_call_depth", defaults.runtime.max_call_depth as i64)?
            .set_default("runtime.trace_process", defaults.runtime.trace_process)?
            .set_default("logging.level", defaults.logging.level)?;

        builder = match &self.config_path {
            Some(path) => builder.add_source(::config::File::from(path.as_path()).required(true)),
            None => builder.add_source(::config::File::with_name(DEFAULT_FILE).required(false)),
        };

        if !self.skip_env {
            builder = builder.add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        builder = builder
            .set_override_option("runtime.max_call_depth", self.max_call_depth.map(|d| d as i64))?
            .set_override_option("runtime.trace_process", self.trace_process)?
            .set_override_option("logging.level", self.log_level)?;

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("green-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.runtime.max_call_depth, 256);
        assert!(config.runtime.trace_process);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_builder_without_sources_matches_defaults() {
        let config = Config::builder()
            .config_path(Some(temp_file("")))
            .skip_env(true)
            .build()
            .unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_file_values() {
        let path = temp_file(
            r#"
[runtime]
max_call_depth = 32
trace_process = false

[logging]
level = "debug"
"#,
        );
        let config = Config::builder()
            .config_path(Some(path.clone()))
            .skip_env(true)
            .build()
            .unwrap();
        fs::remove_file(path).ok();

        assert_eq!(config.runtime.max_call_depth, 32);
        assert!(!config.runtime.trace_process);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_overrides_beat_file() {
        let path = temp_file("[runtime]\nmax_call_depth = 32\n");
        let config = Config::builder()
            .config_path(Some(path.clone()))
            .max_call_depth(Some(8))
            .trace_process(Some(false))
            .skip_env(true)
            .build()
            .unwrap();
        fs::remove_file(path).ok();

        assert_eq!(config.runtime.max_call_depth, 8);
        assert!(!config.runtime.trace_process);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path =
            std::env::temp_dir().join(format!("green-missing-{}.toml", uuid::Uuid::new_v4()));
        let result = Config::builder()
            .config_path(Some(path))
            .skip_env(true)
            .build();
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_zero_call_depth_rejected() {
        let result = Config::builder()
            .config_path(Some(temp_file("")))
            .max_call_depth(Some(0))
            .skip_env(true)
            .build();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_call_depth_above_maximum_rejected() {
        let result = Config::builder()
            .config_path(Some(temp_file("")))
            .max_call_depth(Some(MAX_CALL_DEPTH + 1))
            .skip_env(true)
            .build();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let config = Config::builder()
            .config_path(Some(temp_file("")))
            .max_call_depth(Some(MAX_CALL_DEPTH))
            .skip_env(true)
            .build()
            .unwrap();
        assert_eq!(config.runtime.max_call_depth, MAX_CALL_DEPTH);
    }
}
