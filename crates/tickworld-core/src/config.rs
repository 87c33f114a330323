//! Configuration loading and typed config structures for Tickworld.
//!
//! The canonical configuration lives in `tickworld-config.yaml` at the
//! project root. Every section is optional; missing sections and fields fall
//! back to the defaults below.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

/// Environment variable that overrides `world.seed`.
pub const SEED_ENV_VAR: &str = "TICKWORLD_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `tickworld-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Grid dimensions and the base seed.
    #[serde(default)]
    pub world: WorldConfig,

    /// Step budgets and harness size.
    #[serde(default)]
    pub run: RunConfig,

    /// Vacuum domain parameters.
    #[serde(default)]
    pub vacuum: VacuumConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `TICKWORLD_SEED` overrides `world.seed` when set to a valid integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load the file at `path`, or fall back to defaults if it does not
    /// exist. Environment overrides apply either way.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            info!(path = %path.display(), "Loading configuration");
            return Self::from_file(path);
        }
        info!(path = %path.display(), "No configuration file, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        let value = std::env::var(SEED_ENV_VAR).ok();
        self.world.apply_seed_override(value.as_deref());
    }
}

/// Grid dimensions and seed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Grid width, walls included.
    #[serde(default = "default_width")]
    pub width: i32,

    /// Grid height, walls included.
    #[serde(default = "default_height")]
    pub height: i32,

    /// Base random seed. Harness instance `i` uses `seed + i`.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl WorldConfig {
    /// Replace the seed with `value` if it parses as `u64`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_seed_override(&mut self, value: Option<&str>) {
        let Some(raw) = value else {
            return;
        };
        match raw.trim().parse::<u64>() {
            Ok(seed) => self.seed = seed,
            Err(e) => warn!(
                var = SEED_ENV_VAR,
                value = raw,
                error = %e,
                "Ignoring invalid seed override"
            ),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            seed: default_seed(),
        }
    }
}

/// Step budgets and comparison size.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Steps per harness instance.
    #[serde(default = "default_steps")]
    pub steps: u64,

    /// Number of environment instances per agent in the comparison.
    #[serde(default = "default_instances")]
    pub instances: usize,

    /// Steps for the traced demonstration run.
    #[serde(default = "default_demo_steps")]
    pub demo_steps: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            instances: default_instances(),
            demo_steps: default_demo_steps(),
        }
    }
}

/// Vacuum domain parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VacuumConfig {
    /// Probability that an interior cell starts dirty.
    #[serde(default = "default_dirt_probability")]
    pub dirt_probability: f64,
}

impl Default for VacuumConfig {
    fn default() -> Self {
        Self {
            dirt_probability: default_dirt_probability(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_width() -> i32 {
    10
}

const fn default_height() -> i32 {
    10
}

const fn default_seed() -> u64 {
    42
}

const fn default_steps() -> u64 {
    1000
}

const fn default_instances() -> usize {
    10
}

const fn default_demo_steps() -> u64 {
    20
}

const fn default_dirt_probability() -> f64 {
    0.5
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.width, 10);
        assert_eq!(config.run.steps, 1000);
        assert_eq!(config.run.instances, 10);
        assert!((config.vacuum.dirt_probability - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  width: 6
  height: 4
  seed: 123

run:
  steps: 50
  instances: 3
  demo_steps: 5

vacuum:
  dirt_probability: 0.25

logging:
  level: "debug"
"#;
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.width, 6);
        assert_eq!(config.world.height, 4);
        assert_eq!(config.world.seed, 123);
        assert_eq!(config.run.steps, 50);
        assert_eq!(config.run.instances, 3);
        assert_eq!(config.run.demo_steps, 5);
        assert!((config.vacuum.dirt_probability - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("world:\n  seed: 7\n").unwrap();

        // Seed is overridden
        assert_eq!(config.world.seed, 7);
        // Everything else uses defaults
        assert_eq!(config.world.width, 10);
        assert_eq!(config.run.steps, 1000);
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(SimulationConfig::parse("").unwrap(), SimulationConfig::default());
    }

    #[test]
    fn parse_rejects_malformed_yaml() {
        let result = SimulationConfig::parse("world: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn seed_override() {
        let mut world = WorldConfig::default();
        world.apply_seed_override(Some(" 99 "));
        assert_eq!(world.seed, 99);
        world.apply_seed_override(Some("not-a-number"));
        assert_eq!(world.seed, 99);
        world.apply_seed_override(None);
        assert_eq!(world.seed, 99);
    }

    #[test]
    fn missing_file_means_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("does-not-exist.yaml");
        let config = SimulationConfig::load_or_default(&path).unwrap();
        assert_eq!(config.world.width, 10);
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("tickworld-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
