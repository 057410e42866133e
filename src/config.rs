//! Runtime configuration for quest runs.

use derive_getters::Getters;
use derive_more::{Display, Error};
use quest_engine::ExtraTurnPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for running and playing back a quest.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct QuestConfig {
    /// Dice seed. `None` seeds from entropy.
    #[serde(default)]
    seed: Option<u64>,

    /// Delay between auto-play steps, in milliseconds.
    #[serde(default = "default_autoplay_interval_ms")]
    autoplay_interval_ms: u64,

    /// Whether bonus extra turns are actually played.
    #[serde(default)]
    extra_turns: ExtraTurnPolicy,

    /// Upper bound on turns played by the runner.
    #[serde(default = "default_max_turns")]
    max_turns: u32,
}

fn default_autoplay_interval_ms() -> u64 {
    2000
}

fn default_max_turns() -> u32 {
    1000
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            seed: None,
            autoplay_interval_ms: default_autoplay_interval_ms(),
            extra_turns: ExtraTurnPolicy::default(),
            max_turns: default_max_turns(),
        }
    }
}

impl QuestConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(?config, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Auto-play interval as a duration.
    pub fn autoplay_interval(&self) -> Duration {
        Duration::from_millis(self.autoplay_interval_ms)
    }

    /// Overrides the dice seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// Overrides the auto-play interval.
    pub fn with_autoplay_interval_ms(mut self, interval_ms: Option<u64>) -> Self {
        if let Some(ms) = interval_ms {
            self.autoplay_interval_ms = ms;
        }
        self
    }

    /// Overrides the extra turn policy.
    pub fn with_extra_turns(mut self, policy: Option<ExtraTurnPolicy>) -> Self {
        if let Some(policy) = policy {
            self.extra_turns = policy;
        }
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
