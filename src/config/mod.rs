//! Engine configuration
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Command-line flags of the `caro` binary
//! 2. Environment variables (`CARO_BOARD_SIZE`, `CARO_CACHE_CAPACITY`,
//!    `CARO_LOG_LEVEL`, `CARO_SEED`)
//! 3. `caro.toml`
//! 4. Built-in defaults
//!
//! ```toml
//! board_size = 12
//! cache_capacity = 200000
//! log_level = "info"
//!
//! [hard]
//! search_depth = 5
//! time_budget_secs = 0.6
//! candidate_limit = 22
//! forced_block_probability = 1.0
//! iterative_deepening = true
//! ```

mod loader;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::{ConfigError, EngineError};
use crate::search::DEFAULT_CACHE_CAPACITY;

pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};

/// Difficulty mode requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a mode label, ignoring case and surrounding whitespace.
impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| EngineError::UnknownMode(s.to_string()))
    }
}

/// Search settings for one difficulty mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Fixed depth, or the ceiling when deepening iteratively
    pub search_depth: u8,
    /// Wall-clock budget for the tree search
    pub time_budget_secs: f64,
    /// Maximum children searched per node
    pub candidate_limit: usize,
    /// Chance that a forced block (or pre-empt) is actually played
    pub forced_block_probability: f64,
    pub iterative_deepening: bool,
}

impl DifficultyConfig {
    #[must_use]
    pub fn easy() -> Self {
        Self {
            search_depth: 1,
            time_budget_secs: 0.6,
            candidate_limit: 22,
            forced_block_probability: 0.0,
            iterative_deepening: false,
        }
    }

    #[must_use]
    pub fn medium() -> Self {
        Self {
            search_depth: 2,
            forced_block_probability: 0.8,
            ..Self::easy()
        }
    }

    #[must_use]
    pub fn hard() -> Self {
        Self {
            search_depth: 5,
            forced_block_probability: 1.0,
            iterative_deepening: true,
            ..Self::easy()
        }
    }

    #[must_use]
    pub fn time_budget(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_budget_secs).unwrap_or(Duration::ZERO)
    }

    fn validate(&self, mode: Difficulty) -> Result<(), ConfigError> {
        if self.search_depth == 0 {
            return Err(ConfigError::Invalid(format!("{mode}.search_depth must be at least 1")));
        }
        if !(self.time_budget_secs.is_finite() && self.time_budget_secs > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "{mode}.time_budget_secs must be a positive number of seconds, got {}",
                self.time_budget_secs
            )));
        }
        if self.candidate_limit == 0 {
            return Err(ConfigError::Invalid(format!("{mode}.candidate_limit must be at least 1")));
        }
        if !(0.0..=1.0).contains(&self.forced_block_probability) {
            return Err(ConfigError::Invalid(format!(
                "{mode}.forced_block_probability must be in [0, 1], got {}",
                self.forced_block_probability
            )));
        }
        Ok(())
    }
}

fn d_board_size() -> usize {
    DEFAULT_BOARD_SIZE
}
fn d_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}
fn d_log_level() -> String {
    "info".into()
}
fn d_easy() -> DifficultyConfig {
    DifficultyConfig::easy()
}
fn d_medium() -> DifficultyConfig {
    DifficultyConfig::medium()
}
fn d_hard() -> DifficultyConfig {
    DifficultyConfig::hard()
}

/// Root configuration structure matching `caro.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "d_board_size")]
    pub board_size: usize,
    /// Transposition cache entries before eviction
    #[serde(default = "d_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Seed for the forced-block coin; random when unset
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "d_easy")]
    pub easy: DifficultyConfig,
    #[serde(default = "d_medium")]
    pub medium: DifficultyConfig,
    #[serde(default = "d_hard")]
    pub hard: DifficultyConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: d_board_size(),
            cache_capacity: d_cache_capacity(),
            log_level: d_log_level(),
            seed: None,
            easy: d_easy(),
            medium: d_medium(),
            hard: d_hard(),
        }
    }
}

impl EngineConfig {
    /// Settings for one mode
    #[must_use]
    pub fn difficulty(&self, mode: Difficulty) -> &DifficultyConfig {
        match mode {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// Check every value the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::Invalid(format!(
                "board_size must be in {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}, got {}",
                self.board_size
            )));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid("cache_capacity must be at least 1".into()));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level must not be empty".into()));
        }
        for mode in Difficulty::ALL {
            self.difficulty(mode).validate(mode)?;
        }
        Ok(())
    }
}
