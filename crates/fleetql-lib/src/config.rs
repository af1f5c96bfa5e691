//! Engine configuration.
//!
//! Every knob has a default, so an empty JSON object is a valid config.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Negation semantics for multi-valued and joined field paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    /// `NOT EXISTS(rows) OR EXISTS(row that differs)`.
    Legacy,
    /// `NOT EXISTS(row that matches)`.
    #[default]
    Current,
}

impl Generation {
    pub fn as_str(self) -> &'static str {
        match self {
            Generation::Legacy => "legacy",
            Generation::Current => "current",
        }
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Generation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(Generation::Legacy),
            "current" => Ok(Generation::Current),
            _ => Err(format!("unknown generation `{s}` (expected `legacy` or `current`)")),
        }
    }
}

/// Device polling intervals used to derive the timestamp macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollingConfig {
    pub polling_interval_ms: i64,
    pub overdue_interval_ms: i64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            polling_interval_ms: 5 * 60 * 1000,
            overdue_interval_ms: 5 * 60 * 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Compare strings case-insensitively.
    pub ignore_case: bool,
    /// The database already compares case-insensitively, so SQL needs no `UPPER()`.
    pub case_insensitive_db: bool,
    /// Allow `=gt=` and friends on string fields.
    pub lexicographic_ordering: bool,
    pub generation: Generation,
    /// Maximum group nesting.
    pub max_depth: u32,
    /// Maximum number of tokens consumed by the parser.
    pub max_tokens: u32,
    /// Maximum number of comparisons. Each `;`/`,` adds a tree level, so
    /// this also bounds how deep every later pass recurses.
    pub max_comparisons: u32,
    pub polling: PollingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ignore_case: true,
            case_insensitive_db: false,
            lexicographic_ordering: false,
            generation: Generation::Current,
            max_depth: 64,
            max_tokens: 4096,
            max_comparisons: 256,
            polling: PollingConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn with_generation(mut self, generation: Generation) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_ignore_case(mut self, value: bool) -> Self {
        self.ignore_case = value;
        self
    }

    pub fn with_case_insensitive_db(mut self, value: bool) -> Self {
        self.case_insensitive_db = value;
        self
    }

    pub fn with_lexicographic_ordering(mut self, value: bool) -> Self {
        self.lexicographic_ordering = value;
        self
    }

    pub fn with_limits(mut self, max_depth: u32, max_tokens: u32) -> Self {
        self.max_depth = max_depth;
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_comparisons(mut self, max_comparisons: u32) -> Self {
        self.max_comparisons = max_comparisons;
        self
    }

    /// SQL wraps string columns in `UPPER()` only when the database won't fold for us.
    pub fn store_folds_case(&self) -> bool {
        self.ignore_case && !self.case_insensitive_db
    }

    /// In memory nothing folds for us, so either flag turns folding on.
    pub fn matcher_folds_case(&self) -> bool {
        self.ignore_case || self.case_insensitive_db
    }
}
