//! Sub-configuration structs with defaults matching the reference training run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Corpus counting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CountingConfig {
    /// Drop posts that depict more than one distinct character
    pub solo_heuristic: bool,

    /// Number of shards counted concurrently
    pub parallel_workers: usize,
}

impl Default for CountingConfig {
    fn default() -> Self {
        Self {
            solo_heuristic: true,
            parallel_workers: 1,
        }
    }
}

/// Score derivation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Additive (Laplace) smoothing constant, must be > 0
    pub smoothing: f64,

    /// Divide weights by the mean number of general tags per post
    pub calibrate: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.1,
            calibrate: true,
        }
    }
}

/// Default input files, used when not given on the command line.
///
/// Paths may start with `~`; they are expanded when resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    /// Newline-delimited general tag list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_tags: Option<PathBuf>,

    /// Newline-delimited character tag list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_tags: Option<PathBuf>,

    /// Alias/implication mapping JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,

    /// Log format (pretty, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
