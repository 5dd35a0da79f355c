//! Error types for the tagbayes training pipeline.
//!
//! Errors are organized by stage so that a failed run reports which phase
//! broke and on which input (file path, line number, tag name).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for tagbayes operations.
#[derive(Error, Debug)]
pub enum TagbayesError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Vocabulary construction errors
    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] VocabularyError),

    /// Corpus counting and aggregation errors
    #[error("Counting error: {0}")]
    Count(#[from] CountError),

    /// Score derivation errors
    #[error("Scoring error: {0}")]
    Score(#[from] ScoreError),

    /// Model artifact errors
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    /// Required input file or directory is missing
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while building tag vocabularies.
#[derive(Error, Debug)]
pub enum VocabularyError {
    /// Tag list or mapping file could not be read
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Mapping file is not valid JSON of the expected shape
    #[error("Malformed tag mapping {path}: {message}")]
    Mapping { path: PathBuf, message: String },

    /// The same tag name appears twice in a tag list
    #[error("Duplicate tag {name:?} at positions {first} and {second}")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },
}

/// Errors raised while scanning shards and reducing their counts.
#[derive(Error, Debug)]
pub enum CountError {
    /// Shard could not be opened or read
    #[error("Failed to read shard {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// A record in a shard is not a valid post
    #[error("Malformed record in {path} at line {line}: {message}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Corpus directory holds no shard files
    #[error("No shard files found in {0}")]
    EmptyCorpus(PathBuf),

    /// Two count values with different vocabulary dimensions were merged
    #[error("Count shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A worker task panicked or was torn down
    #[error("Worker failed: {0}")]
    Worker(String),

    /// Run was cancelled after another worker failed
    #[error("Cancelled after an earlier failure")]
    Cancelled,
}

/// Errors raised while deriving the score model.
#[derive(Error, Debug)]
pub enum ScoreError {
    /// Smoothing constant must be strictly positive and finite
    #[error("Smoothing constant must be > 0 and finite, got {0}")]
    InvalidSmoothing(f64),

    /// Aggregated counts violate a structural invariant
    #[error("Inconsistent counts: {0}")]
    InconsistentCounts(String),

    /// Derivation produced NaN or infinity
    #[error("Non-finite model value at {0}")]
    NonFinite(String),
}

/// Errors raised while writing or reading the model artifact.
#[derive(Error, Debug)]
pub enum PersistError {
    /// Writing the archive failed
    #[error("Failed to write model to {path}: {message}")]
    Write { path: PathBuf, message: String },

    /// Reading the archive failed
    #[error("Failed to read model from {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Stored arrays disagree on the character dimension
    #[error("Model shape mismatch in {path}: a is {rows}x{cols}, b has {bias_len} entries")]
    Shape {
        path: PathBuf,
        rows: usize,
        cols: usize,
        bias_len: usize,
    },
}

/// Convenience type alias for tagbayes results.
pub type Result<T> = std::result::Result<T, TagbayesError>;

/// Convenience type alias for counting-stage results.
pub type CountResult<T> = std::result::Result<T, CountError>;
