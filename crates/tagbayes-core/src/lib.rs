//! tagbayes Core - naive-Bayes character scoring from tag co-occurrence.
//!
//! Given a corpus of posts tagged with general descriptive tags and character
//! tags, tagbayes derives a linear model that scores how likely each character
//! is to appear given a set of observed general tags.
//!
//! # Architecture
//!
//! ```text
//! Tag lists + mappings → Vocabulary
//! Corpus shards → ShardCounter (parallel) → Aggregator → ScoreDeriver → .npz
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use tagbayes_core::{Config, TrainInputs, Trainer};
//!
//! #[tokio::main]
//! async fn main() -> tagbayes_core::Result<()> {
//!     let trainer = Trainer::new(Config::load()?)?;
//!     let report = trainer
//!         .train(&TrainInputs {
//!             corpus_dir: "metadata/".into(),
//!             general_tags: "general.txt".into(),
//!             character_tags: "character.txt".into(),
//!             mapping: Some("mapping.json".into()),
//!             output: "naive_bayes.npz".into(),
//!         })
//!         .await?;
//!     println!("Retained {} posts", report.posts_retained);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod corpus;
pub mod counting;
pub mod error;
pub mod persist;
pub mod pipeline;
pub mod scoring;
pub mod vocabulary;

// Re-exports for convenient access
pub use config::Config;
pub use corpus::{Category, Post, TagEntry};
pub use counting::{Aggregator, GlobalCount, ShardCount, ShardCounter, TagCounts};
pub use error::{
    ConfigError, CountError, PersistError, Result, ScoreError, TagbayesError, VocabularyError,
};
pub use pipeline::{TrainEvent, TrainInputs, TrainReport, Trainer, WorkerPool};
pub use scoring::{ScoreDeriver, ScoreModel};
pub use vocabulary::{TagId, TagMappings, TagSpace, Vocabulary};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
