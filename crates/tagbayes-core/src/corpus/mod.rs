//! Corpus inputs: post records and the shard files that hold them.

pub mod discovery;
pub mod record;

pub use discovery::{discover_shards, DiscoveredShard};
pub use record::{Category, Post, TagEntry};
