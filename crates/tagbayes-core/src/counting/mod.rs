//! Co-occurrence counting over corpus shards.
//!
//! - **counts**: count values and the frozen global count
//! - **shard**: per-shard scanning with the solo heuristic
//! - **aggregate**: order-independent reduction of shard counts

pub mod aggregate;
pub mod counts;
pub mod shard;

pub use aggregate::Aggregator;
pub use counts::{Count, GlobalCount, ShardCount, TagCounts};
pub use shard::ShardCounter;
