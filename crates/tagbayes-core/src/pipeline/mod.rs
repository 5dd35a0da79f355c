//! Training pipeline components.
//!
//! - **pool**: bounded worker pool for per-shard tasks
//! - **trainer**: orchestrates vocabulary → counting → scoring → persistence

pub mod pool;
pub mod trainer;

pub use pool::WorkerPool;
pub use trainer::{TrainEvent, TrainInputs, TrainReport, Trainer};
