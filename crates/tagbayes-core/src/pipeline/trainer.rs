//! Training orchestration - wires vocabulary, counting, scoring and persistence.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::corpus::{discover_shards, discovery, DiscoveredShard};
use crate::counting::{Aggregator, GlobalCount, ShardCounter, TagCounts};
use crate::error::{Result, TagbayesError};
use crate::persist;
use crate::scoring::{ScoreDeriver, ScoreModel};
use crate::vocabulary::TagSpace;

use super::pool::WorkerPool;

/// Files a training run reads and writes.
#[derive(Debug, Clone)]
pub struct TrainInputs {
    /// Directory holding the corpus shards
    pub corpus_dir: PathBuf,
    /// Newline-delimited general tag list
    pub general_tags: PathBuf,
    /// Newline-delimited character tag list
    pub character_tags: PathBuf,
    /// Optional alias/implication mapping JSON
    pub mapping: Option<PathBuf>,
    /// Where the `.npz` model is written
    pub output: PathBuf,
}

/// Progress notifications emitted during a run.
#[derive(Debug, Clone)]
pub enum TrainEvent {
    /// Shards found in the corpus directory
    ShardsDiscovered { count: usize, total_bytes: u64 },
    /// One shard finished counting and was folded into the total
    ShardCounted {
        path: PathBuf,
        posts_read: u64,
        posts_retained: u64,
    },
    /// Counting finished; derivation starts
    Deriving,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub shards: usize,
    pub posts_read: u64,
    pub posts_retained: u64,
    pub posts_excluded: u64,
    pub general_tags: usize,
    pub character_tags: usize,
    pub output: PathBuf,
    pub elapsed: Duration,
}

/// Runs the full training pipeline with a validated configuration.
pub struct Trainer {
    config: Config,
    deriver: ScoreDeriver,
    pool: WorkerPool,
}

impl Trainer {
    /// Create a trainer. Configuration is validated here, before any file I/O.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let deriver = ScoreDeriver::from_config(&config.scoring)?;
        let pool = WorkerPool::new(config.counting.parallel_workers);
        tracing::debug!(
            "Trainer ready: {} workers, smoothing {}, solo heuristic {}, calibration {}",
            pool.workers(),
            deriver.smoothing(),
            config.counting.solo_heuristic,
            deriver.calibrates(),
        );
        Ok(Self {
            config,
            deriver,
            pool,
        })
    }

    /// Get a reference to the trainer's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Train and save a model.
    pub async fn train(&self, inputs: &TrainInputs) -> Result<TrainReport> {
        self.train_with_progress(inputs, |_| {}).await
    }

    /// Train and save a model, reporting progress through `on_event`.
    pub async fn train_with_progress<F>(
        &self,
        inputs: &TrainInputs,
        mut on_event: F,
    ) -> Result<TrainReport>
    where
        F: FnMut(TrainEvent),
    {
        let start = Instant::now();
        check_inputs(inputs)?;

        let space = TagSpace::load(
            &inputs.general_tags,
            &inputs.character_tags,
            inputs.mapping.as_deref(),
        )?;
        let (general_len, character_len) = space.dims();

        let shards = discover_shards(&inputs.corpus_dir)?;
        let total_bytes = discovery::total_size(&shards);
        tracing::info!(
            "Found {} shards ({:.1} MB) in {:?}",
            shards.len(),
            total_bytes as f64 / 1_048_576.0,
            inputs.corpus_dir,
        );
        on_event(TrainEvent::ShardsDiscovered {
            count: shards.len(),
            total_bytes,
        });

        let shard_count = shards.len();
        let counts = self.count(Arc::new(space), shards, &mut on_event).await?;
        tracing::info!(
            "Counted {} posts: {} retained, {} excluded by solo heuristic",
            counts.posts_read(),
            counts.num_posts(),
            counts.posts_excluded(),
        );

        on_event(TrainEvent::Deriving);
        let model = self.derive(&counts)?;
        persist::save(&model, &inputs.output)?;

        Ok(TrainReport {
            shards: shard_count,
            posts_read: counts.posts_read(),
            posts_retained: counts.num_posts(),
            posts_excluded: counts.posts_excluded(),
            general_tags: general_len,
            character_tags: character_len,
            output: inputs.output.clone(),
            elapsed: start.elapsed(),
        })
    }

    /// Count every shard on the worker pool and reduce to a global count.
    ///
    /// The reduction runs on the calling task as shard results arrive; any
    /// shard failure aborts the whole run.
    pub async fn count<F>(
        &self,
        space: Arc<TagSpace>,
        shards: Vec<DiscoveredShard>,
        mut on_event: F,
    ) -> Result<GlobalCount>
    where
        F: FnMut(TrainEvent),
    {
        let (general_len, character_len) = space.dims();
        let counter = ShardCounter::new(space, self.config.counting.solo_heuristic);
        let mut aggregator = Aggregator::new(general_len, character_len);

        let paths: Vec<PathBuf> = shards.into_iter().map(|s| s.path).collect();
        self.pool
            .run(
                paths,
                move |path| {
                    let counts = counter.process(&path)?;
                    Ok((path, counts))
                },
                |(path, counts): (PathBuf, TagCounts)| {
                    aggregator.absorb(&counts)?;
                    on_event(TrainEvent::ShardCounted {
                        path,
                        posts_read: counts.posts_read(),
                        posts_retained: counts.num_posts(),
                    });
                    Ok(())
                },
            )
            .await?;

        Ok(aggregator.finish())
    }

    /// Derive the score model from aggregated counts.
    pub fn derive(&self, counts: &GlobalCount) -> Result<ScoreModel> {
        Ok(self.deriver.derive(counts)?)
    }
}

/// Fail fast on missing inputs before any counting starts.
fn check_inputs(inputs: &TrainInputs) -> Result<()> {
    let required = [
        inputs.corpus_dir.as_path(),
        inputs.general_tags.as_path(),
        inputs.character_tags.as_path(),
    ];
    for path in required.into_iter().chain(inputs.mapping.as_deref()) {
        if !path.exists() {
            return Err(TagbayesError::InputNotFound(path.to_path_buf()));
        }
    }
    Ok(())
}
