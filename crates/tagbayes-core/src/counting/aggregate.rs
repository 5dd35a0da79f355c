//! Reduction of shard counts into one global count.

use crate::error::CountResult;

use super::counts::{GlobalCount, ShardCount, TagCounts};

/// Owns the running total while shard counts are folded in.
#[derive(Debug)]
pub struct Aggregator {
    total: TagCounts,
    shards: usize,
}

impl Aggregator {
    /// Start an empty aggregation for `general` × `character` vocabularies.
    pub fn new(general: usize, character: usize) -> Self {
        Self {
            total: TagCounts::zeros(general, character),
            shards: 0,
        }
    }

    /// Fold one shard's counts into the total.
    pub fn absorb(&mut self, shard: &ShardCount) -> CountResult<()> {
        self.total.merge(shard)?;
        self.shards += 1;
        Ok(())
    }

    /// Number of shards absorbed so far.
    pub fn shards(&self) -> usize {
        self.shards
    }

    /// Finish aggregation, freezing the total.
    pub fn finish(self) -> GlobalCount {
        tracing::debug!(
            "Aggregated {} shards: {} posts retained of {} read",
            self.shards,
            self.total.num_posts(),
            self.total.posts_read(),
        );
        GlobalCount::freeze(self.total)
    }

    /// Merge a sequence of shard counts in one call.
    pub fn merge<'a, I>(general: usize, character: usize, counts: I) -> CountResult<GlobalCount>
    where
        I: IntoIterator<Item = &'a ShardCount>,
    {
        let mut aggregator = Self::new(general, character);
        for shard in counts {
            aggregator.absorb(shard)?;
        }
        Ok(aggregator.finish())
    }
}
