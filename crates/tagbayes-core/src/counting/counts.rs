//! Tag and co-occurrence count values.
//!
//! A [`TagCounts`] is produced per shard and summed elementwise into the
//! global count. Summation is commutative and associative, so the global
//! result does not depend on shard order or how shards were split across
//! workers.

use std::ops::Deref;

use ndarray::{Array1, Array2};

use crate::error::{CountError, CountResult};
use crate::vocabulary::TagId;

/// Width of a single count cell.
pub type Count = u32;

/// Per-tag and per-(general, character) post counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCounts {
    num_posts: u64,
    posts_read: u64,
    general: Array1<Count>,
    character: Array1<Count>,
    cooccurrence: Array2<Count>,
}

/// Counts for a single shard.
pub type ShardCount = TagCounts;

impl TagCounts {
    /// Empty counts for `general` × `character` vocabularies.
    pub fn zeros(general: usize, character: usize) -> Self {
        Self {
            num_posts: 0,
            posts_read: 0,
            general: Array1::zeros(general),
            character: Array1::zeros(character),
            cooccurrence: Array2::zeros((general, character)),
        }
    }

    /// Assemble counts from raw arrays, treating every post as retained.
    pub fn from_parts(
        num_posts: u64,
        general: Array1<Count>,
        character: Array1<Count>,
        cooccurrence: Array2<Count>,
    ) -> CountResult<Self> {
        let expected = (general.len(), character.len());
        if cooccurrence.dim() != expected {
            return Err(CountError::ShapeMismatch {
                expected,
                actual: cooccurrence.dim(),
            });
        }
        Ok(Self {
            num_posts,
            posts_read: num_posts,
            general,
            character,
            cooccurrence,
        })
    }

    /// `(general, character)` dimensions.
    pub fn dims(&self) -> (usize, usize) {
        self.cooccurrence.dim()
    }

    /// Posts that contributed to the counts.
    pub fn num_posts(&self) -> u64 {
        self.num_posts
    }

    /// Posts scanned, whether retained or excluded.
    pub fn posts_read(&self) -> u64 {
        self.posts_read
    }

    /// Posts scanned but excluded by the solo heuristic.
    pub fn posts_excluded(&self) -> u64 {
        self.posts_read - self.num_posts
    }

    /// Posts carrying each general tag.
    pub fn general_count(&self) -> &Array1<Count> {
        &self.general
    }

    /// Posts carrying each character tag.
    pub fn character_count(&self) -> &Array1<Count> {
        &self.character
    }

    /// Posts carrying both general tag `g` (row) and character `c` (column).
    pub fn gc_count(&self) -> &Array2<Count> {
        &self.cooccurrence
    }

    /// Record a retained post given its deduplicated tag ids.
    pub(crate) fn record_post(&mut self, general: &[TagId], character: &[TagId]) {
        self.num_posts += 1;
        self.posts_read += 1;
        for &g in general {
            self.general[g] += 1;
        }
        for &c in character {
            self.character[c] += 1;
        }
        for &g in general {
            for &c in character {
                self.cooccurrence[[g, c]] += 1;
            }
        }
    }

    /// Record a post that was read but excluded.
    pub(crate) fn record_excluded(&mut self) {
        self.posts_read += 1;
    }

    /// Add another count of the same shape into this one.
    pub fn merge(&mut self, other: &TagCounts) -> CountResult<()> {
        if self.dims() != other.dims() {
            return Err(CountError::ShapeMismatch {
                expected: self.dims(),
                actual: other.dims(),
            });
        }
        self.num_posts += other.num_posts;
        self.posts_read += other.posts_read;
        self.general += &other.general;
        self.character += &other.character;
        self.cooccurrence += &other.cooccurrence;
        Ok(())
    }

    /// Check the structural invariants every consistent count satisfies.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.general.len() != self.cooccurrence.nrows()
            || self.character.len() != self.cooccurrence.ncols()
        {
            return Err("vector lengths disagree with co-occurrence matrix".into());
        }
        if let Some(g) = self
            .general
            .iter()
            .position(|&n| u64::from(n) > self.num_posts)
        {
            return Err(format!(
                "general_count[{g}] = {} exceeds {} posts",
                self.general[g], self.num_posts
            ));
        }
        if let Some(c) = self
            .character
            .iter()
            .position(|&n| u64::from(n) > self.num_posts)
        {
            return Err(format!(
                "character_count[{c}] = {} exceeds {} posts",
                self.character[c], self.num_posts
            ));
        }
        for ((g, c), &n) in self.cooccurrence.indexed_iter() {
            if n > self.general[g].min(self.character[c]) {
                return Err(format!(
                    "gc_count[{g},{c}] = {n} exceeds min(general {}, character {})",
                    self.general[g], self.character[c]
                ));
            }
            // Posts with g but not c can't outnumber posts without c.
            if u64::from(self.general[g] - n) > self.num_posts - u64::from(self.character[c]) {
                return Err(format!(
                    "general tag {g} without character {c} exceeds posts without {c}"
                ));
            }
        }
        Ok(())
    }
}

/// Aggregated corpus counts, read-only once aggregation has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalCount(TagCounts);

impl GlobalCount {
    /// Freeze a fully aggregated count.
    pub fn freeze(counts: TagCounts) -> Self {
        Self(counts)
    }

    /// Mean number of distinct general tags per retained post.
    ///
    /// `None` for an empty corpus.
    pub fn mean_general_tags_per_post(&self) -> Option<f64> {
        if self.0.num_posts == 0 {
            return None;
        }
        let total: u64 = self.0.general.iter().map(|&n| u64::from(n)).sum();
        Some(total as f64 / self.0.num_posts as f64)
    }

    /// Consume the frozen value, returning the raw counts.
    pub fn into_inner(self) -> TagCounts {
        self.0
    }
}

impl Deref for GlobalCount {
    type Target = TagCounts;

    fn deref(&self) -> &TagCounts {
        &self.0
    }
}
