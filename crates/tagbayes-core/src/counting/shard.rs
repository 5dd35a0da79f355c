//! Per-shard counting.
//!
//! A shard is a file of line-delimited JSON posts. The counter scans it once,
//! applies the solo heuristic, and returns the shard's [`TagCounts`]. It has no
//! side effects beyond reading the file, so shards can be counted on any
//! number of workers.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use crate::corpus::{Category, Post};
use crate::error::{CountError, CountResult};
use crate::vocabulary::{TagId, TagSpace};

use super::counts::TagCounts;

/// Counts tag occurrences in corpus shards against a fixed tag space.
#[derive(Debug, Clone)]
pub struct ShardCounter {
    space: Arc<TagSpace>,
    solo_heuristic: bool,
}

impl ShardCounter {
    /// Create a counter. With `solo_heuristic` on, posts depicting more than
    /// one distinct character are excluded from every count.
    pub fn new(space: Arc<TagSpace>, solo_heuristic: bool) -> Self {
        Self {
            space,
            solo_heuristic,
        }
    }

    /// Count one shard file.
    pub fn process(&self, path: &Path) -> CountResult<TagCounts> {
        let file = File::open(path).map_err(|e| CountError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let counts = self.count_reader(BufReader::new(file), path)?;

        tracing::debug!(
            "Counted {:?}: {} posts read, {} retained",
            path,
            counts.posts_read(),
            counts.num_posts(),
        );

        Ok(counts)
    }

    /// Count posts from any line source. `origin` is used in error messages.
    ///
    /// Whitespace-only lines are skipped; any other line that does not parse
    /// as a post fails the whole shard.
    pub fn count_reader<R: BufRead>(&self, reader: R, origin: &Path) -> CountResult<TagCounts> {
        let (general_len, character_len) = self.space.dims();
        let mut counts = TagCounts::zeros(general_len, character_len);

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| CountError::Read {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let post = Post::parse(&line).map_err(|e| CountError::MalformedRecord {
                path: origin.to_path_buf(),
                line: index + 1,
                message: e.to_string(),
            })?;
            self.count_post(&post, &mut counts);
        }

        Ok(counts)
    }

    /// Add a single post to `counts`.
    pub fn count_post(&self, post: &Post, counts: &mut TagCounts) {
        if self.solo_heuristic && self.distinct_characters(post) > 1 {
            counts.record_excluded();
            return;
        }

        let general = present_ids(post, Category::General, |name| {
            self.space.general.canonicalize(name)
        });
        let character = present_ids(post, Category::Character, |name| {
            self.space.character.canonicalize(name)
        });
        counts.record_post(&general, &character);
    }

    /// Number of distinct character identities on a post, after alias and
    /// implication folding. Characters outside the vocabulary count too.
    pub fn distinct_characters(&self, post: &Post) -> usize {
        let vocab = &self.space.character;
        post.names(Category::Character)
            .map(|name| vocab.identity(name))
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Deduplicated vocabulary ids of a post's tags in one category.
fn present_ids<F>(post: &Post, category: Category, resolve: F) -> Vec<TagId>
where
    F: Fn(&str) -> Option<TagId>,
{
    let mut ids: Vec<TagId> = post.names(category).filter_map(resolve).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
