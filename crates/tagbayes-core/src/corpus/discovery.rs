//! Shard discovery: find the files making up a corpus directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::CountError;

/// Information about a discovered shard file.
#[derive(Debug, Clone)]
pub struct DiscoveredShard {
    /// Full path to the shard
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Discover every shard directly inside `dir`.
///
/// Only regular files at the top level count; hidden files (leading `.`) are
/// skipped. Results are sorted by path for deterministic ordering. A corpus
/// with no shards is an error, since training on nothing is never intended.
pub fn discover_shards(dir: &Path) -> Result<Vec<DiscoveredShard>, CountError> {
    if !dir.is_dir() {
        return Err(CountError::Read {
            path: dir.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let mut shards = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| CountError::Read {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() || is_hidden(entry.path()) {
            continue;
        }
        let meta = entry.metadata().map_err(|e| CountError::Read {
            path: entry.path().to_path_buf(),
            message: e.to_string(),
        })?;
        shards.push(DiscoveredShard {
            path: entry.path().to_path_buf(),
            size: meta.len(),
        });
    }

    if shards.is_empty() {
        return Err(CountError::EmptyCorpus(dir.to_path_buf()));
    }

    shards.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(shards)
}

/// Get total size of all discovered shards.
pub fn total_size(shards: &[DiscoveredShard]) -> u64 {
    shards.iter().map(|s| s.size).sum()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_sorted_top_level_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "{}\n").unwrap();
        std::fs::write(dir.path().join("a.json"), "{}\n{}\n").unwrap();
        std::fs::write(dir.path().join(".hidden"), "x").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.json"), "{}\n").unwrap();

        let shards = discover_shards(dir.path()).unwrap();
        let names: Vec<_> = shards
            .iter()
            .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
        assert_eq!(total_size(&shards), 9);
    }

    #[test]
    fn test_empty_corpus_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_shards(dir.path()).unwrap_err();
        assert!(matches!(err, CountError::EmptyCorpus(_)));
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_shards(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, CountError::Read { .. }));
    }
}
