//! Post records as they appear in corpus shards.
//!
//! Each shard line is a JSON object with a `"tags"` array of
//! `{"name": ..., "category": ...}` entries. All other fields are ignored.

use serde::{Deserialize, Deserializer};

/// Tag category, as far as training is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Descriptive tag (category code "0")
    General,
    /// Character tag (category code "4")
    Character,
    /// Artist, copyright, meta and anything unrecognized
    Other,
}

impl Category {
    /// Map a single-digit category code to a category.
    pub fn from_code(code: &str) -> Self {
        match code {
            "0" => Self::General,
            "4" => Self::Character,
            _ => Self::Other,
        }
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}

/// One tag on a post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagEntry {
    pub name: String,
    pub category: Category,
}

/// A single corpus record.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub tags: Vec<TagEntry>,
}

impl Post {
    /// Parse one shard line.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// Names of all tags in a category.
    pub fn names(&self, category: Category) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .filter(move |tag| tag.category == category)
            .map(|tag| tag.name.as_str())
    }
}
