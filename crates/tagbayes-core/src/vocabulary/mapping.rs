//! Tag alias/implication mappings produced by the tag-relationship collector.
//!
//! The file is JSON shaped as
//! `{"general": {"aliases": {..}, "implications": {..}}, "character": {..}}`.
//! Every level is optional; missing sections read as empty maps.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::VocabularyError;

/// Antecedent → consequent maps for one tag category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryMappings {
    /// Deprecated spelling → canonical spelling
    pub aliases: HashMap<String, String>,
    /// Tag → tag it implies
    pub implications: HashMap<String, String>,
}

/// Mappings for both tag categories the trainer cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagMappings {
    pub general: CategoryMappings,
    pub character: CategoryMappings,
}

impl TagMappings {
    /// Read and parse a mapping file.
    pub fn load(path: &Path) -> Result<Self, VocabularyError> {
        let content = std::fs::read_to_string(path).map_err(|e| VocabularyError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mappings: TagMappings =
            serde_json::from_str(&content).map_err(|e| VocabularyError::Mapping {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        tracing::info!(
            "Loaded tag mappings: general {} aliases / {} implications, character {} aliases / {} implications",
            mappings.general.aliases.len(),
            mappings.general.implications.len(),
            mappings.character.aliases.len(),
            mappings.character.implications.len(),
        );

        Ok(mappings)
    }
}
