//! Tag vocabularies: stable integer id spaces for general and character tags.
//!
//! Line order in a tag list file defines the id of each tag, and therefore the
//! row/column axes of the trained model. Alias entries let deprecated spellings
//! count toward their canonical tag without introducing new ids.

pub mod mapping;

pub use mapping::{CategoryMappings, TagMappings};

use std::collections::HashMap;
use std::path::Path;

use crate::error::VocabularyError;

/// Dense index of a tag within its vocabulary.
pub type TagId = usize;

/// Bidirectional name ↔ id map with an alias table.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    names: Vec<String>,
    by_name: HashMap<String, TagId>,
    /// Deprecated spelling → id of its canonical tag
    alias_ids: HashMap<String, TagId>,
    aliases: HashMap<String, String>,
    implications: HashMap<String, String>,
}

impl Vocabulary {
    /// Build a vocabulary from ordered names plus alias/implication maps.
    ///
    /// An alias `from → to` is registered only when `from` is not itself a
    /// vocabulary name and `to` is. The implication map is kept for
    /// [`Vocabulary::identity`] and never affects id assignment.
    pub fn build(
        names: Vec<String>,
        aliases: HashMap<String, String>,
        implications: HashMap<String, String>,
    ) -> Result<Self, VocabularyError> {
        let mut by_name = HashMap::with_capacity(names.len());
        for (id, name) in names.iter().enumerate() {
            if let Some(first) = by_name.insert(name.clone(), id) {
                return Err(VocabularyError::DuplicateName {
                    name: name.clone(),
                    first,
                    second: id,
                });
            }
        }

        let alias_ids: HashMap<String, TagId> = aliases
            .iter()
            .filter(|(from, _)| !by_name.contains_key(from.as_str()))
            .filter_map(|(from, to)| by_name.get(to.as_str()).map(|&id| (from.clone(), id)))
            .collect();

        Ok(Self {
            names,
            by_name,
            alias_ids,
            aliases,
            implications,
        })
    }

    /// Load a newline-delimited tag list and attach the given mappings.
    pub fn load(list_path: &Path, mappings: &CategoryMappings) -> Result<Self, VocabularyError> {
        let names = read_tag_list(list_path)?;
        let vocab = Self::build(
            names,
            mappings.aliases.clone(),
            mappings.implications.clone(),
        )?;

        tracing::info!(
            "Loaded {} tags from {:?} ({} aliases resolved)",
            vocab.len(),
            list_path,
            vocab.alias_count(),
        );

        Ok(vocab)
    }

    /// Resolve a raw tag name to its id, directly or through an alias.
    ///
    /// Returns `None` for tags outside the vocabulary.
    pub fn canonicalize(&self, name: &str) -> Option<TagId> {
        self.by_name
            .get(name)
            .or_else(|| self.alias_ids.get(name))
            .copied()
    }

    /// Fold a raw name through the alias map, then the implication map.
    ///
    /// Two spellings that end on the same identity count as one character
    /// for the solo heuristic. Works for names outside the vocabulary too.
    /// Folding stops at the first vocabulary name, so two distinct canonical
    /// tags always keep distinct identities.
    pub fn identity<'a>(&'a self, name: &'a str) -> &'a str {
        if self.by_name.contains_key(name) {
            return name;
        }
        let aliased = self.aliases.get(name).map_or(name, String::as_str);
        if self.by_name.contains_key(aliased) {
            return aliased;
        }
        self.implications
            .get(aliased)
            .map_or(aliased, String::as_str)
    }

    /// Canonical name for an id.
    pub fn name(&self, id: TagId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// All canonical names in id order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of canonical tags.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of aliases that resolved to a vocabulary tag.
    pub fn alias_count(&self) -> usize {
        self.alias_ids.len()
    }
}

/// The two vocabularies a training run counts against.
#[derive(Debug, Clone)]
pub struct TagSpace {
    pub general: Vocabulary,
    pub character: Vocabulary,
}

impl TagSpace {
    /// Load both tag lists, attaching mappings when a mapping file is given.
    pub fn load(
        general_list: &Path,
        character_list: &Path,
        mapping: Option<&Path>,
    ) -> Result<Self, VocabularyError> {
        let mappings = match mapping {
            Some(path) => TagMappings::load(path)?,
            None => TagMappings::default(),
        };
        Ok(Self {
            general: Vocabulary::load(general_list, &mappings.general)?,
            character: Vocabulary::load(character_list, &mappings.character)?,
        })
    }

    /// `(general, character)` vocabulary sizes.
    pub fn dims(&self) -> (usize, usize) {
        (self.general.len(), self.character.len())
    }
}

/// Read tag names one per line, skipping blank lines and stripping `\r`.
pub fn read_tag_list(path: &Path) -> Result<Vec<String>, VocabularyError> {
    let content = std::fs::read_to_string(path).map_err(|e| VocabularyError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_ids_follow_list_order() {
        let vocab =
            Vocabulary::build(names(&["solo", "smile", "long_hair"]), map(&[]), map(&[])).unwrap();
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.canonicalize("solo"), Some(0));
        assert_eq!(vocab.canonicalize("long_hair"), Some(2));
        assert_eq!(vocab.name(1), Some("smile"));
        assert_eq!(vocab.canonicalize("absent"), None);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Vocabulary::build(names(&["a", "b", "a"]), map(&[]), map(&[])).unwrap_err();
        match err {
            VocabularyError::DuplicateName { name, first, second } => {
                assert_eq!(name, "a");
                assert_eq!((first, second), (0, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_alias_resolves_to_canonical_id() {
        let vocab = Vocabulary::build(
            names(&["hatsune_miku", "kagamine_rin"]),
            map(&[("miku", "hatsune_miku"), ("rin", "kagamine_rin")]),
            map(&[]),
        )
        .unwrap();
        assert_eq!(vocab.canonicalize("miku"), Some(0));
        assert_eq!(vocab.canonicalize("rin"), Some(1));
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.alias_count(), 2);
    }

    #[test]
    fn test_alias_never_shadows_known_name() {
        let vocab = Vocabulary::build(names(&["a", "b"]), map(&[("a", "b")]), map(&[])).unwrap();
        assert_eq!(vocab.canonicalize("a"), Some(0));
        assert_eq!(vocab.alias_count(), 0);
    }

    #[test]
    fn test_identity_never_merges_canonical_names() {
        let vocab = Vocabulary::build(
            names(&["a", "b"]),
            map(&[("a", "b"), ("old_a", "a")]),
            map(&[("a", "b")]),
        )
        .unwrap();
        assert_eq!(vocab.identity("a"), "a");
        assert_eq!(vocab.identity("b"), "b");
        assert_eq!(vocab.identity("old_a"), "a");
    }

    #[test]
    fn test_alias_to_unknown_target_ignored() {
        let vocab =
            Vocabulary::build(names(&["a"]), map(&[("old", "elsewhere")]), map(&[])).unwrap();
        assert_eq!(vocab.canonicalize("old"), None);
    }

    #[test]
    fn test_identity_folds_alias_then_implication() {
        let vocab = Vocabulary::build(
            names(&["hatsune_miku"]),
            map(&[("miku", "hatsune_miku_(append)")]),
            map(&[("hatsune_miku_(append)", "hatsune_miku")]),
        )
        .unwrap();
        assert_eq!(vocab.identity("miku"), "hatsune_miku");
        assert_eq!(vocab.identity("hatsune_miku_(append)"), "hatsune_miku");
        assert_eq!(vocab.identity("someone_else"), "someone_else");
    }

    #[test]
    fn test_read_tag_list_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("general.txt");
        std::fs::write(&path, "a\r\nb\n\nc\n").unwrap();

        let list = read_tag_list(&path).unwrap();
        assert_eq!(list, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tag_space_load_with_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let general = dir.path().join("general.txt");
        let character = dir.path().join("character.txt");
        let mapping = dir.path().join("mapping.json");
        std::fs::write(&general, "smile\nsolo\n").unwrap();
        std::fs::write(&character, "hatsune_miku\n").unwrap();
        std::fs::write(
            &mapping,
            r#"{"general": {"aliases": {"smiling": "smile"}}, "character": {"aliases": {"miku": "hatsune_miku"}}}"#,
        )
        .unwrap();

        let space = TagSpace::load(&general, &character, Some(&mapping)).unwrap();
        assert_eq!(space.dims(), (2, 1));
        assert_eq!(space.general.canonicalize("smiling"), Some(0));
        assert_eq!(space.character.canonicalize("miku"), Some(0));
    }

    #[test]
    fn test_tag_space_missing_list_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TagSpace::load(
            &dir.path().join("nope.txt"),
            &dir.path().join("nope2.txt"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, VocabularyError::Read { .. }));
    }
}
