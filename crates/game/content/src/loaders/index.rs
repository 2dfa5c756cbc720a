//! Campaign index loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One playable level in campaign order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelEntry {
    /// File stem under `levels/`.
    pub file: String,
    /// Display title; falls back to the file stem.
    #[serde(default)]
    pub title: Option<String>,
}

impl LevelEntry {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.file)
    }
}

/// Ordered list of levels played one after another.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelIndex {
    pub levels: Vec<LevelEntry>,
}

impl LevelIndex {
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelEntry> {
        self.levels.get(index)
    }

    pub fn position_of(&self, file: &str) -> Option<usize> {
        self.levels.iter().position(|entry| entry.file == file)
    }

    /// Index of the level after `index`, or `None` at the end of the campaign.
    pub fn next_after(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.levels.len()).then_some(next)
    }
}

/// Loader for the campaign index from a RON file.
pub struct LevelIndexLoader;

impl LevelIndexLoader {
    pub fn load(path: &Path) -> LoadResult<LevelIndex> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse level index {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<LevelIndex> {
        let index: LevelIndex = ron::from_str(content)?;
        if index.is_empty() {
            anyhow::bail!("level index lists no levels");
        }
        let mut seen = std::collections::BTreeSet::new();
        for entry in &index.levels {
            if !seen.insert(entry.file.as_str()) {
                anyhow::bail!("level '{}' is listed twice", entry.file);
            }
        }
        Ok(index)
    }
}
