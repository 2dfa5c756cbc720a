//! Level definition loader.

use std::path::Path;

use snapfit_core::LevelDefinition;

use crate::loaders::{LoadResult, read_file};

/// Loader for level definitions from RON files.
pub struct LevelLoader;

impl LevelLoader {
    /// Load a level definition from a RON file.
    pub fn load(path: &Path) -> LoadResult<LevelDefinition> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse level RON {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<LevelDefinition> {
        let definition: LevelDefinition = ron::from_str(content)?;
        Ok(definition)
    }
}
