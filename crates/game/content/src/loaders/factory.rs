//! Content factory for building levels from data files.

use std::path::{Path, PathBuf};

use snapfit_core::{GameConfig, Level, LevelDefinition};

use crate::loaders::{ConfigLoader, LevelIndex, LevelIndexLoader, LevelLoader, LoadResult};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── levels.ron
/// └── levels/
///     ├── tutorial.ron
///     └── shelf.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or defaults when absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the campaign order from `levels.ron`.
    pub fn load_index(&self) -> LoadResult<LevelIndex> {
        LevelIndexLoader::load(&self.data_dir.join("levels.ron"))
    }

    /// Load a level definition from `levels/{name}.ron`.
    pub fn load_level(&self, name: &str) -> LoadResult<LevelDefinition> {
        LevelLoader::load(&self.level_path(name))
    }

    /// Load and build a level in one step.
    pub fn build_level(&self, name: &str, config: GameConfig) -> LoadResult<Level> {
        let definition = self.load_level(name)?;
        Self::build(definition, config)
    }

    /// Build an already loaded definition.
    ///
    /// Records the core skips as invalid are logged, not fatal.
    pub fn build(definition: LevelDefinition, config: GameConfig) -> LoadResult<Level> {
        let name = definition.name.clone();
        let level = Level::build(definition, config)
            .map_err(|e| anyhow::anyhow!("Failed to build level '{}': {}", name, e))?;
        for skipped in level.skipped_items() {
            tracing::warn!(level = %name, error = %skipped, "item record skipped");
        }
        Ok(level)
    }

    pub fn level_path(&self, name: &str) -> PathBuf {
        self.data_dir.join("levels").join(format!("{}.ron", name))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
