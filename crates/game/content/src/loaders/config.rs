//! Game configuration loader.

use std::path::Path;

use snapfit_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)?;
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &GameConfig) -> LoadResult<()> {
    if config.min_change_dir_time > config.max_change_dir_time {
        anyhow::bail!(
            "min_change_dir_time ({}) exceeds max_change_dir_time ({})",
            config.min_change_dir_time,
            config.max_change_dir_time
        );
    }
    if config.min_dialogue_interval > config.max_dialogue_interval {
        anyhow::bail!(
            "min_dialogue_interval ({}) exceeds max_dialogue_interval ({})",
            config.min_dialogue_interval,
            config.max_dialogue_interval
        );
    }
    if config.shake_window <= 0.0 || config.shake_reversals == 0 {
        anyhow::bail!("shake detection needs a positive window and at least one reversal");
    }
    if config.shake_reversals > GameConfig::MAX_SHAKE_SAMPLES {
        anyhow::bail!(
            "shake_reversals ({}) exceeds the {} remembered samples",
            config.shake_reversals,
            GameConfig::MAX_SHAKE_SAMPLES
        );
    }
    Ok(())
}
