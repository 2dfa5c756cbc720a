//! Client configuration read from the environment.
use std::env;
use std::path::PathBuf;

use snapfit_runtime::RuntimeConfig;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    /// Identifies the log file directory of this run.
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
    /// Time steps between two moves of the scripted player.
    pub act_every: u32,
    pub runtime: RuntimeConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../game/content/data")),
            session_id: None,
            log_dir: None,
            act_every: 10,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SNAPFIT_DATA_DIR` - Content directory (default: bundled data)
    /// - `SNAPFIT_SESSION_ID` - Log session name (default: timestamp)
    /// - `SNAPFIT_LOG_DIR` - Log root (default: platform data dir)
    /// - `SNAPFIT_ACT_EVERY` - Steps between scripted moves (default: 10)
    /// - `SNAPFIT_EVENT_BUFFER` - Event channel capacity (default: 256)
    /// - `SNAPFIT_COMMAND_BUFFER` - Command queue size (default: 32)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("SNAPFIT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.session_id = env::var("SNAPFIT_SESSION_ID").ok();
        config.log_dir = env::var("SNAPFIT_LOG_DIR").ok().map(PathBuf::from);

        if let Some(steps) = read_env::<u32>("SNAPFIT_ACT_EVERY") {
            config.act_every = steps.max(1);
        }
        if let Some(capacity) = read_env::<usize>("SNAPFIT_EVENT_BUFFER") {
            config.runtime.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("SNAPFIT_COMMAND_BUFFER") {
            config.runtime.command_buffer_size = capacity.max(1);
        }

        config
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.parse().ok()
}
