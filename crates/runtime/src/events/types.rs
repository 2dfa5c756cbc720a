//! Event payloads that do not come from the core's own event outbox.

use serde::{Deserialize, Serialize};

use snapfit_core::InstanceId;

/// A call the level made on one of its presentation ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PresentationEvent {
    Sound { name: String, volume: f32 },
    Label { instance: InstanceId, text: String },
    Panel { name: String, visible: bool },
    LevelCompleted,
}

/// Coarse state of the play session around the level.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum SessionState {
    #[default]
    Playing,
    /// Input and time steps are dropped until the session resumes.
    Paused,
    /// The level reported completion; only queries are answered.
    LevelComplete,
}
