//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and the level itself so clients
//! can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use snapfit_core::LevelError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("time step must be finite and non-negative, got {dt}")]
    InvalidTimeStep { dt: f32 },

    #[error(transparent)]
    Level(#[from] LevelError),
}
