use crate::error::{ErrorSeverity, GameError};
use crate::phase::PhaseError;
use crate::state::{InstanceId, ManagerId};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LevelError {
    #[error("level declares no position managers")]
    NoManagers,

    #[error("{manager} is declared more than once")]
    DuplicateManager { manager: ManagerId },

    #[error("phase transition targets {manager}, which the level does not declare")]
    UnknownManager { manager: ManagerId },

    #[error("{manager} signals a phase, but the level has no phase script")]
    SignalWithoutPhases { manager: ManagerId },

    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error("no manager owns instance {instance}")]
    UnknownInstance { instance: InstanceId },
}

impl GameError for LevelError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            LevelError::UnknownInstance { .. } => ErrorSeverity::Validation,
            LevelError::Phase(inner) => inner.severity(),
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            LevelError::NoManagers => "LEVEL_NO_MANAGERS",
            LevelError::DuplicateManager { .. } => "LEVEL_DUPLICATE_MANAGER",
            LevelError::UnknownManager { .. } => "LEVEL_UNKNOWN_MANAGER",
            LevelError::SignalWithoutPhases { .. } => "LEVEL_SIGNAL_WITHOUT_PHASES",
            LevelError::Phase(inner) => inner.error_code(),
            LevelError::UnknownInstance { .. } => "LEVEL_UNKNOWN_INSTANCE",
        }
    }
}
