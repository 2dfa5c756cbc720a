use crate::error::{ErrorSeverity, GameError};

/// A phase script that cannot be run.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseError {
    #[error("phase script has no phases")]
    Empty,

    #[error("phase {index} ({name}) has negative timer duration {duration}")]
    NegativeDuration {
        index: usize,
        name: String,
        duration: f32,
    },

    #[error("transition keyed on phase {index}, but the script only has {phases} phases")]
    TransitionOutOfRange { index: usize, phases: usize },
}

impl GameError for PhaseError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            PhaseError::Empty => "PHASE_EMPTY",
            PhaseError::NegativeDuration { .. } => "PHASE_NEGATIVE_DURATION",
            PhaseError::TransitionOutOfRange { .. } => "PHASE_TRANSITION_OUT_OF_RANGE",
        }
    }
}
