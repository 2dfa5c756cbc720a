use crate::error::{ErrorSeverity, GameError};
use crate::state::{InstanceId, SlotId};

/// Why a claim on a slot was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OccupyError {
    #[error("{slot} is not one of this manager's slots")]
    UnknownSlot { slot: SlotId },

    #[error("{slot} is already held by {holder}")]
    AlreadyOccupied { slot: SlotId, holder: InstanceId },
}

impl GameError for OccupyError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            OccupyError::UnknownSlot { .. } => ErrorSeverity::Validation,
            OccupyError::AlreadyOccupied { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            OccupyError::UnknownSlot { .. } => "OCCUPY_UNKNOWN_SLOT",
            OccupyError::AlreadyOccupied { .. } => "OCCUPY_ALREADY_OCCUPIED",
        }
    }
}
