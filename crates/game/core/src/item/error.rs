use crate::error::{ErrorSeverity, GameError};
use crate::state::ItemId;

/// Problems with a single item record. Fatal to that item's setup only.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemConfigError {
    #[error("{item} has no correct positions")]
    NoCorrectPositions { item: ItemId },

    #[error("{item} has non-positive snap range {snap_range}")]
    InvalidSnapRange { item: ItemId, snap_range: f32 },

    #[error("{item} has negative move speed {move_speed}")]
    NegativeSpeed { item: ItemId, move_speed: f32 },

    #[error("{item} has negative settle duration {settle_duration}")]
    NegativeSettleDuration { item: ItemId, settle_duration: f32 },

    #[error("{item} lists itself as its prerequisite")]
    SelfPrerequisite { item: ItemId },

    #[error("{item} is declared more than once")]
    DuplicateItemId { item: ItemId },

    #[error("{item} references {prerequisite}, which no manager in the level spawns")]
    UnknownPrerequisite { item: ItemId, prerequisite: ItemId },
}

impl GameError for ItemConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use ItemConfigError::*;
        match self {
            NoCorrectPositions { .. } => "ITEM_NO_CORRECT_POSITIONS",
            InvalidSnapRange { .. } => "ITEM_INVALID_SNAP_RANGE",
            NegativeSpeed { .. } => "ITEM_NEGATIVE_SPEED",
            NegativeSettleDuration { .. } => "ITEM_NEGATIVE_SETTLE_DURATION",
            SelfPrerequisite { .. } => "ITEM_SELF_PREREQUISITE",
            DuplicateItemId { .. } => "ITEM_DUPLICATE_ID",
            UnknownPrerequisite { .. } => "ITEM_UNKNOWN_PREREQUISITE",
        }
    }
}
