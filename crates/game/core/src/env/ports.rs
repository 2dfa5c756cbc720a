//! Presentation collaborators the core talks to.
//!
//! All calls are fire-and-forget. Implementations own whatever failure
//! handling they need (a missing audio clip is their problem to log), and
//! the core never consults a return value.

use crate::state::InstanceId;

/// Named sound effects emitted on state transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoundEffect {
    /// Drag rejected or released away from a free slot.
    ItemPlaceFail,
    /// Item locked onto a slot.
    ItemPlaced,
    /// Settle window ran out and the slot was released.
    SettleEnd,
    /// Item starts running around again.
    RunLoop,
}

/// Sound output.
pub trait AudioPort: Send + Sync {
    fn play_effect(&self, name: &str, volume: f32);
}

/// Per-item floating text (dialogue lines).
///
/// Positioning the label is the collaborator's job; it can query the item's
/// bounds from a level snapshot each frame.
pub trait LabelPort: Send + Sync {
    /// Shows `text` next to the item. An empty string clears the label.
    fn set_item_label(&self, instance: InstanceId, text: &str);
}

/// Named UI panels toggled by phase transitions.
pub trait UiPort: Send + Sync {
    fn set_panel_visible(&self, panel: &str, visible: bool);
}

/// External progression system told when the level is done.
pub trait CompletionPort: Send + Sync {
    fn complete_level(&self);
}
