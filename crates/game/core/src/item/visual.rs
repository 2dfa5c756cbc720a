//! Presentation state derived from an item's logical state.
//!
//! None of these values are stored on the instance. They are recomputed from
//! the current state and flags whenever asked, so resuming from a pause can
//! never leave an item on a stale layer.

use bitflags::bitflags;

bitflags! {
    /// Orthogonal switches on an instance, toggled by its manager.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct InstanceFlags: u8 {
        /// Hit box enabled; cleared while snapped so the item cannot be re-dragged.
        const COLLIDER = 1 << 0;
        /// Frozen by the owning manager between phases.
        const PAUSED = 1 << 1;
        /// Not rendered.
        const HIDDEN = 1 << 2;
    }
}

impl Default for InstanceFlags {
    fn default() -> Self {
        Self::COLLIDER
    }
}

/// Render ordering bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortingLayer {
    /// Wandering items.
    ItemMove,
    /// The item under the cursor.
    Drag,
    /// Snapped items.
    Item,
    /// Paused items, drawn behind everything interactive.
    Background,
}

impl SortingLayer {
    /// Higher draws on top; used for picking the topmost item.
    pub const fn order(self) -> u8 {
        match self {
            SortingLayer::Background => 0,
            SortingLayer::Item => 1,
            SortingLayer::ItemMove => 2,
            SortingLayer::Drag => 3,
        }
    }
}

/// Animation state of the item's legs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegsState {
    /// Running animation.
    Moving,
    /// Dangling while carried.
    Dragging,
    /// Legs hidden; the item sits in its slot.
    Settled,
}

impl LegsState {
    pub const fn legs_visible(self) -> bool {
        !matches!(self, LegsState::Settled)
    }
}
