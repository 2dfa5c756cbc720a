use crate::state::{InstanceId, Vec2};

/// Drag input with the cursor already mapped to world space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputEvent {
    DragBegin { instance: InstanceId, cursor: Vec2 },
    DragMove { instance: InstanceId, cursor: Vec2 },
    /// The cursor is applied as a last move before the drop resolves.
    DragEnd { instance: InstanceId, cursor: Vec2 },
}

impl InputEvent {
    pub fn instance(&self) -> InstanceId {
        match self {
            InputEvent::DragBegin { instance, .. }
            | InputEvent::DragMove { instance, .. }
            | InputEvent::DragEnd { instance, .. } => *instance,
        }
    }

    pub fn cursor(&self) -> Vec2 {
        match self {
            InputEvent::DragBegin { cursor, .. }
            | InputEvent::DragMove { cursor, .. }
            | InputEvent::DragEnd { cursor, .. } => *cursor,
        }
    }
}
