use crate::state::{InstanceId, ItemId, ManagerId, SlotId};

/// Why a drop did not end in a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DropFailure {
    SlotTaken,
    NoSlotInRange,
    Refused,
}

/// Domain events collected by the level, drained with `Level::take_events`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelEvent {
    DragStarted {
        instance: InstanceId,
    },
    DragRejected {
        instance: InstanceId,
        waiting_for: ItemId,
    },
    ItemPassedOut {
        instance: InstanceId,
    },
    ItemRecovered {
        instance: InstanceId,
    },
    ItemSnapped {
        manager: ManagerId,
        instance: InstanceId,
        slot: SlotId,
        settling: bool,
    },
    DropFailed {
        manager: ManagerId,
        instance: InstanceId,
        reason: DropFailure,
    },
    SlotReleased {
        manager: ManagerId,
        instance: InstanceId,
        slot: SlotId,
    },
    ManagerCompleted {
        manager: ManagerId,
    },
    PhaseStarted {
        index: usize,
        name: String,
    },
    PhasesFinished,
    LevelCompleted,
}
