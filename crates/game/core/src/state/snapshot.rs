//! Read-only views of a level for observers.
//!
//! Snapshots are plain data: cloning one never touches the live level, and
//! every presentation value in them (layer, legs) is already derived.

use crate::item::{InstanceFlags, ItemInstance, ItemPhase, LegsState, SortingLayer};

use super::{InstanceId, ItemId, ManagerId, SlotId, Vec2};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemSnapshot {
    pub instance: InstanceId,
    pub item: ItemId,
    pub name: String,
    pub position: Vec2,
    pub phase: ItemPhase,
    pub slot: Option<SlotId>,
    pub layer: SortingLayer,
    pub legs: LegsState,
    pub flags: InstanceFlags,
    pub passed_out: bool,
    pub rotation_degrees: f32,
    pub scale: Vec2,
}

impl ItemSnapshot {
    pub fn of(item: &ItemInstance) -> Self {
        let record = item.record();
        Self {
            instance: item.id(),
            item: record.id,
            name: record.name.clone(),
            position: item.position(),
            phase: item.phase(),
            slot: item.occupied_slot(),
            layer: item.sorting_layer(),
            legs: item.legs_state(),
            flags: item.flags(),
            passed_out: item.is_passed_out(),
            rotation_degrees: record.rotation_degrees,
            scale: record.scale,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotSnapshot {
    pub slot: SlotId,
    pub position: Vec2,
    pub holder: Option<InstanceId>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManagerSnapshot {
    pub id: ManagerId,
    pub active: bool,
    pub slots: Vec<SlotSnapshot>,
    pub occupied: usize,
    pub complete: bool,
    pub items: Vec<ItemSnapshot>,
}

impl ManagerSnapshot {
    /// Free slots, in declaration order.
    pub fn free_slots(&self) -> impl Iterator<Item = &SlotSnapshot> {
        self.slots.iter().filter(|slot| slot.holder.is_none())
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseSnapshot {
    /// Index of the running phase; equals the phase count once finished.
    pub index: usize,
    pub name: Option<String>,
    pub finished: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelSnapshot {
    pub name: String,
    /// Level clock in seconds.
    pub clock: f32,
    pub completed: bool,
    pub phase: Option<PhaseSnapshot>,
    pub managers: Vec<ManagerSnapshot>,
}

impl LevelSnapshot {
    pub fn items(&self) -> impl Iterator<Item = &ItemSnapshot> {
        self.managers.iter().flat_map(|manager| manager.items.iter())
    }

    pub fn item(&self, instance: InstanceId) -> Option<&ItemSnapshot> {
        self.items().find(|item| item.instance == instance)
    }

    /// Manager that owns `instance`.
    pub fn manager_of(&self, instance: InstanceId) -> Option<&ManagerSnapshot> {
        self.managers
            .iter()
            .find(|manager| manager.items.iter().any(|item| item.instance == instance))
    }
}
