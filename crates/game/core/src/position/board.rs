//! Slot occupancy for one position manager.
//!
//! [`SlotBoard`] is the only writer of occupancy. Slots are addressed by
//! [`SlotId`]; points are resolved to slots once, through a fixed epsilon,
//! so two near-coincident candidates can never be claimed twice.

use std::collections::BTreeMap;

use crate::state::{InstanceId, SlotId, Vec2};

use super::OccupyError;

#[derive(Clone, Debug, PartialEq)]
pub struct SlotBoard {
    slots: Vec<Vec2>,
    epsilon: f32,
    occupancy: BTreeMap<SlotId, InstanceId>,
}

impl SlotBoard {
    /// Builds a board from raw points. Points within `epsilon` of an earlier
    /// one collapse into that slot.
    pub fn new(points: impl IntoIterator<Item = Vec2>, epsilon: f32) -> Self {
        let epsilon = epsilon.max(0.0);
        let mut slots: Vec<Vec2> = Vec::new();
        for point in points {
            if slots.iter().any(|existing| existing.distance(point) <= epsilon) {
                tracing::debug!(target: "snapfit::position", %point, "duplicate slot collapsed");
                continue;
            }
            slots.push(point);
        }
        Self {
            slots,
            epsilon,
            occupancy: BTreeMap::new(),
        }
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.occupancy.len()
    }

    /// All slots with their positions, in declaration order.
    pub fn slots(&self) -> impl Iterator<Item = (SlotId, Vec2)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, point)| (SlotId(index as u32), *point))
    }

    pub fn position(&self, slot: SlotId) -> Option<Vec2> {
        self.slots.get(slot.index()).copied()
    }

    /// Resolves a point to the nearest slot within epsilon.
    pub fn slot_at(&self, point: Vec2) -> Option<SlotId> {
        self.slots()
            .map(|(slot, at)| (slot, at.distance(point)))
            .filter(|(_, distance)| *distance <= self.epsilon)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(slot, _)| slot)
    }

    pub fn is_occupied(&self, slot: SlotId) -> bool {
        self.occupancy.contains_key(&slot)
    }

    pub fn is_position_occupied(&self, point: Vec2) -> bool {
        self.slot_at(point).is_some_and(|slot| self.is_occupied(slot))
    }

    pub fn holder(&self, slot: SlotId) -> Option<InstanceId> {
        self.occupancy.get(&slot).copied()
    }

    /// Slot currently held by `instance`, if any.
    pub fn slot_of(&self, instance: InstanceId) -> Option<SlotId> {
        self.occupancy
            .iter()
            .find_map(|(slot, holder)| (*holder == instance).then_some(*slot))
    }

    /// Claims `slot` for `instance`. First caller wins.
    pub fn occupy(&mut self, slot: SlotId, instance: InstanceId) -> Result<(), OccupyError> {
        if slot.index() >= self.slots.len() {
            return Err(OccupyError::UnknownSlot { slot });
        }
        if let Some(holder) = self.holder(slot) {
            return Err(OccupyError::AlreadyOccupied { slot, holder });
        }
        self.occupancy.insert(slot, instance);
        tracing::debug!(
            target: "snapfit::position",
            %slot,
            %instance,
            occupied = self.occupancy.len(),
            total = self.slots.len(),
            "slot occupied"
        );
        Ok(())
    }

    /// Frees `slot` and returns who held it. Freeing an empty slot is a no-op.
    pub fn release_slot(&mut self, slot: SlotId) -> Option<InstanceId> {
        let holder = self.occupancy.remove(&slot)?;
        tracing::debug!(
            target: "snapfit::position",
            %slot,
            instance = %holder,
            occupied = self.occupancy.len(),
            "slot released"
        );
        Some(holder)
    }

    /// Frees whatever slot lies within epsilon of `point`.
    pub fn release(&mut self, point: Vec2) -> bool {
        self.slot_at(point)
            .and_then(|slot| self.release_slot(slot))
            .is_some()
    }

    /// True once every slot is held. A board without slots is never complete.
    pub fn is_complete(&self) -> bool {
        !self.slots.is_empty() && self.occupancy.len() >= self.slots.len()
    }
}
