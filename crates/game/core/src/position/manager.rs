use crate::item::{
    DragBeginOutcome, DragEndOutcome, DragMoveOutcome, InstanceFlags, ItemContext, ItemInstance,
    ItemTickReport,
};
use crate::state::{InstanceId, ItemSnapshot, ManagerId, ManagerSnapshot, SlotId, SlotSnapshot, Vec2};
use crate::timing::Countdown;

use super::SlotBoard;

/// Where a manager reports once every slot is held.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompletionRoute {
    /// Finishes the whole level.
    #[default]
    CompleteLevel,
    /// Signals the phase manager. Completion is not checked until `grace`
    /// seconds after the manager became active.
    SignalPhase { grace: f32 },
}

/// A completion that fired on this poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionSignal {
    CompleteLevel,
    SignalPhase,
}

/// Authority over one set of slots and the instances that compete for them.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionManager {
    id: ManagerId,
    board: SlotBoard,
    items: Vec<ItemInstance>,
    completion: CompletionRoute,
    grace: Countdown,
    completion_fired: bool,
    active: bool,
}

impl PositionManager {
    pub fn new(id: ManagerId, board: SlotBoard, completion: CompletionRoute) -> Self {
        let grace = match completion {
            CompletionRoute::CompleteLevel => Countdown::elapsed(),
            CompletionRoute::SignalPhase { grace } => Countdown::new(grace),
        };
        Self {
            id,
            board,
            items: Vec::new(),
            completion,
            grace,
            completion_fired: false,
            active: true,
        }
    }

    pub fn id(&self) -> ManagerId {
        self.id
    }

    pub fn board(&self) -> &SlotBoard {
        &self.board
    }

    pub fn completion(&self) -> CompletionRoute {
        self.completion
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_fired_completion(&self) -> bool {
        self.completion_fired
    }

    pub fn items(&self) -> &[ItemInstance] {
        &self.items
    }

    pub fn item(&self, instance: InstanceId) -> Option<&ItemInstance> {
        self.items.iter().find(|item| item.id() == instance)
    }

    pub fn contains(&self, instance: InstanceId) -> bool {
        self.item(instance).is_some()
    }

    pub fn spawn(&mut self, instance: ItemInstance) {
        tracing::debug!(
            target: "snapfit::position",
            manager = %self.id,
            instance = %instance.id(),
            item = %instance.item_id(),
            name = instance.record().label(),
            "instance spawned"
        );
        self.items.push(instance);
    }

    // ===== occupancy =====

    /// Frees the slot at `point` and sends its holder back to wandering.
    pub fn release(&mut self, point: Vec2) -> bool {
        self.board
            .slot_at(point)
            .and_then(|slot| self.release_slot(slot))
            .is_some()
    }

    pub fn release_slot(&mut self, slot: SlotId) -> Option<InstanceId> {
        let holder = self.board.release_slot(slot)?;
        if let Some(item) = self.items.iter_mut().find(|item| item.id() == holder) {
            item.unsnap();
        }
        Some(holder)
    }

    pub fn is_occupied(&self, slot: SlotId) -> bool {
        self.board.is_occupied(slot)
    }

    pub fn is_position_occupied(&self, point: Vec2) -> bool {
        self.board.is_position_occupied(point)
    }

    pub fn occupied_count(&self) -> usize {
        self.board.occupied_count()
    }

    pub fn slot_count(&self) -> usize {
        self.board.slot_count()
    }

    pub fn is_level_complete(&self) -> bool {
        self.board.is_complete()
    }

    // ===== lifecycle =====

    pub fn pause_all(&mut self) {
        self.set_all(InstanceFlags::PAUSED, true);
        tracing::debug!(target: "snapfit::position", manager = %self.id, "paused");
    }

    pub fn unpause_all(&mut self) {
        self.set_all(InstanceFlags::PAUSED, false);
        tracing::debug!(target: "snapfit::position", manager = %self.id, "unpaused");
    }

    /// Pauses and stops rendering every instance.
    pub fn hide_all(&mut self) {
        self.set_all(InstanceFlags::PAUSED | InstanceFlags::HIDDEN, true);
        tracing::debug!(target: "snapfit::position", manager = %self.id, "hidden");
    }

    /// An inactive manager neither ticks nor accepts input.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        if active {
            if let CompletionRoute::SignalPhase { grace } = self.completion {
                self.grace.reset(grace);
            }
        }
        tracing::debug!(target: "snapfit::position", manager = %self.id, active, "activity changed");
    }

    fn set_all(&mut self, flags: InstanceFlags, on: bool) {
        for item in &mut self.items {
            item.set_flag(flags, on);
        }
    }

    // ===== input routing =====

    fn item_mut(&mut self, instance: InstanceId) -> Option<&mut ItemInstance> {
        self.items.iter_mut().find(|item| item.id() == instance)
    }

    /// `None` when the instance does not belong to this manager.
    pub fn begin_drag(
        &mut self,
        instance: InstanceId,
        cursor: Vec2,
        ctx: &ItemContext<'_>,
    ) -> Option<DragBeginOutcome> {
        let active = self.active;
        let item = self.item_mut(instance)?;
        if !active {
            return Some(DragBeginOutcome::Ignored);
        }
        Some(item.begin_drag(cursor, ctx))
    }

    pub fn drag_to(
        &mut self,
        instance: InstanceId,
        cursor: Vec2,
        ctx: &ItemContext<'_>,
    ) -> Option<DragMoveOutcome> {
        let active = self.active;
        let item = self.item_mut(instance)?;
        if !active {
            return Some(DragMoveOutcome::Ignored);
        }
        Some(item.drag_to(cursor, ctx))
    }

    pub fn end_drag(
        &mut self,
        instance: InstanceId,
        ctx: &ItemContext<'_>,
    ) -> Option<DragEndOutcome> {
        let Self { items, board, .. } = self;
        let item = items.iter_mut().find(|item| item.id() == instance)?;
        Some(item.end_drag(board, ctx))
    }

    /// Advances every instance and the completion grace timer.
    pub fn tick(&mut self, dt: f32, ctx: &ItemContext<'_>) -> Vec<(InstanceId, ItemTickReport)> {
        if !self.active {
            return Vec::new();
        }
        self.grace.tick(dt);

        let Self { items, board, .. } = self;
        items
            .iter_mut()
            .map(|item| (item.id(), item.tick(dt, board, ctx)))
            .filter(|(_, report)| *report != ItemTickReport::default())
            .collect()
    }

    /// Reports completion while every slot is held.
    ///
    /// A level route latches on the first report. A phase signal keeps
    /// repeating on every poll until [`Self::acknowledge_signal`] is called,
    /// so a signal sent while no phase is listening is not lost.
    pub fn poll_completion(&mut self) -> Option<CompletionSignal> {
        if self.completion_fired || !self.active || !self.grace.is_elapsed() {
            return None;
        }
        if !self.board.is_complete() {
            return None;
        }
        match self.completion {
            CompletionRoute::CompleteLevel => {
                self.latch_completion();
                Some(CompletionSignal::CompleteLevel)
            }
            CompletionRoute::SignalPhase { .. } => Some(CompletionSignal::SignalPhase),
        }
    }

    /// Stops a phase signal from repeating once a phase has accepted it.
    pub(crate) fn acknowledge_signal(&mut self) {
        if !self.completion_fired {
            self.latch_completion();
        }
    }

    fn latch_completion(&mut self) {
        self.completion_fired = true;
        tracing::info!(
            target: "snapfit::position",
            manager = %self.id,
            slots = self.board.slot_count(),
            "all slots occupied"
        );
    }

    pub fn snapshot(&self) -> ManagerSnapshot {
        ManagerSnapshot {
            id: self.id,
            active: self.active,
            slots: self
                .board
                .slots()
                .map(|(slot, position)| SlotSnapshot {
                    slot,
                    position,
                    holder: self.board.holder(slot),
                })
                .collect(),
            occupied: self.board.occupied_count(),
            complete: self.board.is_complete(),
            items: self.items.iter().map(ItemSnapshot::of).collect(),
        }
    }
}
