//! The level aggregate.
//!
//! [`Level`] owns every position manager, the optional phase manager, the
//! clock and the random source. All mutation enters through
//! [`Level::handle_input`], [`Level::tick`] and [`Level::signal_phase_done`];
//! each call finishes its own completion check before returning, so a
//! level-completing drop is reported in the call that made it.
mod definition;
mod error;
mod events;
mod input;

pub use definition::{LevelDefinition, ManagerDefinition};
pub use error::LevelError;
pub use events::{DropFailure, LevelEvent};
pub use input::InputEvent;

use std::collections::BTreeSet;

use crate::config::{GameConfig, SettlePolicy};
use crate::env::{PcgRng, Ports, RngOracle};
use crate::item::{
    DragBeginOutcome, DragEndOutcome, DragMoveOutcome, ItemConfigError, ItemContext, ItemInstance,
    ItemRecord,
};
use crate::phase::{LevelPhaseManager, PhaseAction, PhaseAdvance};
use crate::position::{CompletionRoute, CompletionSignal, PositionManager, SlotBoard};
use crate::state::{Bounds, InstanceId, ItemId, LevelSnapshot, ManagerId, PhaseSnapshot, Vec2};

pub struct Level {
    name: String,
    seed: u64,
    bounds: Bounds,
    config: GameConfig,
    settle_policy: SettlePolicy,
    rng: Box<dyn RngOracle>,
    managers: Vec<PositionManager>,
    phases: Option<LevelPhaseManager>,
    clock: f32,
    next_instance: u32,
    started: bool,
    completed: bool,
    events: Vec<LevelEvent>,
    skipped: Vec<ItemConfigError>,
}

impl Level {
    /// Builds a level with the default [`PcgRng`].
    pub fn build(definition: LevelDefinition, config: GameConfig) -> Result<Self, LevelError> {
        Self::build_with_rng(definition, config, Box::new(PcgRng))
    }

    /// Builds a level. Invalid item records are logged and skipped; structural
    /// problems (managers, phases) fail the whole build.
    pub fn build_with_rng(
        definition: LevelDefinition,
        config: GameConfig,
        rng: Box<dyn RngOracle>,
    ) -> Result<Self, LevelError> {
        validate_structure(&definition)?;

        let phases = definition
            .phases
            .clone()
            .map(LevelPhaseManager::new)
            .transpose()?;
        let settle_policy = definition.settle_policy.unwrap_or(config.settle_policy);
        let accepted = accepted_items(&definition);

        let mut level = Self {
            name: definition.name,
            seed: definition.seed,
            bounds: definition.bounds,
            config,
            settle_policy,
            rng,
            managers: Vec::with_capacity(definition.managers.len()),
            phases,
            clock: 0.0,
            next_instance: 0,
            started: false,
            completed: false,
            events: Vec::new(),
            skipped: accepted.rejected,
        };

        for (manager_index, manager_def) in definition.managers.into_iter().enumerate() {
            let records: Vec<ItemRecord> = manager_def
                .items
                .into_iter()
                .enumerate()
                .filter(|(record_index, _)| accepted.keep.contains(&(manager_index, *record_index)))
                .map(|(_, record)| record)
                .collect();
            let points = if manager_def.slots.is_empty() {
                records
                    .iter()
                    .flat_map(|record| record.correct_positions.iter().copied())
                    .collect()
            } else {
                manager_def.slots
            };

            let board = SlotBoard::new(points, level.config.slot_epsilon);
            if board.slot_count() == 0 {
                tracing::warn!(target: "snapfit::level", manager = %manager_def.id, "manager has no slots and can never complete");
            }
            let mut manager = PositionManager::new(manager_def.id, board, manager_def.completion);

            for record in records {
                for candidate in &record.correct_positions {
                    if manager.board().slot_at(*candidate).is_none() {
                        tracing::warn!(
                            target: "snapfit::level",
                            manager = %manager_def.id,
                            item = %record.id,
                            %candidate,
                            "candidate position is not a slot of its manager"
                        );
                    }
                }
                let id = InstanceId(level.next_instance);
                level.next_instance += 1;
                manager.spawn(ItemInstance::spawn(
                    id,
                    record,
                    &level.config,
                    level.rng.as_ref(),
                    level.seed,
                ));
            }

            manager.set_active(manager_def.active);
            level.managers.push(manager);
        }

        tracing::info!(
            target: "snapfit::level",
            name = %level.name,
            managers = level.managers.len(),
            instances = level.next_instance,
            skipped = level.skipped.len(),
            policy = %level.settle_policy,
            "level built"
        );
        Ok(level)
    }

    // ===== accessors =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn settle_policy(&self) -> SettlePolicy {
        self.settle_policy
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn managers(&self) -> &[PositionManager] {
        &self.managers
    }

    pub fn manager(&self, id: ManagerId) -> Option<&PositionManager> {
        self.managers.iter().find(|manager| manager.id() == id)
    }

    pub fn phases(&self) -> Option<&LevelPhaseManager> {
        self.phases.as_ref()
    }

    /// Records rejected while building, with the reason.
    pub fn skipped_items(&self) -> &[ItemConfigError] {
        &self.skipped
    }

    pub fn item(&self, instance: InstanceId) -> Option<&ItemInstance> {
        self.managers.iter().find_map(|manager| manager.item(instance))
    }

    pub fn instances(&self) -> impl Iterator<Item = &ItemInstance> {
        self.managers.iter().flat_map(|manager| manager.items())
    }

    /// Drains the events produced since the last call.
    pub fn take_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.events)
    }

    /// Records snapped anywhere in the level.
    pub fn snapped_items(&self) -> BTreeSet<ItemId> {
        self.instances()
            .filter(|item| item.is_snapped())
            .map(ItemInstance::item_id)
            .collect()
    }

    // ===== lifecycle =====

    /// Creates the item labels and enters the first phase. Runs once; input
    /// and ticks call it implicitly.
    pub fn start(&mut self, ports: &Ports<'_>) {
        if self.started {
            return;
        }
        self.started = true;

        for item in self.managers.iter().flat_map(|manager| manager.items()) {
            ports.set_label(item.id(), "");
        }
        if let Some(phases) = self.phases.as_mut() {
            phases.start();
            if let Some(phase) = phases.current() {
                self.events.push(LevelEvent::PhaseStarted {
                    index: phases.current_index(),
                    name: phase.name.clone(),
                });
            }
        }
        tracing::info!(target: "snapfit::level", name = %self.name, "level started");
    }

    pub fn handle_input(&mut self, input: InputEvent, ports: &Ports<'_>) -> Result<(), LevelError> {
        self.start(ports);

        let instance = input.instance();
        let index = self
            .managers
            .iter()
            .position(|manager| manager.contains(instance))
            .ok_or(LevelError::UnknownInstance { instance })?;

        let snapped = self.snapped_items();
        let ctx = ItemContext {
            config: &self.config,
            rng: self.rng.as_ref(),
            level_seed: self.seed,
            now: self.clock,
            bounds: &self.bounds,
            settle_policy: self.settle_policy,
            ports: *ports,
            snapped_items: &snapped,
        };
        let manager = &mut self.managers[index];
        let manager_id = manager.id();

        match input {
            InputEvent::DragBegin { cursor, .. } => match manager.begin_drag(instance, cursor, &ctx) {
                Some(DragBeginOutcome::Started) => {
                    self.events.push(LevelEvent::DragStarted { instance });
                }
                Some(DragBeginOutcome::Rejected { waiting_for }) => {
                    self.events.push(LevelEvent::DragRejected {
                        instance,
                        waiting_for,
                    });
                }
                _ => {}
            },
            InputEvent::DragMove { cursor, .. } => {
                if manager.drag_to(instance, cursor, &ctx) == Some(DragMoveOutcome::PassedOut) {
                    self.events.push(LevelEvent::ItemPassedOut { instance });
                }
            }
            InputEvent::DragEnd { cursor, .. } => {
                if manager.drag_to(instance, cursor, &ctx) == Some(DragMoveOutcome::PassedOut) {
                    self.events.push(LevelEvent::ItemPassedOut { instance });
                }
                let reason = match manager.end_drag(instance, &ctx) {
                    Some(DragEndOutcome::Snapped { slot, settling }) => {
                        self.events.push(LevelEvent::ItemSnapped {
                            manager: manager_id,
                            instance,
                            slot,
                            settling,
                        });
                        None
                    }
                    Some(DragEndOutcome::SlotTaken) => Some(DropFailure::SlotTaken),
                    Some(DragEndOutcome::NoSlotInRange) => Some(DropFailure::NoSlotInRange),
                    Some(DragEndOutcome::Refused) => Some(DropFailure::Refused),
                    Some(DragEndOutcome::Ignored) | None => None,
                };
                if let Some(reason) = reason {
                    self.events.push(LevelEvent::DropFailed {
                        manager: manager_id,
                        instance,
                        reason,
                    });
                }
            }
        }

        self.evaluate_completion(ports);
        Ok(())
    }

    /// Advances items, grace timers and phases by `dt` seconds.
    pub fn tick(&mut self, dt: f32, ports: &Ports<'_>) {
        self.start(ports);
        let dt = dt.max(0.0);
        self.clock += dt;

        let snapped = self.snapped_items();
        let ctx = ItemContext {
            config: &self.config,
            rng: self.rng.as_ref(),
            level_seed: self.seed,
            now: self.clock,
            bounds: &self.bounds,
            settle_policy: self.settle_policy,
            ports: *ports,
            snapped_items: &snapped,
        };
        for manager in &mut self.managers {
            let manager_id = manager.id();
            for (instance, report) in manager.tick(dt, &ctx) {
                if let Some(slot) = report.released {
                    self.events.push(LevelEvent::SlotReleased {
                        manager: manager_id,
                        instance,
                        slot,
                    });
                }
                if report.recovered {
                    self.events.push(LevelEvent::ItemRecovered { instance });
                }
            }
        }

        let advance = self.phases.as_mut().and_then(|phases| phases.tick(dt));
        if let Some(advance) = advance {
            self.apply_advance(advance, ports);
        }
        self.evaluate_completion(ports);
    }

    /// External end-of-phase signal. Ignored unless the running phase waits
    /// for one. Returns whether a phase ended.
    pub fn signal_phase_done(&mut self, ports: &Ports<'_>) -> bool {
        self.start(ports);
        let advanced = self.end_signal_phase(ports);
        self.evaluate_completion(ports);
        advanced
    }

    fn end_signal_phase(&mut self, ports: &Ports<'_>) -> bool {
        let advance = self
            .phases
            .as_mut()
            .and_then(LevelPhaseManager::signal_phase_done);
        match advance {
            Some(advance) => {
                self.apply_advance(advance, ports);
                true
            }
            None => false,
        }
    }

    /// Phase signals that no phase accepts stay pending and are retried on
    /// the next evaluation.
    fn evaluate_completion(&mut self, ports: &Ports<'_>) {
        for index in 0..self.managers.len() {
            let Some(signal) = self.managers[index].poll_completion() else {
                continue;
            };
            let manager = self.managers[index].id();
            match signal {
                CompletionSignal::CompleteLevel => {
                    self.events.push(LevelEvent::ManagerCompleted { manager });
                    self.report_completion(ports);
                }
                CompletionSignal::SignalPhase => {
                    if !self.end_signal_phase(ports) {
                        continue;
                    }
                    self.managers[index].acknowledge_signal();
                    self.events.push(LevelEvent::ManagerCompleted { manager });
                }
            }
        }
    }

    fn apply_advance(&mut self, advance: PhaseAdvance, ports: &Ports<'_>) {
        for action in &advance.actions {
            self.apply_action(action, ports);
        }
        match advance.next {
            Some(index) => {
                let name = self
                    .phases
                    .as_ref()
                    .and_then(|phases| phases.current())
                    .map(|phase| phase.name.clone())
                    .unwrap_or_default();
                self.events.push(LevelEvent::PhaseStarted { index, name });
            }
            None => {
                self.events.push(LevelEvent::PhasesFinished);
                self.report_completion(ports);
            }
        }
    }

    fn apply_action(&mut self, action: &PhaseAction, ports: &Ports<'_>) {
        tracing::debug!(target: "snapfit::level", ?action, "phase action");
        if let Some(id) = action.manager() {
            let Some(manager) = self.managers.iter_mut().find(|manager| manager.id() == id) else {
                tracing::error!(target: "snapfit::level", manager = %id, "phase action targets a missing manager");
                return;
            };
            match action {
                PhaseAction::Pause(_) => manager.pause_all(),
                PhaseAction::Unpause(_) => manager.unpause_all(),
                PhaseAction::Hide(_) => manager.hide_all(),
                PhaseAction::Activate(_) => manager.set_active(true),
                PhaseAction::Deactivate(_) => manager.set_active(false),
                PhaseAction::ShowUi(_) | PhaseAction::HideUi(_) => {}
            }
            return;
        }
        match action {
            PhaseAction::ShowUi(panel) => ports.set_panel(panel, true),
            PhaseAction::HideUi(panel) => ports.set_panel(panel, false),
            _ => {}
        }
    }

    fn report_completion(&mut self, ports: &Ports<'_>) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.events.push(LevelEvent::LevelCompleted);
        tracing::info!(target: "snapfit::level", name = %self.name, clock = self.clock, "level complete");
        ports.complete_level();
    }

    // ===== queries =====

    /// Topmost pickable instance under `point`.
    pub fn hit_test(&self, point: Vec2) -> Option<InstanceId> {
        self.managers
            .iter()
            .filter(|manager| manager.is_active())
            .flat_map(|manager| manager.items())
            .filter(|item| item.hit(point))
            .max_by_key(|item| (item.sorting_layer().order(), item.id()))
            .map(ItemInstance::id)
    }

    pub fn snapshot(&self) -> LevelSnapshot {
        LevelSnapshot {
            name: self.name.clone(),
            clock: self.clock,
            completed: self.completed,
            phase: self.phases.as_ref().map(|phases| PhaseSnapshot {
                index: phases.current_index(),
                name: phases.current().map(|phase| phase.name.clone()),
                finished: phases.is_finished(),
            }),
            managers: self.managers.iter().map(PositionManager::snapshot).collect(),
        }
    }
}

impl std::fmt::Debug for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Level")
            .field("name", &self.name)
            .field("seed", &self.seed)
            .field("clock", &self.clock)
            .field("managers", &self.managers.len())
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

fn validate_structure(definition: &LevelDefinition) -> Result<(), LevelError> {
    if definition.managers.is_empty() {
        return Err(LevelError::NoManagers);
    }

    let mut seen = BTreeSet::new();
    for manager in &definition.managers {
        if !seen.insert(manager.id) {
            return Err(LevelError::DuplicateManager {
                manager: manager.id,
            });
        }
        if matches!(manager.completion, CompletionRoute::SignalPhase { .. })
            && definition.phases.is_none()
        {
            return Err(LevelError::SignalWithoutPhases {
                manager: manager.id,
            });
        }
    }

    if let Some(script) = &definition.phases {
        script.validate()?;
        if let Some(manager) = script
            .actions()
            .filter_map(PhaseAction::manager)
            .find(|id| !seen.contains(id))
        {
            return Err(LevelError::UnknownManager { manager });
        }
    }
    Ok(())
}

/// Outcome of checking every record in a definition.
struct AcceptedItems {
    /// `(manager index, record index)` of every record to spawn.
    keep: BTreeSet<(usize, usize)>,
    rejected: Vec<ItemConfigError>,
}

fn reject(error: ItemConfigError, rejected: &mut Vec<ItemConfigError>) {
    tracing::error!(target: "snapfit::level", %error, "item skipped");
    rejected.push(error);
}

fn accepted_items(definition: &LevelDefinition) -> AcceptedItems {
    let mut keep = BTreeSet::new();
    let mut ids = BTreeSet::new();
    let mut rejected = Vec::new();

    for (manager_index, manager) in definition.managers.iter().enumerate() {
        for (record_index, record) in manager.items.iter().enumerate() {
            if let Err(error) = record.validate() {
                reject(error, &mut rejected);
                continue;
            }
            if !ids.insert(record.id) {
                reject(ItemConfigError::DuplicateItemId { item: record.id }, &mut rejected);
                continue;
            }
            keep.insert((manager_index, record_index));
        }
    }

    let dangling: Vec<((usize, usize), ItemId, ItemId)> = keep
        .iter()
        .filter_map(|&(manager_index, record_index)| {
            let record = &definition.managers[manager_index].items[record_index];
            record
                .prerequisite
                .filter(|prerequisite| !ids.contains(prerequisite))
                .map(|prerequisite| ((manager_index, record_index), record.id, prerequisite))
        })
        .collect();
    for (key, item, prerequisite) in dangling {
        keep.remove(&key);
        reject(ItemConfigError::UnknownPrerequisite { item, prerequisite }, &mut rejected);
    }

    AcceptedItems { keep, rejected }
}

#[cfg(test)]
mod tests;
