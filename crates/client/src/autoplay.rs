//! Scripted player that drags wandering items onto free candidate slots.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use snapfit_core::{
    CompletionRoute, InputEvent, InstanceFlags, InstanceId, ItemId, ItemPhase, ItemRecord, ItemSnapshot,
    LevelDefinition, LevelSnapshot, ManagerId, ManagerSnapshot, PhaseKind, Vec2,
};

/// Horizontal swing used to shake an item; kept inside the snap range.
const SHAKE_AMPLITUDE: f32 = 0.25;
const SHAKE_SWINGS: usize = 8;

/// What the player wants to do next.
#[derive(Debug, PartialEq)]
pub enum Move {
    /// A full drag gesture, fed to the runtime in order.
    Drag(Vec<InputEvent>),
    /// The running phase waits for an outside signal and nothing else will send it.
    SignalPhase,
    Idle,
}

pub struct Autoplayer {
    records: BTreeMap<(ManagerId, ItemId), ItemRecord>,
    routes: BTreeMap<ManagerId, CompletionRoute>,
    phase_kinds: Vec<PhaseKind>,
    epsilon: f32,
    rng: StdRng,
}

impl Autoplayer {
    pub fn new(definition: &LevelDefinition, slot_epsilon: f32, seed: u64) -> Self {
        let records = definition
            .managers
            .iter()
            .flat_map(|manager| {
                manager
                    .items
                    .iter()
                    .map(move |record| ((manager.id, record.id), record.clone()))
            })
            .collect();
        let routes = definition
            .managers
            .iter()
            .map(|manager| (manager.id, manager.completion))
            .collect();
        let phase_kinds = definition
            .phases
            .as_ref()
            .map(|script| script.phases.iter().map(|phase| phase.kind).collect())
            .unwrap_or_default();

        Self {
            records,
            routes,
            phase_kinds,
            epsilon: slot_epsilon,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Plans the next move, passing over instances listed in `skip`.
    pub fn next_move(&mut self, snapshot: &LevelSnapshot, skip: &BTreeSet<InstanceId>) -> Move {
        let snapped: BTreeSet<ItemId> = snapshot
            .items()
            .filter(|item| item.slot.is_some())
            .map(|item| item.item)
            .collect();

        for manager in snapshot.managers.iter().filter(|manager| manager.active) {
            for item in manager.items.iter().filter(|item| !skip.contains(&item.instance)) {
                if let Some(gesture) = self.plan_drag(manager, item, &snapped) {
                    return Move::Drag(gesture);
                }
            }
        }

        if self.should_signal(snapshot) {
            return Move::SignalPhase;
        }
        Move::Idle
    }

    fn plan_drag(
        &mut self,
        manager: &ManagerSnapshot,
        item: &ItemSnapshot,
        snapped: &BTreeSet<ItemId>,
    ) -> Option<Vec<InputEvent>> {
        if item.phase != ItemPhase::Wandering
            || item.flags.intersects(InstanceFlags::PAUSED | InstanceFlags::HIDDEN)
        {
            return None;
        }
        let record = self.records.get(&(manager.id, item.item))?;
        if record.prerequisite.is_some_and(|needed| !snapped.contains(&needed)) {
            return None;
        }

        let target = record
            .correct_positions
            .iter()
            .copied()
            .find(|candidate| {
                manager.free_slots().any(|slot| slot.position.distance(*candidate) <= self.epsilon)
            })?;

        let instance = item.instance;
        let mut gesture = vec![InputEvent::DragBegin {
            instance,
            cursor: item.position,
        }];

        if record.snap_requires_pass_out && !item.passed_out {
            // Swing around the target until the item passes out where it hangs.
            let amplitude = SHAKE_AMPLITUDE.min(record.snap_range * 0.4);
            for swing in 0..SHAKE_SWINGS {
                let side = if swing % 2 == 0 { amplitude } else { -amplitude };
                gesture.push(InputEvent::DragMove {
                    instance,
                    cursor: target + Vec2::new(side, 0.0),
                });
            }
        } else {
            let midpoint = item.position + (target - item.position) * 0.5;
            gesture.push(InputEvent::DragMove {
                instance,
                cursor: midpoint,
            });
        }

        let jitter = record.snap_range * 0.3;
        let cursor = target
            + Vec2::new(
                self.rng.gen_range(-jitter..=jitter),
                self.rng.gen_range(-jitter..=jitter),
            );
        gesture.push(InputEvent::DragEnd { instance, cursor });
        Some(gesture)
    }

    /// Signals only when the running external phase has no signalling manager
    /// of its own and every active manager is already complete.
    fn should_signal(&self, snapshot: &LevelSnapshot) -> bool {
        let Some(phase) = snapshot.phase.as_ref().filter(|phase| !phase.finished) else {
            return false;
        };
        if self.phase_kinds.get(phase.index) != Some(&PhaseKind::ExternalSignal) {
            return false;
        }
        let active: Vec<_> = snapshot.managers.iter().filter(|manager| manager.active).collect();
        let has_signaller = active.iter().any(|manager| {
            matches!(
                self.routes.get(&manager.id),
                Some(CompletionRoute::SignalPhase { .. })
            )
        });
        !has_signaller && active.iter().all(|manager| manager.complete)
    }
}
