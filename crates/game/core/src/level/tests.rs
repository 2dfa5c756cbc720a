use std::sync::Mutex;

use super::*;
use crate::env::{AudioPort, CompletionPort, LabelPort, UiPort};
use crate::item::{ItemPhase, ItemRecord, ItemState, SortingLayer};
use crate::phase::{PhaseDescriptor, PhaseScript};
use crate::state::SlotId;

#[derive(Default)]
struct Recorder {
    sounds: Mutex<Vec<String>>,
    labels: Mutex<Vec<(InstanceId, String)>>,
    panels: Mutex<Vec<(String, bool)>>,
    completions: Mutex<usize>,
}

impl AudioPort for Recorder {
    fn play_effect(&self, name: &str, _volume: f32) {
        self.sounds.lock().unwrap().push(name.to_owned());
    }
}

impl LabelPort for Recorder {
    fn set_item_label(&self, instance: InstanceId, text: &str) {
        self.labels.lock().unwrap().push((instance, text.to_owned()));
    }
}

impl UiPort for Recorder {
    fn set_panel_visible(&self, panel: &str, visible: bool) {
        self.panels.lock().unwrap().push((panel.to_owned(), visible));
    }
}

impl CompletionPort for Recorder {
    fn complete_level(&self) {
        *self.completions.lock().unwrap() += 1;
    }
}

impl Recorder {
    fn ports(&self) -> Ports<'_> {
        Ports::empty()
            .with_audio(self)
            .with_labels(self)
            .with_ui(self)
            .with_completion(self)
    }

    fn completions(&self) -> usize {
        *self.completions.lock().unwrap()
    }

    fn played(&self, name: &str) -> usize {
        self.sounds.lock().unwrap().iter().filter(|sound| *sound == name).count()
    }
}

fn item(id: i32, at: Vec2) -> ItemRecord {
    ItemRecord::new(ItemId(id), vec![at]).with_name(format!("item-{id}"))
}

fn drag(level: &mut Level, instance: InstanceId, to: Vec2, ports: &Ports<'_>) {
    let from = level.item(instance).map(ItemInstance::position).unwrap();
    level
        .handle_input(InputEvent::DragBegin { instance, cursor: from }, ports)
        .unwrap();
    level
        .handle_input(InputEvent::DragMove { instance, cursor: to }, ports)
        .unwrap();
    level
        .handle_input(InputEvent::DragEnd { instance, cursor: to }, ports)
        .unwrap();
}

fn three_slot_level() -> Level {
    let slots = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
    let items = slots
        .iter()
        .enumerate()
        .map(|(index, at)| item(index as i32 + 1, *at))
        .collect();
    let manager = ManagerDefinition::new(ManagerId(0), items).with_slots(slots);
    Level::build(LevelDefinition::new("three", vec![manager]), GameConfig::default()).unwrap()
}

fn completions_in(events: &[LevelEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, LevelEvent::LevelCompleted))
        .count()
}

#[test]
fn three_slot_level_completes_exactly_once() {
    let recorder = Recorder::default();
    let ports = recorder.ports();
    let mut level = three_slot_level();

    drag(&mut level, InstanceId(0), Vec2::new(0.2, 0.1), &ports);
    let item = level.item(InstanceId(0)).unwrap();
    assert_eq!(item.phase(), ItemPhase::Snapped);
    assert_eq!(item.position(), Vec2::ZERO);
    let manager = level.manager(ManagerId(0)).unwrap();
    assert_eq!(manager.occupied_count(), 1);
    assert!(manager.is_occupied(SlotId(0)));
    assert!(!manager.is_level_complete());
    assert!(!level.is_completed());

    drag(&mut level, InstanceId(1), Vec2::new(1.1, 0.9), &ports);
    assert!(!level.is_completed());
    drag(&mut level, InstanceId(2), Vec2::new(2.0, 2.3), &ports);

    assert!(level.is_completed());
    assert_eq!(level.manager(ManagerId(0)).unwrap().occupied_count(), 3);
    assert_eq!(recorder.completions(), 1);

    for _ in 0..50 {
        level.tick(0.1, &ports);
    }
    assert_eq!(recorder.completions(), 1);
    assert_eq!(completions_in(&level.take_events()), 1);
}

#[test]
fn completion_is_detected_in_the_same_call_as_the_last_drop() {
    let recorder = Recorder::default();
    let ports = recorder.ports();
    let manager = ManagerDefinition::new(ManagerId(0), vec![item(1, Vec2::ZERO)]);
    let mut level = Level::build(LevelDefinition::new("one", vec![manager]), GameConfig::default()).unwrap();

    let instance = InstanceId(0);
    level
        .handle_input(InputEvent::DragBegin { instance, cursor: Vec2::ZERO }, &ports)
        .unwrap();
    level
        .handle_input(InputEvent::DragEnd { instance, cursor: Vec2::ZERO }, &ports)
        .unwrap();

    let events = level.take_events();
    assert!(matches!(events.last(), Some(LevelEvent::LevelCompleted)));
    assert_eq!(recorder.completions(), 1);
}

#[test]
fn two_items_racing_for_one_slot() {
    let recorder = Recorder::default();
    let ports = recorder.ports();
    let slot = Vec2::new(5.0, 5.0);
    let manager = ManagerDefinition::new(ManagerId(0), vec![item(1, slot), item(2, slot)]);
    let mut level = Level::build(LevelDefinition::new("race", vec![manager]), GameConfig::default()).unwrap();
    assert_eq!(level.manager(ManagerId(0)).unwrap().slot_count(), 1);

    drag(&mut level, InstanceId(0), Vec2::new(5.1, 5.0), &ports);
    drag(&mut level, InstanceId(1), Vec2::new(4.9, 5.0), &ports);

    assert!(level.item(InstanceId(0)).unwrap().is_snapped());
    let loser = level.item(InstanceId(1)).unwrap();
    assert_eq!(loser.state(), ItemState::Wandering);
    assert_eq!(loser.occupied_slot(), None);

    let events = level.take_events();
    assert!(events.contains(&LevelEvent::DropFailed {
        manager: ManagerId(0),
        instance: InstanceId(1),
        reason: DropFailure::SlotTaken,
    }));
    assert_eq!(recorder.played("ItemPlaceFail"), 1);
    assert_eq!(recorder.played("ItemPlaced"), 1);
}

#[test]
fn shaking_knocks_an_item_out_for_five_seconds() {
    let recorder = Recorder::default();
    let ports = recorder.ports();
    let record = item(1, Vec2::ZERO).with_shake();
    let manager = ManagerDefinition::new(ManagerId(0), vec![record]).with_slots(vec![Vec2::new(4.0, 4.0)]);
    let mut level = Level::build(LevelDefinition::new("shake", vec![manager]), GameConfig::default()).unwrap();
    let instance = InstanceId(0);

    level
        .handle_input(InputEvent::DragBegin { instance, cursor: Vec2::ZERO }, &ports)
        .unwrap();
    for step in 0..4 {
        level.tick(0.1, &ports);
        let x = if step % 2 == 0 { 1.0 } else { -1.0 };
        level
            .handle_input(InputEvent::DragMove { instance, cursor: Vec2::new(x, 0.0) }, &ports)
            .unwrap();
    }

    assert!(level.take_events().contains(&LevelEvent::ItemPassedOut { instance }));
    let item = level.item(instance).unwrap();
    assert!(item.is_passed_out());
    assert!(!item.can_move());
    assert!(item.is_dragging());

    for _ in 0..49 {
        level.tick(0.1, &ports);
    }
    assert!(level.item(instance).unwrap().is_passed_out());
    for _ in 0..3 {
        level.tick(0.1, &ports);
    }
    assert!(!level.item(instance).unwrap().is_passed_out());
    assert!(level.take_events().contains(&LevelEvent::ItemRecovered { instance }));
}

#[test]
fn settle_cycle_releases_the_slot() {
    let recorder = Recorder::default();
    let ports = recorder.ports();
    let record = item(1, Vec2::ZERO).with_settle_duration(2.0);
    let other = item(2, Vec2::new(3.0, 0.0));
    let manager = ManagerDefinition::new(ManagerId(0), vec![record, other]);
    let definition = LevelDefinition::new("settle", vec![manager])
        .with_settle_policy(SettlePolicy::ReleaseAfterSettle);
    let mut level = Level::build(definition, GameConfig::default()).unwrap();

    drag(&mut level, InstanceId(0), Vec2::ZERO, &ports);
    assert_eq!(level.item(InstanceId(0)).unwrap().phase(), ItemPhase::Settling);

    for _ in 0..21 {
        level.tick(0.1, &ports);
    }

    let manager = level.manager(ManagerId(0)).unwrap();
    assert!(!manager.is_occupied(SlotId(0)));
    assert_eq!(level.item(InstanceId(0)).unwrap().state(), ItemState::Wandering);
    assert!(level.take_events().contains(&LevelEvent::SlotReleased {
        manager: ManagerId(0),
        instance: InstanceId(0),
        slot: SlotId(0),
    }));
    assert_eq!(recorder.played("SettleEnd"), 1);
    assert_eq!(recorder.played("RunLoop"), 1);
}

#[test]
fn hold_policy_ignores_settle_duration() {
    let ports = Ports::empty();
    let record = item(1, Vec2::ZERO).with_settle_duration(0.5);
    let manager = ManagerDefinition::new(ManagerId(0), vec![record, item(2, Vec2::new(3.0, 0.0))]);
    let mut level = Level::build(LevelDefinition::new("hold", vec![manager]), GameConfig::default()).unwrap();

    drag(&mut level, InstanceId(0), Vec2::ZERO, &ports);
    for _ in 0..20 {
        level.tick(0.1, &ports);
    }
    assert_eq!(level.item(InstanceId(0)).unwrap().phase(), ItemPhase::Snapped);
}

#[test]
fn prerequisite_gates_dragging_until_snapped() {
    let recorder = Recorder::default();
    let ports = recorder.ports();
    let first = item(1, Vec2::ZERO);
    let second = item(2, Vec2::new(2.0, 0.0))
        .with_prerequisite(ItemId(1))
        .with_dialogue("not yet");
    let manager = ManagerDefinition::new(ManagerId(0), vec![first, second]);
    let mut level = Level::build(LevelDefinition::new("gate", vec![manager]), GameConfig::default()).unwrap();
    let gated = InstanceId(1);

    level
        .handle_input(InputEvent::DragBegin { instance: gated, cursor: Vec2::new(2.0, 0.0) }, &ports)
        .unwrap();
    assert_eq!(level.item(gated).unwrap().state(), ItemState::Wandering);
    assert!(level.take_events().contains(&LevelEvent::DragRejected {
        instance: gated,
        waiting_for: ItemId(1),
    }));
    assert!(recorder
        .labels
        .lock()
        .unwrap()
        .contains(&(gated, "not yet".to_owned())));
    assert_eq!(recorder.played("ItemPlaceFail"), 1);

    drag(&mut level, InstanceId(0), Vec2::ZERO, &ports);
    let at = level.item(gated).unwrap().position();
    level
        .handle_input(InputEvent::DragBegin { instance: gated, cursor: at }, &ports)
        .unwrap();
    assert!(level.item(gated).unwrap().is_dragging());
}

#[test]
fn phases_pause_and_restore_managers() {
    let recorder = Recorder::default();
    let ports = recorder.ports();

    let main = ManagerDefinition::new(
        ManagerId(0),
        vec![item(1, Vec2::ZERO), item(2, Vec2::new(2.0, 0.0))],
    );
    let bonus = ManagerDefinition::new(ManagerId(1), vec![item(10, Vec2::new(-3.0, 0.0))])
        .with_completion(CompletionRoute::SignalPhase { grace: 0.5 })
        .inactive();
    let script = PhaseScript::new(vec![
        PhaseDescriptor::timer("game", 3.0),
        PhaseDescriptor::external("bonus"),
    ])
    .with_transition(
        0,
        vec![
            PhaseAction::Pause(ManagerId(0)),
            PhaseAction::ShowUi("bonus_panel".into()),
            PhaseAction::Activate(ManagerId(1)),
        ],
    )
    .with_transition(
        1,
        vec![
            PhaseAction::Unpause(ManagerId(0)),
            PhaseAction::HideUi("bonus_panel".into()),
            PhaseAction::Hide(ManagerId(1)),
            PhaseAction::Deactivate(ManagerId(1)),
        ],
    );
    let definition = LevelDefinition::new("phased", vec![main, bonus]).with_phases(script);
    let mut level = Level::build(definition, GameConfig::default()).unwrap();

    drag(&mut level, InstanceId(0), Vec2::ZERO, &ports);
    assert!(!level.signal_phase_done(&ports));

    for _ in 0..31 {
        level.tick(0.1, &ports);
    }
    assert_eq!(level.phases().unwrap().current_index(), 1);
    assert!(level.manager(ManagerId(1)).unwrap().is_active());
    for item in level.manager(ManagerId(0)).unwrap().items() {
        assert_eq!(item.sorting_layer(), SortingLayer::Background);
    }
    assert!(recorder
        .panels
        .lock()
        .unwrap()
        .contains(&("bonus_panel".to_owned(), true)));

    let bonus_item = InstanceId(2);
    drag(&mut level, bonus_item, Vec2::new(-3.0, 0.0), &ports);
    assert!(!level.is_completed());

    for _ in 0..6 {
        level.tick(0.1, &ports);
    }
    assert!(level.phases().unwrap().is_finished());
    assert!(level.is_completed());
    assert_eq!(recorder.completions(), 1);

    let main = level.manager(ManagerId(0)).unwrap();
    assert_eq!(main.item(InstanceId(0)).unwrap().sorting_layer(), SortingLayer::Item);
    assert_eq!(main.item(InstanceId(1)).unwrap().sorting_layer(), SortingLayer::ItemMove);
    assert!(!level.manager(ManagerId(1)).unwrap().is_active());
}

fn manager_completions_in(events: &[LevelEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, LevelEvent::ManagerCompleted { .. }))
        .count()
}

#[test]
fn phase_signal_waits_for_a_listening_phase() {
    let recorder = Recorder::default();
    let ports = recorder.ports();

    let solo = ManagerDefinition::new(ManagerId(0), vec![item(1, Vec2::ZERO)])
        .with_completion(CompletionRoute::SignalPhase { grace: 0.0 });
    let script = PhaseScript::new(vec![
        PhaseDescriptor::timer("intro", 3.0),
        PhaseDescriptor::external("main"),
    ]);
    let definition = LevelDefinition::new("early", vec![solo]).with_phases(script);
    let mut level = Level::build(definition, GameConfig::default()).unwrap();

    drag(&mut level, InstanceId(0), Vec2::ZERO, &ports);
    assert!(level.manager(ManagerId(0)).unwrap().is_level_complete());
    assert_eq!(level.phases().unwrap().current_index(), 0);
    assert!(!level.manager(ManagerId(0)).unwrap().has_fired_completion());

    for _ in 0..100 {
        level.tick(0.1, &ports);
    }
    assert!(level.phases().unwrap().is_finished());
    assert!(level.is_completed());
    assert_eq!(recorder.completions(), 1);

    let events = level.take_events();
    assert_eq!(manager_completions_in(&events), 1);
    assert_eq!(completions_in(&events), 1);
}

#[test]
fn phase_signal_is_retried_after_grace() {
    let recorder = Recorder::default();
    let ports = recorder.ports();

    let solo = ManagerDefinition::new(ManagerId(0), vec![item(1, Vec2::ZERO)])
        .with_completion(CompletionRoute::SignalPhase { grace: 1.0 });
    let script = PhaseScript::new(vec![PhaseDescriptor::external("main")]);
    let definition = LevelDefinition::new("graced", vec![solo]).with_phases(script);
    let mut level = Level::build(definition, GameConfig::default()).unwrap();

    drag(&mut level, InstanceId(0), Vec2::ZERO, &ports);
    for _ in 0..5 {
        level.tick(0.1, &ports);
    }
    assert!(!level.phases().unwrap().is_finished());
    assert!(!level.is_completed());

    for _ in 0..6 {
        level.tick(0.1, &ports);
    }
    assert!(level.phases().unwrap().is_finished());
    assert!(level.is_completed());
    assert!(level.manager(ManagerId(0)).unwrap().has_fired_completion());
    assert_eq!(manager_completions_in(&level.take_events()), 1);
}

#[test]
fn hit_test_skips_snapped_items() {
    let ports = Ports::empty();
    let mut level = three_slot_level();

    assert_eq!(level.hit_test(Vec2::new(0.1, 0.1)), Some(InstanceId(0)));
    drag(&mut level, InstanceId(0), Vec2::ZERO, &ports);
    assert_eq!(level.hit_test(Vec2::new(0.1, 0.1)), None);
}

#[test]
fn unknown_instance_is_an_error() {
    let mut level = three_slot_level();
    let result = level.handle_input(
        InputEvent::DragBegin {
            instance: InstanceId(42),
            cursor: Vec2::ZERO,
        },
        &Ports::empty(),
    );
    assert_eq!(result, Err(LevelError::UnknownInstance { instance: InstanceId(42) }));
}

#[test]
fn invalid_records_are_skipped() {
    let records = vec![
        item(1, Vec2::ZERO),
        ItemRecord::new(ItemId(2), Vec::new()),
        item(1, Vec2::new(1.0, 0.0)),
        item(3, Vec2::new(2.0, 0.0)).with_prerequisite(ItemId(99)),
    ];
    let manager = ManagerDefinition::new(ManagerId(0), records);
    let level = Level::build(LevelDefinition::new("messy", vec![manager]), GameConfig::default()).unwrap();

    assert_eq!(level.instances().count(), 1);
    assert_eq!(level.skipped_items().len(), 3);
}

#[test]
fn structural_errors_fail_the_build() {
    let config = GameConfig::default();
    assert_eq!(
        Level::build(LevelDefinition::new("empty", Vec::new()), config.clone()).err(),
        Some(LevelError::NoManagers)
    );

    let signalling = ManagerDefinition::new(ManagerId(0), vec![item(1, Vec2::ZERO)])
        .with_completion(CompletionRoute::SignalPhase { grace: 0.0 });
    assert_eq!(
        Level::build(LevelDefinition::new("nophase", vec![signalling]), config.clone()).err(),
        Some(LevelError::SignalWithoutPhases { manager: ManagerId(0) })
    );

    let manager = ManagerDefinition::new(ManagerId(0), vec![item(1, Vec2::ZERO)]);
    let script = PhaseScript::new(vec![PhaseDescriptor::external("main")])
        .with_transition(0, vec![PhaseAction::Activate(ManagerId(7))]);
    assert_eq!(
        Level::build(LevelDefinition::new("dangling", vec![manager]).with_phases(script), config).err(),
        Some(LevelError::UnknownManager { manager: ManagerId(7) })
    );
}

#[test]
fn same_seed_replays_identically() {
    let build = || {
        let manager = ManagerDefinition::new(
            ManagerId(0),
            vec![item(1, Vec2::ZERO).with_move_speed(2.0)],
        );
        Level::build(LevelDefinition::new("walk", vec![manager]).with_seed(77), GameConfig::default()).unwrap()
    };
    let (mut a, mut b) = (build(), build());
    for _ in 0..200 {
        a.tick(0.05, &Ports::empty());
        b.tick(0.05, &Ports::empty());
    }
    assert_eq!(a.snapshot(), b.snapshot());
    assert_ne!(a.item(InstanceId(0)).unwrap().position(), Vec2::ZERO);
}
