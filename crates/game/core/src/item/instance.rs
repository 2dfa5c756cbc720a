//! Per-instance placement state machine.
//!
//! One [`ItemInstance`] type covers every item variant. Prerequisite gating
//! and shake detection are optional capabilities composed onto the instance
//! rather than subclasses, so each drag callback runs the same code path and
//! consults whichever capabilities are present.

use std::collections::BTreeSet;

use crate::config::{GameConfig, SettlePolicy};
use crate::env::{Dice, Ports, RngOracle, SoundEffect};
use crate::position::SlotBoard;
use crate::state::{Bounds, InstanceId, ItemId, SlotId, Vec2};
use crate::timing::Countdown;

use super::dialogue::{DialogueCue, DialogueTimer};
use super::motion::WanderMotion;
use super::record::ItemRecord;
use super::shake::ShakeDetector;
use super::visual::{InstanceFlags, LegsState, SortingLayer};

/// Logical state. The slot is carried by the `Snapped` variant so an
/// occupied slot without a snap, or a drag while snapped, cannot be written.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemState {
    Wandering,
    Dragging {
        /// Item position minus cursor position at grab time.
        grab_offset: Vec2,
    },
    Snapped {
        slot: SlotId,
        /// Present while a timed release is pending.
        settle: Option<Countdown>,
    },
}

/// Coarse classification reported to observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemPhase {
    Wandering,
    Dragging,
    /// Snapped with a release countdown running.
    Settling,
    Snapped,
}

/// Drag is refused until another item is snapped somewhere in the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrerequisiteGate {
    pub item: ItemId,
}

impl PrerequisiteGate {
    pub fn is_met(&self, snapped_items: &BTreeSet<ItemId>) -> bool {
        snapped_items.contains(&self.item)
    }
}

/// Everything an instance reads from its surroundings during one call.
#[derive(Clone, Copy)]
pub struct ItemContext<'a> {
    pub config: &'a GameConfig,
    pub rng: &'a dyn RngOracle,
    pub level_seed: u64,
    /// Level clock in seconds.
    pub now: f32,
    pub bounds: &'a Bounds,
    pub settle_policy: SettlePolicy,
    pub ports: Ports<'a>,
    /// Records currently snapped anywhere in the level.
    pub snapped_items: &'a BTreeSet<ItemId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragBeginOutcome {
    Started,
    /// Prerequisite unmet; feedback was played.
    Rejected { waiting_for: ItemId },
    /// Already carried, snapped, paused or not pickable.
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMoveOutcome {
    Moved,
    /// This sample knocked the item out.
    PassedOut,
    /// Gesture continues but the item does not follow the cursor.
    Blocked,
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEndOutcome {
    Snapped { slot: SlotId, settling: bool },
    /// Every candidate in range is held by another instance.
    SlotTaken,
    NoSlotInRange,
    /// Prerequisite unmet or the shake gate is closed.
    Refused,
    Ignored,
}

/// Notable things that happened to an instance during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemTickReport {
    /// Slot freed by an elapsed settle countdown.
    pub released: Option<SlotId>,
    /// Pass-out wore off.
    pub recovered: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemInstance {
    id: InstanceId,
    record: ItemRecord,
    state: ItemState,
    position: Vec2,
    flags: InstanceFlags,
    motion: WanderMotion,
    prerequisite: Option<PrerequisiteGate>,
    shake: Option<ShakeDetector>,
    dialogue: Option<DialogueTimer>,
    rng_nonce: u64,
}

impl ItemInstance {
    /// Spawns an instance at the record's first candidate position.
    ///
    /// The record must already be validated.
    pub fn spawn(
        id: InstanceId,
        record: ItemRecord,
        config: &GameConfig,
        rng: &dyn RngOracle,
        level_seed: u64,
    ) -> Self {
        let position = record.spawn_position().unwrap_or(Vec2::ZERO);
        let mut rng_nonce = 0;
        let dialogue = record.dialogue().is_some().then(|| {
            let mut dice = Dice::new(rng, level_seed, id.0, &mut rng_nonce);
            DialogueTimer::new(&mut dice, config)
        });

        Self {
            id,
            motion: WanderMotion::new(record.move_speed),
            prerequisite: record.prerequisite.map(|item| PrerequisiteGate { item }),
            shake: record
                .needs_shake
                .then(|| ShakeDetector::new(record.snap_requires_pass_out)),
            dialogue,
            record,
            state: ItemState::Wandering,
            position,
            flags: InstanceFlags::default(),
            rng_nonce,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn record(&self) -> &ItemRecord {
        &self.record
    }

    pub fn item_id(&self) -> ItemId {
        self.record.id
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn flags(&self) -> InstanceFlags {
        self.flags
    }

    pub fn prerequisite(&self) -> Option<PrerequisiteGate> {
        self.prerequisite
    }

    pub fn shake(&self) -> Option<&ShakeDetector> {
        self.shake.as_ref()
    }

    pub fn phase(&self) -> ItemPhase {
        match self.state {
            ItemState::Wandering => ItemPhase::Wandering,
            ItemState::Dragging { .. } => ItemPhase::Dragging,
            ItemState::Snapped { settle: Some(_), .. } => ItemPhase::Settling,
            ItemState::Snapped { settle: None, .. } => ItemPhase::Snapped,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ItemState::Dragging { .. })
    }

    pub fn is_snapped(&self) -> bool {
        matches!(self.state, ItemState::Snapped { .. })
    }

    pub fn occupied_slot(&self) -> Option<SlotId> {
        match self.state {
            ItemState::Snapped { slot, .. } => Some(slot),
            _ => None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.flags.contains(InstanceFlags::PAUSED)
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.contains(InstanceFlags::HIDDEN)
    }

    pub fn is_passed_out(&self) -> bool {
        self.shake.as_ref().is_some_and(ShakeDetector::is_passed_out)
    }

    /// Whether the item may change position this tick.
    pub fn can_move(&self) -> bool {
        !self.is_paused()
            && !self.is_passed_out()
            && matches!(self.state, ItemState::Wandering | ItemState::Dragging { .. })
    }

    pub fn sorting_layer(&self) -> SortingLayer {
        if self.is_paused() {
            return SortingLayer::Background;
        }
        match self.state {
            ItemState::Wandering => SortingLayer::ItemMove,
            ItemState::Dragging { .. } => SortingLayer::Drag,
            ItemState::Snapped { .. } => SortingLayer::Item,
        }
    }

    pub fn legs_state(&self) -> LegsState {
        match self.state {
            ItemState::Wandering => LegsState::Moving,
            ItemState::Dragging { .. } => LegsState::Dragging,
            ItemState::Snapped { .. } => LegsState::Settled,
        }
    }

    /// Whether `point` lies on the item's hit box and the item can be picked.
    pub fn hit(&self, point: Vec2) -> bool {
        if !self.flags.contains(InstanceFlags::COLLIDER) || self.is_paused() || self.is_hidden() {
            return false;
        }
        let extents = if self.record.half_extents == Vec2::ZERO {
            Vec2::new(
                GameConfig::DEFAULT_HIT_HALF_EXTENT,
                GameConfig::DEFAULT_HIT_HALF_EXTENT,
            )
        } else {
            self.record.half_extents
        };
        (point.x - self.position.x).abs() <= extents.x
            && (point.y - self.position.y).abs() <= extents.y
    }

    fn prerequisite_unmet(&self, ctx: &ItemContext<'_>) -> Option<ItemId> {
        self.prerequisite
            .filter(|gate| !gate.is_met(ctx.snapped_items))
            .map(|gate| gate.item)
    }

    fn speak(&mut self, ctx: &ItemContext<'_>) {
        let Some(text) = self.record.dialogue().map(str::to_owned) else {
            return;
        };
        if let Some(timer) = self.dialogue.as_mut() {
            let mut dice = Dice::new(ctx.rng, ctx.level_seed, self.id.0, &mut self.rng_nonce);
            timer.speak_now(&mut dice, ctx.config);
        }
        ctx.ports.set_label(self.id, &text);
    }

    pub fn begin_drag(&mut self, cursor: Vec2, ctx: &ItemContext<'_>) -> DragBeginOutcome {
        if !matches!(self.state, ItemState::Wandering)
            || self.is_paused()
            || self.is_hidden()
            || !self.flags.contains(InstanceFlags::COLLIDER)
        {
            return DragBeginOutcome::Ignored;
        }

        if let Some(waiting_for) = self.prerequisite_unmet(ctx) {
            tracing::debug!(target: "snapfit::item", instance = %self.id, %waiting_for, "drag rejected");
            self.speak(ctx);
            ctx.ports.play(SoundEffect::ItemPlaceFail, ctx.config.effect_volume);
            return DragBeginOutcome::Rejected { waiting_for };
        }

        self.state = ItemState::Dragging {
            grab_offset: self.position - cursor,
        };
        if let Some(shake) = self.shake.as_mut() {
            shake.begin_tracking(cursor.x);
        }
        tracing::debug!(target: "snapfit::item", instance = %self.id, position = %self.position, "drag started");
        DragBeginOutcome::Started
    }

    pub fn drag_to(&mut self, cursor: Vec2, ctx: &ItemContext<'_>) -> DragMoveOutcome {
        let ItemState::Dragging { grab_offset } = self.state else {
            return DragMoveOutcome::Ignored;
        };
        if self.is_paused() {
            return DragMoveOutcome::Ignored;
        }

        if self.prerequisite_unmet(ctx).is_some() {
            ctx.ports.play(SoundEffect::ItemPlaceFail, ctx.config.effect_volume);
            return DragMoveOutcome::Blocked;
        }

        if let Some(shake) = self.shake.as_mut() {
            if shake.observe(cursor.x, ctx.now, ctx.config) {
                tracing::info!(target: "snapfit::item", instance = %self.id, "item passed out");
                return DragMoveOutcome::PassedOut;
            }
            if shake.is_passed_out() {
                return DragMoveOutcome::Blocked;
            }
        }

        self.position = cursor + grab_offset;
        DragMoveOutcome::Moved
    }

    /// Ends the drag. Tries the nearest free candidate slot in snap range.
    ///
    /// Paused and passed-out items still resolve their drag here.
    pub fn end_drag(&mut self, board: &mut SlotBoard, ctx: &ItemContext<'_>) -> DragEndOutcome {
        if !self.is_dragging() {
            return DragEndOutcome::Ignored;
        }

        let outcome = self.resolve_drop(board, ctx);
        if let Some(shake) = self.shake.as_mut() {
            shake.stop_tracking();
        }

        match outcome {
            DragEndOutcome::Snapped { .. } => {
                ctx.ports.play(SoundEffect::ItemPlaced, ctx.config.effect_volume);
            }
            _ => {
                self.state = ItemState::Wandering;
                ctx.ports.play(SoundEffect::ItemPlaceFail, ctx.config.effect_volume);
                tracing::debug!(target: "snapfit::item", instance = %self.id, ?outcome, "drop failed");
            }
        }
        outcome
    }

    fn resolve_drop(&mut self, board: &mut SlotBoard, ctx: &ItemContext<'_>) -> DragEndOutcome {
        if self.prerequisite_unmet(ctx).is_some() {
            return DragEndOutcome::Refused;
        }
        if self.shake.as_ref().is_some_and(|shake| !shake.allows_snap()) {
            return DragEndOutcome::Refused;
        }

        let mut nearest_free: Option<(SlotId, f32)> = None;
        let mut taken_in_range = false;
        for candidate in &self.record.correct_positions {
            let Some(slot) = board.slot_at(*candidate) else {
                tracing::warn!(
                    target: "snapfit::item",
                    item = %self.record.id,
                    %candidate,
                    "candidate is not a slot of the owning manager"
                );
                continue;
            };
            let distance = self.position.distance(*candidate);
            if distance > self.record.snap_range {
                continue;
            }
            if board.is_occupied(slot) {
                taken_in_range = true;
                continue;
            }
            if nearest_free.is_none_or(|(_, best)| distance < best) {
                nearest_free = Some((slot, distance));
            }
        }

        let Some((slot, _)) = nearest_free else {
            return if taken_in_range {
                DragEndOutcome::SlotTaken
            } else {
                DragEndOutcome::NoSlotInRange
            };
        };

        if let Err(error) = board.occupy(slot, self.id) {
            tracing::debug!(target: "snapfit::item", instance = %self.id, %error, "occupy refused");
            return DragEndOutcome::SlotTaken;
        }

        let settle = (ctx.settle_policy == SettlePolicy::ReleaseAfterSettle
            && self.record.settle_duration > 0.0)
            .then(|| Countdown::new(self.record.settle_duration));
        if let Some(point) = board.position(slot) {
            self.position = point;
        }
        self.state = ItemState::Snapped { slot, settle };
        self.flags.remove(InstanceFlags::COLLIDER);
        tracing::info!(target: "snapfit::item", instance = %self.id, item = %self.record.id, %slot, "item snapped");
        DragEndOutcome::Snapped {
            slot,
            settling: settle.is_some(),
        }
    }

    /// Advances timers and wander motion. Paused instances are frozen.
    pub fn tick(&mut self, dt: f32, board: &mut SlotBoard, ctx: &ItemContext<'_>) -> ItemTickReport {
        let mut report = ItemTickReport::default();
        if self.is_paused() {
            return report;
        }

        if let Some(shake) = self.shake.as_mut() {
            report.recovered = shake.tick(dt);
        }
        self.tick_dialogue(dt, ctx);

        match self.state {
            ItemState::Wandering if self.can_move() => {
                let mut dice = Dice::new(ctx.rng, ctx.level_seed, self.id.0, &mut self.rng_nonce);
                self.position = self.motion.step(
                    self.position,
                    dt,
                    ctx.bounds,
                    self.record.half_extents,
                    &mut dice,
                    ctx.config,
                );
            }
            ItemState::Snapped {
                slot,
                settle: Some(mut countdown),
            } => {
                if !countdown.tick(dt) {
                    self.state = ItemState::Snapped {
                        slot,
                        settle: Some(countdown),
                    };
                    return report;
                }
                board.release_slot(slot);
                self.unsnap();
                let mut dice = Dice::new(ctx.rng, ctx.level_seed, self.id.0, &mut self.rng_nonce);
                self.motion.pick_new_direction(&mut dice, ctx.config);
                ctx.ports.play(SoundEffect::SettleEnd, ctx.config.effect_volume);
                ctx.ports.play(SoundEffect::RunLoop, ctx.config.effect_volume);
                tracing::info!(target: "snapfit::item", instance = %self.id, %slot, "settle elapsed, slot released");
                report.released = Some(slot);
            }
            _ => {}
        }
        report
    }

    fn tick_dialogue(&mut self, dt: f32, ctx: &ItemContext<'_>) {
        let Some(timer) = self.dialogue.as_mut() else {
            return;
        };
        let mut dice = Dice::new(ctx.rng, ctx.level_seed, self.id.0, &mut self.rng_nonce);
        match timer.tick(dt, &mut dice, ctx.config) {
            Some(DialogueCue::Show) => {
                if let Some(text) = self.record.dialogue() {
                    ctx.ports.set_label(self.id, text);
                }
            }
            Some(DialogueCue::Clear) => ctx.ports.set_label(self.id, ""),
            None => {}
        }
    }

    /// Returns to Wandering after the owning board dropped the slot.
    pub(crate) fn unsnap(&mut self) {
        if self.is_snapped() {
            self.state = ItemState::Wandering;
            self.flags.insert(InstanceFlags::COLLIDER);
        }
    }

    pub(crate) fn set_flag(&mut self, flag: InstanceFlags, on: bool) {
        self.flags.set(flag, on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    struct Fixture {
        config: GameConfig,
        bounds: Bounds,
        snapped: BTreeSet<ItemId>,
        board: SlotBoard,
        policy: SettlePolicy,
    }

    impl Fixture {
        fn new(slots: &[Vec2]) -> Self {
            Self {
                config: GameConfig::default(),
                bounds: Bounds::default(),
                snapped: BTreeSet::new(),
                board: SlotBoard::new(slots.iter().copied(), 0.01),
                policy: SettlePolicy::Hold,
            }
        }

        fn ctx(&self, now: f32) -> ItemContext<'_> {
            ItemContext {
                config: &self.config,
                rng: &PcgRng,
                level_seed: 1,
                now,
                bounds: &self.bounds,
                settle_policy: self.policy,
                ports: Ports::empty(),
                snapped_items: &self.snapped,
            }
        }

        fn spawn(&self, id: u32, record: ItemRecord) -> ItemInstance {
            ItemInstance::spawn(InstanceId(id), record, &self.config, &PcgRng, 1)
        }
    }

    fn drop_at(fixture: &mut Fixture, item: &mut ItemInstance, at: Vec2) -> DragEndOutcome {
        let ctx = fixture.ctx(0.0);
        item.begin_drag(item.position(), &ctx);
        item.drag_to(at, &ctx);
        let snapped = fixture.snapped.clone();
        let ctx = ItemContext {
            snapped_items: &snapped,
            ..fixture.ctx(0.0)
        };
        let mut board = fixture.board.clone();
        let outcome = item.end_drag(&mut board, &ctx);
        fixture.board = board;
        outcome
    }

    #[test]
    fn snap_within_range_occupies_slot() {
        let mut fixture = Fixture::new(&[Vec2::new(2.0, 2.0)]);
        let mut item = fixture.spawn(1, ItemRecord::new(ItemId(1), vec![Vec2::new(2.0, 2.0)]));

        let outcome = drop_at(&mut fixture, &mut item, Vec2::new(2.2, 2.1));

        assert_eq!(outcome, DragEndOutcome::Snapped { slot: SlotId(0), settling: false });
        assert_eq!(item.position(), Vec2::new(2.0, 2.0));
        assert_eq!(item.occupied_slot(), Some(SlotId(0)));
        assert_eq!(item.phase(), ItemPhase::Snapped);
        assert!(!item.flags().contains(InstanceFlags::COLLIDER));
        assert_eq!(fixture.board.holder(SlotId(0)), Some(InstanceId(1)));
    }

    #[test]
    fn drop_out_of_range_returns_to_wandering() {
        let mut fixture = Fixture::new(&[Vec2::new(2.0, 2.0)]);
        let mut item = fixture.spawn(1, ItemRecord::new(ItemId(1), vec![Vec2::new(2.0, 2.0)]));

        let outcome = drop_at(&mut fixture, &mut item, Vec2::new(4.0, 4.0));

        assert_eq!(outcome, DragEndOutcome::NoSlotInRange);
        assert_eq!(item.state(), ItemState::Wandering);
        assert_eq!(item.occupied_slot(), None);
    }

    #[test]
    fn nearest_free_candidate_wins() {
        let slots = [Vec2::new(0.0, 0.0), Vec2::new(0.6, 0.0)];
        let mut fixture = Fixture::new(&slots);
        let record = ItemRecord::new(ItemId(1), slots.to_vec()).with_snap_range(1.0);
        let mut item = fixture.spawn(1, record);

        let outcome = drop_at(&mut fixture, &mut item, Vec2::new(0.5, 0.0));

        assert_eq!(outcome, DragEndOutcome::Snapped { slot: SlotId(1), settling: false });
    }

    #[test]
    fn occupied_candidate_is_skipped() {
        let slots = [Vec2::new(0.0, 0.0), Vec2::new(0.6, 0.0)];
        let mut fixture = Fixture::new(&slots);
        fixture.board.occupy(SlotId(1), InstanceId(9)).unwrap();
        let record = ItemRecord::new(ItemId(1), slots.to_vec()).with_snap_range(1.0);
        let mut item = fixture.spawn(1, record);

        let outcome = drop_at(&mut fixture, &mut item, Vec2::new(0.5, 0.0));

        assert_eq!(outcome, DragEndOutcome::Snapped { slot: SlotId(0), settling: false });
    }

    #[test]
    fn only_candidate_taken_reports_slot_taken() {
        let mut fixture = Fixture::new(&[Vec2::new(5.0, 5.0)]);
        fixture.board.occupy(SlotId(0), InstanceId(9)).unwrap();
        let mut item = fixture.spawn(1, ItemRecord::new(ItemId(1), vec![Vec2::new(5.0, 5.0)]));

        let outcome = drop_at(&mut fixture, &mut item, Vec2::new(5.0, 5.0));

        assert_eq!(outcome, DragEndOutcome::SlotTaken);
        assert_eq!(item.state(), ItemState::Wandering);
    }

    #[test]
    fn begin_drag_is_idempotent() {
        let fixture = Fixture::new(&[Vec2::ZERO]);
        let mut item = fixture.spawn(1, ItemRecord::new(ItemId(1), vec![Vec2::ZERO]));
        let ctx = fixture.ctx(0.0);

        assert_eq!(item.begin_drag(Vec2::ZERO, &ctx), DragBeginOutcome::Started);
        assert_eq!(item.begin_drag(Vec2::ZERO, &ctx), DragBeginOutcome::Ignored);
        assert_eq!(item.occupied_slot(), None);
    }

    #[test]
    fn grab_offset_is_kept_through_the_drag() {
        let fixture = Fixture::new(&[Vec2::ZERO]);
        let mut item = fixture.spawn(1, ItemRecord::new(ItemId(1), vec![Vec2::new(1.0, 1.0)]));
        let ctx = fixture.ctx(0.0);

        item.begin_drag(Vec2::new(1.2, 0.9), &ctx);
        item.drag_to(Vec2::new(3.2, 2.9), &ctx);

        let expected = Vec2::new(3.0, 3.0);
        assert!(item.position().distance(expected) < 1e-5);
    }

    #[test]
    fn unmet_prerequisite_rejects_drag() {
        let fixture = Fixture::new(&[Vec2::ZERO]);
        let record = ItemRecord::new(ItemId(2), vec![Vec2::ZERO]).with_prerequisite(ItemId(1));
        let mut item = fixture.spawn(2, record);

        let outcome = item.begin_drag(Vec2::ZERO, &fixture.ctx(0.0));

        assert_eq!(outcome, DragBeginOutcome::Rejected { waiting_for: ItemId(1) });
        assert_eq!(item.state(), ItemState::Wandering);
    }

    #[test]
    fn met_prerequisite_allows_drag() {
        let mut fixture = Fixture::new(&[Vec2::ZERO]);
        fixture.snapped.insert(ItemId(1));
        let record = ItemRecord::new(ItemId(2), vec![Vec2::ZERO]).with_prerequisite(ItemId(1));
        let mut item = fixture.spawn(2, record);

        assert_eq!(item.begin_drag(Vec2::ZERO, &fixture.ctx(0.0)), DragBeginOutcome::Started);
    }

    #[test]
    fn prerequisite_lost_mid_drag_blocks_and_refuses() {
        let mut fixture = Fixture::new(&[Vec2::ZERO]);
        fixture.snapped.insert(ItemId(1));
        let record = ItemRecord::new(ItemId(2), vec![Vec2::ZERO]).with_prerequisite(ItemId(1));
        let mut item = fixture.spawn(2, record);
        item.begin_drag(Vec2::ZERO, &fixture.ctx(0.0));

        fixture.snapped.clear();
        let ctx = fixture.ctx(0.0);
        assert_eq!(item.drag_to(Vec2::new(1.0, 0.0), &ctx), DragMoveOutcome::Blocked);
        assert_eq!(item.position(), Vec2::ZERO);

        let mut board = fixture.board.clone();
        assert_eq!(item.end_drag(&mut board, &ctx), DragEndOutcome::Refused);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn settle_releases_under_release_policy() {
        let mut fixture = Fixture::new(&[Vec2::ZERO]);
        fixture.policy = SettlePolicy::ReleaseAfterSettle;
        let record = ItemRecord::new(ItemId(1), vec![Vec2::ZERO]).with_settle_duration(1.0);
        let mut item = fixture.spawn(1, record);

        assert_eq!(
            drop_at(&mut fixture, &mut item, Vec2::ZERO),
            DragEndOutcome::Snapped { slot: SlotId(0), settling: true }
        );
        assert_eq!(item.phase(), ItemPhase::Settling);

        let mut board = fixture.board.clone();
        let ctx = fixture.ctx(0.0);
        assert_eq!(item.tick(0.6, &mut board, &ctx).released, None);
        assert_eq!(item.tick(0.6, &mut board, &ctx).released, Some(SlotId(0)));
        assert_eq!(item.state(), ItemState::Wandering);
        assert!(!board.is_occupied(SlotId(0)));
        assert!(item.flags().contains(InstanceFlags::COLLIDER));
    }

    #[test]
    fn hold_policy_keeps_item_snapped() {
        let mut fixture = Fixture::new(&[Vec2::ZERO]);
        let record = ItemRecord::new(ItemId(1), vec![Vec2::ZERO]).with_settle_duration(1.0);
        let mut item = fixture.spawn(1, record);
        drop_at(&mut fixture, &mut item, Vec2::ZERO);

        let mut board = fixture.board.clone();
        let ctx = fixture.ctx(0.0);
        for _ in 0..100 {
            item.tick(0.1, &mut board, &ctx);
        }
        assert!(item.is_snapped());
        assert!(board.is_occupied(SlotId(0)));
    }

    #[test]
    fn layers_and_legs_follow_state() {
        let mut fixture = Fixture::new(&[Vec2::ZERO]);
        let mut item = fixture.spawn(1, ItemRecord::new(ItemId(1), vec![Vec2::ZERO]));
        assert_eq!(item.sorting_layer(), SortingLayer::ItemMove);
        assert_eq!(item.legs_state(), LegsState::Moving);

        item.begin_drag(Vec2::ZERO, &fixture.ctx(0.0));
        assert_eq!(item.sorting_layer(), SortingLayer::Drag);
        assert_eq!(item.legs_state(), LegsState::Dragging);

        let mut board = fixture.board.clone();
        item.end_drag(&mut board, &fixture.ctx(0.0));
        fixture.board = board;
        assert_eq!(item.sorting_layer(), SortingLayer::Item);
        assert!(!item.legs_state().legs_visible());

        item.set_flag(InstanceFlags::PAUSED, true);
        assert_eq!(item.sorting_layer(), SortingLayer::Background);
        item.set_flag(InstanceFlags::PAUSED, false);
        assert_eq!(item.sorting_layer(), SortingLayer::Item);
    }

    #[test]
    fn shake_pass_out_freezes_the_item() {
        let fixture = Fixture::new(&[Vec2::ZERO]);
        let record = ItemRecord::new(ItemId(1), vec![Vec2::ZERO]).with_shake();
        let mut item = fixture.spawn(1, record);

        item.begin_drag(Vec2::ZERO, &fixture.ctx(0.0));
        let mut outcomes = Vec::new();
        for step in 0..4 {
            let x = if step % 2 == 0 { 1.0 } else { -1.0 };
            let now = 0.1 * step as f32;
            outcomes.push(item.drag_to(Vec2::new(x, 0.0), &fixture.ctx(now)));
        }

        assert_eq!(outcomes.last(), Some(&DragMoveOutcome::PassedOut));
        assert!(item.is_passed_out());
        assert!(!item.can_move());

        let frozen = item.position();
        assert_eq!(item.drag_to(Vec2::new(3.0, 3.0), &fixture.ctx(0.5)), DragMoveOutcome::Blocked);
        assert_eq!(item.position(), frozen);

        let mut board = fixture.board.clone();
        let ctx = fixture.ctx(0.5);
        for _ in 0..51 {
            item.tick(0.1, &mut board, &ctx);
        }
        assert!(!item.is_passed_out());
        assert!(item.can_move());
    }

    #[test]
    fn paused_item_ignores_drag_begin() {
        let fixture = Fixture::new(&[Vec2::ZERO]);
        let mut item = fixture.spawn(1, ItemRecord::new(ItemId(1), vec![Vec2::ZERO]));
        item.set_flag(InstanceFlags::PAUSED, true);

        assert_eq!(item.begin_drag(Vec2::ZERO, &fixture.ctx(0.0)), DragBeginOutcome::Ignored);
        assert!(!item.hit(Vec2::ZERO));
    }
}
