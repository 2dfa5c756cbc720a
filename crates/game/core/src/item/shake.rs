//! Shake-to-pass-out capability.
//!
//! While an item is carried, horizontal cursor reversals are timestamped.
//! Enough reversals inside the rolling window knock the item out for a fixed
//! cooldown, during which it neither wanders nor follows the cursor.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::timing::Countdown;

type ReversalTimes = ArrayVec<f32, { GameConfig::MAX_SHAKE_SAMPLES }>;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct ShakeDetector {
    reversals: ReversalTimes,
    last_cursor_x: Option<f32>,
    last_direction: i8,
    passed_out: Option<Countdown>,
    snap_requires_pass_out: bool,
}

impl ShakeDetector {
    pub fn new(snap_requires_pass_out: bool) -> Self {
        Self {
            snap_requires_pass_out,
            ..Self::default()
        }
    }

    pub fn is_passed_out(&self) -> bool {
        self.passed_out.is_some()
    }

    /// Seconds left of the current pass-out, if any.
    pub fn pass_out_remaining(&self) -> Option<f32> {
        self.passed_out.map(|countdown| countdown.remaining())
    }

    /// Whether a drag may end on a slot right now.
    pub fn allows_snap(&self) -> bool {
        !self.snap_requires_pass_out || self.is_passed_out()
    }

    pub fn reversal_count(&self) -> usize {
        self.reversals.len()
    }

    /// Starts tracking from the grab point.
    pub fn begin_tracking(&mut self, cursor_x: f32) {
        self.reversals.clear();
        self.last_cursor_x = Some(cursor_x);
        self.last_direction = 0;
    }

    /// Forgets the gesture; called whenever the item is not being carried.
    pub fn stop_tracking(&mut self) {
        self.reversals.clear();
        self.last_cursor_x = None;
        self.last_direction = 0;
    }

    /// Feeds one cursor sample taken at level time `now`.
    ///
    /// Returns true on the sample that knocks the item out.
    pub fn observe(&mut self, cursor_x: f32, now: f32, config: &GameConfig) -> bool {
        if self.is_passed_out() {
            return false;
        }

        let Some(last_x) = self.last_cursor_x.replace(cursor_x) else {
            return false;
        };

        let delta = cursor_x - last_x;
        let direction: i8 = if delta > config.shake_dead_zone {
            1
        } else if delta < -config.shake_dead_zone {
            -1
        } else {
            0
        };

        if direction != 0 && self.last_direction != 0 && direction != self.last_direction {
            self.record_reversal(now, config);
        }
        if direction != 0 {
            self.last_direction = direction;
        }

        let threshold = config.shake_reversals.max(1);
        if self.reversals.len() >= threshold {
            let span = match (self.reversals.first(), self.reversals.last()) {
                (Some(first), Some(last)) => last - first,
                _ => f32::INFINITY,
            };
            if span <= config.shake_window {
                self.pass_out(config);
                return true;
            }
        }
        false
    }

    fn record_reversal(&mut self, now: f32, config: &GameConfig) {
        if self.reversals.is_full() {
            self.reversals.remove(0);
        }
        self.reversals.push(now);
        self.reversals.retain(|at| now - *at <= config.shake_window);
    }

    fn pass_out(&mut self, config: &GameConfig) {
        self.passed_out = Some(Countdown::new(config.pass_out_duration));
        self.reversals.clear();
        tracing::debug!(target: "snapfit::item", duration = config.pass_out_duration, "passed out");
    }

    /// Advances the pass-out cooldown. Returns true on the tick it wears off.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(countdown) = self.passed_out.as_mut() else {
            return false;
        };
        if countdown.tick(dt) || countdown.is_elapsed() {
            self.passed_out = None;
            return true;
        }
        false
    }
}
