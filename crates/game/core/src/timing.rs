//! Per-tick countdowns.
//!
//! Every timed behaviour in the core (settle windows, pass-out cooldowns,
//! phase timers, dialogue pacing) is a [`Countdown`] advanced by the single
//! update pass. Nothing blocks or suspends.

/// Seconds remaining until something happens.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }

    /// A countdown that has already elapsed.
    pub const fn elapsed() -> Self {
        Self { remaining: 0.0 }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_elapsed(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Advances by `dt` seconds. Returns true exactly on the tick it reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.is_elapsed() {
            return false;
        }
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        self.is_elapsed()
    }

    pub fn reset(&mut self, seconds: f32) {
        self.remaining = seconds.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_on_expiry() {
        let mut countdown = Countdown::new(1.0);
        assert!(!countdown.tick(0.6));
        assert!(countdown.tick(0.6));
        assert!(!countdown.tick(0.6));
        assert!(countdown.is_elapsed());
    }

    #[test]
    fn negative_durations_clamp_to_elapsed() {
        let countdown = Countdown::new(-3.0);
        assert!(countdown.is_elapsed());
        assert_eq!(countdown.remaining(), 0.0);
    }
}
