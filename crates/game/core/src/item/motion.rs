//! Autonomous wandering for items that are neither carried nor snapped.

use crate::config::GameConfig;
use crate::env::{Dice, RollContext};
use crate::state::{Bounds, Vec2};
use crate::timing::Countdown;

/// Random-direction walk bounded by the play area.
///
/// The heading changes when a randomized timer runs out or when the item
/// bounces off an edge. A bounce reflects only the axis that hit the edge and
/// restarts the timer.
#[derive(Clone, Debug, PartialEq)]
pub struct WanderMotion {
    direction: Vec2,
    speed: f32,
    change_dir: Countdown,
}

impl WanderMotion {
    pub fn new(speed: f32) -> Self {
        Self {
            direction: Vec2::ZERO,
            speed: speed.max(0.0),
            change_dir: Countdown::elapsed(),
        }
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Picks a fresh heading and restarts the direction-change timer.
    pub fn pick_new_direction(&mut self, dice: &mut Dice<'_>, config: &GameConfig) {
        let angle = dice.roll(RollContext::Heading, 0.0, 360.0);
        self.direction = Vec2::from_angle_degrees(angle).normalized();
        self.restart_timer(dice, config);
    }

    fn restart_timer(&mut self, dice: &mut Dice<'_>, config: &GameConfig) {
        let seconds = dice.roll(
            RollContext::ChangeDirTimer,
            config.min_change_dir_time,
            config.max_change_dir_time,
        );
        self.change_dir.reset(seconds);
    }

    /// Advances one tick and returns the new position.
    pub fn step(
        &mut self,
        position: Vec2,
        dt: f32,
        area: &Bounds,
        half_extents: Vec2,
        dice: &mut Dice<'_>,
        config: &GameConfig,
    ) -> Vec2 {
        if self.direction == Vec2::ZERO {
            self.pick_new_direction(dice, config);
        }

        let next = position + self.direction * (self.speed * dt);

        let mut bounced = false;
        let hits_left = next.x - half_extents.x <= area.min.x && self.direction.x < 0.0;
        let hits_right = next.x + half_extents.x >= area.max.x && self.direction.x > 0.0;
        if hits_left || hits_right {
            self.direction.x = -self.direction.x;
            bounced = true;
        }
        let hits_bottom = next.y - half_extents.y <= area.min.y && self.direction.y < 0.0;
        let hits_top = next.y + half_extents.y >= area.max.y && self.direction.y > 0.0;
        if hits_bottom || hits_top {
            self.direction.y = -self.direction.y;
            bounced = true;
        }

        if bounced {
            self.direction = self.direction.normalized();
            self.restart_timer(dice, config);
        } else if self.change_dir.tick(dt) {
            self.pick_new_direction(dice, config);
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;

    fn area() -> Bounds {
        Bounds::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0))
    }

    #[test]
    fn first_step_picks_unit_heading() {
        let config = GameConfig::default();
        let mut nonce = 0;
        let mut dice = Dice::new(&PcgRng, 3, 0, &mut nonce);
        let mut motion = WanderMotion::new(1.0);

        motion.step(Vec2::ZERO, 0.1, &area(), Vec2::ZERO, &mut dice, &config);

        assert!((motion.direction().length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn bounce_reflects_outgoing_axis() {
        let config = GameConfig::default();
        let mut nonce = 0;
        let mut dice = Dice::new(&PcgRng, 3, 0, &mut nonce);
        let mut motion = WanderMotion::new(1.0);
        motion.direction = Vec2::new(1.0, 0.0);
        motion.change_dir.reset(10.0);

        motion.step(Vec2::new(0.95, 0.0), 0.1, &area(), Vec2::ZERO, &mut dice, &config);

        assert_eq!(motion.direction(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn extents_count_towards_the_edge() {
        let config = GameConfig::default();
        let mut nonce = 0;
        let mut dice = Dice::new(&PcgRng, 3, 0, &mut nonce);
        let mut motion = WanderMotion::new(1.0);
        motion.direction = Vec2::new(0.0, 1.0);
        motion.change_dir.reset(10.0);

        motion.step(Vec2::new(0.0, 0.5), 0.1, &area(), Vec2::new(0.0, 0.5), &mut dice, &config);

        assert_eq!(motion.direction(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn stays_inside_area_over_many_ticks() {
        let config = GameConfig::default();
        let mut nonce = 0;
        let mut dice = Dice::new(&PcgRng, 99, 4, &mut nonce);
        let mut motion = WanderMotion::new(2.0);
        let mut position = Vec2::ZERO;

        for _ in 0..5_000 {
            position = motion.step(position, 0.016, &area(), Vec2::ZERO, &mut dice, &config);
            assert!(position.x.abs() < 1.1 && position.y.abs() < 1.1, "escaped to {position}");
        }
    }

    #[test]
    fn zero_speed_never_moves() {
        let config = GameConfig::default();
        let mut nonce = 0;
        let mut dice = Dice::new(&PcgRng, 1, 1, &mut nonce);
        let mut motion = WanderMotion::new(0.0);

        let position = motion.step(Vec2::new(0.3, 0.3), 1.0, &area(), Vec2::ZERO, &mut dice, &config);

        assert_eq!(position, Vec2::new(0.3, 0.3));
    }
}
