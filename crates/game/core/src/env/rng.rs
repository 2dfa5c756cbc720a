//! RNG oracle for deterministic random number generation.
//!
//! Wander headings, direction-change timers and dialogue pacing all draw from
//! an [`RngOracle`]. Given the same level seed the whole session replays
//! identically, which is what the tests rely on.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[0, 1)`.
    fn unit(&self, seed: u64) -> f32 {
        // 24 bits is the f32 mantissa; anything more is rounding noise.
        (self.next_u32(seed) >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform value in `[min, max)`. Returns `min` for an empty range.
    fn range_f32(&self, seed: u64, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        min + (max - min) * self.unit(seed)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// This implementation uses PCG-XSH-RR, which produces 32-bit output from
/// 64-bit state. It is stateless: the caller supplies the seed for each draw.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Advance the PCG state by one step.
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Roll purposes, mixed into the seed so independent draws never collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RollContext {
    Heading = 0,
    ChangeDirTimer = 1,
    DialogueInterval = 2,
}

/// Compute deterministic seed from level state components.
///
/// * `level_seed` - Base seed set when the level is built
/// * `nonce` - Per-instance draw counter (increments each draw)
/// * `instance` - Raw id of the drawing instance
/// * `context` - Which kind of roll this is
pub fn compute_seed(level_seed: u64, nonce: u64, instance: u32, context: RollContext) -> u64 {
    // SplitMix64 / FxHash style multipliers
    let mut hash = level_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (instance as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Draw source bound to one instance.
///
/// Each roll consumes the instance's nonce so consecutive draws differ while
/// the whole sequence stays a pure function of the level seed.
pub struct Dice<'a> {
    rng: &'a dyn RngOracle,
    level_seed: u64,
    instance: u32,
    nonce: &'a mut u64,
}

impl<'a> Dice<'a> {
    pub fn new(rng: &'a dyn RngOracle, level_seed: u64, instance: u32, nonce: &'a mut u64) -> Self {
        Self {
            rng,
            level_seed,
            instance,
            nonce,
        }
    }

    /// Uniform value in `[min, max)`.
    pub fn roll(&mut self, context: RollContext, min: f32, max: f32) -> f32 {
        let seed = compute_seed(self.level_seed, *self.nonce, self.instance, context);
        *self.nonce = self.nonce.wrapping_add(1);
        self.rng.range_f32(seed, min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_value() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
    }

    #[test]
    fn range_stays_inside_bounds() {
        let rng = PcgRng;
        for nonce in 0..500 {
            let seed = compute_seed(7, nonce, 3, RollContext::ChangeDirTimer);
            let value = rng.range_f32(seed, 1.0, 3.0);
            assert!((1.0..3.0).contains(&value), "{value} out of range");
        }
    }

    #[test]
    fn dice_advances_nonce() {
        let mut nonce = 0;
        let mut dice = Dice::new(&PcgRng, 11, 2, &mut nonce);
        let first = dice.roll(RollContext::Heading, 0.0, 360.0);
        let second = dice.roll(RollContext::Heading, 0.0, 360.0);
        assert_ne!(first, second);
        assert_eq!(nonce, 2);
    }

    #[test]
    fn contexts_decorrelate_draws() {
        let a = compute_seed(1, 0, 0, RollContext::Heading);
        let b = compute_seed(1, 0, 0, RollContext::DialogueInterval);
        assert_ne!(a, b);
    }
}
