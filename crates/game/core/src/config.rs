/// What happens to a snapped item once its settle countdown runs out.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SettlePolicy {
    /// Snapped is terminal; the settle duration is ignored.
    #[default]
    Hold,
    /// The slot is released and the item wanders again after `settle_duration`.
    ReleaseAfterSettle,
}

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Distance under which a point is considered to name an existing slot.
    pub slot_epsilon: f32,
    /// Snap range used by records that do not specify a positive one.
    pub default_snap_range: f32,
    /// Level-wide settle behaviour.
    pub settle_policy: SettlePolicy,

    /// Rolling window (seconds) in which cursor reversals are counted.
    pub shake_window: f32,
    /// Reversals inside the window needed to pass an item out.
    pub shake_reversals: usize,
    /// Horizontal cursor movement (world units) below this is not a direction.
    pub shake_dead_zone: f32,
    /// How long (seconds) a passed-out item stays immobile.
    pub pass_out_duration: f32,

    /// Bounds (seconds) of the randomized wander direction-change timer.
    pub min_change_dir_time: f32,
    pub max_change_dir_time: f32,

    /// Bounds (seconds) between two spontaneous dialogue lines.
    pub min_dialogue_interval: f32,
    pub max_dialogue_interval: f32,
    /// How long (seconds) a dialogue line stays on the label.
    pub dialogue_display_time: f32,

    /// Volume used for every sound effect emitted by the core.
    pub effect_volume: f32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Upper bound on remembered reversal timestamps per shake detector.
    pub const MAX_SHAKE_SAMPLES: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SLOT_EPSILON: f32 = 0.01;
    pub const DEFAULT_SNAP_RANGE: f32 = 0.5;
    pub const DEFAULT_SHAKE_WINDOW: f32 = 1.0;
    pub const DEFAULT_SHAKE_REVERSALS: usize = 3;
    pub const DEFAULT_SHAKE_DEAD_ZONE: f32 = 0.05;
    pub const DEFAULT_PASS_OUT_DURATION: f32 = 5.0;
    /// Pick radius for records that declare no hit box.
    pub const DEFAULT_HIT_HALF_EXTENT: f32 = 0.5;

    pub fn new() -> Self {
        Self {
            slot_epsilon: Self::DEFAULT_SLOT_EPSILON,
            default_snap_range: Self::DEFAULT_SNAP_RANGE,
            settle_policy: SettlePolicy::default(),
            shake_window: Self::DEFAULT_SHAKE_WINDOW,
            shake_reversals: Self::DEFAULT_SHAKE_REVERSALS,
            shake_dead_zone: Self::DEFAULT_SHAKE_DEAD_ZONE,
            pass_out_duration: Self::DEFAULT_PASS_OUT_DURATION,
            min_change_dir_time: 1.0,
            max_change_dir_time: 3.0,
            min_dialogue_interval: 5.0,
            max_dialogue_interval: 15.0,
            dialogue_display_time: 3.0,
            effect_volume: 1.0,
        }
    }

    pub fn with_settle_policy(mut self, settle_policy: SettlePolicy) -> Self {
        self.settle_policy = settle_policy;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
