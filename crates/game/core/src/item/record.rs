use crate::state::{ItemId, Vec2};

use super::ItemConfigError;

/// Static per-item-type configuration.
///
/// Records are immutable once a level is built. Everything cosmetic
/// (`rotation_degrees`, `scale`) is carried through untouched for the
/// renderer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRecord {
    pub id: ItemId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Candidate slots. The first entry is also the spawn position.
    pub correct_positions: Vec<Vec2>,
    /// Max distance to a candidate counted as "reached" when a drag ends.
    pub snap_range: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub move_speed: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub settle_duration: f32,
    /// Item that must be snapped before this one can be dragged.
    #[cfg_attr(feature = "serde", serde(default))]
    pub prerequisite: Option<ItemId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dialogue: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation_degrees: f32,
    #[cfg_attr(feature = "serde", serde(default = "ItemRecord::unit_scale"))]
    pub scale: Vec2,
    /// Half size of the item's hit box, used for edge bounce and picking.
    #[cfg_attr(feature = "serde", serde(default))]
    pub half_extents: Vec2,
    /// Enables the shake-to-pass-out capability.
    #[cfg_attr(feature = "serde", serde(default))]
    pub needs_shake: bool,
    /// Shake items only: a drag may end on a slot only while passed out.
    #[cfg_attr(feature = "serde", serde(default))]
    pub snap_requires_pass_out: bool,
}

impl ItemRecord {
    /// Sentinel used by legacy data for "no prerequisite".
    pub const NO_PREREQUISITE: i32 = -1;

    pub fn new(id: ItemId, correct_positions: Vec<Vec2>) -> Self {
        Self {
            id,
            name: String::new(),
            correct_positions,
            snap_range: crate::GameConfig::DEFAULT_SNAP_RANGE,
            move_speed: 0.0,
            settle_duration: 0.0,
            prerequisite: None,
            dialogue: None,
            rotation_degrees: 0.0,
            scale: Self::unit_scale(),
            half_extents: Vec2::ZERO,
            needs_shake: false,
            snap_requires_pass_out: false,
        }
    }

    fn unit_scale() -> Vec2 {
        Vec2::new(1.0, 1.0)
    }

    /// Maps the integer sentinel form (`-1` = none) onto an optional id.
    pub fn prerequisite_from_raw(raw: i32) -> Option<ItemId> {
        (raw != Self::NO_PREREQUISITE).then_some(ItemId(raw))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_snap_range(mut self, snap_range: f32) -> Self {
        self.snap_range = snap_range;
        self
    }

    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    pub fn with_settle_duration(mut self, settle_duration: f32) -> Self {
        self.settle_duration = settle_duration;
        self
    }

    pub fn with_prerequisite(mut self, prerequisite: ItemId) -> Self {
        self.prerequisite = Some(prerequisite);
        self
    }

    pub fn with_dialogue(mut self, dialogue: impl Into<String>) -> Self {
        self.dialogue = Some(dialogue.into());
        self
    }

    pub fn with_half_extents(mut self, half_extents: Vec2) -> Self {
        self.half_extents = half_extents;
        self
    }

    pub fn with_shake(mut self) -> Self {
        self.needs_shake = true;
        self
    }

    pub fn with_snap_requires_pass_out(mut self) -> Self {
        self.needs_shake = true;
        self.snap_requires_pass_out = true;
        self
    }

    /// Spawn position: the first candidate slot.
    pub fn spawn_position(&self) -> Option<Vec2> {
        self.correct_positions.first().copied()
    }

    /// Dialogue text, if non-empty.
    pub fn dialogue(&self) -> Option<&str> {
        self.dialogue.as_deref().filter(|text| !text.is_empty())
    }

    /// Display label for logs.
    pub fn label(&self) -> &str {
        if self.name.is_empty() { "<unnamed>" } else { &self.name }
    }

    /// Checks the record in isolation. Cross-record checks (duplicate ids,
    /// dangling prerequisites) happen when the level is assembled.
    pub fn validate(&self) -> Result<(), ItemConfigError> {
        let item = self.id;
        if self.correct_positions.is_empty() {
            return Err(ItemConfigError::NoCorrectPositions { item });
        }
        if !(self.snap_range > 0.0) {
            return Err(ItemConfigError::InvalidSnapRange {
                item,
                snap_range: self.snap_range,
            });
        }
        if self.move_speed < 0.0 {
            return Err(ItemConfigError::NegativeSpeed {
                item,
                move_speed: self.move_speed,
            });
        }
        if self.settle_duration < 0.0 {
            return Err(ItemConfigError::NegativeSettleDuration {
                item,
                settle_duration: self.settle_duration,
            });
        }
        if self.prerequisite == Some(item) {
            return Err(ItemConfigError::SelfPrerequisite { item });
        }
        Ok(())
    }
}
