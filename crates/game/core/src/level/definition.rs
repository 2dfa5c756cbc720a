use crate::config::SettlePolicy;
use crate::item::ItemRecord;
use crate::phase::PhaseScript;
use crate::position::CompletionRoute;
use crate::state::{Bounds, ManagerId, Vec2};

/// Static description of a level, loaded before the level is built.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelDefinition {
    pub name: String,
    /// Seed for every random draw in the level.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: u64,
    /// Visible play area.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bounds: Bounds,
    /// Overrides the configured settle policy for this level.
    #[cfg_attr(feature = "serde", serde(default))]
    pub settle_policy: Option<SettlePolicy>,
    pub managers: Vec<ManagerDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phases: Option<PhaseScript>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManagerDefinition {
    pub id: ManagerId,
    /// Slot universe. When empty, the items' candidate positions are used.
    #[cfg_attr(feature = "serde", serde(default))]
    pub slots: Vec<Vec2>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub completion: CompletionRoute,
    pub items: Vec<ItemRecord>,
    /// Inactive managers wait for a phase transition to activate them.
    #[cfg_attr(feature = "serde", serde(default = "ManagerDefinition::active_by_default"))]
    pub active: bool,
}

impl ManagerDefinition {
    pub fn new(id: ManagerId, items: Vec<ItemRecord>) -> Self {
        Self {
            id,
            slots: Vec::new(),
            completion: CompletionRoute::default(),
            items,
            active: true,
        }
    }

    fn active_by_default() -> bool {
        true
    }

    pub fn with_slots(mut self, slots: Vec<Vec2>) -> Self {
        self.slots = slots;
        self
    }

    pub fn with_completion(mut self, completion: CompletionRoute) -> Self {
        self.completion = completion;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

impl LevelDefinition {
    pub fn new(name: impl Into<String>, managers: Vec<ManagerDefinition>) -> Self {
        Self {
            name: name.into(),
            seed: 0,
            bounds: Bounds::default(),
            settle_policy: None,
            managers,
            phases: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_settle_policy(mut self, policy: SettlePolicy) -> Self {
        self.settle_policy = Some(policy);
        self
    }

    pub fn with_phases(mut self, phases: PhaseScript) -> Self {
        self.phases = Some(phases);
        self
    }
}
