use std::collections::BTreeMap;

use crate::state::ManagerId;

use super::PhaseError;

/// How a phase ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseKind {
    /// Ends when its timer runs out.
    Timer,
    /// Ends only when a collaborator signals it.
    ExternalSignal,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseDescriptor {
    pub name: String,
    pub kind: PhaseKind,
    /// Seconds; only read for `Timer` phases.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timer_duration: f32,
}

impl PhaseDescriptor {
    pub fn timer(name: impl Into<String>, seconds: f32) -> Self {
        Self {
            name: name.into(),
            kind: PhaseKind::Timer,
            timer_duration: seconds,
        }
    }

    pub fn external(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PhaseKind::ExternalSignal,
            timer_duration: 0.0,
        }
    }
}

/// Side effect run when a phase ends.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseAction {
    Pause(ManagerId),
    Unpause(ManagerId),
    Hide(ManagerId),
    Activate(ManagerId),
    Deactivate(ManagerId),
    /// Shows a named UI panel through the UI port.
    ShowUi(String),
    HideUi(String),
}

impl PhaseAction {
    /// Manager the action targets, if any.
    pub fn manager(&self) -> Option<ManagerId> {
        match self {
            PhaseAction::Pause(id)
            | PhaseAction::Unpause(id)
            | PhaseAction::Hide(id)
            | PhaseAction::Activate(id)
            | PhaseAction::Deactivate(id) => Some(*id),
            PhaseAction::ShowUi(_) | PhaseAction::HideUi(_) => None,
        }
    }
}

/// Ordered phases plus the actions run when each one ends.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseScript {
    pub phases: Vec<PhaseDescriptor>,
    /// Keyed by the index of the phase being left.
    #[cfg_attr(feature = "serde", serde(default))]
    pub transitions: BTreeMap<usize, Vec<PhaseAction>>,
}

impl PhaseScript {
    pub fn new(phases: Vec<PhaseDescriptor>) -> Self {
        Self {
            phases,
            transitions: BTreeMap::new(),
        }
    }

    pub fn with_transition(mut self, outgoing: usize, actions: Vec<PhaseAction>) -> Self {
        self.transitions.entry(outgoing).or_default().extend(actions);
        self
    }

    pub fn actions_after(&self, outgoing: usize) -> &[PhaseAction] {
        self.transitions
            .get(&outgoing)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every action across all transitions.
    pub fn actions(&self) -> impl Iterator<Item = &PhaseAction> {
        self.transitions.values().flatten()
    }

    pub fn validate(&self) -> Result<(), PhaseError> {
        if self.phases.is_empty() {
            return Err(PhaseError::Empty);
        }
        for (index, phase) in self.phases.iter().enumerate() {
            if phase.kind == PhaseKind::Timer && phase.timer_duration < 0.0 {
                return Err(PhaseError::NegativeDuration {
                    index,
                    name: phase.name.clone(),
                    duration: phase.timer_duration,
                });
            }
        }
        if let Some(&index) = self.transitions.keys().find(|index| **index >= self.phases.len()) {
            return Err(PhaseError::TransitionOutOfRange {
                index,
                phases: self.phases.len(),
            });
        }
        Ok(())
    }
}
