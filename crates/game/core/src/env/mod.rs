//! Collaborators injected into the core.
//!
//! [`Ports`] bundles the presentation collaborators so the level can reach
//! everything it needs without global lookups. Every port is optional: a
//! call site whose port is absent skips the side effect and the state
//! transition still completes.
mod ports;
mod rng;

pub use ports::{AudioPort, CompletionPort, LabelPort, SoundEffect, UiPort};
pub use rng::{Dice, PcgRng, RngOracle, RollContext, compute_seed};

use crate::state::InstanceId;

/// Aggregates the optional presentation ports for one call into the core.
#[derive(Clone, Copy, Default)]
pub struct Ports<'a> {
    audio: Option<&'a dyn AudioPort>,
    labels: Option<&'a dyn LabelPort>,
    ui: Option<&'a dyn UiPort>,
    completion: Option<&'a dyn CompletionPort>,
}

impl<'a> Ports<'a> {
    pub fn new(
        audio: Option<&'a dyn AudioPort>,
        labels: Option<&'a dyn LabelPort>,
        ui: Option<&'a dyn UiPort>,
        completion: Option<&'a dyn CompletionPort>,
    ) -> Self {
        Self {
            audio,
            labels,
            ui,
            completion,
        }
    }

    /// No collaborators at all. Useful for headless tests.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_audio(mut self, audio: &'a dyn AudioPort) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn with_labels(mut self, labels: &'a dyn LabelPort) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn with_ui(mut self, ui: &'a dyn UiPort) -> Self {
        self.ui = Some(ui);
        self
    }

    pub fn with_completion(mut self, completion: &'a dyn CompletionPort) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn play(&self, effect: SoundEffect, volume: f32) {
        match self.audio {
            Some(audio) => audio.play_effect(effect.as_ref(), volume),
            None => tracing::trace!(target: "snapfit::ports", %effect, "no audio port, effect skipped"),
        }
    }

    pub fn set_label(&self, instance: InstanceId, text: &str) {
        match self.labels {
            Some(labels) => labels.set_item_label(instance, text),
            None => tracing::trace!(target: "snapfit::ports", %instance, "no label port, text skipped"),
        }
    }

    pub fn set_panel(&self, panel: &str, visible: bool) {
        match self.ui {
            Some(ui) => ui.set_panel_visible(panel, visible),
            None => tracing::trace!(target: "snapfit::ports", panel, visible, "no ui port, panel skipped"),
        }
    }

    pub fn complete_level(&self) {
        match self.completion {
            Some(completion) => completion.complete_level(),
            None => tracing::warn!(target: "snapfit::ports", "level completed but no completion port is attached"),
        }
    }
}

impl core::fmt::Debug for Ports<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ports")
            .field("audio", &self.audio.is_some())
            .field("labels", &self.labels.is_some())
            .field("ui", &self.ui.is_some())
            .field("completion", &self.completion.is_some())
            .finish()
    }
}
