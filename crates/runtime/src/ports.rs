//! Presentation ports that republish every call on the event bus.

use snapfit_core::{AudioPort, CompletionPort, InstanceId, LabelPort, Ports, UiPort};

use crate::events::{EventBus, PresentationEvent, RuntimeEvent};

/// Implements all four core ports by publishing [`PresentationEvent`]s.
#[derive(Clone)]
pub struct EventPorts {
    bus: EventBus,
}

impl EventPorts {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    /// Borrows this adapter as every port of a [`Ports`] bundle.
    pub fn as_ports(&self) -> Ports<'_> {
        Ports::new(Some(self), Some(self), Some(self), Some(self))
    }

    fn publish(&self, event: PresentationEvent) {
        self.bus.publish(RuntimeEvent::Presentation(event));
    }
}

impl AudioPort for EventPorts {
    fn play_effect(&self, name: &str, volume: f32) {
        self.publish(PresentationEvent::Sound {
            name: name.to_owned(),
            volume,
        });
    }
}

impl LabelPort for EventPorts {
    fn set_item_label(&self, instance: InstanceId, text: &str) {
        self.publish(PresentationEvent::Label {
            instance,
            text: text.to_owned(),
        });
    }
}

impl UiPort for EventPorts {
    fn set_panel_visible(&self, panel: &str, visible: bool) {
        self.publish(PresentationEvent::Panel {
            name: panel.to_owned(),
            visible,
        });
    }
}

impl CompletionPort for EventPorts {
    fn complete_level(&self) {
        self.publish(PresentationEvent::LevelCompleted);
    }
}

#[cfg(test)]
mod tests {
    use snapfit_core::SoundEffect;

    use super::*;

    #[tokio::test]
    async fn port_calls_become_presentation_events() {
        let bus = EventBus::with_capacity(8);
        let mut rx = bus.subscribe_all();
        let adapter = EventPorts::new(bus);
        let ports = adapter.as_ports();

        ports.play(SoundEffect::ItemPlaced, 0.5);
        ports.set_panel("hint", true);
        ports.complete_level();

        assert_eq!(
            rx.recv().await.unwrap(),
            RuntimeEvent::Presentation(PresentationEvent::Sound {
                name: "ItemPlaced".into(),
                volume: 0.5
            })
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            RuntimeEvent::Presentation(PresentationEvent::Panel {
                name: "hint".into(),
                visible: true
            })
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            RuntimeEvent::Presentation(PresentationEvent::LevelCompleted)
        );
    }
}
