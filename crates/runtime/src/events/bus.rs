//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use snapfit_core::LevelEvent;

use super::types::{PresentationEvent, SessionState};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Domain events drained from the level
    Level,
    /// Sounds, labels, panels and the completion call
    Presentation,
    /// Session state changes (pause, resume, completion)
    Session,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuntimeEvent {
    Level(LevelEvent),
    Presentation(PresentationEvent),
    Session(SessionState),
}

impl RuntimeEvent {
    pub fn topic(&self) -> Topic {
        match self {
            RuntimeEvent::Level(_) => Topic::Level,
            RuntimeEvent::Presentation(_) => Topic::Presentation,
            RuntimeEvent::Session(_) => Topic::Session,
        }
    }
}

/// Topic-based event bus
///
/// Every event goes to its topic channel and to a combined channel, so
/// consumers either pick topics or take the whole ordered stream.
#[derive(Clone)]
pub struct EventBus {
    level: broadcast::Sender<RuntimeEvent>,
    presentation: broadcast::Sender<RuntimeEvent>,
    session: broadcast::Sender<RuntimeEvent>,
    all: broadcast::Sender<RuntimeEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            level: broadcast::channel(capacity).0,
            presentation: broadcast::channel(capacity).0,
            session: broadcast::channel(capacity).0,
            all: broadcast::channel(capacity).0,
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<RuntimeEvent> {
        match topic {
            Topic::Level => &self.level,
            Topic::Presentation => &self.presentation,
            Topic::Session => &self.session,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: RuntimeEvent) {
        let topic = event.topic();

        // No subscribers is normal, not an error
        if self.channel(topic).send(event.clone()).is_err() {
            tracing::trace!(target: "runtime::bus", ?topic, "no subscribers for topic");
        }
        let _ = self.all.send(event);
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<RuntimeEvent> {
        self.channel(topic).subscribe()
    }

    /// Subscribe to every topic through one ordered receiver.
    pub fn subscribe_all(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.all.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
