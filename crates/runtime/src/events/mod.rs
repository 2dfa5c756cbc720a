//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers can subscribe only
//! to the topics they need, or to all of them at once.

mod bus;
mod types;

pub use bus::{EventBus, RuntimeEvent, Topic};
pub use types::{PresentationEvent, SessionState};
