//! Runtime orchestration for a running level.
//!
//! The runtime moves the [`snapfit_core::Level`] into a background worker that
//! is its only writer, and exposes a cloneable [`RuntimeHandle`] for input,
//! time steps and queries. Everything the level emits (domain events, port
//! calls, session changes) is republished on an [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the entry point and its configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`ports`] adapts the core's presentation ports onto the bus
pub mod api;
pub mod events;
pub mod ports;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{EventBus, PresentationEvent, RuntimeEvent, SessionState, Topic};
pub use ports::EventPorts;
pub use runtime::{Runtime, RuntimeConfig};
