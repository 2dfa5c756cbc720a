//! Runtime entry point.
//!
//! [`Runtime::start`] wires up the command/event channels, moves the level
//! into its worker and returns the handle clients drive it through.

use tokio::sync::mpsc;

use snapfit_core::Level;

use crate::api::RuntimeHandle;
use crate::events::EventBus;
use crate::workers::SimulationWorker;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 256,
            command_buffer_size: 32,
        }
    }
}

/// Owns nothing itself; the worker owns the level and the handle owns the worker.
pub struct Runtime;

impl Runtime {
    /// Spawns the simulation worker for `level` on the current tokio runtime.
    ///
    /// The level is started when the worker receives its first command, so
    /// subscribers taken from the returned handle see the opening events.
    pub fn start(config: RuntimeConfig, level: Level) -> RuntimeHandle {
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size);

        tracing::info!(
            target: "runtime",
            level = level.name(),
            seed = level.seed(),
            "starting runtime"
        );

        let worker = SimulationWorker::new(level, command_rx, event_bus.clone());
        let join = tokio::spawn(worker.run());

        RuntimeHandle::new(command_tx, event_bus, join)
    }
}
