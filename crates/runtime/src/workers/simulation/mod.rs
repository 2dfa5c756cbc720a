//! Simulation worker that owns the authoritative [`snapfit_core::Level`].
//!
//! Receives commands from [`crate::RuntimeHandle`], applies them to the level
//! and publishes whatever the level emitted on the event bus.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use snapfit_core::{InputEvent, InstanceId, Level, LevelSnapshot, Vec2};

use crate::api::Result;
use crate::events::{EventBus, RuntimeEvent, SessionState};
use crate::ports::EventPorts;

/// Commands that can be sent to the simulation worker
pub enum Command {
    Input {
        input: InputEvent,
        reply: oneshot::Sender<Result<bool>>,
    },
    Tick {
        dt: f32,
        reply: oneshot::Sender<Result<bool>>,
    },
    SignalPhaseDone {
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<LevelSnapshot>,
    },
    HitTest {
        point: Vec2,
        reply: oneshot::Sender<Option<InstanceId>>,
    },
    Pause {
        reply: oneshot::Sender<SessionState>,
    },
    Resume {
        reply: oneshot::Sender<SessionState>,
    },
    Session {
        reply: oneshot::Sender<SessionState>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    level: Level,
    session: SessionState,
    ports: EventPorts,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    pub fn new(level: Level, command_rx: mpsc::Receiver<Command>, event_bus: EventBus) -> Self {
        Self {
            level,
            session: SessionState::Playing,
            ports: EventPorts::new(event_bus.clone()),
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends on `Shutdown` or when every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            if let Command::Shutdown { reply } = cmd {
                debug!(target: "runtime::worker", level = self.level.name(), "shutting down");
                let _ = reply.send(());
                break;
            }
            self.ensure_started();
            self.handle_command(cmd);
        }
    }

    fn ensure_started(&mut self) {
        if self.level.is_started() {
            return;
        }
        self.level.start(&self.ports.as_ports());
        self.flush();
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Input { input, reply } => {
                let result = self.apply_input(input);
                let _ = reply.send(result);
            }
            Command::Tick { dt, reply } => {
                let _ = reply.send(Ok(self.apply_tick(dt)));
            }
            Command::SignalPhaseDone { reply } => {
                let advanced = self.session == SessionState::Playing
                    && self.level.signal_phase_done(&self.ports.as_ports());
                self.flush();
                let _ = reply.send(advanced);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.level.snapshot());
            }
            Command::HitTest { point, reply } => {
                let _ = reply.send(self.level.hit_test(point));
            }
            Command::Pause { reply } => {
                if self.session == SessionState::Playing {
                    self.set_session(SessionState::Paused);
                }
                let _ = reply.send(self.session);
            }
            Command::Resume { reply } => {
                if self.session == SessionState::Paused {
                    self.set_session(SessionState::Playing);
                }
                let _ = reply.send(self.session);
            }
            Command::Session { reply } => {
                let _ = reply.send(self.session);
            }
            // Handled by the run loop.
            Command::Shutdown { reply } => {
                let _ = reply.send(());
            }
        }
    }

    fn apply_input(&mut self, input: InputEvent) -> Result<bool> {
        if self.session != SessionState::Playing {
            debug!(target: "runtime::worker", session = %self.session, ?input, "input dropped");
            return Ok(false);
        }
        let result = self.level.handle_input(input, &self.ports.as_ports());
        self.flush();
        result?;
        Ok(true)
    }

    fn apply_tick(&mut self, dt: f32) -> bool {
        if self.session != SessionState::Playing {
            return false;
        }
        self.level.tick(dt, &self.ports.as_ports());
        self.flush();
        true
    }

    /// Publishes drained level events and moves to `LevelComplete` once the
    /// level has finished.
    fn flush(&mut self) {
        for event in self.level.take_events() {
            self.event_bus.publish(RuntimeEvent::Level(event));
        }
        if self.level.is_completed() && self.session != SessionState::LevelComplete {
            info!(
                target: "runtime::worker",
                level = self.level.name(),
                clock = self.level.clock(),
                "level complete"
            );
            self.set_session(SessionState::LevelComplete);
        }
    }

    fn set_session(&mut self, session: SessionState) {
        debug!(target: "runtime::worker", from = %self.session, to = %session, "session state");
        self.session = session;
        self.event_bus.publish(RuntimeEvent::Session(session));
    }
}
