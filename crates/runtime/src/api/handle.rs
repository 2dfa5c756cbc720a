//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! feeding input, stepping time and streaming events.
use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use snapfit_core::{InputEvent, InstanceId, LevelSnapshot, Vec2};

use super::errors::{Result, RuntimeError};
use crate::events::{EventBus, RuntimeEvent, SessionState, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        worker: JoinHandle<()>,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            worker: Arc::new(Mutex::new(Some(worker))),
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Feed one drag event. Returns `false` when the session is not playing.
    pub async fn send_input(&self, input: InputEvent) -> Result<bool> {
        self.request(|reply| Command::Input { input, reply }).await?
    }

    /// Advance the level by `dt` seconds. Returns `false` when the session is
    /// not playing.
    pub async fn tick(&self, dt: f32) -> Result<bool> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(RuntimeError::InvalidTimeStep { dt });
        }
        self.request(|reply| Command::Tick { dt, reply }).await?
    }

    /// Ends the current external-signal phase, if that is what is running.
    pub async fn signal_phase_done(&self) -> Result<bool> {
        self.request(|reply| Command::SignalPhaseDone { reply }).await
    }

    /// Query a read-only snapshot of the level.
    pub async fn snapshot(&self) -> Result<LevelSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Topmost draggable instance under `point`.
    pub async fn hit_test(&self, point: Vec2) -> Result<Option<InstanceId>> {
        self.request(|reply| Command::HitTest { point, reply }).await
    }

    pub async fn pause(&self) -> Result<SessionState> {
        self.request(|reply| Command::Pause { reply }).await
    }

    pub async fn resume(&self) -> Result<SessionState> {
        self.request(|reply| Command::Resume { reply }).await
    }

    pub async fn session_state(&self) -> Result<SessionState> {
        self.request(|reply| Command::Session { reply }).await
    }

    /// Subscribe to every event the runtime publishes.
    pub fn subscribe_events(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.event_bus.subscribe_all()
    }

    /// Receiver for one [`Topic`]. Presentation cues get their own topic so
    /// a frontend can route them apart from level progress.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<RuntimeEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Stops the worker and waits for it to exit.
    ///
    /// Other clones of the handle fail with
    /// [`RuntimeError::CommandChannelClosed`] afterwards. Calling it twice is
    /// harmless.
    pub async fn shutdown(&self) -> Result<()> {
        let Some(worker) = self.worker.lock().await.take() else {
            return Ok(());
        };

        // The worker may already be gone; joining below reports the real outcome.
        let _ = self.request(|reply| Command::Shutdown { reply }).await;

        worker.await.map_err(RuntimeError::WorkerJoin)
    }
}
