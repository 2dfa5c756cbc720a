//! Plays one level on the runtime with the scripted player.

use std::collections::BTreeSet;
use std::fmt;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use snapfit_content::ContentFactory;
use snapfit_core::{GameConfig, LevelEvent};
use snapfit_runtime::{Runtime, RuntimeConfig, RuntimeEvent, RuntimeHandle, SessionState};

use crate::autoplay::{Autoplayer, Move};

#[derive(Clone, Debug)]
pub struct PlayOptions {
    pub ticks: u32,
    pub dt: f32,
    pub seed: u64,
    pub events_json: bool,
    pub act_every: u32,
    pub runtime: RuntimeConfig,
}

/// Event totals gathered while a level runs.
#[derive(Clone, Debug, Default)]
struct EventTally {
    snaps: usize,
    failed_drops: usize,
    rejections: usize,
    pass_outs: usize,
    releases: usize,
    phases: usize,
}

impl EventTally {
    fn record(&mut self, event: &RuntimeEvent) {
        let RuntimeEvent::Level(event) = event else {
            return;
        };
        match event {
            LevelEvent::ItemSnapped { .. } => self.snaps += 1,
            LevelEvent::DropFailed { .. } => self.failed_drops += 1,
            LevelEvent::DragRejected { .. } => self.rejections += 1,
            LevelEvent::ItemPassedOut { .. } => self.pass_outs += 1,
            LevelEvent::SlotReleased { .. } => self.releases += 1,
            LevelEvent::PhaseStarted { .. } => self.phases += 1,
            _ => {}
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlayReport {
    pub level: String,
    pub completed: bool,
    pub clock: f32,
    pub ticks: u32,
    pub slots: Vec<(String, usize, usize)>,
    tally: EventTally,
}

impl PlayReport {
    pub fn ensure_completed(&self) -> Result<()> {
        if self.completed {
            Ok(())
        } else {
            anyhow::bail!(
                "level '{}' did not complete within {} steps",
                self.level,
                self.ticks
            )
        }
    }
}

impl fmt::Display for PlayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.completed { "completed" } else { "incomplete" };
        writeln!(
            f,
            "{}: {} at {:.2}s after {} steps",
            self.level, verdict, self.clock, self.ticks
        )?;
        for (manager, occupied, total) in &self.slots {
            writeln!(f, "  {manager}: {occupied}/{total} slots")?;
        }
        write!(
            f,
            "  snaps {}, failed drops {}, rejected drags {}, pass-outs {}, releases {}, phases {}",
            self.tally.snaps,
            self.tally.failed_drops,
            self.tally.rejections,
            self.tally.pass_outs,
            self.tally.releases,
            self.tally.phases
        )
    }
}

pub async fn play_level(
    factory: &ContentFactory,
    name: &str,
    config: GameConfig,
    options: &PlayOptions,
) -> Result<PlayReport> {
    let definition = factory.load_level(name)?;
    let mut player = Autoplayer::new(&definition, config.slot_epsilon, options.seed);
    let level = ContentFactory::build(definition, config)?;

    let handle = Runtime::start(options.runtime.clone(), level);
    let collector = spawn_collector(&handle, options.events_json);

    let mut steps = 0;
    while steps < options.ticks {
        if handle.session_state().await? == SessionState::LevelComplete {
            break;
        }
        if steps % options.act_every.max(1) == 0 {
            act(&handle, &mut player).await?;
        }
        handle.tick(options.dt).await?;
        steps += 1;
    }

    let snapshot = handle.snapshot().await?;
    handle.shutdown().await?;
    // The collector stops once the last bus sender, held by the handle, is gone.
    drop(handle);
    let tally = collector.await.context("event collector panicked")?;

    Ok(PlayReport {
        level: snapshot.name.clone(),
        completed: snapshot.completed,
        clock: snapshot.clock,
        ticks: steps,
        slots: snapshot
            .managers
            .iter()
            .map(|manager| (manager.id.to_string(), manager.occupied, manager.slots.len()))
            .collect(),
        tally,
    })
}

/// Plays one move. A drag only starts on an item that is on top at its grab
/// point; covered items are passed over for this move.
async fn act(handle: &RuntimeHandle, player: &mut Autoplayer) -> Result<()> {
    let snapshot = handle.snapshot().await?;
    let mut covered = BTreeSet::new();
    loop {
        match player.next_move(&snapshot, &covered) {
            Move::Drag(gesture) => {
                let Some(first) = gesture.first() else {
                    return Ok(());
                };
                let instance = first.instance();
                let on_top = handle.hit_test(first.cursor()).await?;
                if on_top != Some(instance) {
                    tracing::debug!(%instance, ?on_top, "item covered, trying another");
                    covered.insert(instance);
                    continue;
                }
                for input in gesture {
                    handle.send_input(input).await?;
                }
                return Ok(());
            }
            Move::SignalPhase => {
                let advanced = handle.signal_phase_done().await?;
                tracing::debug!(advanced, "signalled phase");
                return Ok(());
            }
            Move::Idle => return Ok(()),
        }
    }
}

/// Tallies events until the runtime shuts down and its bus is dropped.
fn spawn_collector(handle: &RuntimeHandle, events_json: bool) -> JoinHandle<EventTally> {
    let mut rx = handle.subscribe_events();
    tokio::spawn(async move {
        let mut tally = EventTally::default();
        loop {
            match rx.recv().await {
                Ok(event) => {
                    tally.record(&event);
                    if events_json {
                        match serde_json::to_string(&event) {
                            Ok(line) => println!("{line}"),
                            Err(error) => tracing::warn!(%error, "event not serializable"),
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event collector lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tally
    })
}
