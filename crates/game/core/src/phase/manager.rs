use crate::timing::Countdown;

use super::{PhaseAction, PhaseDescriptor, PhaseError, PhaseKind, PhaseScript};

/// Result of leaving a phase.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseAdvance {
    /// Index of the phase that just ended.
    pub outgoing: usize,
    /// Actions to run for this transition, in order.
    pub actions: Vec<PhaseAction>,
    /// Index of the phase that started, or `None` once the script is done.
    pub next: Option<usize>,
}

impl PhaseAdvance {
    pub fn finished(&self) -> bool {
        self.next.is_none()
    }
}

/// Steps through a [`PhaseScript`], strictly forward.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelPhaseManager {
    script: PhaseScript,
    current: usize,
    timer: Countdown,
    started: bool,
}

impl LevelPhaseManager {
    pub fn new(script: PhaseScript) -> Result<Self, PhaseError> {
        script.validate()?;
        Ok(Self {
            script,
            current: 0,
            timer: Countdown::elapsed(),
            started: false,
        })
    }

    pub fn script(&self) -> &PhaseScript {
        &self.script
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn phase_count(&self) -> usize {
        self.script.phases.len()
    }

    pub fn current(&self) -> Option<&PhaseDescriptor> {
        self.script.phases.get(self.current)
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.script.phases.len()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Seconds left in the current timer phase.
    pub fn timer_remaining(&self) -> Option<f32> {
        self.current()
            .filter(|phase| phase.kind == PhaseKind::Timer)
            .map(|_| self.timer.remaining())
    }

    /// Enters the first phase. Later calls do nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.enter_current();
    }

    fn enter_current(&mut self) {
        let Some(phase) = self.script.phases.get(self.current) else {
            return;
        };
        if phase.kind == PhaseKind::Timer {
            self.timer.reset(phase.timer_duration);
        }
        tracing::info!(
            target: "snapfit::phase",
            index = self.current,
            name = %phase.name,
            kind = %phase.kind,
            "phase started"
        );
    }

    pub fn tick(&mut self, dt: f32) -> Option<PhaseAdvance> {
        if !self.started {
            self.start();
        }
        let phase = self.current()?;
        if phase.kind != PhaseKind::Timer {
            return None;
        }
        self.timer.tick(dt);
        self.timer.is_elapsed().then(|| self.advance())
    }

    /// Ends the current phase if it waits for a signal. Otherwise a no-op.
    pub fn signal_phase_done(&mut self) -> Option<PhaseAdvance> {
        let Some(phase) = self.current() else {
            tracing::debug!(target: "snapfit::phase", "signal after the last phase ignored");
            return None;
        };
        if phase.kind != PhaseKind::ExternalSignal {
            tracing::debug!(target: "snapfit::phase", index = self.current, "signal during timer phase ignored");
            return None;
        }
        Some(self.advance())
    }

    fn advance(&mut self) -> PhaseAdvance {
        let outgoing = self.current;
        let actions = self.script.actions_after(outgoing).to_vec();
        self.current += 1;

        let next = (!self.is_finished()).then_some(self.current);
        if next.is_some() {
            self.enter_current();
        } else {
            tracing::info!(target: "snapfit::phase", phases = self.phase_count(), "all phases finished");
        }
        PhaseAdvance {
            outgoing,
            actions,
            next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ManagerId;

    fn script() -> PhaseScript {
        PhaseScript::new(vec![
            PhaseDescriptor::timer("intro", 3.0),
            PhaseDescriptor::external("main"),
        ])
        .with_transition(0, vec![PhaseAction::Pause(ManagerId(0)), PhaseAction::Activate(ManagerId(1))])
        .with_transition(1, vec![PhaseAction::Unpause(ManagerId(0)), PhaseAction::Hide(ManagerId(1))])
    }

    #[test]
    fn timer_phase_advances_when_it_runs_out() {
        let mut phases = LevelPhaseManager::new(script()).unwrap();
        phases.start();

        assert_eq!(phases.tick(2.0), None);
        let advance = phases.tick(1.5).unwrap();

        assert_eq!(advance.outgoing, 0);
        assert_eq!(advance.next, Some(1));
        assert_eq!(advance.actions.len(), 2);
        assert_eq!(phases.current_index(), 1);
    }

    #[test]
    fn signal_is_ignored_during_timer_phase() {
        let mut phases = LevelPhaseManager::new(script()).unwrap();
        phases.start();

        assert_eq!(phases.signal_phase_done(), None);
        assert_eq!(phases.current_index(), 0);
    }

    #[test]
    fn signal_finishes_the_script_once() {
        let mut phases = LevelPhaseManager::new(script()).unwrap();
        phases.start();
        phases.tick(3.0);

        let advance = phases.signal_phase_done().unwrap();
        assert!(advance.finished());
        assert!(phases.is_finished());

        assert_eq!(phases.signal_phase_done(), None);
        assert_eq!(phases.tick(10.0), None);
        assert_eq!(phases.current_index(), 2);
    }

    #[test]
    fn zero_length_timer_advances_on_first_tick() {
        let script = PhaseScript::new(vec![
            PhaseDescriptor::timer("flash", 0.0),
            PhaseDescriptor::external("main"),
        ]);
        let mut phases = LevelPhaseManager::new(script).unwrap();

        assert!(phases.tick(0.016).is_some());
        assert_eq!(phases.current().map(|phase| phase.name.as_str()), Some("main"));
    }

    #[test]
    fn invalid_script_is_refused() {
        assert_eq!(LevelPhaseManager::new(PhaseScript::default()), Err(PhaseError::Empty));
    }
}
