use crate::config::GameConfig;
use crate::env::{Dice, RollContext};
use crate::timing::Countdown;

/// What the label should do this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogueCue {
    Show,
    Clear,
}

/// Paces an item's spontaneous dialogue lines.
///
/// A line is shown every `min..max` seconds (measured from the previous line)
/// and cleared after the display time.
#[derive(Clone, Debug, PartialEq)]
pub struct DialogueTimer {
    next_line: Countdown,
    showing: Option<Countdown>,
}

impl DialogueTimer {
    pub fn new(dice: &mut Dice<'_>, config: &GameConfig) -> Self {
        Self {
            next_line: Countdown::new(Self::interval(dice, config)),
            showing: None,
        }
    }

    fn interval(dice: &mut Dice<'_>, config: &GameConfig) -> f32 {
        dice.roll(
            RollContext::DialogueInterval,
            config.min_dialogue_interval,
            config.max_dialogue_interval,
        )
    }

    pub fn is_showing(&self) -> bool {
        self.showing.is_some()
    }

    /// Shows a line immediately and reschedules the next spontaneous one.
    pub fn speak_now(&mut self, dice: &mut Dice<'_>, config: &GameConfig) -> DialogueCue {
        self.showing = Some(Countdown::new(config.dialogue_display_time));
        self.next_line.reset(Self::interval(dice, config));
        DialogueCue::Show
    }

    pub fn tick(&mut self, dt: f32, dice: &mut Dice<'_>, config: &GameConfig) -> Option<DialogueCue> {
        self.next_line.tick(dt);

        if let Some(display) = self.showing.as_mut() {
            display.tick(dt);
            if display.is_elapsed() {
                self.showing = None;
                return Some(DialogueCue::Clear);
            }
            return None;
        }

        if self.next_line.is_elapsed() {
            return Some(self.speak_now(dice, config));
        }
        None
    }
}
