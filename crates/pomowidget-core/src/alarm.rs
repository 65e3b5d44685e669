//! Alarm notifier.
//!
//! Fired once by the session timer's terminal tick. The audio cue is a best
//! effort; the display flash always runs, and also runs as the fallback when
//! playback is refused.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::events::Event;
use crate::host::{Class, Element};
use crate::scheduler::Task;
use crate::widget::Ctx;

/// How long the alarm flash stays on the timer display.
pub const DEFAULT_FLASH: Duration = Duration::from_millis(1200);

/// Alarm sound choice offered to the user.
///
/// The choice is remembered but the bell clip is what plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmSound {
    Default,
    Beep,
    #[default]
    Bell,
}

impl fmt::Display for AlarmSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlarmSound::Default => "default",
            AlarmSound::Beep => "beep",
            AlarmSound::Bell => "bell",
        };
        f.write_str(name)
    }
}

impl FromStr for AlarmSound {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(AlarmSound::Default),
            "beep" => Ok(AlarmSound::Beep),
            "bell" => Ok(AlarmSound::Bell),
            _ => Err(ValidationError::UnknownChoice {
                field: "alarm sound".into(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlarmNotifier {
    flash: Duration,
    selected: AlarmSound,
}

impl Default for AlarmNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_FLASH, AlarmSound::default())
    }
}

impl AlarmNotifier {
    pub fn new(flash: Duration, selected: AlarmSound) -> Self {
        Self { flash, selected }
    }

    pub fn selected(&self) -> AlarmSound {
        self.selected
    }

    pub fn select(&mut self, sound: AlarmSound) {
        debug!(%sound, "alarm sound selected");
        self.selected = sound;
    }

    /// Play the alarm and flash the display. Returns whether audio played.
    pub fn fire(&mut self, ctx: &mut Ctx<'_>) -> bool {
        let audible = match ctx.audio.play_alarm_from_start() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "alarm audio rejected, flashing instead");
                self.flash(ctx);
                false
            }
        };
        self.flash(ctx);
        ctx.emit(Event::AlarmFired {
            audible,
            at: Utc::now(),
        });
        audible
    }

    /// Scheduler callback ending a flash.
    pub fn end_flash(&mut self, ctx: &mut Ctx<'_>) {
        ctx.surface.remove_class(Element::TimerDisplay, Class::AlarmFlash);
    }

    fn flash(&self, ctx: &mut Ctx<'_>) {
        ctx.surface.add_class(Element::TimerDisplay, Class::AlarmFlash);
        ctx.scheduler.set_timeout(self.flash, Task::AlarmFlashEnd);
    }
}
