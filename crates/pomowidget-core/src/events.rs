use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every observable state change in the widget produces an Event.
/// Hosts drain them from the widget after each input or clock advance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Remaining time changed while stopped (duration field edit).
    DurationApplied {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Programmatic phase change; no user control emits this.
    PhaseChanged {
        phase: Phase,
        at: DateTime<Utc>,
    },
    TimerTicked {
        remaining_secs: u64,
        display: String,
        at: DateTime<Utc>,
    },
    /// Countdown reached its terminal tick; the next session must be started by hand.
    TimerCompleted {
        phase: Phase,
        at: DateTime<Utc>,
    },
    AlarmFired {
        /// Whether the audio cue played; the visual flash fires either way.
        audible: bool,
        at: DateTime<Utc>,
    },
    IdleEntered {
        at: DateTime<Utc>,
    },
    IdleExited {
        at: DateTime<Utc>,
    },
    SlideShown {
        index: usize,
        path: String,
        at: DateTime<Utc>,
    },
    MusicToggled {
        playing: bool,
        at: DateTime<Utc>,
    },
    ColorPickerToggled {
        open: bool,
        at: DateTime<Utc>,
    },
    BackgroundChanged {
        color: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Variant name, as it appears in the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "TimerStarted",
            Event::TimerPaused { .. } => "TimerPaused",
            Event::TimerReset { .. } => "TimerReset",
            Event::DurationApplied { .. } => "DurationApplied",
            Event::PhaseChanged { .. } => "PhaseChanged",
            Event::TimerTicked { .. } => "TimerTicked",
            Event::TimerCompleted { .. } => "TimerCompleted",
            Event::AlarmFired { .. } => "AlarmFired",
            Event::IdleEntered { .. } => "IdleEntered",
            Event::IdleExited { .. } => "IdleExited",
            Event::SlideShown { .. } => "SlideShown",
            Event::MusicToggled { .. } => "MusicToggled",
            Event::ColorPickerToggled { .. } => "ColorPickerToggled",
            Event::BackgroundChanged { .. } => "BackgroundChanged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_serde_tag() {
        let ev = Event::SlideShown {
            index: 2,
            path: "assets/background/bg3.jpg".into(),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], ev.kind());
        assert_eq!(json["index"], 2);
    }
}
