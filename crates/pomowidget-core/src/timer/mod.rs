mod display;
mod duration;
mod engine;

pub use display::{format_mmss, TimerReadout};
pub use duration::{parse_minutes, DurationField, Phase};
pub use engine::{SessionState, SessionTimer, TickOutcome};
