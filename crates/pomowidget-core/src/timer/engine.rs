//! Session timer.
//!
//! A countdown state machine driven by a repeating scheduler tick. It never
//! advances phase on its own: when the countdown runs out the alarm fires,
//! the tick is cancelled and the next session has to be started by hand.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped --start--> Running --pause/terminal tick--> Stopped
//!                       |
//!                       +--reset--> Stopped (work phase, full duration)
//! ```

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::display::TimerReadout;
use super::duration::{DurationField, Phase};
use crate::alarm::AlarmNotifier;
use crate::error::ValidationError;
use crate::events::Event;
use crate::scheduler::{Task, TimerId};
use crate::widget::Ctx;

/// Result of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second was counted down.
    Counted,
    /// The countdown was already at zero; the alarm fired and the timer stopped.
    Completed,
    /// A stale tick arrived while stopped.
    Ignored,
}

/// Serializable view of the session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub remaining_secs: u64,
    pub running: bool,
    pub phase: Phase,
}

#[derive(Debug, Clone)]
pub struct SessionTimer {
    remaining_secs: u64,
    running: bool,
    phase: Phase,
    tick: Option<TimerId>,
    tick_interval: Duration,
    work: DurationField,
    rest: DurationField,
    readout: TimerReadout,
}

impl SessionTimer {
    /// Create a stopped timer in the work phase.
    ///
    /// Remaining time starts at the work field's value, or zero when the field
    /// does not parse. Nothing is rendered until [`SessionTimer::mount`].
    pub fn new(work: DurationField, rest: DurationField, tick_interval: Duration) -> Self {
        let remaining_secs = work.seconds().unwrap_or(0);
        Self {
            remaining_secs,
            running: false,
            phase: Phase::Work,
            tick: None,
            tick_interval,
            work,
            rest,
            readout: TimerReadout::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn work_field(&self) -> &DurationField {
        &self.work
    }

    pub fn break_field(&self) -> &DurationField {
        &self.rest
    }

    pub fn display_text(&self) -> &str {
        self.readout.rendered()
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            remaining_secs: self.remaining_secs,
            running: self.running,
            phase: self.phase,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Initial render.
    pub fn mount(&mut self, ctx: &mut Ctx<'_>) {
        self.readout.refresh(ctx.surface, self.remaining_secs);
    }

    pub fn start(&mut self, ctx: &mut Ctx<'_>) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        self.tick = Some(ctx.scheduler.set_interval(self.tick_interval, Task::SessionTick));
        info!(remaining_secs = self.remaining_secs, phase = ?self.phase, "session started");
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self, ctx: &mut Ctx<'_>) -> Option<Event> {
        let was_running = self.running;
        self.stop_ticking(ctx);
        if !was_running {
            return None;
        }
        info!(remaining_secs = self.remaining_secs, "session paused");
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop, return to the work phase and reload the work duration.
    ///
    /// The timer is stopped and the phase cleared even when the work field
    /// does not parse; remaining time is then left untouched.
    pub fn reset(&mut self, ctx: &mut Ctx<'_>) -> Result<Event, ValidationError> {
        self.stop_ticking(ctx);
        self.phase = Phase::Work;
        self.remaining_secs = self.work.seconds()?;
        self.readout.refresh(ctx.surface, self.remaining_secs);
        info!(remaining_secs = self.remaining_secs, "session reset");
        Ok(Event::TimerReset {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Store new work-field text; applies immediately when stopped in the
    /// work phase.
    pub fn set_work_duration(
        &mut self,
        ctx: &mut Ctx<'_>,
        input: &str,
    ) -> Result<Option<Event>, ValidationError> {
        self.work.set(input);
        if self.running || self.phase != Phase::Work {
            return Ok(None);
        }
        let secs = self.work.seconds()?;
        Ok(Some(self.apply_duration(ctx, secs)))
    }

    /// Store new break-field text; applies immediately when stopped in the
    /// break phase.
    pub fn set_break_duration(
        &mut self,
        ctx: &mut Ctx<'_>,
        input: &str,
    ) -> Result<Option<Event>, ValidationError> {
        self.rest.set(input);
        if self.running || self.phase != Phase::Break {
            return Ok(None);
        }
        let secs = self.rest.seconds()?;
        Ok(Some(self.apply_duration(ctx, secs)))
    }

    /// Switch phase without touching remaining time.
    ///
    /// No control in the widget calls this; it exists for embedders that
    /// want a break countdown.
    pub fn set_phase(&mut self, phase: Phase) -> Option<Event> {
        if self.phase == phase {
            return None;
        }
        self.phase = phase;
        debug!(?phase, "phase changed");
        Some(Event::PhaseChanged {
            phase,
            at: Utc::now(),
        })
    }

    /// Scheduler callback.
    pub fn tick(&mut self, ctx: &mut Ctx<'_>, alarm: &mut AlarmNotifier) -> TickOutcome {
        if !self.running {
            return TickOutcome::Ignored;
        }

        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            self.readout.refresh(ctx.surface, self.remaining_secs);
            ctx.emit(Event::TimerTicked {
                remaining_secs: self.remaining_secs,
                display: self.readout.rendered().to_string(),
                at: Utc::now(),
            });
            return TickOutcome::Counted;
        }

        ctx.emit(Event::TimerCompleted {
            phase: self.phase,
            at: Utc::now(),
        });
        alarm.fire(ctx);
        self.stop_ticking(ctx);
        info!(phase = ?self.phase, "session completed");
        TickOutcome::Completed
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn stop_ticking(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(id) = self.tick.take() {
            ctx.scheduler.clear(id);
        }
        self.running = false;
    }

    fn apply_duration(&mut self, ctx: &mut Ctx<'_>, secs: u64) -> Event {
        self.remaining_secs = secs;
        self.readout.refresh(ctx.surface, secs);
        debug!(remaining_secs = secs, phase = ?self.phase, "duration applied");
        Event::DurationApplied {
            phase: self.phase,
            remaining_secs: secs,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryAudio, MemorySurface};
    use crate::scheduler::Scheduler;

    struct Rig {
        scheduler: Scheduler,
        surface: MemorySurface,
        audio: MemoryAudio,
        events: Vec<Event>,
        alarm: AlarmNotifier,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                scheduler: Scheduler::new(),
                surface: MemorySurface::new(),
                audio: MemoryAudio::new(),
                events: Vec::new(),
                alarm: AlarmNotifier::default(),
            }
        }

        fn ctx(&mut self) -> Ctx<'_> {
            Ctx::new(
                &mut self.scheduler,
                &mut self.surface,
                &mut self.audio,
                &mut self.events,
            )
        }

        /// Run every tick due within `secs` seconds.
        fn run_for(&mut self, timer: &mut SessionTimer, secs: u64) {
            let until = self.scheduler.now_ms() + secs * 1000;
            while let Some((_, task)) = self.scheduler.pop_due(until) {
                if task == Task::SessionTick {
                    let mut alarm = std::mem::take(&mut self.alarm);
                    timer.tick(&mut self.ctx(), &mut alarm);
                    self.alarm = alarm;
                }
            }
        }
    }

    fn timer(work: u64, rest: u64) -> SessionTimer {
        SessionTimer::new(work.into(), rest.into(), Duration::from_secs(1))
    }

    #[test]
    fn start_pause_resume() {
        let mut rig = Rig::new();
        let mut t = timer(1, 5);
        assert!(t.start(&mut rig.ctx()).is_some());
        assert!(t.is_running());
        rig.run_for(&mut t, 10);
        assert_eq!(t.remaining_secs(), 50);

        assert!(t.pause(&mut rig.ctx()).is_some());
        assert!(!t.is_running());
        rig.run_for(&mut t, 30);
        assert_eq!(t.remaining_secs(), 50);

        assert!(t.start(&mut rig.ctx()).is_some());
        rig.run_for(&mut t, 5);
        assert_eq!(t.remaining_secs(), 45);
    }

    #[test]
    fn double_start_does_not_double_speed() {
        let mut rig = Rig::new();
        let mut t = timer(1, 5);
        assert!(t.start(&mut rig.ctx()).is_some());
        assert!(t.start(&mut rig.ctx()).is_none());
        assert_eq!(rig.scheduler.pending_count(), 1);
        rig.run_for(&mut t, 3);
        assert_eq!(t.remaining_secs(), 57);
    }

    #[test]
    fn pause_when_stopped_is_silent() {
        let mut rig = Rig::new();
        let mut t = timer(1, 5);
        assert!(t.pause(&mut rig.ctx()).is_none());
    }

    #[test]
    fn terminal_tick_fires_alarm_and_stops() {
        let mut rig = Rig::new();
        let mut t = SessionTimer::new(DurationField::new("0"), 5.into(), Duration::from_secs(1));
        t.start(&mut rig.ctx());
        rig.run_for(&mut t, 1);
        assert!(!t.is_running());
        assert_eq!(rig.scheduler.pending_count(), 1, "only the flash removal remains");
        assert_eq!(rig.audio.alarm_plays(), 1);
        assert!(rig
            .events
            .iter()
            .any(|e| matches!(e, Event::TimerCompleted { phase: Phase::Work, .. })));
    }

    #[test]
    fn reset_restores_work_duration_and_phase() {
        let mut rig = Rig::new();
        let mut t = timer(2, 5);
        t.set_phase(Phase::Break);
        t.start(&mut rig.ctx());
        rig.run_for(&mut t, 7);
        let ev = t.reset(&mut rig.ctx()).unwrap();
        assert!(matches!(ev, Event::TimerReset { remaining_secs: 120, .. }));
        assert_eq!(t.phase(), Phase::Work);
        assert!(!t.is_running());
        assert_eq!(rig.scheduler.pending_count(), 0);
        assert_eq!(t.display_text(), "02:00");
    }

    #[test]
    fn reset_with_bad_work_field_still_stops() {
        let mut rig = Rig::new();
        let mut t = timer(1, 5);
        t.start(&mut rig.ctx());
        rig.run_for(&mut t, 4);
        assert!(t.set_work_duration(&mut rig.ctx(), "soon").unwrap().is_none());
        assert!(t.reset(&mut rig.ctx()).is_err());
        assert!(!t.is_running());
        assert_eq!(t.remaining_secs(), 56);
    }

    #[test]
    fn work_duration_applies_only_when_stopped_in_work_phase() {
        let mut rig = Rig::new();
        let mut t = timer(25, 5);

        let ev = t.set_work_duration(&mut rig.ctx(), "30").unwrap();
        assert!(ev.is_some());
        assert_eq!(t.remaining_secs(), 1800);

        t.start(&mut rig.ctx());
        assert!(t.set_work_duration(&mut rig.ctx(), "40").unwrap().is_none());
        assert_eq!(t.remaining_secs(), 1800);
        assert_eq!(t.work_field().raw(), "40");

        t.pause(&mut rig.ctx());
        t.set_phase(Phase::Break);
        assert!(t.set_work_duration(&mut rig.ctx(), "45").unwrap().is_none());
        assert_eq!(t.remaining_secs(), 1800);
    }

    #[test]
    fn break_duration_applies_only_in_break_phase() {
        let mut rig = Rig::new();
        let mut t = timer(25, 5);
        assert!(t.set_break_duration(&mut rig.ctx(), "10").unwrap().is_none());
        assert_eq!(t.remaining_secs(), 1500);

        t.set_phase(Phase::Break);
        assert!(t.set_break_duration(&mut rig.ctx(), "10").unwrap().is_some());
        assert_eq!(t.remaining_secs(), 600);
        assert_eq!(t.display_text(), "10:00");
    }

    #[test]
    fn invalid_duration_leaves_remaining_untouched() {
        let mut rig = Rig::new();
        let mut t = timer(25, 5);
        let err = t.set_work_duration(&mut rig.ctx(), "").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDuration { .. }));
        assert_eq!(t.remaining_secs(), 1500);
    }

    #[test]
    fn set_phase_is_idempotent() {
        let mut t = timer(25, 5);
        assert!(t.set_phase(Phase::Work).is_none());
        assert!(t.set_phase(Phase::Break).is_some());
        assert_eq!(t.remaining_secs(), 1500);
    }
}
