//! Widget composition root.
//!
//! [`Widget`] owns every component, the scheduler and the host handles. Hosts
//! feed it user input with [`Widget::dispatch`], move its clock with
//! [`Widget::advance`], and drain the resulting [`Event`]s.
//!
//! ## Usage
//!
//! ```ignore
//! let mut widget = Widget::new(config.widget_settings(), surface, audio);
//! widget.dispatch(Input::Click(ClickTarget::Start))?;
//! widget.advance(Duration::from_secs(1));
//! for event in widget.drain_events() { /* ... */ }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::alarm::{AlarmNotifier, AlarmSound};
use crate::ambient::{ColorPicker, MusicToggle};
use crate::error::{CoreError, ValidationError};
use crate::events::Event;
use crate::host::{AudioOutput, Surface};
use crate::idle::{Activity, IdleMonitor, IdleState, Slideshow};
use crate::scheduler::{Scheduler, Task};
use crate::timer::{DurationField, Phase, SessionState, SessionTimer};

/// Borrowed host resources handed to component methods.
pub struct Ctx<'a> {
    pub scheduler: &'a mut Scheduler,
    pub surface: &'a mut dyn Surface,
    pub audio: &'a mut dyn AudioOutput,
    events: &'a mut Vec<Event>,
}

impl<'a> Ctx<'a> {
    pub fn new(
        scheduler: &'a mut Scheduler,
        surface: &'a mut dyn Surface,
        audio: &'a mut dyn AudioOutput,
        events: &'a mut Vec<Event>,
    ) -> Self {
        Self {
            scheduler,
            surface,
            audio,
            events,
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    fn emit_opt(&mut self, event: Option<Event>) {
        self.events.extend(event);
    }
}

/// Starting values for a widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSettings {
    /// Work-minutes field text.
    pub work_minutes: String,
    /// Break-minutes field text.
    pub break_minutes: String,
    pub tick_interval: Duration,
    pub alarm_sound: AlarmSound,
    pub alarm_flash: Duration,
    pub quiet_period: Duration,
    pub slide_interval: Duration,
    pub images: Vec<String>,
    pub swatches: Vec<String>,
    pub background: Option<String>,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        crate::storage::Config::default().widget_settings()
    }
}

/// Clickable parts of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", content = "index", rename_all = "snake_case")]
pub enum ClickTarget {
    Start,
    Pause,
    Reset,
    MusicToggle,
    ColorPickerToggle,
    /// A swatch inside the color panel.
    Swatch(usize),
    /// The color panel background, between swatches.
    ColorPanel,
    /// Anywhere else on the page.
    Elsewhere,
}

/// User input delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", content = "value", rename_all = "snake_case")]
pub enum Input {
    Click(ClickTarget),
    MouseMove,
    KeyDown,
    TouchStart,
    /// Work-minutes field committed.
    WorkMinutesChanged(String),
    /// Break-minutes field committed.
    BreakMinutesChanged(String),
    AlarmSoundSelected(AlarmSound),
}

/// Serializable view of the whole widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub session: SessionState,
    pub display: String,
    pub work_field: String,
    pub break_field: String,
    pub alarm_sound: AlarmSound,
    pub idle: IdleState,
    pub next_slide: usize,
    pub music_playing: bool,
    pub color_picker_open: bool,
    pub background: Option<String>,
    pub clock_ms: u64,
}

/// Scheduler, host handles and event outbox.
struct Runtime<S, A> {
    scheduler: Scheduler,
    surface: S,
    audio: A,
    events: Vec<Event>,
}

impl<S: Surface, A: AudioOutput> Runtime<S, A> {
    fn ctx(&mut self) -> Ctx<'_> {
        Ctx::new(
            &mut self.scheduler,
            &mut self.surface,
            &mut self.audio,
            &mut self.events,
        )
    }
}

pub struct Widget<S, A> {
    rt: Runtime<S, A>,
    session: SessionTimer,
    alarm: AlarmNotifier,
    idle: IdleMonitor,
    slideshow: Slideshow,
    music: MusicToggle,
    picker: ColorPicker,
}

impl<S: Surface, A: AudioOutput> Widget<S, A> {
    /// Build the widget, render its initial state and arm the idle timer.
    pub fn new(settings: WidgetSettings, surface: S, audio: A) -> Self {
        let WidgetSettings {
            work_minutes,
            break_minutes,
            tick_interval,
            alarm_sound,
            alarm_flash,
            quiet_period,
            slide_interval,
            images,
            swatches,
            background,
        } = settings;

        let mut widget = Self {
            rt: Runtime {
                scheduler: Scheduler::new(),
                surface,
                audio,
                events: Vec::new(),
            },
            session: SessionTimer::new(
                DurationField::new(work_minutes),
                DurationField::new(break_minutes),
                tick_interval,
            ),
            alarm: AlarmNotifier::new(alarm_flash, alarm_sound),
            idle: IdleMonitor::new(quiet_period),
            slideshow: Slideshow::new(images, slide_interval),
            music: MusicToggle::new(),
            picker: ColorPicker::new(swatches),
        };

        let mut ctx = widget.rt.ctx();
        widget.session.mount(&mut ctx);
        widget.music.mount(&mut ctx);
        widget.picker.mount(&mut ctx, background.as_deref());
        widget.idle.mount(&mut ctx);
        debug!("widget mounted");
        widget
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &SessionTimer {
        &self.session
    }

    pub fn idle_state(&self) -> IdleState {
        self.idle.state()
    }

    pub fn slideshow(&self) -> &Slideshow {
        &self.slideshow
    }

    pub fn music_playing(&self) -> bool {
        self.music.is_playing()
    }

    pub fn color_picker(&self) -> &ColorPicker {
        &self.picker
    }

    pub fn alarm_sound(&self) -> AlarmSound {
        self.alarm.selected()
    }

    pub fn surface(&self) -> &S {
        &self.rt.surface
    }

    pub fn audio(&self) -> &A {
        &self.rt.audio
    }

    /// Milliseconds on the widget clock.
    pub fn now_ms(&self) -> u64 {
        self.rt.scheduler.now_ms()
    }

    /// Milliseconds until the next scheduled callback.
    pub fn until_next_due_ms(&self) -> Option<u64> {
        self.rt
            .scheduler
            .next_due_ms()
            .map(|due| due.saturating_sub(self.now_ms()))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session: self.session.state(),
            display: self.session.display_text().to_string(),
            work_field: self.session.work_field().raw().to_string(),
            break_field: self.session.break_field().raw().to_string(),
            alarm_sound: self.alarm.selected(),
            idle: self.idle.state(),
            next_slide: self.slideshow.index(),
            music_playing: self.music.is_playing(),
            color_picker_open: self.picker.is_open(),
            background: self.picker.background().map(String::from),
            clock_ms: self.now_ms(),
        }
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.rt.events)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Deliver one user input.
    ///
    /// Invalid field text and unknown swatches are reported as errors after
    /// being logged; the widget state is left as the input found it, apart
    /// from the stored field text.
    pub fn dispatch(&mut self, input: Input) -> Result<(), CoreError> {
        debug!(?input, "dispatch");
        let result = match input {
            Input::Click(target) => self.click(target),
            Input::MouseMove => {
                self.activity(Activity::MouseMove);
                Ok(())
            }
            Input::KeyDown => {
                self.activity(Activity::KeyDown);
                Ok(())
            }
            Input::TouchStart => {
                self.activity(Activity::TouchStart);
                Ok(())
            }
            Input::WorkMinutesChanged(text) => {
                let mut ctx = self.rt.ctx();
                self.session
                    .set_work_duration(&mut ctx, &text)
                    .map(|ev| ctx.emit_opt(ev))
            }
            Input::BreakMinutesChanged(text) => {
                let mut ctx = self.rt.ctx();
                self.session
                    .set_break_duration(&mut ctx, &text)
                    .map(|ev| ctx.emit_opt(ev))
            }
            Input::AlarmSoundSelected(sound) => {
                self.alarm.select(sound);
                Ok(())
            }
        };

        result.map_err(|e| {
            warn!(error = %e, "input rejected");
            CoreError::from(e)
        })
    }

    /// Switch the session phase. No input maps to this.
    pub fn set_phase(&mut self, phase: Phase) {
        let ev = self.session.set_phase(phase);
        self.rt.events.extend(ev);
    }

    /// Move the clock forward, running every callback that comes due.
    pub fn advance(&mut self, by: Duration) {
        let by_ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        let until = self.now_ms().saturating_add(by_ms);
        while let Some((_, task)) = self.rt.scheduler.pop_due(until) {
            self.run_task(task);
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn run_task(&mut self, task: Task) {
        let mut ctx = self.rt.ctx();
        match task {
            Task::SessionTick => {
                self.session.tick(&mut ctx, &mut self.alarm);
            }
            Task::IdleQuietElapsed => self.idle.on_quiet_elapsed(&mut ctx, &mut self.slideshow),
            Task::SlideshowCycle => self.slideshow.run(&mut ctx, self.idle.is_idle()),
            Task::AlarmFlashEnd => self.alarm.end_flash(&mut ctx),
        }
    }

    fn click(&mut self, target: ClickTarget) -> Result<(), ValidationError> {
        let mut ctx = self.rt.ctx();
        let result = match target {
            ClickTarget::Start => {
                let ev = self.session.start(&mut ctx);
                ctx.emit_opt(ev);
                Ok(())
            }
            ClickTarget::Pause => {
                let ev = self.session.pause(&mut ctx);
                ctx.emit_opt(ev);
                Ok(())
            }
            ClickTarget::Reset => self.session.reset(&mut ctx).map(|ev| ctx.emit(ev)),
            ClickTarget::MusicToggle => {
                let ev = self.music.toggle(&mut ctx);
                ctx.emit(ev);
                Ok(())
            }
            ClickTarget::ColorPickerToggle => {
                // Stops here: page-level handlers never see this click.
                let ev = self.picker.toggle(&mut ctx);
                ctx.emit(ev);
                return Ok(());
            }
            ClickTarget::Swatch(index) => self.picker.select(&mut ctx, index).map(|ev| ctx.emit(ev)),
            ClickTarget::ColorPanel | ClickTarget::Elsewhere => Ok(()),
        };

        if !matches!(target, ClickTarget::Swatch(_) | ClickTarget::ColorPanel) {
            let ev = self.picker.click_outside(&mut ctx);
            ctx.emit_opt(ev);
        }
        let ev = self
            .idle
            .on_activity(&mut ctx, &mut self.slideshow, Activity::Click);
        ctx.emit_opt(ev);

        result
    }

    fn activity(&mut self, activity: Activity) {
        let mut ctx = self.rt.ctx();
        let ev = self.idle.on_activity(&mut ctx, &mut self.slideshow, activity);
        ctx.emit_opt(ev);
    }
}

impl<S: Surface + Default, A: AudioOutput + Default> Default for Widget<S, A> {
    fn default() -> Self {
        Self::new(WidgetSettings::default(), S::default(), A::default())
    }
}
