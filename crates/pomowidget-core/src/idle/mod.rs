//! Idle detection.
//!
//! Two states, `Active` and `Idle`. Every tracked input restarts a one-shot
//! quiet-period timer; when it expires the page goes idle and the slideshow
//! starts. Input while idle switches back and stops the slideshow.

mod slideshow;

pub use slideshow::{Slideshow, DEFAULT_SLIDE_INTERVAL};

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::events::Event;
use crate::host::{Class, Element};
use crate::scheduler::{Task, TimerId};
use crate::widget::Ctx;

/// Quiet period before the page goes idle.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleState {
    Active,
    Idle,
}

/// Inputs that count as user activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    MouseMove,
    Click,
    KeyDown,
    TouchStart,
}

#[derive(Debug, Clone)]
pub struct IdleMonitor {
    state: IdleState,
    quiet_period: Duration,
    quiet_timer: Option<TimerId>,
}

impl IdleMonitor {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            state: IdleState::Active,
            quiet_period,
            quiet_timer: None,
        }
    }

    pub fn state(&self) -> IdleState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == IdleState::Idle
    }

    /// Arm the first quiet period.
    pub fn mount(&mut self, ctx: &mut Ctx<'_>) {
        self.rearm(ctx);
    }

    /// Record user input. Returns `IdleExited` when this ended an idle period.
    pub fn on_activity(
        &mut self,
        ctx: &mut Ctx<'_>,
        slideshow: &mut Slideshow,
        activity: Activity,
    ) -> Option<Event> {
        let exited = if self.is_idle() {
            self.state = IdleState::Active;
            ctx.surface.remove_class(Element::Page, Class::Idle);
            ctx.surface
                .remove_class(Element::SlideshowContainer, Class::Active);
            slideshow.stop(ctx);
            info!(?activity, "activity detected, leaving idle mode");
            Some(Event::IdleExited { at: Utc::now() })
        } else {
            None
        };
        self.rearm(ctx);
        exited
    }

    /// Scheduler callback: the quiet period ran out.
    pub fn on_quiet_elapsed(&mut self, ctx: &mut Ctx<'_>, slideshow: &mut Slideshow) {
        self.quiet_timer = None;
        if self.is_idle() {
            return;
        }
        self.state = IdleState::Idle;
        ctx.surface.add_class(Element::Page, Class::Idle);
        ctx.surface.add_class(Element::SlideshowContainer, Class::Active);
        info!("entering idle mode");
        ctx.emit(Event::IdleEntered { at: Utc::now() });
        slideshow.run(ctx, true);
    }

    fn rearm(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(id) = self.quiet_timer.take() {
            ctx.scheduler.clear(id);
        }
        self.quiet_timer = Some(
            ctx.scheduler
                .set_timeout(self.quiet_period, Task::IdleQuietElapsed),
        );
        debug!(quiet_period = ?self.quiet_period, "idle timer reset");
    }
}

impl Default for IdleMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}
