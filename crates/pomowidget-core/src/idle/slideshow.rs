use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::events::Event;
use crate::host::Element;
use crate::scheduler::{Task, TimerId};
use crate::widget::Ctx;

/// Delay between slideshow frames.
pub const DEFAULT_SLIDE_INTERVAL: Duration = Duration::from_secs(18);

/// Cycles a fixed image list while the page is idle.
///
/// The index survives leaving idle mode, so the next idle period picks up
/// where the last one stopped.
#[derive(Debug, Clone)]
pub struct Slideshow {
    images: Vec<String>,
    index: usize,
    interval: Duration,
    pending: Option<TimerId>,
}

impl Slideshow {
    pub fn new(images: Vec<String>, interval: Duration) -> Self {
        Self {
            images,
            index: 0,
            interval,
            pending: None,
        }
    }

    /// Index of the next image to show.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Show the next frame and schedule the one after it.
    ///
    /// Does nothing once the page is no longer idle, which ends the cycle.
    pub fn run(&mut self, ctx: &mut Ctx<'_>, idle: bool) {
        self.pending = None;
        if !idle || self.images.is_empty() {
            return;
        }

        let index = self.index;
        let path = self.images[index].clone();
        debug!(index, %path, "showing slide");
        ctx.surface.set_background_image(Element::SlideshowImage, &path);
        ctx.emit(Event::SlideShown {
            index,
            path,
            at: Utc::now(),
        });

        self.index = (index + 1) % self.images.len();
        self.pending = Some(ctx.scheduler.set_timeout(self.interval, Task::SlideshowCycle));
    }

    /// Cancel the pending frame, if any.
    pub fn stop(&mut self, ctx: &mut Ctx<'_>) {
        if let Some(id) = self.pending.take() {
            ctx.scheduler.clear(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryAudio, MemorySurface};
    use crate::scheduler::Scheduler;

    fn images(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("assets/background/bg{i}.jpg")).collect()
    }

    #[test]
    fn index_wraps_after_full_cycle() {
        let mut scheduler = Scheduler::new();
        let mut surface = MemorySurface::new();
        let mut audio = MemoryAudio::new();
        let mut events = Vec::new();
        let mut ctx = Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events);

        let mut show = Slideshow::new(images(7), DEFAULT_SLIDE_INTERVAL);
        for _ in 0..7 {
            show.run(&mut ctx, true);
        }
        assert_eq!(show.index(), 0);
    }

    #[test]
    fn not_idle_shows_nothing() {
        let mut scheduler = Scheduler::new();
        let mut surface = MemorySurface::new();
        let mut audio = MemoryAudio::new();
        let mut events = Vec::new();
        let mut show = Slideshow::new(images(3), DEFAULT_SLIDE_INTERVAL);

        show.run(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events), false);
        assert!(!show.is_scheduled());
        assert_eq!(show.index(), 0);
        assert!(surface.background_image(Element::SlideshowImage).is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn reschedules_after_interval() {
        let mut scheduler = Scheduler::new();
        let mut surface = MemorySurface::new();
        let mut audio = MemoryAudio::new();
        let mut events = Vec::new();
        let mut show = Slideshow::new(images(3), DEFAULT_SLIDE_INTERVAL);

        show.run(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events), true);
        assert_eq!(
            surface.background_image(Element::SlideshowImage),
            Some("assets/background/bg1.jpg")
        );
        assert_eq!(scheduler.next_due_ms(), Some(18_000));

        show.stop(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events));
        assert_eq!(scheduler.pending_count(), 0);
        assert!(!show.is_scheduled());
    }

    #[test]
    fn empty_list_never_schedules() {
        let mut scheduler = Scheduler::new();
        let mut surface = MemorySurface::new();
        let mut audio = MemoryAudio::new();
        let mut events = Vec::new();
        let mut show = Slideshow::new(Vec::new(), DEFAULT_SLIDE_INTERVAL);

        show.run(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events), true);
        assert_eq!(scheduler.pending_count(), 0);
    }
}
