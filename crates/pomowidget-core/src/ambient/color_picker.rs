use chrono::Utc;
use tracing::debug;

use crate::error::ValidationError;
use crate::events::Event;
use crate::host::{Class, Element};
use crate::widget::Ctx;

/// Background color picker: a toggle and a panel of swatches.
#[derive(Debug, Clone)]
pub struct ColorPicker {
    swatches: Vec<String>,
    open: bool,
    background: Option<String>,
}

impl ColorPicker {
    pub fn new(swatches: Vec<String>) -> Self {
        Self {
            swatches,
            open: false,
            background: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn swatches(&self) -> &[String] {
        &self.swatches
    }

    /// Last color applied through this picker or [`ColorPicker::apply`].
    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Hide the panel and apply the starting background, if any.
    pub fn mount(&mut self, ctx: &mut Ctx<'_>, initial: Option<&str>) {
        ctx.surface.set_visible(Element::ColorPanel, false);
        if let Some(color) = initial {
            self.paint(ctx, color);
        }
    }

    /// Picker toggle clicked.
    pub fn toggle(&mut self, ctx: &mut Ctx<'_>) -> Event {
        self.open = !self.open;
        self.sync_panel(ctx);
        Event::ColorPickerToggled {
            open: self.open,
            at: Utc::now(),
        }
    }

    /// A click landed somewhere other than the panel or the toggle.
    pub fn click_outside(&mut self, ctx: &mut Ctx<'_>) -> Option<Event> {
        if !self.open {
            return None;
        }
        self.open = false;
        self.sync_panel(ctx);
        Some(Event::ColorPickerToggled {
            open: false,
            at: Utc::now(),
        })
    }

    /// Swatch clicked. The panel stays open.
    pub fn select(&mut self, ctx: &mut Ctx<'_>, index: usize) -> Result<Event, ValidationError> {
        let color = self
            .swatches
            .get(index)
            .cloned()
            .ok_or_else(|| ValidationError::OutOfBounds {
                collection: "swatches".into(),
                index,
                len: self.swatches.len(),
            })?;
        Ok(self.paint(ctx, &color))
    }

    /// Paint an arbitrary color as the background.
    pub fn apply(&mut self, ctx: &mut Ctx<'_>, color: &str) -> Event {
        self.paint(ctx, color)
    }

    fn paint(&mut self, ctx: &mut Ctx<'_>, color: &str) -> Event {
        ctx.surface.set_background_color(color);
        self.background = Some(color.to_string());
        debug!(%color, "background changed");
        Event::BackgroundChanged {
            color: color.to_string(),
            at: Utc::now(),
        }
    }

    fn sync_panel(&self, ctx: &mut Ctx<'_>) {
        if self.open {
            ctx.surface.add_class(Element::ColorPanel, Class::Open);
        } else {
            ctx.surface.remove_class(Element::ColorPanel, Class::Open);
        }
        ctx.surface.set_visible(Element::ColorPanel, self.open);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryAudio, MemorySurface};
    use crate::scheduler::Scheduler;

    fn swatches() -> Vec<String> {
        vec!["#ffadad".into(), "#caffbf".into(), "#a0c4ff".into()]
    }

    #[test]
    fn toggle_opens_and_closes_panel() {
        let mut scheduler = Scheduler::new();
        let mut surface = MemorySurface::new();
        let mut audio = MemoryAudio::new();
        let mut events = Vec::new();
        let mut picker = ColorPicker::new(swatches());

        picker.mount(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events), None);
        assert!(!surface.is_visible(Element::ColorPanel));

        picker.toggle(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events));
        assert!(picker.is_open());
        assert!(surface.is_visible(Element::ColorPanel));
        assert!(surface.has_class(Element::ColorPanel, Class::Open));

        picker.toggle(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events));
        assert!(!picker.is_open());
        assert!(!surface.is_visible(Element::ColorPanel));
    }

    #[test]
    fn selecting_keeps_panel_open() {
        let mut scheduler = Scheduler::new();
        let mut surface = MemorySurface::new();
        let mut audio = MemoryAudio::new();
        let mut events = Vec::new();
        let mut picker = ColorPicker::new(swatches());

        picker.toggle(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events));
        let ev = picker
            .select(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events), 1)
            .unwrap();
        assert!(matches!(ev, Event::BackgroundChanged { ref color, .. } if color == "#caffbf"));
        assert!(picker.is_open());
        assert_eq!(surface.background_color(), Some("#caffbf"));
    }

    #[test]
    fn unknown_swatch_is_rejected() {
        let mut scheduler = Scheduler::new();
        let mut surface = MemorySurface::new();
        let mut audio = MemoryAudio::new();
        let mut events = Vec::new();
        let mut picker = ColorPicker::new(swatches());

        let err = picker
            .select(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events), 9)
            .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfBounds { index: 9, len: 3, .. }));
        assert!(surface.background_color().is_none());
    }

    #[test]
    fn outside_click_closes_only_when_open() {
        let mut scheduler = Scheduler::new();
        let mut surface = MemorySurface::new();
        let mut audio = MemoryAudio::new();
        let mut events = Vec::new();
        let mut picker = ColorPicker::new(swatches());

        assert!(picker
            .click_outside(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events))
            .is_none());
        picker.toggle(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events));
        assert!(picker
            .click_outside(&mut Ctx::new(&mut scheduler, &mut surface, &mut audio, &mut events))
            .is_some());
        assert!(!picker.is_open());
    }
}
