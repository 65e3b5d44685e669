use crate::host::{Class, Element, Surface};

/// Format seconds as `MM:SS`, each part zero-padded to two digits.
///
/// Minutes are not wrapped into hours, so long sessions render as `120:00`.
pub fn format_mmss(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// The `MM:SS` readout and its digit-change cue.
#[derive(Debug, Clone, Default)]
pub struct TimerReadout {
    rendered: String,
}

impl TimerReadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text written to the display.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Render `remaining_secs`. When the text differs from what is on screen,
    /// the tick cue is restarted. Returns whether the text changed.
    pub fn refresh(&mut self, surface: &mut dyn Surface, remaining_secs: u64) -> bool {
        let text = format_mmss(remaining_secs);
        let changed = text != self.rendered;
        if changed {
            surface.remove_class(Element::TimerDisplay, Class::TimerTick);
            surface.add_class(Element::TimerDisplay, Class::TimerTick);
        }
        surface.set_text(Element::TimerDisplay, &text);
        self.rendered = text;
        changed
    }
}
