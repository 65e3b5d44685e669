//! Host collaborators.
//!
//! The widget never touches a UI toolkit directly. Whatever renders it (a
//! terminal, a web view, a test) implements [`Surface`] and [`AudioOutput`]
//! and hands them to [`Widget`](crate::Widget) at construction time.
//!
//! [`MemorySurface`] and [`MemoryAudio`] are headless implementations that
//! record everything they are told; the CLI's `simulate` command and the test
//! suites use them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::AudioError;

/// Addressable parts of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// The page itself; carries the background color and the idle class.
    Page,
    /// The `MM:SS` readout.
    TimerDisplay,
    SlideshowContainer,
    SlideshowImage,
    MusicToggle,
    ColorPickerToggle,
    ColorPanel,
}

/// Visual state markers toggled on elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Class {
    /// Digit-change animation on the timer display.
    TimerTick,
    /// Alarm flash on the timer display.
    AlarmFlash,
    /// Page is in idle mode.
    Idle,
    /// Toggle or container is active.
    Active,
    /// Color panel is open.
    Open,
}

impl Class {
    /// CSS class name for hosts that render to markup.
    pub fn css_name(self) -> &'static str {
        match self {
            Class::TimerTick => "timer-tick",
            Class::AlarmFlash => "alarm-flash",
            Class::Idle => "idle",
            Class::Active => "active",
            Class::Open => "open",
        }
    }
}

/// Rendering surface.
pub trait Surface {
    fn set_text(&mut self, element: Element, text: &str);
    fn add_class(&mut self, element: Element, class: Class);
    fn remove_class(&mut self, element: Element, class: Class);
    fn set_visible(&mut self, element: Element, visible: bool);
    /// Page background; last writer wins.
    fn set_background_color(&mut self, color: &str);
    fn set_background_image(&mut self, element: Element, path: &str);
}

/// Audio playback.
pub trait AudioOutput {
    /// Rewind the alarm clip and play it once.
    fn play_alarm_from_start(&mut self) -> Result<(), AudioError>;
    /// Start (or continue) the background track on loop.
    fn play_music_looped(&mut self) -> Result<(), AudioError>;
    fn pause_music(&mut self);
}

/// One call made on a [`MemorySurface`], in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfaceOp {
    Text { element: Element, text: String },
    AddClass { element: Element, class: Class },
    RemoveClass { element: Element, class: Class },
    Visible { element: Element, visible: bool },
    BackgroundColor { color: String },
    BackgroundImage { element: Element, path: String },
}

/// Headless surface that keeps the current state and a log of calls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemorySurface {
    texts: BTreeMap<Element, String>,
    classes: BTreeSet<(Element, Class)>,
    hidden: BTreeSet<Element>,
    background_color: Option<String>,
    images: BTreeMap<Element, String>,
    #[serde(skip)]
    ops: Vec<SurfaceOp>,
    /// Keep state only; skip the call log.
    #[serde(skip)]
    unlogged: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that tracks state but records no call log, for long runs.
    pub fn without_log() -> Self {
        Self {
            unlogged: true,
            ..Self::default()
        }
    }

    pub fn text(&self, element: Element) -> Option<&str> {
        self.texts.get(&element).map(String::as_str)
    }

    pub fn has_class(&self, element: Element, class: Class) -> bool {
        self.classes.contains(&(element, class))
    }

    pub fn is_visible(&self, element: Element) -> bool {
        !self.hidden.contains(&element)
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    pub fn background_image(&self, element: Element) -> Option<&str> {
        self.images.get(&element).map(String::as_str)
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Take the call log, leaving the current state in place.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    fn record(&mut self, op: SurfaceOp) {
        if !self.unlogged {
            self.ops.push(op);
        }
    }
}

impl Surface for MemorySurface {
    fn set_text(&mut self, element: Element, text: &str) {
        self.texts.insert(element, text.to_string());
        self.record(SurfaceOp::Text {
            element,
            text: text.to_string(),
        });
    }

    fn add_class(&mut self, element: Element, class: Class) {
        self.classes.insert((element, class));
        self.record(SurfaceOp::AddClass { element, class });
    }

    fn remove_class(&mut self, element: Element, class: Class) {
        self.classes.remove(&(element, class));
        self.record(SurfaceOp::RemoveClass { element, class });
    }

    fn set_visible(&mut self, element: Element, visible: bool) {
        if visible {
            self.hidden.remove(&element);
        } else {
            self.hidden.insert(element);
        }
        self.record(SurfaceOp::Visible { element, visible });
    }

    fn set_background_color(&mut self, color: &str) {
        self.background_color = Some(color.to_string());
        self.record(SurfaceOp::BackgroundColor {
            color: color.to_string(),
        });
    }

    fn set_background_image(&mut self, element: Element, path: &str) {
        self.images.insert(element, path.to_string());
        self.record(SurfaceOp::BackgroundImage {
            element,
            path: path.to_string(),
        });
    }
}

/// Headless audio output with scriptable failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryAudio {
    alarm_error: Option<AudioError>,
    music_error: Option<AudioError>,
    alarm_plays: usize,
    music_playing: bool,
}

impl MemoryAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Audio that refuses every playback request, like a browser that
    /// blocks autoplay.
    pub fn rejecting() -> Self {
        let refusal = AudioError::Rejected("autoplay blocked".into());
        Self {
            alarm_error: Some(refusal.clone()),
            music_error: Some(refusal),
            ..Self::default()
        }
    }

    /// Number of successful alarm plays.
    pub fn alarm_plays(&self) -> usize {
        self.alarm_plays
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }
}

impl AudioOutput for MemoryAudio {
    fn play_alarm_from_start(&mut self) -> Result<(), AudioError> {
        if let Some(err) = &self.alarm_error {
            return Err(err.clone());
        }
        self.alarm_plays += 1;
        Ok(())
    }

    fn play_music_looped(&mut self) -> Result<(), AudioError> {
        if let Some(err) = &self.music_error {
            return Err(err.clone());
        }
        self.music_playing = true;
        Ok(())
    }

    fn pause_music(&mut self) {
        self.music_playing = false;
    }
}
