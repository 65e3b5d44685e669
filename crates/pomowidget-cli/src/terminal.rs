//! Terminal rendering of the widget.
//!
//! The countdown is redrawn in place on one line; every other visual change
//! is printed on a line of its own.

use std::io::Write;
use std::path::{Path, PathBuf};

use pomowidget_core::{AudioError, AudioOutput, Class, Config, Element, Surface};
use tracing::debug;

#[derive(Debug, Default)]
pub struct TerminalSurface {
    /// Cursor sits right after the in-place countdown.
    inline: bool,
    swatches: Vec<String>,
}

impl TerminalSurface {
    pub fn new(swatches: Vec<String>) -> Self {
        Self {
            inline: false,
            swatches,
        }
    }

    fn line(&mut self, msg: &str) {
        let mut out = std::io::stdout().lock();
        if self.inline {
            let _ = writeln!(out);
            self.inline = false;
        }
        let _ = writeln!(out, "{msg}");
    }
}

impl Surface for TerminalSurface {
    fn set_text(&mut self, element: Element, text: &str) {
        match element {
            Element::TimerDisplay => {
                let mut out = std::io::stdout().lock();
                let _ = write!(out, "\r  {text}   ");
                let _ = out.flush();
                self.inline = true;
            }
            Element::MusicToggle => self.line(&format!("music {text}")),
            other => debug!(?other, text, "text ignored"),
        }
    }

    fn add_class(&mut self, element: Element, class: Class) {
        match (element, class) {
            (Element::TimerDisplay, Class::AlarmFlash) => self.line("*** time is up ***"),
            (Element::Page, Class::Idle) => self.line("(idle) slideshow on"),
            _ => debug!(?element, class = class.css_name(), "class added"),
        }
    }

    fn remove_class(&mut self, element: Element, class: Class) {
        if (element, class) == (Element::Page, Class::Idle) {
            self.line("welcome back");
        } else {
            debug!(?element, class = class.css_name(), "class removed");
        }
    }

    fn set_visible(&mut self, element: Element, visible: bool) {
        if element != Element::ColorPanel {
            return;
        }
        if visible {
            let listing = self
                .swatches
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{i}:{c}"))
                .collect::<Vec<_>>()
                .join("  ");
            self.line(&format!("colors  {listing}"));
        } else {
            debug!("color panel hidden");
        }
    }

    fn set_background_color(&mut self, color: &str) {
        self.line(&format!("background {color}"));
    }

    fn set_background_image(&mut self, _element: Element, path: &str) {
        self.line(&format!("slide {path}"));
    }
}

/// Terminal bell for the alarm; the music track is tracked but not decoded.
#[derive(Debug)]
pub struct TerminalAudio {
    alarm_clip: PathBuf,
    music: PathBuf,
    music_playing: bool,
}

impl TerminalAudio {
    pub fn from_config(config: &Config) -> Self {
        Self {
            alarm_clip: PathBuf::from(&config.alarm.clip),
            music: PathBuf::from(&config.ambient.music),
            music_playing: false,
        }
    }
}

fn require(path: &Path) -> Result<(), AudioError> {
    if path.exists() {
        Ok(())
    } else {
        Err(AudioError::MissingClip(path.display().to_string()))
    }
}

impl AudioOutput for TerminalAudio {
    fn play_alarm_from_start(&mut self) -> Result<(), AudioError> {
        require(&self.alarm_clip)?;
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\x07");
        let _ = out.flush();
        Ok(())
    }

    fn play_music_looped(&mut self) -> Result<(), AudioError> {
        require(&self.music)?;
        self.music_playing = true;
        debug!(track = %self.music.display(), "music looping");
        Ok(())
    }

    fn pause_music(&mut self) {
        if self.music_playing {
            debug!(track = %self.music.display(), "music paused");
        }
        self.music_playing = false;
    }
}
