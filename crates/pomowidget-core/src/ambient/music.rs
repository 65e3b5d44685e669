use chrono::Utc;
use tracing::{info, warn};

use crate::events::Event;
use crate::host::{Class, Element};
use crate::widget::Ctx;

/// Toggle label while the track is stopped.
pub const STOPPED_LABEL: &str = "🎵";
/// Toggle label while the track is playing.
pub const PLAYING_LABEL: &str = "⏸️";

/// Background music on/off switch.
#[derive(Debug, Clone, Default)]
pub struct MusicToggle {
    playing: bool,
}

impl MusicToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn mount(&mut self, ctx: &mut Ctx<'_>) {
        ctx.surface.set_text(Element::MusicToggle, STOPPED_LABEL);
    }

    /// Flip playback. A refused play request is logged; the toggle still
    /// shows "playing".
    pub fn toggle(&mut self, ctx: &mut Ctx<'_>) -> Event {
        if self.playing {
            ctx.audio.pause_music();
            ctx.surface.remove_class(Element::MusicToggle, Class::Active);
            ctx.surface.set_text(Element::MusicToggle, STOPPED_LABEL);
        } else {
            if let Err(e) = ctx.audio.play_music_looped() {
                warn!(error = %e, "background music did not start");
            }
            ctx.surface.add_class(Element::MusicToggle, Class::Active);
            ctx.surface.set_text(Element::MusicToggle, PLAYING_LABEL);
        }
        self.playing = !self.playing;
        info!(playing = self.playing, "music toggled");
        Event::MusicToggled {
            playing: self.playing,
            at: Utc::now(),
        }
    }
}
