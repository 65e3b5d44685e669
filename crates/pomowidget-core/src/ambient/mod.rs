//! Ambient controls: background music and background color.
//!
//! Neither control reads or writes session or idle state.

mod color_picker;
mod music;

pub use color_picker::ColorPicker;
pub use music::{MusicToggle, PLAYING_LABEL, STOPPED_LABEL};
