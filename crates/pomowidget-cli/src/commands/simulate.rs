use std::time::Duration;

use clap::Args;
use pomowidget_core::{ClickTarget, Config, Input, MemoryAudio, MemorySurface, Phase, Widget};

#[derive(Args)]
pub struct SimulateArgs {
    /// Virtual seconds to run for
    #[arg(long, default_value_t = 60)]
    pub seconds: u64,
    /// Press start before the clock moves
    #[arg(long)]
    pub start: bool,
    /// Work-minutes field text
    #[arg(long)]
    pub work: Option<String>,
    /// Break-minutes field text
    #[arg(long = "break")]
    pub break_minutes: Option<String>,
    /// Switch to the break phase first
    #[arg(long)]
    pub break_phase: bool,
    /// Turn background music on
    #[arg(long)]
    pub music: bool,
    /// Apply a color swatch by index
    #[arg(long)]
    pub swatch: Option<usize>,
    /// Refuse every playback request
    #[arg(long)]
    pub mute: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let audio = if args.mute {
        MemoryAudio::rejecting()
    } else {
        MemoryAudio::new()
    };
    let mut widget = Widget::new(
        config.widget_settings(),
        MemorySurface::without_log(),
        audio,
    );

    if args.break_phase {
        widget.set_phase(Phase::Break);
    }
    if let Some(text) = args.work {
        widget.dispatch(Input::WorkMinutesChanged(text))?;
    }
    if let Some(text) = args.break_minutes {
        widget.dispatch(Input::BreakMinutesChanged(text))?;
    }
    if args.music {
        widget.dispatch(Input::Click(ClickTarget::MusicToggle))?;
    }
    if let Some(index) = args.swatch {
        widget.dispatch(Input::Click(ClickTarget::Swatch(index)))?;
    }
    if args.start {
        widget.dispatch(Input::Click(ClickTarget::Start))?;
    }

    widget.advance(Duration::from_secs(args.seconds));

    for event in widget.drain_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    println!("{}", serde_json::to_string(&widget.snapshot())?);
    Ok(())
}
