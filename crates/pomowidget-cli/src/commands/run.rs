use std::time::Duration;

use pomowidget_core::{AlarmSound, ClickTarget, Config, Input, Widget};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::terminal::{TerminalAudio, TerminalSurface};

/// How often the widget clock catches up with wall time.
const PUMP_INTERVAL: Duration = Duration::from_millis(100);

const HELP: &str = "\
commands:
  start | pause | reset
  work <min> | break <min>   edit the duration fields
  sound <default|beep|bell>
  music                      toggle background music
  colors                     open or close the color panel
  swatch <n>                 pick a color from the panel
  click | move | touch       plain activity
  status                     print the widget state as JSON
  help | quit";

/// One line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Inputs(Vec<Input>),
    Status,
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Line, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Line::Inputs(Vec::new()));
    };
    let arg = words.collect::<Vec<_>>().join(" ");
    let click = |target| Ok(Line::Inputs(vec![Input::Click(target)]));

    match head.to_ascii_lowercase().as_str() {
        "start" | "s" => click(ClickTarget::Start),
        "pause" | "p" => click(ClickTarget::Pause),
        "reset" | "r" => click(ClickTarget::Reset),
        "music" | "m" => click(ClickTarget::MusicToggle),
        "colors" | "c" => click(ClickTarget::ColorPickerToggle),
        "swatch" => arg
            .parse::<usize>()
            .map(|i| Line::Inputs(vec![Input::Click(ClickTarget::Swatch(i))]))
            .map_err(|_| format!("swatch needs an index, got '{arg}'")),
        "click" => click(ClickTarget::Elsewhere),
        "move" => Ok(Line::Inputs(vec![Input::MouseMove])),
        "touch" => Ok(Line::Inputs(vec![Input::TouchStart])),
        "work" => Ok(Line::Inputs(vec![Input::WorkMinutesChanged(arg)])),
        "break" => Ok(Line::Inputs(vec![Input::BreakMinutesChanged(arg)])),
        "sound" => arg
            .parse::<AlarmSound>()
            .map(|s| Line::Inputs(vec![Input::AlarmSoundSelected(s)]))
            .map_err(|e| e.to_string()),
        "status" => Ok(Line::Status),
        "help" | "?" => Ok(Line::Help),
        "quit" | "exit" | "q" => Ok(Line::Quit),
        other => Err(format!("unknown command '{other}' (try help)")),
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_loop(config))
}

async fn run_loop(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let surface = TerminalSurface::new(config.ambient.swatches.clone());
    let audio = TerminalAudio::from_config(&config);
    let mut widget = Widget::new(config.widget_settings(), surface, audio);
    println!("{HELP}");

    let started = Instant::now();
    let mut pump = tokio::time::interval(PUMP_INTERVAL);
    pump.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!("interactive widget started");
    loop {
        tokio::select! {
            _ = pump.tick() => {
                catch_up(&mut widget, started);
            }
            line = lines.next_line() => {
                catch_up(&mut widget, started);
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                // typing is activity in its own right
                let _ = widget.dispatch(Input::KeyDown);
                match parse_line(&line) {
                    Ok(Line::Inputs(inputs)) => {
                        for input in inputs {
                            // rejected inputs are logged by the widget
                            let _ = widget.dispatch(input);
                        }
                    }
                    Ok(Line::Status) => println!("{}", serde_json::to_string_pretty(&widget.snapshot())?),
                    Ok(Line::Help) => println!("{HELP}"),
                    Ok(Line::Quit) => break,
                    Err(msg) => println!("{msg}"),
                }
            }
        }

        for event in widget.drain_events() {
            debug!(kind = event.kind(), "event");
        }
    }

    info!(clock_ms = widget.now_ms(), "interactive widget stopped");
    Ok(())
}

/// Advance the widget clock to the wall time elapsed since `started`.
fn catch_up(widget: &mut Widget<TerminalSurface, TerminalAudio>, started: Instant) {
    let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let behind = elapsed.saturating_sub(widget.now_ms());
    if behind > 0 {
        widget.advance(Duration::from_millis(behind));
    }
}
