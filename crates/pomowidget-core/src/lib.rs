//! # Pomowidget Core Library
//!
//! This library provides the logic of the Pomowidget Pomodoro widget: a
//! countdown with an alarm, an idle-triggered slideshow, and two ambient
//! controls (background music, background color). It owns no UI toolkit; a
//! host renders it through the [`Surface`] and [`AudioOutput`] traits.
//!
//! ## Architecture
//!
//! - **Scheduler**: a single-threaded queue of repeating and one-shot
//!   callbacks on a virtual clock. The host moves the clock forward.
//! - **Session Timer**: countdown state machine ticking once a second; the
//!   terminal tick fires the **Alarm Notifier**.
//! - **Idle Monitor**: quiet-period detection that starts the **Slideshow**.
//! - **Ambient Controls**: music toggle and color picker.
//! - **Storage**: TOML configuration for starting values.
//!
//! ## Key Components
//!
//! - [`Widget`]: composition root; takes [`Input`], emits [`Event`]
//! - [`SessionTimer`]: countdown state machine
//! - [`Scheduler`]: cooperative callback scheduler
//! - [`Config`]: configuration management

pub mod alarm;
pub mod ambient;
pub mod error;
pub mod events;
pub mod host;
pub mod idle;
pub mod scheduler;
pub mod storage;
pub mod timer;
pub mod widget;

pub use alarm::{AlarmNotifier, AlarmSound};
pub use ambient::{ColorPicker, MusicToggle};
pub use error::{AudioError, ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use host::{AudioOutput, Class, Element, MemoryAudio, MemorySurface, Surface};
pub use idle::{Activity, IdleMonitor, IdleState, Slideshow};
pub use scheduler::{Scheduler, Task, TimerId};
pub use storage::Config;
pub use timer::{format_mmss, Phase, SessionTimer};
pub use widget::{ClickTarget, Ctx, Input, Snapshot, Widget, WidgetSettings};
