//! Focus mode engine for Study Buddy.
//!
//! A Pomodoro-style focus/break timer with tab-visibility distraction
//! tracking and study-session logging. The host UI drives a
//! [`FocusDriver`] and renders the [`FocusEvent`] stream; page visibility
//! and session persistence are injected capabilities so the whole state
//! machine runs (and tests) without a browser.

pub mod audio;
pub mod db;
pub mod distraction;
pub mod events;
pub mod models;
pub mod recorder;
pub mod settings;
pub mod timer;
pub mod utils;


pub use audio::Chime;
pub use db::Database;
pub use distraction::{DistractionMonitor, VisibilitySource};
pub use events::{EventBus, FocusEvent};
pub use models::{StudySession, TopicTotals};
pub use recorder::{HttpSink, NullSink, SessionSink, SqliteSink};
pub use settings::{FocusSettings, SettingsStore};
pub use timer::{FocusDriver, TimerPhase, TimerState, TimerStatus};
