pub mod driver;
pub mod state;

pub use driver::FocusDriver;
pub use state::{CompletedFocus, TickOutcome, TimerPhase, TimerState, TimerStatus};
