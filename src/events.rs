use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::StudySession;
use crate::timer::{TimerPhase, TimerState};

/// Notifications the host UI renders: countdown updates, phase chimes,
/// distraction alerts, recorded sessions.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum FocusEvent {
    #[serde(rename_all = "camelCase")]
    StateChanged { state: TimerState },
    #[serde(rename_all = "camelCase")]
    Tick {
        phase: TimerPhase,
        remaining_secs: u32,
    },
    #[serde(rename_all = "camelCase")]
    PhaseCompleted { finished: TimerPhase },
    #[serde(rename_all = "camelCase")]
    SessionRecorded { session: StudySession },
    #[serde(rename_all = "camelCase")]
    DistractionAlert {
        away_secs: i64,
        distraction_count: u32,
    },
}

/// Fire-and-forget event delivery to however many host subscribers exist.
/// A send with no receivers is not an error; a slow subscriber lags and
/// drops, it never blocks the timer.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<FocusEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FocusEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: FocusEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
