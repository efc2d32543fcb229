use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::events::{EventBus, FocusEvent};
use crate::timer::TimerState;

use super::DistractionMonitor;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = false;

use crate::log_info;

/// Receiving half of the injected page-visibility capability: `true` when
/// the document is in the foreground. Hosts without a visibility signal
/// simply never supply one and the timer runs as a plain countdown.
pub type VisibilitySource = watch::Receiver<bool>;

/// Forwards visibility transitions into the distraction monitor until
/// cancelled. Armed/disarmed is decided per event from the live timer
/// state, so a pause or phase flip that happened while hidden is honored.
pub async fn visibility_loop(
    mut visibility: VisibilitySource,
    state: Arc<Mutex<TimerState>>,
    monitor: Arc<Mutex<DistractionMonitor>>,
    events: EventBus,
    cancel_token: CancellationToken,
) {
    let mut last_visible = *visibility.borrow();

    loop {
        tokio::select! {
            changed = visibility.changed() => {
                if changed.is_err() {
                    log_info!("visibility source dropped; distraction tracking off");
                    break;
                }

                let visible = *visibility.borrow_and_update();
                if visible == last_visible {
                    continue;
                }
                last_visible = visible;

                let now = Utc::now();
                let armed = state.lock().await.is_focus_running();
                let mut guard = monitor.lock().await;

                if visible {
                    if let Some(away) = guard.page_visible(now, armed) {
                        log_info!(
                            "distraction counted after {}s away (total {})",
                            away.num_seconds(),
                            guard.distraction_count()
                        );
                        events.emit(FocusEvent::DistractionAlert {
                            away_secs: away.num_seconds(),
                            distraction_count: guard.distraction_count(),
                        });
                    }
                } else {
                    log_info!("page hidden (armed: {armed})");
                    guard.page_hidden(now, armed);
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("visibility loop shutting down");
                break;
            }
        }
    }
}
