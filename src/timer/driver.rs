use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use chrono::Utc;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    audio::Chime,
    distraction::{visibility_loop, DistractionMonitor, VisibilitySource},
    events::{EventBus, FocusEvent},
    models::StudySession,
    recorder::SessionSink,
    settings::FocusSettings,
};

use super::{CompletedFocus, TickOutcome, TimerPhase, TimerState, TimerStatus};

/// Async orchestrator for one focus-mode surface: owns the countdown
/// ticker, the visibility watcher, and the session recording contract.
/// Everything runs on the host's tokio runtime; teardown cancels both
/// background tasks in the same step that logs the final session.
#[derive(Clone)]
pub struct FocusDriver {
    state: Arc<Mutex<TimerState>>,
    monitor: Arc<Mutex<DistractionMonitor>>,
    sink: Arc<dyn SessionSink>,
    events: EventBus,
    chime: Chime,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    watcher: Arc<Mutex<Option<(CancellationToken, JoinHandle<()>)>>>,
    tick_interval: Duration,
}

impl FocusDriver {
    pub fn new(settings: FocusSettings, sink: Arc<dyn SessionSink>) -> Self {
        let chime = Chime::new(settings.chime_enabled);
        Self {
            state: Arc::new(Mutex::new(TimerState::new(
                settings.focus_secs,
                settings.break_secs,
            ))),
            monitor: Arc::new(Mutex::new(DistractionMonitor::new(
                settings.distraction_threshold_secs,
            ))),
            sink,
            events: EventBus::default(),
            chime,
            ticker: Arc::new(Mutex::new(None)),
            watcher: Arc::new(Mutex::new(None)),
            tick_interval: Duration::from_secs(1),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FocusEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> TimerState {
        self.state.lock().await.clone()
    }

    /// Wire up the host's page-visibility signal. Hosts without one skip
    /// this and the timer runs as a plain countdown.
    pub async fn attach_visibility(&self, source: VisibilitySource) {
        let token = CancellationToken::new();
        let handle = tokio::spawn(visibility_loop(
            source,
            self.state.clone(),
            self.monitor.clone(),
            self.events.clone(),
            token.clone(),
        ));

        let mut guard = self.watcher.lock().await;
        if let Some((old_token, old_handle)) = guard.take() {
            old_token.cancel();
            old_handle.abort();
        }
        *guard = Some((token, handle));
    }

    /// Begin a focus phase from Idle, or resume from Paused.
    pub async fn start(&self, topic_id: Option<String>) -> Result<TimerState> {
        let snapshot = {
            let mut state = self.state.lock().await;
            if !state.start(topic_id, Utc::now()) {
                return Err(anyhow!("timer already running"));
            }
            state.clone()
        };

        self.spawn_ticker().await;
        self.events.emit(FocusEvent::StateChanged {
            state: snapshot.clone(),
        });

        Ok(snapshot)
    }

    pub async fn pause(&self) -> Result<TimerState> {
        let snapshot = {
            let mut state = self.state.lock().await;
            if !state.pause() {
                return Err(anyhow!("no running timer to pause"));
            }
            state.clone()
        };

        // The ticker loop observes the status change and exits on its own.
        self.events.emit(FocusEvent::StateChanged {
            state: snapshot.clone(),
        });

        Ok(snapshot)
    }

    /// Finish the current phase immediately, with the same completion
    /// behavior as natural expiry.
    pub async fn skip(&self) -> Result<TimerState> {
        let (finished, completed, snapshot) = {
            let mut state = self.state.lock().await;
            if state.status == TimerStatus::Idle {
                return Err(anyhow!("no active phase to skip"));
            }
            let finished = state.phase;
            let completed = state.skip(Utc::now());
            (finished, completed, state.clone())
        };

        self.handle_phase_completion(finished, completed).await;
        self.events.emit(FocusEvent::StateChanged {
            state: snapshot.clone(),
        });

        Ok(snapshot)
    }

    /// Terminal teardown from the host UI (close or complete). Cancels the
    /// ticker and the visibility watcher in the same step that triggers
    /// the final recording attempt; nothing keeps ticking afterwards.
    pub async fn close(&self) -> Result<Option<StudySession>> {
        let completed = {
            let mut state = self.state.lock().await;
            state.close(Utc::now())
        };

        self.cancel_ticker().await;
        self.cancel_watcher().await;

        let session = match completed {
            Some(completed) => {
                Some(record_completed_focus(&self.monitor, self.sink.as_ref(), &self.events, completed).await)
            }
            None => {
                // No session to fold the counter into; drop it so a future
                // focus phase starts clean.
                self.monitor.lock().await.take_count();
                None
            }
        };

        let snapshot = self.state.lock().await.clone();
        self.events.emit(FocusEvent::StateChanged { state: snapshot });

        Ok(session)
    }

    async fn handle_phase_completion(
        &self,
        finished: TimerPhase,
        completed: Option<CompletedFocus>,
    ) {
        if let Some(completed) = completed {
            record_completed_focus(&self.monitor, self.sink.as_ref(), &self.events, completed)
                .await;
        }

        self.chime.play();
        self.events.emit(FocusEvent::PhaseCompleted { finished });
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let monitor = self.monitor.clone();
        let sink = self.sink.clone();
        let events = self.events.clone();
        let chime = self.chime.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately; consume it so
            // the countdown moves one second per elapsed second.
            interval.tick().await;

            loop {
                interval.tick().await;

                let now = Utc::now();
                let (outcome, snapshot) = {
                    let mut guard = state.lock().await;
                    if guard.status != TimerStatus::Running {
                        break;
                    }
                    let outcome = guard.tick(now);
                    (outcome, guard.clone())
                };

                match outcome {
                    TickOutcome::Counting => {
                        events.emit(FocusEvent::Tick {
                            phase: snapshot.phase,
                            remaining_secs: snapshot.remaining_secs,
                        });
                    }
                    TickOutcome::PhaseElapsed(completed) => {
                        // The snapshot already carries the new phase.
                        let finished = match snapshot.phase {
                            TimerPhase::Focus => TimerPhase::Break,
                            TimerPhase::Break => TimerPhase::Focus,
                        };

                        if let Some(completed) = completed {
                            record_completed_focus(&monitor, sink.as_ref(), &events, completed)
                                .await;
                        }

                        chime.play();
                        events.emit(FocusEvent::PhaseCompleted { finished });
                        events.emit(FocusEvent::StateChanged {
                            state: snapshot.clone(),
                        });
                    }
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn cancel_watcher(&self) {
        if let Some((token, handle)) = self.watcher.lock().await.take() {
            token.cancel();
            let _ = handle.await;
        }
    }
}

/// Fold the distraction counter into a session record and hand it to the
/// sink. The counter and start stamp are reset before the write resolves,
/// so a lost write never corrupts the next phase.
async fn record_completed_focus(
    monitor: &Mutex<DistractionMonitor>,
    sink: &dyn SessionSink,
    events: &EventBus,
    completed: CompletedFocus,
) -> StudySession {
    let distraction_count = monitor.lock().await.take_count();
    let session = StudySession::new(
        completed.topic_id,
        completed.started_at,
        completed.ended_at,
        distraction_count,
    );

    sink.submit(session.clone());
    events.emit(FocusEvent::SessionRecorded {
        session: session.clone(),
    });

    session
}
