use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerPhase {
    Focus,
    Break,
}

impl Default for TimerPhase {
    fn default() -> Self {
        TimerPhase::Focus
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

impl Default for TimerStatus {
    fn default() -> Self {
        TimerStatus::Idle
    }
}

/// Outcome of finishing a phase. Present only when the phase was Focus and
/// had a recorded start time; the driver turns it into a session record.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedFocus {
    pub topic_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Countdown still in progress (or timer not running).
    Counting,
    /// The phase reached zero and flipped. Carries the focus completion
    /// when the elapsed phase was a recordable focus phase.
    PhaseElapsed(Option<CompletedFocus>),
}

/// Pure focus/break countdown state machine. No I/O and no clock of its
/// own: every operation with a timestamp side effect takes `now`, so the
/// driver ticks it once per second and tests drive it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub status: TimerStatus,
    pub phase: TimerPhase,
    pub remaining_secs: u32,
    pub focus_secs: u32,
    pub break_secs: u32,
    pub topic_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl TimerState {
    pub fn new(focus_secs: u32, break_secs: u32) -> Self {
        Self {
            status: TimerStatus::Idle,
            phase: TimerPhase::Focus,
            remaining_secs: focus_secs,
            focus_secs,
            break_secs,
            topic_id: None,
            started_at: None,
        }
    }

    pub fn phase_total_secs(&self) -> u32 {
        match self.phase {
            TimerPhase::Focus => self.focus_secs,
            TimerPhase::Break => self.break_secs,
        }
    }

    /// True while a focus phase is actively ticking; the only window in
    /// which distraction tracking is armed.
    pub fn is_focus_running(&self) -> bool {
        self.status == TimerStatus::Running && self.phase == TimerPhase::Focus
    }

    /// Valid from Idle or Paused. Starting a focus phase from Idle stamps
    /// the session start time.
    pub fn start(&mut self, topic_id: Option<String>, now: DateTime<Utc>) -> bool {
        match self.status {
            TimerStatus::Idle => {
                if let Some(topic) = topic_id {
                    self.topic_id = Some(topic);
                }
                if self.phase == TimerPhase::Focus {
                    self.started_at = Some(now);
                }
                self.status = TimerStatus::Running;
                true
            }
            TimerStatus::Paused => {
                // A focus phase entered while paused (skip out of a break)
                // has no start stamp yet; resuming begins its clock.
                if self.phase == TimerPhase::Focus && self.started_at.is_none() {
                    self.started_at = Some(now);
                }
                self.status = TimerStatus::Running;
                true
            }
            TimerStatus::Running => false,
        }
    }

    /// Valid from Running. No time-of-day side effects.
    pub fn pause(&mut self) -> bool {
        if self.status == TimerStatus::Running {
            self.status = TimerStatus::Paused;
            true
        } else {
            false
        }
    }

    /// One-second tick. The countdown never goes below zero; reaching zero
    /// flips the phase in the same step.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.status != TimerStatus::Running {
            return TickOutcome::Counting;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            TickOutcome::PhaseElapsed(self.finish_phase(now))
        } else {
            TickOutcome::Counting
        }
    }

    /// Same completion-and-flip as natural expiry, from any remaining time.
    /// A skipped focus phase still counts its partial elapsed time.
    pub fn skip(&mut self, now: DateTime<Utc>) -> Option<CompletedFocus> {
        self.finish_phase(now)
    }

    /// Terminal teardown. Emits the in-flight focus phase (if any) and
    /// resets to the idle default, keeping the configured durations.
    pub fn close(&mut self, now: DateTime<Utc>) -> Option<CompletedFocus> {
        let completed = self.take_completed_focus(now);
        let (focus_secs, break_secs) = (self.focus_secs, self.break_secs);
        *self = Self::new(focus_secs, break_secs);
        completed
    }

    /// Flip the phase, resetting the countdown for the new phase. A focus
    /// phase entered while running starts its session clock immediately so
    /// the auto-continued cycle is recordable.
    fn finish_phase(&mut self, now: DateTime<Utc>) -> Option<CompletedFocus> {
        let completed = self.take_completed_focus(now);

        self.phase = match self.phase {
            TimerPhase::Focus => TimerPhase::Break,
            TimerPhase::Break => TimerPhase::Focus,
        };
        self.remaining_secs = self.phase_total_secs();

        if self.phase == TimerPhase::Focus && self.status == TimerStatus::Running {
            self.started_at = Some(now);
        }

        completed
    }

    /// A session is only ever emitted for a focus phase with a recorded
    /// start time, and the start time is cleared in the same step so the
    /// phase can never be logged twice.
    fn take_completed_focus(&mut self, now: DateTime<Utc>) -> Option<CompletedFocus> {
        if self.phase != TimerPhase::Focus {
            return None;
        }
        let started_at = self.started_at.take()?;
        Some(CompletedFocus {
            topic_id: self.topic_id.clone().unwrap_or_default(),
            started_at,
            ended_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn state() -> TimerState {
        TimerState::new(1500, 300)
    }

    fn t0() -> DateTime<Utc> {
        "2026-03-01T09:00:00Z".parse().unwrap()
    }

    #[test]
    fn starts_idle_in_focus_with_full_countdown() {
        let s = state();
        assert_eq!(s.status, TimerStatus::Idle);
        assert_eq!(s.phase, TimerPhase::Focus);
        assert_eq!(s.remaining_secs, 1500);
        assert!(s.started_at.is_none());
    }

    #[test]
    fn start_from_idle_records_started_at() {
        let mut s = state();
        assert!(s.start(Some("algorithms".into()), t0()));
        assert_eq!(s.status, TimerStatus::Running);
        assert_eq!(s.started_at, Some(t0()));
        assert_eq!(s.topic_id.as_deref(), Some("algorithms"));
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut s = state();
        s.start(None, t0());
        assert!(!s.start(None, t0()));
    }

    #[test]
    fn pause_and_resume_keep_started_at() {
        let mut s = state();
        s.start(Some("calculus".into()), t0());
        assert!(s.pause());
        assert_eq!(s.status, TimerStatus::Paused);
        assert!(s.start(None, t0() + Duration::seconds(60)));
        // Resuming does not restamp the session start.
        assert_eq!(s.started_at, Some(t0()));
    }

    #[test]
    fn pause_from_idle_is_rejected() {
        let mut s = state();
        assert!(!s.pause());
    }

    #[test]
    fn remaining_never_goes_negative_and_flips_exactly_at_zero() {
        let mut s = state();
        s.start(Some("algorithms".into()), t0());

        for i in 0..1499 {
            let outcome = s.tick(t0() + Duration::seconds(i + 1));
            assert_eq!(outcome, TickOutcome::Counting, "flipped early at tick {}", i + 1);
        }
        assert_eq!(s.remaining_secs, 1);

        let end = t0() + Duration::seconds(1500);
        let completed = match s.tick(end) {
            TickOutcome::PhaseElapsed(Some(completed)) => completed,
            other => panic!("expected focus completion, got {other:?}"),
        };
        assert_eq!(completed.topic_id, "algorithms");
        assert_eq!(completed.started_at, t0());
        assert_eq!(completed.ended_at, end);
        assert_eq!((completed.ended_at - completed.started_at).num_seconds(), 1500);

        // Auto-continue into the break.
        assert_eq!(s.phase, TimerPhase::Break);
        assert_eq!(s.status, TimerStatus::Running);
        assert_eq!(s.remaining_secs, 300);
    }

    #[test]
    fn tick_does_nothing_while_paused() {
        let mut s = state();
        s.start(None, t0());
        s.pause();
        assert_eq!(s.tick(t0()), TickOutcome::Counting);
        assert_eq!(s.remaining_secs, 1500);
    }

    #[test]
    fn skip_matches_natural_expiry() {
        let mut s = state();
        s.start(Some("algorithms".into()), t0());
        for i in 0..600 {
            s.tick(t0() + Duration::seconds(i + 1));
        }
        assert_eq!(s.remaining_secs, 900);

        let skipped_at = t0() + Duration::seconds(600);
        let completed = s.skip(skipped_at).expect("partial focus still counts");
        assert_eq!((completed.ended_at - completed.started_at).num_seconds(), 600);
        assert_eq!(s.phase, TimerPhase::Break);
        assert_eq!(s.remaining_secs, 300);
    }

    #[test]
    fn break_completion_never_emits_a_session() {
        let mut s = state();
        s.start(Some("algorithms".into()), t0());
        s.skip(t0() + Duration::seconds(10));
        assert_eq!(s.phase, TimerPhase::Break);

        let resumed = t0() + Duration::seconds(310);
        assert!(s.skip(resumed).is_none());
        // Back in focus, clock restamped for the new phase.
        assert_eq!(s.phase, TimerPhase::Focus);
        assert_eq!(s.started_at, Some(resumed));
        assert_eq!(s.remaining_secs, 1500);
    }

    #[test]
    fn close_during_focus_emits_once_and_resets() {
        let mut s = state();
        s.start(Some("algorithms".into()), t0());
        let completed = s.close(t0() + Duration::seconds(120));
        assert!(completed.is_some());
        assert_eq!(s.status, TimerStatus::Idle);
        assert_eq!(s.phase, TimerPhase::Focus);
        assert_eq!(s.remaining_secs, 1500);
        assert!(s.started_at.is_none());

        // A second close has nothing left to emit.
        assert!(s.close(t0() + Duration::seconds(121)).is_none());
    }

    #[test]
    fn close_during_break_emits_nothing() {
        let mut s = state();
        s.start(None, t0());
        s.skip(t0() + Duration::seconds(5));
        assert_eq!(s.phase, TimerPhase::Break);
        assert!(s.close(t0() + Duration::seconds(10)).is_none());
    }

    #[test]
    fn close_from_idle_emits_nothing() {
        let mut s = state();
        assert!(s.close(t0()).is_none());
    }
}
