use chrono::{DateTime, Duration, Utc};

/// Tracks time spent away from the page during active focus time.
///
/// One piece of mutable state (`hidden_at`) and one derived counter. The
/// caller decides whether the monitor is armed (focus phase, timer
/// running) at the moment each visibility transition arrives.
#[derive(Debug)]
pub struct DistractionMonitor {
    threshold: Duration,
    hidden_at: Option<DateTime<Utc>>,
    distraction_count: u32,
}

impl DistractionMonitor {
    pub fn new(threshold_secs: u32) -> Self {
        Self {
            threshold: Duration::seconds(i64::from(threshold_secs)),
            hidden_at: None,
            distraction_count: 0,
        }
    }

    pub fn distraction_count(&self) -> u32 {
        self.distraction_count
    }

    /// Page went to the background. Only an armed monitor starts the away
    /// clock; breaks and paused timers are not watched.
    pub fn page_hidden(&mut self, now: DateTime<Utc>, armed: bool) {
        if armed {
            self.hidden_at = Some(now);
        }
    }

    /// Page came back to the foreground. Clears `hidden_at` regardless of
    /// outcome; counts a distraction only when the monitor is still armed
    /// and the absence exceeded the threshold. Returns the away duration
    /// when a distraction was counted, so the host can alert the user.
    pub fn page_visible(&mut self, now: DateTime<Utc>, armed: bool) -> Option<Duration> {
        let hidden_at = self.hidden_at.take()?;
        if !armed {
            return None;
        }

        let away = now - hidden_at;
        if away > self.threshold {
            self.distraction_count += 1;
            Some(away)
        } else {
            None
        }
    }

    /// Hand the counter to the session recorder and reset it, so the next
    /// focus phase starts clean.
    pub fn take_count(&mut self) -> u32 {
        self.hidden_at = None;
        std::mem::take(&mut self.distraction_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        "2026-03-01T10:00:00Z".parse().unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(secs)
    }

    #[test]
    fn long_absence_counts_short_absence_does_not() {
        let mut m = DistractionMonitor::new(30);

        m.page_hidden(at(0), true);
        let away = m.page_visible(at(45), true).expect("45s away should count");
        assert_eq!(away.num_seconds(), 45);
        assert_eq!(m.distraction_count(), 1);

        m.page_hidden(at(60), true);
        assert!(m.page_visible(at(70), true).is_none());
        assert_eq!(m.distraction_count(), 1);
    }

    #[test]
    fn exactly_threshold_does_not_count() {
        let mut m = DistractionMonitor::new(30);
        m.page_hidden(at(0), true);
        assert!(m.page_visible(at(30), true).is_none());
        assert_eq!(m.distraction_count(), 0);
    }

    #[test]
    fn disarmed_hide_never_arms_the_away_clock() {
        let mut m = DistractionMonitor::new(30);
        m.page_hidden(at(0), false);
        assert!(m.page_visible(at(120), true).is_none());
        assert_eq!(m.distraction_count(), 0);
    }

    #[test]
    fn disarm_before_return_clears_without_counting() {
        // Hidden during focus, but the phase flipped (or the user paused)
        // before the page came back.
        let mut m = DistractionMonitor::new(30);
        m.page_hidden(at(0), true);
        assert!(m.page_visible(at(120), false).is_none());
        assert_eq!(m.distraction_count(), 0);
        // hidden_at was cleared either way.
        assert!(m.page_visible(at(240), true).is_none());
    }

    #[test]
    fn take_count_resets() {
        let mut m = DistractionMonitor::new(30);
        m.page_hidden(at(0), true);
        m.page_visible(at(60), true);
        m.page_hidden(at(100), true);
        m.page_visible(at(200), true);
        assert_eq!(m.take_count(), 2);
        assert_eq!(m.distraction_count(), 0);
    }
}
