//! Debounced auto-save timer

use std::time::{Duration, Instant};

/// Single-shot countdown restarted by every edit
///
/// The owner polls it from its event loop; nothing runs in the background.
#[derive(Debug, Clone)]
pub struct AutoSaveTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl AutoSaveTimer {
    /// `interval_ms == 0` disables auto-save
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            deadline: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.interval.is_zero()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Change the interval; a pending countdown is cancelled
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval = Duration::from_millis(interval_ms);
        self.deadline = None;
    }

    /// Record an edit: cancel any pending countdown and start a new one
    pub fn touch(&mut self, now: Instant) {
        if self.is_enabled() {
            self.deadline = Some(now + self.interval);
        }
    }

    /// Drop a pending countdown (e.g. after a manual save)
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns true exactly once when the countdown expires
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before expiry, if armed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_interval() {
        let start = Instant::now();
        let mut timer = AutoSaveTimer::new(2000);
        assert!(!timer.poll(start));

        timer.touch(start);
        assert!(!timer.poll(start + Duration::from_millis(1999)));
        assert!(timer.poll(start + Duration::from_millis(2000)));
        assert!(!timer.poll(start + Duration::from_millis(5000)));
    }

    #[test]
    fn test_edits_debounce() {
        let start = Instant::now();
        let mut timer = AutoSaveTimer::new(1000);
        timer.touch(start);
        timer.touch(start + Duration::from_millis(800));
        assert!(!timer.poll(start + Duration::from_millis(1500)));
        assert_eq!(
            timer.remaining(start + Duration::from_millis(1500)),
            Some(Duration::from_millis(300))
        );
        assert!(timer.poll(start + Duration::from_millis(1800)));
    }

    #[test]
    fn test_disabled_and_cancelled() {
        let start = Instant::now();
        let mut timer = AutoSaveTimer::new(0);
        timer.touch(start);
        assert!(!timer.is_armed());

        timer.set_interval(100);
        timer.touch(start);
        timer.cancel();
        assert!(!timer.poll(start + Duration::from_secs(1)));
    }
}
