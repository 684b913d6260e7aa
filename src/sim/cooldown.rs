//! Polling timers
//!
//! A cooldown stores the timestamp of its last firing and is compared
//! against the current time every frame. Nothing is scheduled, so dropping
//! a cooldown cancels it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    /// Minimum time between firings (ms)
    pub interval: f64,
    /// Last firing, `None` until the first one (ready immediately)
    pub last: Option<f64>,
}

impl Cooldown {
    /// A cooldown that is ready right away
    pub fn ready_now(interval: f64) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// A cooldown that starts counting at `now`
    pub fn started_at(interval: f64, now: f64) -> Self {
        Self {
            interval,
            last: Some(now),
        }
    }

    pub fn ready(&self, now: f64) -> bool {
        self.ready_with(now, self.interval)
    }

    /// Readiness against an interval that varies per frame (difficulty,
    /// mobile multiplier)
    pub fn ready_with(&self, now: f64, interval: f64) -> bool {
        match self.last {
            None => true,
            Some(last) => now - last >= interval,
        }
    }

    pub fn fire(&mut self, now: f64) {
        self.last = Some(now);
    }

    /// Fire if ready; returns whether it fired
    pub fn try_fire(&mut self, now: f64) -> bool {
        if self.ready(now) {
            self.fire(now);
            true
        } else {
            false
        }
    }

    /// Fraction of the interval elapsed, clamped to 1.0 (for HUD bars)
    pub fn progress(&self, now: f64) -> f64 {
        match self.last {
            None => 1.0,
            Some(_) if self.interval <= 0.0 => 1.0,
            Some(last) => ((now - last) / self.interval).clamp(0.0, 1.0),
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_now_then_waits() {
        let mut cd = Cooldown::ready_now(200.0);
        assert!(cd.try_fire(1000.0));
        assert!(!cd.ready(1199.0));
        assert!(cd.ready(1200.0));
    }

    #[test]
    fn test_started_at_waits_full_interval() {
        let cd = Cooldown::started_at(5000.0, 10_000.0);
        assert!(!cd.ready(14_999.0));
        assert!(cd.ready(15_000.0));
        assert_eq!(cd.progress(12_500.0), 0.5);
    }

    #[test]
    fn test_ready_with_override() {
        let cd = Cooldown::started_at(2000.0, 0.0);
        assert!(cd.ready(2000.0));
        assert!(!cd.ready_with(2000.0, 3000.0));
    }
}
