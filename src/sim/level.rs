//! Level progression and difficulty curve

use serde::{Deserialize, Serialize};

use crate::config::LevelConfig;

/// Difficulty derived from cumulative resources.
///
/// Spawn intervals only shrink (down to their floors) and bug speed only
/// grows (up to its ceiling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLedger {
    pub current: u32,
    pub asteroid_interval: f64,
    pub bug_interval: f64,
    pub bug_speed: f32,
    /// Cumulative resources required for the next level
    pub next_level_at: u32,
}

impl LevelLedger {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            current: 1,
            asteroid_interval: config.initial_asteroid_interval_ms,
            bug_interval: config.initial_bug_interval_ms,
            bug_speed: config.initial_bug_speed,
            next_level_at: config.resources_per_level,
        }
    }

    /// Advance one level if `total_collected` reached the threshold.
    /// Returns the new level, or `None` when nothing changed.
    pub fn check_level_up(&mut self, total_collected: u32, config: &LevelConfig) -> Option<u32> {
        if total_collected < self.next_level_at {
            return None;
        }
        self.current += 1;
        self.asteroid_interval = (self.asteroid_interval * config.asteroid_interval_decay)
            .max(config.min_asteroid_interval_ms)
            .min(self.asteroid_interval);
        self.bug_interval = (self.bug_interval * config.bug_interval_decay)
            .max(config.min_bug_interval_ms)
            .min(self.bug_interval);
        self.bug_speed = (self.bug_speed * config.bug_speed_growth)
            .min(config.max_bug_speed)
            .max(self.bug_speed);
        self.next_level_at = self.next_level_at.saturating_add(config.resources_per_level);
        log::debug!(
            "Level {} (asteroids every {:.0}ms, bugs every {:.0}ms, bug speed {:.2})",
            self.current,
            self.asteroid_interval,
            self.bug_interval,
            self.bug_speed
        );
        Some(self.current)
    }

    /// Replay level-ups until `level` is reached (restoring a saved session)
    pub fn restore(&mut self, level: u32, config: &LevelConfig) {
        *self = Self::new(config);
        let target = level.max(1);
        while self.current < target {
            if self.at_limits(config) {
                // Curve is flat from here on, only the thresholds move
                let remaining = target - self.current;
                self.current = target;
                self.next_level_at = self
                    .next_level_at
                    .saturating_add(remaining.saturating_mul(config.resources_per_level));
                break;
            }
            let threshold = self.next_level_at;
            if self.check_level_up(threshold, config).is_none() {
                break;
            }
        }
    }

    fn at_limits(&self, config: &LevelConfig) -> bool {
        self.asteroid_interval <= config.min_asteroid_interval_ms
            && self.bug_interval <= config.min_bug_interval_ms
            && self.bug_speed >= config.max_bug_speed
    }

    pub fn reset(&mut self, config: &LevelConfig) {
        *self = Self::new(config);
    }
}
