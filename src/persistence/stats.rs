//! Lifetime statistics and per-session counters

use serde::{Deserialize, Serialize};

use super::GameStorage;
use crate::highscores::LeaderboardEntry;

/// Counters that only ever grow, plus the highest level reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LifetimeStats {
    pub games_played: u32,
    pub total_bugs_killed: u32,
    pub total_asteroids_destroyed: u32,
    pub total_resources_collected: u32,
    pub total_structures_deployed: u32,
    /// Accumulated play time (ms)
    pub total_play_time: f64,
    pub highest_level: u32,
    pub last_played: f64,
}

impl Default for LifetimeStats {
    fn default() -> Self {
        Self {
            games_played: 0,
            total_bugs_killed: 0,
            total_asteroids_destroyed: 0,
            total_resources_collected: 0,
            total_structures_deployed: 0,
            total_play_time: 0.0,
            highest_level: 1,
            last_played: 0.0,
        }
    }
}

/// Incrementable counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatName {
    GamesPlayed,
    BugsKilled,
    AsteroidsDestroyed,
    ResourcesCollected,
    StructuresDeployed,
}

impl LifetimeStats {
    fn counter(&mut self, name: StatName) -> &mut u32 {
        match name {
            StatName::GamesPlayed => &mut self.games_played,
            StatName::BugsKilled => &mut self.total_bugs_killed,
            StatName::AsteroidsDestroyed => &mut self.total_asteroids_destroyed,
            StatName::ResourcesCollected => &mut self.total_resources_collected,
            StatName::StructuresDeployed => &mut self.total_structures_deployed,
        }
    }

    pub fn increment(&mut self, name: StatName, amount: u32) {
        let counter = self.counter(name);
        *counter = counter.saturating_add(amount);
    }
}

/// Bookkeeping for the session in progress. Every update is written
/// through to storage immediately.
#[derive(Debug, Clone, Default)]
pub struct StatsTracker {
    started_at: Option<f64>,
    pub session_bugs_killed: u32,
    pub session_asteroids_destroyed: u32,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Reset the session counters and count one more game played
    pub fn start_session(&mut self, storage: &mut GameStorage, now: f64) {
        self.started_at = Some(now);
        self.session_bugs_killed = 0;
        self.session_asteroids_destroyed = 0;

        let mut stats = storage.load_stats();
        stats.increment(StatName::GamesPlayed, 1);
        stats.last_played = now;
        storage.save_stats(&stats);
    }

    pub fn increment(&mut self, storage: &mut GameStorage, name: StatName, amount: u32) {
        match name {
            StatName::BugsKilled => self.session_bugs_killed += amount,
            StatName::AsteroidsDestroyed => self.session_asteroids_destroyed += amount,
            _ => {}
        }
        let mut stats = storage.load_stats();
        stats.increment(name, amount);
        storage.save_stats(&stats);
    }

    /// High-water mark; lower levels leave the record alone
    pub fn record_level_reached(&self, storage: &mut GameStorage, level: u32) {
        let mut stats = storage.load_stats();
        if level > stats.highest_level {
            stats.highest_level = level;
            storage.save_stats(&stats);
        }
    }

    /// Close the session: add play time, offer the score to the leaderboard
    /// and drop the in-progress save. Returns the leaderboard rank, if any.
    pub fn end_session(
        &mut self,
        storage: &mut GameStorage,
        score: u64,
        level: u32,
        now: f64,
    ) -> Option<usize> {
        let started_at = self.started_at.take()?;

        let mut stats = storage.load_stats();
        stats.total_play_time += (now - started_at).max(0.0);
        stats.last_played = now;
        storage.save_stats(&stats);

        let mut board = storage.load_leaderboard();
        let rank = board.add(LeaderboardEntry {
            score,
            level,
            timestamp: now,
            bugs_killed: self.session_bugs_killed,
            asteroids_destroyed: self.session_asteroids_destroyed,
        });
        if rank.is_some() {
            storage.save_leaderboard(&board);
        }

        storage.clear_session();
        log::info!(
            "Session ended after {:.0}s: score {score}, level {level}, rank {rank:?}",
            (now - started_at) / 1000.0
        );
        rank
    }
}
