//! In-progress session snapshot

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::sim::{GameState, StructureKind};

/// Structure position and type. Ids, quotes and weapon stats are
/// regenerated on restore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedStructure {
    #[serde(rename = "type")]
    pub kind: StructureKind,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResources {
    pub collected: u32,
    pub total_collected: u32,
    pub next_deploy_at: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSave {
    /// Wall-clock time of the save (ms)
    pub timestamp: f64,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub resources: SavedResources,
    pub structures: Vec<SavedStructure>,
}

impl SessionSave {
    pub fn capture(state: &GameState, now: f64) -> Self {
        Self {
            timestamp: now,
            score: state.score,
            lives: state.rocket.lives,
            level: state.level.current,
            resources: SavedResources {
                collected: state.resources.collected,
                total_collected: state.resources.total_collected,
                next_deploy_at: state.resources.next_deploy_at,
            },
            structures: state
                .resources
                .structures
                .iter()
                .map(|s| SavedStructure {
                    kind: s.kind,
                    x: s.pos.x,
                    y: s.pos.y,
                })
                .collect(),
        }
    }

    /// Rejects snapshots no real session could have produced: the level
    /// must be reachable with the resources collected so far.
    pub fn is_valid(&self, config: &GameConfig) -> bool {
        let per_level = config.level.resources_per_level.max(1);
        let reachable = self.resources.total_collected / per_level + 1;
        self.level >= 1
            && self.level <= reachable
            && self.resources.collected <= self.resources.total_collected
            && self.timestamp.is_finite()
            && self.timestamp > 0.0
    }

    pub fn is_stale(&self, now: f64, retention_ms: f64) -> bool {
        now - self.timestamp > retention_ms
    }

    /// Start a fresh session at `now` and load this snapshot into it.
    /// Difficulty is recomputed by replaying level-ups.
    pub fn restore_into(&self, state: &mut GameState, now: f64) {
        state.reset(now);
        state.score = self.score;
        state.rocket.lives = self.lives.max(1);
        state.level.restore(self.level, &state.config.level);

        let resources = &mut state.resources;
        resources.collected = self.resources.collected;
        resources.total_collected = self.resources.total_collected;
        // The stored threshold is informational, deployment always uses config
        resources.next_deploy_at = state.config.resource.deploy_threshold;
        for saved in &self.structures {
            let id = state.ids.next();
            resources.restore_structure(id, saved.kind, Vec2::new(saved.x, saved.y), &state.config);
        }
        log::info!(
            "Restored session: score {}, level {}, {} structures",
            self.score,
            self.level,
            self.structures.len()
        );
    }
}
