//! Game tuning tables
//!
//! Every balance constant lives here so a host page can overlay a partial
//! JSON document without recompiling. Timestamps and durations are in
//! milliseconds, distances in logical pixels, speeds in pixels per frame.

use serde::{Deserialize, Serialize};

/// Player rocket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocketConfig {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub initial_lives: u32,
    /// Distance between the rocket's bottom edge and the viewport bottom
    pub bottom_offset: f32,
    pub bottom_offset_mobile: f32,
}

impl Default for RocketConfig {
    fn default() -> Self {
        Self {
            width: 60.0,
            height: 80.0,
            speed: 8.0,
            initial_lives: 3,
            bottom_offset: 80.0,
            bottom_offset_mobile: 160.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub speed: f32,
    pub radius: f32,
    /// Minimum time between player shots
    pub fire_cooldown_ms: f64,
    /// Projectiles further than this outside the viewport are dropped
    pub offscreen_margin: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            radius: 4.0,
            fire_cooldown_ms: 200.0,
            offscreen_margin: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidConfig {
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for AsteroidConfig {
    fn default() -> Self {
        Self {
            min_radius: 20.0,
            max_radius: 40.0,
            min_speed: 1.0,
            max_speed: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BugConfig {
    pub min_radius: f32,
    pub max_radius: f32,
    /// Every Nth spawned bug is elite
    pub elite_every: u32,
    pub dust_emission_interval_ms: f64,
    pub max_dust_per_bug: u32,
    /// Fraction of the bug radius used to scatter emitted dust
    pub dust_spread: f32,
}

impl Default for BugConfig {
    fn default() -> Self {
        Self {
            min_radius: 15.0,
            max_radius: 25.0,
            elite_every: 3,
            dust_emission_interval_ms: 800.0,
            max_dust_per_bug: 6,
            dust_spread: 0.5,
        }
    }
}

/// Dust-cluster nests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestConfig {
    pub enabled: bool,
    pub health: i32,
    pub damage_per_hit: i32,
    pub spawn_interval_ms: f64,
    pub max_duration_ms: f64,
    pub radius: f32,
    pub min_offspring: u32,
    pub max_offspring: u32,
    /// Minimum number of mature dust particles in one cluster
    pub min_cluster_size: usize,
    pub cluster_radius: f32,
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            health: 50,
            damage_per_hit: 10,
            spawn_interval_ms: 5000.0,
            max_duration_ms: 30000.0,
            radius: 30.0,
            min_offspring: 2,
            max_offspring: 3,
            min_cluster_size: 6,
            cluster_radius: 100.0,
        }
    }
}

/// Nebulae seeded directly by elite bug deaths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NebulaConfig {
    pub enabled: bool,
    pub activation_delay_ms: f64,
    pub offspring: u32,
    pub radius: f32,
    pub offspring_distance: f32,
}

impl Default for NebulaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            activation_delay_ms: 5000.0,
            offspring: 2,
            radius: 30.0,
            offspring_distance: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DustConfig {
    /// Age at which a particle may join a cluster
    pub maturation_ms: f64,
    /// Age at which an unclustered particle is discarded
    pub expiry_ms: f64,
    pub min_size: f32,
    pub max_size: f32,
    pub min_opacity: f32,
    pub max_opacity: f32,
}

impl Default for DustConfig {
    fn default() -> Self {
        Self {
            maturation_ms: 20000.0,
            expiry_ms: 21000.0,
            min_size: 4.0,
            max_size: 6.0,
            min_opacity: 0.7,
            max_opacity: 0.9,
        }
    }
}

/// Per-kind structure weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub range: f32,
    pub fire_cooldown_ms: f64,
    pub bullet_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    pub satellite: WeaponConfig,
    pub station: WeaponConfig,
    /// Horizontal keep-out on both sides of the viewport
    pub margin_x: f32,
    pub top_offset: f32,
    /// Fraction of the viewport height available below `top_offset`
    pub vertical_band: f32,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            satellite: WeaponConfig {
                range: 200.0,
                fire_cooldown_ms: 1000.0,
                bullet_speed: 8.0,
            },
            station: WeaponConfig {
                range: 300.0,
                fire_cooldown_ms: 500.0,
                bullet_speed: 10.0,
            },
            margin_x: 100.0,
            top_offset: 100.0,
            vertical_band: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub deploy_threshold: u32,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            deploy_threshold: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub initial_asteroid_interval_ms: f64,
    pub initial_bug_interval_ms: f64,
    pub initial_bug_speed: f32,
    pub min_asteroid_interval_ms: f64,
    pub min_bug_interval_ms: f64,
    pub max_bug_speed: f32,
    pub asteroid_interval_decay: f64,
    pub bug_interval_decay: f64,
    pub bug_speed_growth: f32,
    /// Extra cumulative resources required per level
    pub resources_per_level: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            initial_asteroid_interval_ms: 2000.0,
            initial_bug_interval_ms: 5000.0,
            initial_bug_speed: 2.0,
            min_asteroid_interval_ms: 800.0,
            min_bug_interval_ms: 2000.0,
            max_bug_speed: 5.0,
            asteroid_interval_decay: 0.9,
            bug_interval_decay: 0.85,
            bug_speed_growth: 1.1,
            resources_per_level: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobileConfig {
    pub breakpoint: f32,
    pub spawn_multiplier: f64,
    pub speed_multiplier: f32,
}

impl Default for MobileConfig {
    fn default() -> Self {
        Self {
            breakpoint: 768.0,
            spawn_multiplier: 1.5,
            speed_multiplier: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub asteroid: u64,
    pub bug: u64,
    pub elite_bug: u64,
    pub nest_destroyed: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            asteroid: 10,
            bug: 25,
            elite_bug: 35,
            nest_destroyed: 100,
        }
    }
}

/// Horizontal laser sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserConfig {
    pub cooldown_ms: f64,
    pub duration_ms: f64,
}

impl Default for LaserConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 10000.0,
            duration_ms: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Saved sessions older than this are discarded on load
    pub retention_ms: f64,
    pub auto_save_interval_ms: f64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            retention_ms: 7.0 * 24.0 * 60.0 * 60.0 * 1000.0,
            auto_save_interval_ms: 30000.0,
        }
    }
}

/// Cosmetic timings. None of these affect gameplay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub max_particles: usize,
    pub shake_intensity: f32,
    pub damage_flash_ms: f64,
    pub deploy_animation_ms: f64,
    pub level_up_animation_ms: f64,
    pub max_visible_notifications: usize,
    pub deploy_notification_ms: f64,
    pub level_up_notification_ms: f64,
    pub damage_notification_ms: f64,
    pub info_notification_ms: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            max_particles: 400,
            shake_intensity: 10.0,
            damage_flash_ms: 200.0,
            deploy_animation_ms: 1000.0,
            level_up_animation_ms: 2000.0,
            max_visible_notifications: 3,
            deploy_notification_ms: 7000.0,
            level_up_notification_ms: 3000.0,
            damage_notification_ms: 2000.0,
            info_notification_ms: 3000.0,
        }
    }
}

/// Complete tuning table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rocket: RocketConfig,
    pub bullet: BulletConfig,
    pub asteroid: AsteroidConfig,
    pub bug: BugConfig,
    pub nest: NestConfig,
    pub nebula: NebulaConfig,
    pub dust: DustConfig,
    pub structure: StructureConfig,
    pub resource: ResourceConfig,
    pub level: LevelConfig,
    pub mobile: MobileConfig,
    pub scoring: ScoringConfig,
    pub laser: LaserConfig,
    pub persistence: PersistenceConfig,
    pub effects: EffectsConfig,
}

impl GameConfig {
    /// Overlay a (possibly partial) JSON document on the defaults.
    ///
    /// Malformed input is logged and ignored.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid game config, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Weapon table for a structure kind
    pub fn weapon(&self, kind: crate::sim::StructureKind) -> &WeaponConfig {
        match kind {
            crate::sim::StructureKind::Satellite => &self.structure.satellite,
            crate::sim::StructureKind::Station => &self.structure.station,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_overlays_defaults() {
        let config = GameConfig::from_json(r#"{"bug": {"elite_every": 5}, "resource": {}}"#);
        assert_eq!(config.bug.elite_every, 5);
        assert_eq!(config.bug.max_dust_per_bug, 6);
        assert_eq!(config.resource.deploy_threshold, 20);
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let config = GameConfig::from_json("{not json");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_difficulty_defaults_are_ordered() {
        let level = LevelConfig::default();
        assert!(level.min_asteroid_interval_ms <= level.initial_asteroid_interval_ms);
        assert!(level.min_bug_interval_ms <= level.initial_bug_interval_ms);
        assert!(level.max_bug_speed >= level.initial_bug_speed);
    }
}
