//! Hostile spawning on level-driven timers

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cooldown::Cooldown;
use super::entities::{DustEmitter, Hostile, HostileKind};
use super::level::LevelLedger;
use super::state::EntityIds;
use crate::config::GameConfig;
use crate::platform::Viewport;

/// Asteroid and bug timers plus the elite cadence counter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    asteroid: Cooldown,
    bug: Cooldown,
    /// Bugs spawned this session (drives the elite cadence)
    pub bugs_spawned: u32,
}

impl Spawner {
    /// Both timers start counting at `now`, so the first wave arrives one
    /// interval after the session starts
    pub fn new(now: f64) -> Self {
        Self {
            asteroid: Cooldown::started_at(0.0, now),
            bug: Cooldown::started_at(0.0, now),
            bugs_spawned: 0,
        }
    }

    pub fn reset(&mut self, now: f64) {
        *self = Self::new(now);
    }

    /// Spawn whatever is due this frame. At most one asteroid and one bug.
    pub fn update<R: Rng>(
        &mut self,
        now: f64,
        level: &LevelLedger,
        viewport: Viewport,
        config: &GameConfig,
        rng: &mut R,
        ids: &mut EntityIds,
    ) -> Vec<Hostile> {
        let mut spawned = Vec::new();
        let mobile = viewport.is_mobile(config.mobile.breakpoint);
        let (interval_scale, speed_scale) = if mobile {
            (config.mobile.spawn_multiplier, config.mobile.speed_multiplier)
        } else {
            (1.0, 1.0)
        };

        if self.asteroid.ready_with(now, level.asteroid_interval * interval_scale) {
            self.asteroid.fire(now);
            spawned.push(spawn_asteroid(ids.next(), viewport, config, speed_scale, rng));
        }

        if self.bug.ready_with(now, level.bug_interval * interval_scale) {
            self.bug.fire(now);
            self.bugs_spawned += 1;
            let elite = config.bug.elite_every > 0 && self.bugs_spawned % config.bug.elite_every == 0;
            let mut bug = spawn_bug(ids.next(), viewport, config, level.bug_speed, speed_scale, rng);
            if elite {
                bug.elite = true;
                if config.nest.enabled {
                    bug.emitter = Some(DustEmitter {
                        cooldown: Cooldown::started_at(config.bug.dust_emission_interval_ms, now),
                        emitted: 0,
                    });
                }
                log::debug!("Elite bug {} spawned", bug.id);
            }
            spawned.push(bug);
        }

        spawned
    }
}

fn spawn_asteroid<R: Rng>(
    id: u32,
    viewport: Viewport,
    config: &GameConfig,
    speed_scale: f32,
    rng: &mut R,
) -> Hostile {
    let cfg = &config.asteroid;
    let radius = cfg.min_radius + rng.random::<f32>() * (cfg.max_radius - cfg.min_radius);
    let speed = (cfg.min_speed + rng.random::<f32>() * (cfg.max_speed - cfg.min_speed)) * speed_scale;
    Hostile {
        id,
        kind: HostileKind::Asteroid,
        pos: Vec2::new(rng.random::<f32>() * viewport.width, -radius),
        radius,
        speed,
        rotation: rng.random::<f32>() * std::f32::consts::TAU,
        rotation_speed: (rng.random::<f32>() - 0.5) * 0.05,
        elite: false,
        emitter: None,
    }
}

fn spawn_bug<R: Rng>(
    id: u32,
    viewport: Viewport,
    config: &GameConfig,
    base_speed: f32,
    speed_scale: f32,
    rng: &mut R,
) -> Hostile {
    let cfg = &config.bug;
    let radius = cfg.min_radius + rng.random::<f32>() * (cfg.max_radius - cfg.min_radius);
    Hostile {
        id,
        kind: HostileKind::Bug,
        pos: Vec2::new(rng.random::<f32>() * viewport.width, -radius),
        radius,
        speed: (base_speed + rng.random::<f32>()) * speed_scale,
        rotation: 0.0,
        rotation_speed: 0.0,
        elite: false,
        emitter: None,
    }
}

/// An ordinary bug placed on a ring around `center` (nest offspring)
pub fn spawn_offspring(
    id: u32,
    center: Vec2,
    distance: f32,
    angle: f32,
    speed: f32,
    radius: f32,
) -> Hostile {
    Hostile {
        id,
        kind: HostileKind::Bug,
        pos: center + Vec2::from_angle(angle) * distance,
        radius,
        speed,
        rotation: 0.0,
        rotation_speed: 0.0,
        elite: false,
        emitter: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelConfig;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Fixture {
        spawner: Spawner,
        level: LevelLedger,
        config: GameConfig,
        rng: Pcg32,
        ids: EntityIds,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                spawner: Spawner::new(0.0),
                level: LevelLedger::new(&LevelConfig::default()),
                config: GameConfig::default(),
                rng: Pcg32::seed_from_u64(5),
                ids: EntityIds::default(),
            }
        }

        fn update(&mut self, now: f64, viewport: Viewport) -> Vec<Hostile> {
            self.spawner.update(
                now,
                &self.level,
                viewport,
                &self.config,
                &mut self.rng,
                &mut self.ids,
            )
        }
    }

    const DESKTOP: Viewport = Viewport {
        width: 1200.0,
        height: 800.0,
    };

    #[test]
    fn test_asteroid_timer() {
        let mut f = Fixture::new();
        assert!(f.update(1999.0, DESKTOP).is_empty());
        let spawned = f.update(2000.0, DESKTOP);
        assert_eq!(spawned.len(), 1);
        let rock = &spawned[0];
        assert_eq!(rock.kind, HostileKind::Asteroid);
        assert_eq!(rock.pos.y, -rock.radius);
        assert!(rock.radius >= 20.0 && rock.radius <= 40.0);
        assert!(rock.speed >= 1.0 && rock.speed <= 3.0);
        assert!(f.update(2001.0, DESKTOP).is_empty());
    }

    #[test]
    fn test_mobile_stretches_intervals() {
        let mut f = Fixture::new();
        let mobile = Viewport::new(400.0, 800.0);
        assert!(f.update(2999.0, mobile).is_empty());
        let spawned = f.update(3000.0, mobile);
        assert_eq!(spawned.len(), 1);
        assert!(spawned[0].speed <= 3.0 * 0.6 + 1e-5);
    }

    #[test]
    fn test_every_third_bug_is_elite() {
        let mut f = Fixture::new();
        let mut bugs = Vec::new();
        let mut now = 0.0;
        while bugs.len() < 6 {
            now += 5000.0;
            bugs.extend(f.update(now, DESKTOP).into_iter().filter(|h| h.is_bug()));
        }
        let elites: Vec<bool> = bugs.iter().map(|b| b.elite).collect();
        assert_eq!(elites, vec![false, false, true, false, false, true]);
        let emitter = bugs[2].emitter.expect("elite carries an emitter");
        assert_eq!(emitter.emitted, 0);
        assert!(!emitter.cooldown.ready(15_000.0 + 799.0));
        assert!(bugs[0].emitter.is_none());
    }

    #[test]
    fn test_bug_speed_follows_level() {
        let mut f = Fixture::new();
        f.level.bug_speed = 4.0;
        let bug = f
            .update(5000.0, DESKTOP)
            .into_iter()
            .find(|h| h.is_bug())
            .expect("bug due at 5s");
        assert!(bug.speed >= 4.0 && bug.speed <= 5.0);
    }

    #[test]
    fn test_offspring_on_ring() {
        let bug = spawn_offspring(9, Vec2::new(100.0, 100.0), 50.0, 0.0, 2.0, 15.0);
        assert!((bug.pos - Vec2::new(150.0, 100.0)).length() < 1e-4);
        assert!(!bug.elite);
    }
}
