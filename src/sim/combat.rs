//! Collision and combat resolution
//!
//! Projectile hits are resolved in two passes: `find_impacts` only reads the
//! containers and records which projectile struck what, then
//! `apply_impacts` removes entities and reports the kills. Scoring and
//! resource collection happen in the caller from the returned `Kill`s.

use glam::Vec2;
use rand::Rng;

use super::cooldown::Cooldown;
use super::entities::{
    DustParticle, Hostile, HostileKind, HorizontalLaser, Nest, NestOrigin, Particle, ParticleColor,
    Projectile, Rocket,
};
use super::geometry::{circles_overlap, distance};
use super::spawner::spawn_offspring;
use super::state::EntityIds;
use crate::config::{GameConfig, ScoringConfig};
use crate::platform::Viewport;

/// Something destroyed by the player or a structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kill {
    Asteroid { pos: Vec2 },
    Bug { pos: Vec2, elite: bool },
    Nest { pos: Vec2, origin: NestOrigin },
}

impl Kill {
    pub fn pos(&self) -> Vec2 {
        match self {
            Kill::Asteroid { pos } | Kill::Bug { pos, .. } | Kill::Nest { pos, .. } => *pos,
        }
    }

    pub fn score(&self, scoring: &ScoringConfig) -> u64 {
        match self {
            Kill::Asteroid { .. } => scoring.asteroid,
            Kill::Bug { elite: false, .. } => scoring.bug,
            Kill::Bug { elite: true, .. } => scoring.elite_bug,
            Kill::Nest { .. } => scoring.nest_destroyed,
        }
    }

    pub fn color(&self) -> ParticleColor {
        match self {
            Kill::Asteroid { .. } => ParticleColor::Rock,
            Kill::Bug { .. } => ParticleColor::Bug,
            Kill::Nest {
                origin: NestOrigin::Dust,
                ..
            } => ParticleColor::Nest,
            Kill::Nest {
                origin: NestOrigin::Nebula,
                ..
            } => ParticleColor::Nebula,
        }
    }

    fn of_hostile(hostile: &Hostile) -> Self {
        match hostile.kind {
            HostileKind::Asteroid => Kill::Asteroid { pos: hostile.pos },
            HostileKind::Bug => Kill::Bug {
                pos: hostile.pos,
                elite: hostile.elite,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Hostile(usize),
    Nest(usize),
}

/// One projectile striking one target (indices into the containers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Impact {
    pub projectile: usize,
    pub target: HitTarget,
}

/// Result of applying a batch of impacts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatOutcome {
    pub kills: Vec<Kill>,
    /// Positions of nests that were damaged but survived
    pub nest_hits: Vec<Vec2>,
}

/// Move every projectile one frame and drop the ones that left the screen
pub fn advance_projectiles(projectiles: &mut Vec<Projectile>, viewport: Viewport, margin: f32) {
    for projectile in projectiles.iter_mut() {
        projectile.advance();
    }
    projectiles.retain(|p| !p.is_offscreen(viewport, margin));
}

/// First pass: each projectile hits at most one target and each hostile is
/// claimed at most once. Hostiles are tested before nests.
pub fn find_impacts(
    projectiles: &[Projectile],
    hostiles: &[Hostile],
    nests: &[Nest],
    bullet_radius: f32,
) -> Vec<Impact> {
    let mut claimed = vec![false; hostiles.len()];
    let mut impacts = Vec::new();

    for (pi, projectile) in projectiles.iter().enumerate() {
        let hostile_hit = hostiles.iter().enumerate().find(|(hi, h)| {
            !claimed[*hi] && circles_overlap(projectile.pos, bullet_radius, h.pos, h.radius)
        });
        if let Some((hi, _)) = hostile_hit {
            claimed[hi] = true;
            impacts.push(Impact {
                projectile: pi,
                target: HitTarget::Hostile(hi),
            });
            continue;
        }

        let nest_hit = nests
            .iter()
            .position(|n| circles_overlap(projectile.pos, bullet_radius, n.pos, n.radius));
        if let Some(ni) = nest_hit {
            impacts.push(Impact {
                projectile: pi,
                target: HitTarget::Nest(ni),
            });
        }
    }

    impacts
}

/// Second pass: remove spent projectiles and destroyed hostiles, damage
/// nests, and remove nests whose health dropped to zero
pub fn apply_impacts(
    impacts: &[Impact],
    projectiles: &mut Vec<Projectile>,
    hostiles: &mut Vec<Hostile>,
    nests: &mut Vec<Nest>,
    nest_damage: i32,
) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();
    let mut spent = vec![false; projectiles.len()];
    let mut destroyed = vec![false; hostiles.len()];
    let mut damaged = vec![false; nests.len()];

    for impact in impacts {
        spent[impact.projectile] = true;
        match impact.target {
            HitTarget::Hostile(hi) => {
                destroyed[hi] = true;
                outcome.kills.push(Kill::of_hostile(&hostiles[hi]));
            }
            HitTarget::Nest(ni) => {
                nests[ni].health -= nest_damage;
                damaged[ni] = true;
            }
        }
    }

    for (ni, nest) in nests.iter().enumerate() {
        if !damaged[ni] {
            continue;
        }
        if nest.health <= 0 {
            outcome.kills.push(Kill::Nest {
                pos: nest.pos,
                origin: nest.origin,
            });
        } else {
            outcome.nest_hits.push(nest.pos);
        }
    }

    retain_unmarked(projectiles, &spent);
    retain_unmarked(hostiles, &destroyed);
    nests.retain(|n| n.health > 0);
    outcome
}

fn retain_unmarked<T>(items: &mut Vec<T>, marked: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !marked[index];
        index += 1;
        keep
    });
}

/// Bugs touching the rocket cost one life each and are removed. Stops as
/// soon as the rocket is out of lives. Returns where each hit landed.
pub fn resolve_player_hits(rocket: &mut Rocket, hostiles: &mut Vec<Hostile>) -> Vec<Vec2> {
    let center = rocket.center();
    let radius = rocket.hit_radius();
    let mut hits = Vec::new();

    hostiles.retain(|h| {
        if rocket.lives == 0 || !h.is_bug() || !circles_overlap(center, radius, h.pos, h.radius) {
            return true;
        }
        rocket.lives -= 1;
        hits.push(h.pos);
        false
    });

    hits
}

/// Silently drop hostiles that drifted out of view. Returns how many.
pub fn remove_offscreen(hostiles: &mut Vec<Hostile>, viewport: Viewport) -> usize {
    let before = hostiles.len();
    hostiles.retain(|h| !h.is_offscreen(viewport));
    before - hostiles.len()
}

/// Destroy every hostile and nest the beam crosses
pub fn sweep_laser(
    laser: &HorizontalLaser,
    hostiles: &mut Vec<Hostile>,
    nests: &mut Vec<Nest>,
) -> Vec<Kill> {
    let mut kills = Vec::new();
    hostiles.retain(|h| {
        if laser.hits(h.pos, h.radius) {
            kills.push(Kill::of_hostile(h));
            false
        } else {
            true
        }
    });
    nests.retain(|n| {
        if laser.hits(n.pos, n.radius) {
            kills.push(Kill::Nest {
                pos: n.pos,
                origin: n.origin,
            });
            false
        } else {
            true
        }
    });
    kills
}

/// Elite bugs shed dust on their emission timer until they hit the cap
pub fn emit_dust<R: Rng>(
    hostiles: &mut [Hostile],
    dust: &mut Vec<DustParticle>,
    config: &GameConfig,
    now: f64,
    rng: &mut R,
) {
    for bug in hostiles.iter_mut() {
        let Some(emitter) = bug.emitter.as_mut() else {
            continue;
        };
        if emitter.emitted >= config.bug.max_dust_per_bug || !emitter.cooldown.try_fire(now) {
            continue;
        }
        emitter.emitted += 1;
        let spread = bug.radius * config.bug.dust_spread;
        let offset = Vec2::new(
            (rng.random::<f32>() - 0.5) * spread,
            (rng.random::<f32>() - 0.5) * spread,
        );
        let dc = &config.dust;
        dust.push(DustParticle {
            pos: bug.pos + offset,
            created_at: now,
            opacity: dc.min_opacity + rng.random::<f32>() * (dc.max_opacity - dc.min_opacity),
            size: dc.min_size + rng.random::<f32>() * (dc.max_size - dc.min_size),
        });
    }
}

/// Look for the largest cluster of mature dust. When it is big enough the
/// particles are consumed and the cluster centroid is returned. Otherwise
/// particles past their hard expiry are discarded.
pub fn cluster_dust(dust: &mut Vec<DustParticle>, config: &GameConfig, now: f64) -> Option<Vec2> {
    let mature: Vec<usize> = dust
        .iter()
        .enumerate()
        .filter(|(_, d)| d.age(now) >= config.dust.maturation_ms)
        .map(|(i, _)| i)
        .collect();

    let mut best: Vec<usize> = Vec::new();
    for &i in &mature {
        let cluster: Vec<usize> = mature
            .iter()
            .copied()
            .filter(|&j| distance(dust[i].pos, dust[j].pos) <= config.nest.cluster_radius)
            .collect();
        if cluster.len() > best.len() {
            best = cluster;
        }
    }

    if !best.is_empty() && best.len() >= config.nest.min_cluster_size {
        let centroid = best.iter().map(|&i| dust[i].pos).sum::<Vec2>() / best.len() as f32;
        let mut consumed = vec![false; dust.len()];
        for &i in &best {
            consumed[i] = true;
        }
        retain_unmarked(dust, &consumed);
        return Some(centroid);
    }

    dust.retain(|d| d.age(now) < config.dust.expiry_ms);
    None
}

/// A nest formed from dust. Its first brood is due immediately.
pub fn dust_nest(id: u32, pos: Vec2, now: f64, config: &GameConfig) -> Nest {
    let cfg = &config.nest;
    Nest {
        id,
        origin: NestOrigin::Dust,
        pos,
        radius: cfg.radius,
        health: cfg.health,
        max_health: cfg.health,
        created_at: now,
        production: Cooldown::ready_now(cfg.spawn_interval_ms),
        max_duration: cfg.max_duration_ms,
        min_offspring: cfg.min_offspring,
        max_offspring: cfg.max_offspring,
        offspring_distance: cfg.radius + 20.0,
    }
}

/// A nebula left by an elite bug. Produces once after the activation delay.
pub fn nebula(id: u32, pos: Vec2, now: f64, config: &GameConfig) -> Nest {
    let cfg = &config.nebula;
    Nest {
        id,
        origin: NestOrigin::Nebula,
        pos,
        radius: cfg.radius,
        health: config.nest.health,
        max_health: config.nest.health,
        created_at: now,
        production: Cooldown::started_at(cfg.activation_delay_ms, now),
        max_duration: config.nest.max_duration_ms.max(cfg.activation_delay_ms),
        min_offspring: cfg.offspring,
        max_offspring: cfg.offspring,
        offspring_distance: cfg.offspring_distance,
    }
}

/// What happened to the nests this frame
#[derive(Debug, Clone, Default)]
pub struct NestReport {
    pub offspring: Vec<Hostile>,
    /// Nests that produced a brood (id, origin)
    pub produced: Vec<(u32, NestOrigin)>,
    /// Nests removed by age or after their single brood
    pub removed: Vec<(u32, NestOrigin)>,
}

/// Expire old nests and let the rest produce offspring when due
pub fn update_nests<R: Rng>(
    nests: &mut Vec<Nest>,
    now: f64,
    bug_speed: f32,
    speed_scale: f32,
    config: &GameConfig,
    rng: &mut R,
    ids: &mut EntityIds,
) -> NestReport {
    let mut report = NestReport::default();

    nests.retain_mut(|nest| {
        if nest.is_expired(now) {
            report.removed.push((nest.id, nest.origin));
            return false;
        }
        if !nest.production.try_fire(now) {
            return true;
        }

        let count = if nest.max_offspring > nest.min_offspring {
            rng.random_range(nest.min_offspring..=nest.max_offspring)
        } else {
            nest.min_offspring
        };
        for i in 0..count {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU + rng.random::<f32>();
            let radius = config.bug.min_radius
                + rng.random::<f32>() * (config.bug.max_radius - config.bug.min_radius);
            let speed = (bug_speed + rng.random::<f32>()) * speed_scale;
            report.offspring.push(spawn_offspring(
                ids.next(),
                nest.pos,
                nest.offspring_distance,
                angle,
                speed,
                radius,
            ));
        }
        report.produced.push((nest.id, nest.origin));

        if nest.is_one_shot() {
            report.removed.push((nest.id, nest.origin));
            false
        } else {
            true
        }
    });

    report
}

/// Burst of debris, capped at `max` live particles
pub fn spawn_explosion<R: Rng>(
    particles: &mut Vec<Particle>,
    pos: Vec2,
    color: ParticleColor,
    count: usize,
    max: usize,
    rng: &mut R,
) {
    for _ in 0..count {
        if particles.len() >= max {
            break;
        }
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = 2.0 + rng.random::<f32>() * 4.0;
        particles.push(Particle {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            color,
            life: 1.0,
            size: 2.0 + rng.random::<f32>() * 3.0,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RocketConfig;
    use crate::sim::entities::{DustEmitter, Owner};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn hostile(kind: HostileKind, pos: Vec2, radius: f32) -> Hostile {
        Hostile {
            id: 0,
            kind,
            pos,
            radius,
            speed: 1.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            elite: false,
            emitter: None,
        }
    }

    fn shot(pos: Vec2) -> Projectile {
        Projectile::player(pos, 10.0)
    }

    #[test]
    fn test_one_projectile_one_target() {
        let projectiles = vec![shot(Vec2::new(100.0, 100.0))];
        let hostiles = vec![
            hostile(HostileKind::Asteroid, Vec2::new(100.0, 100.0), 20.0),
            hostile(HostileKind::Asteroid, Vec2::new(105.0, 100.0), 20.0),
        ];
        let impacts = find_impacts(&projectiles, &hostiles, &[], 4.0);
        assert_eq!(
            impacts,
            vec![Impact {
                projectile: 0,
                target: HitTarget::Hostile(0)
            }]
        );
    }

    #[test]
    fn test_hostile_claimed_once() {
        let projectiles = vec![shot(Vec2::new(100.0, 100.0)), shot(Vec2::new(101.0, 100.0))];
        let mut hostiles = vec![hostile(HostileKind::Asteroid, Vec2::new(100.0, 100.0), 20.0)];
        let impacts = find_impacts(&projectiles, &hostiles, &[], 4.0);
        assert_eq!(impacts.len(), 1);

        let mut projectiles = projectiles;
        let outcome = apply_impacts(&impacts, &mut projectiles, &mut hostiles, &mut Vec::new(), 10);
        assert_eq!(outcome.kills, vec![Kill::Asteroid { pos: Vec2::new(100.0, 100.0) }]);
        assert!(hostiles.is_empty());
        // The second shot flies on
        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].pos.x, 101.0);
    }

    #[test]
    fn test_nest_takes_damage_then_dies() {
        let config = GameConfig::default();
        let mut nests = vec![dust_nest(1, Vec2::new(50.0, 50.0), 0.0, &config)];
        let mut hostiles = Vec::new();

        for round in 0..5 {
            let mut projectiles = vec![shot(Vec2::new(50.0, 50.0))];
            let impacts = find_impacts(&projectiles, &hostiles, &nests, 4.0);
            let outcome = apply_impacts(&impacts, &mut projectiles, &mut hostiles, &mut nests, 10);
            assert!(projectiles.is_empty());
            if round < 4 {
                assert_eq!(outcome.nest_hits.len(), 1);
                assert_eq!(nests[0].health, 40 - round * 10);
            } else {
                assert_eq!(
                    outcome.kills,
                    vec![Kill::Nest {
                        pos: Vec2::new(50.0, 50.0),
                        origin: NestOrigin::Dust
                    }]
                );
                assert!(nests.is_empty());
            }
        }
    }

    #[test]
    fn test_scoring_table() {
        let scoring = ScoringConfig::default();
        let pos = Vec2::ZERO;
        assert_eq!(Kill::Asteroid { pos }.score(&scoring), 10);
        assert_eq!(Kill::Bug { pos, elite: false }.score(&scoring), 25);
        assert_eq!(Kill::Bug { pos, elite: true }.score(&scoring), 35);
        let nest = Kill::Nest {
            pos,
            origin: NestOrigin::Nebula,
        };
        assert_eq!(nest.score(&scoring), 100);
    }

    #[test]
    fn test_player_hits_stop_at_zero_lives() {
        let mut rocket = Rocket::new(&RocketConfig::default());
        rocket.lives = 2;
        let center = rocket.center();
        let mut hostiles = vec![
            hostile(HostileKind::Bug, center, 15.0),
            hostile(HostileKind::Asteroid, center, 15.0),
            hostile(HostileKind::Bug, center, 15.0),
            hostile(HostileKind::Bug, center, 15.0),
        ];
        let hits = resolve_player_hits(&mut rocket, &mut hostiles);
        assert_eq!(hits.len(), 2);
        assert_eq!(rocket.lives, 0);
        // Asteroid never hurts, the third bug arrived after game over
        assert_eq!(hostiles.len(), 2);
    }

    #[test]
    fn test_laser_sweeps_band() {
        let config = GameConfig::default();
        let laser = HorizontalLaser {
            y: 300.0,
            started_at: 0.0,
            duration: 500.0,
        };
        let mut hostiles = vec![
            hostile(HostileKind::Bug, Vec2::new(10.0, 310.0), 15.0),
            hostile(HostileKind::Asteroid, Vec2::new(500.0, 280.0), 30.0),
            hostile(HostileKind::Bug, Vec2::new(10.0, 400.0), 15.0),
        ];
        let mut nests = vec![nebula(1, Vec2::new(700.0, 320.0), 0.0, &config)];
        let kills = sweep_laser(&laser, &mut hostiles, &mut nests);
        assert_eq!(kills.len(), 3);
        assert_eq!(hostiles.len(), 1);
        assert!(nests.is_empty());
    }

    #[test]
    fn test_elite_emits_until_cap() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut bug = hostile(HostileKind::Bug, Vec2::new(200.0, 200.0), 20.0);
        bug.elite = true;
        bug.emitter = Some(DustEmitter {
            cooldown: Cooldown::started_at(800.0, 0.0),
            emitted: 0,
        });
        let mut hostiles = vec![bug];
        let mut dust = Vec::new();

        emit_dust(&mut hostiles, &mut dust, &config, 799.0, &mut rng);
        assert!(dust.is_empty());

        let mut now = 0.0;
        for _ in 0..10 {
            now += 800.0;
            emit_dust(&mut hostiles, &mut dust, &config, now, &mut rng);
        }
        assert_eq!(dust.len(), 6);
        for d in &dust {
            assert!((d.pos - Vec2::new(200.0, 200.0)).abs().max_element() <= 5.0);
            assert!(d.opacity >= 0.7 && d.opacity <= 0.9);
        }
    }

    fn dust_at(pos: Vec2, created_at: f64) -> DustParticle {
        DustParticle {
            pos,
            created_at,
            opacity: 0.8,
            size: 5.0,
        }
    }

    #[test]
    fn test_mature_cluster_forms_nest() {
        let config = GameConfig::default();
        let mut dust: Vec<DustParticle> = (0..6)
            .map(|i| dust_at(Vec2::new(100.0 + i as f32 * 2.0, 100.0), 0.0))
            .collect();
        dust.push(dust_at(Vec2::new(600.0, 600.0), 0.0));
        dust.push(dust_at(Vec2::new(100.0, 100.0), 15_000.0));

        assert_eq!(cluster_dust(&mut dust, &config, 19_999.0), None);
        assert_eq!(dust.len(), 8);

        let centroid = cluster_dust(&mut dust, &config, 20_000.0).expect("cluster of six");
        assert!((centroid - Vec2::new(105.0, 100.0)).length() < 1e-4);
        // The immature particle and the straggler remain
        assert_eq!(dust.len(), 2);
    }

    #[test]
    fn test_cluster_radius_is_inclusive() {
        let config = GameConfig::default();
        let center = Vec2::new(300.0, 300.0);
        let mut dust = vec![dust_at(center, 0.0)];
        for offset in [
            Vec2::new(100.0, 0.0),
            Vec2::new(-100.0, 0.0),
            Vec2::new(0.0, 100.0),
            Vec2::new(0.0, -100.0),
            Vec2::new(60.0, 80.0),
        ] {
            dust.push(dust_at(center + offset, 0.0));
        }
        assert!(cluster_dust(&mut dust, &config, 20_000.0).is_some());
        assert!(dust.is_empty());
    }

    #[test]
    fn test_small_cluster_expires() {
        let config = GameConfig::default();
        let mut dust: Vec<DustParticle> = (0..5)
            .map(|i| dust_at(Vec2::new(i as f32, 0.0), 0.0))
            .collect();
        assert_eq!(cluster_dust(&mut dust, &config, 20_500.0), None);
        assert_eq!(dust.len(), 5);
        assert_eq!(cluster_dust(&mut dust, &config, 21_000.0), None);
        assert!(dust.is_empty());
    }

    #[test]
    fn test_nebula_waits_then_vanishes() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut ids = EntityIds::default();
        let mut nests = vec![nebula(1, Vec2::new(300.0, 300.0), 1000.0, &config)];

        let report = update_nests(&mut nests, 5999.0, 2.0, 1.0, &config, &mut rng, &mut ids);
        assert!(report.offspring.is_empty());
        assert_eq!(nests.len(), 1);

        let report = update_nests(&mut nests, 6000.0, 2.0, 1.0, &config, &mut rng, &mut ids);
        assert_eq!(report.offspring.len(), 2);
        assert_eq!(report.removed, vec![(1, NestOrigin::Nebula)]);
        assert!(nests.is_empty());
        for bug in &report.offspring {
            assert!((distance(bug.pos, Vec2::new(300.0, 300.0)) - 20.0).abs() < 1e-3);
            assert!(!bug.elite);
        }
    }

    #[test]
    fn test_dust_nest_produces_until_expiry() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ids = EntityIds::default();
        let mut nests = vec![dust_nest(1, Vec2::new(300.0, 300.0), 0.0, &config)];

        let first = update_nests(&mut nests, 0.0, 2.0, 1.0, &config, &mut rng, &mut ids);
        assert!((2..=3).contains(&first.offspring.len()));
        assert!(update_nests(&mut nests, 4999.0, 2.0, 1.0, &config, &mut rng, &mut ids)
            .offspring
            .is_empty());
        assert!(!update_nests(&mut nests, 5000.0, 2.0, 1.0, &config, &mut rng, &mut ids)
            .offspring
            .is_empty());

        let last = update_nests(&mut nests, 30_000.0, 2.0, 1.0, &config, &mut rng, &mut ids);
        assert!(last.offspring.is_empty());
        assert_eq!(last.removed, vec![(1, NestOrigin::Dust)]);
        assert!(nests.is_empty());
    }

    #[test]
    fn test_structure_shots_follow_heading() {
        let mut projectiles = vec![Projectile::aimed(
            Vec2::new(100.0, 100.0),
            10.0,
            Owner::Station,
            Vec2::new(1.0, 0.0),
        )];
        let viewport = Viewport::new(115.0, 200.0);
        advance_projectiles(&mut projectiles, viewport, 10.0);
        assert_eq!(projectiles[0].pos, Vec2::new(110.0, 100.0));
        advance_projectiles(&mut projectiles, viewport, 10.0);
        advance_projectiles(&mut projectiles, viewport, 10.0);
        assert!(projectiles.is_empty());
    }

    #[test]
    fn test_explosion_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut particles = Vec::new();
        spawn_explosion(&mut particles, Vec2::ZERO, ParticleColor::Bug, 12, 20, &mut rng);
        spawn_explosion(&mut particles, Vec2::ZERO, ParticleColor::Bug, 12, 20, &mut rng);
        assert_eq!(particles.len(), 20);
    }
}
