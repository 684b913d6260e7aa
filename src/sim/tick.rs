//! Per-frame simulation tick
//!
//! Order within a running frame: input, spawning, structure fire, movement,
//! collision resolution, scoring and resources, hazards, deployment and
//! level-up. Cosmetic timers advance on every frame, including paused ones.

use glam::Vec2;
use rand::Rng;

use super::combat::{self, Kill};
use super::entities::{
    DeployAnimation, HorizontalLaser, LevelUpAnimation, NestOrigin, NotificationKind,
    ParticleColor, Projectile, StructureKind,
};
use super::state::{GameState, SessionCommand};
use super::targeting;
use crate::platform::InputState;

/// Held input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub laser: bool,
}

impl From<&InputState> for TickInput {
    fn from(input: &InputState) -> Self {
        Self {
            left: input.left,
            right: input.right,
            fire: input.fire,
            laser: input.laser,
        }
    }
}

/// Things that happened during a tick, for audio, statistics and HUD
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerFired,
    LaserFired,
    StructureFired { count: usize },
    Destroyed { kill: Kill, points: u64 },
    NestDamaged { pos: Vec2 },
    ResourceCollected,
    EliteSpawned { id: u32 },
    HazardFormed { id: u32, origin: NestOrigin },
    HazardProduced { id: u32, origin: NestOrigin },
    StructureDeployed { id: u32, kind: StructureKind },
    LevelUp { level: u32 },
    PlayerHit { lives: u32 },
    GameOver { score: u64, level: u32 },
}

const KILL_PARTICLES: usize = 12;
const HIT_PARTICLES: usize = 8;

/// Advance the game by one frame at wall-clock time `now` (ms)
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();

    update_cosmetics(state, now);

    if !state.session.is_running() {
        return events;
    }

    handle_input(state, input, now, &mut events);

    // Spawning
    let spawned = state.spawner.update(
        now,
        &state.level,
        state.viewport,
        &state.config,
        &mut state.rng,
        &mut state.ids,
    );
    for hostile in spawned {
        if hostile.elite {
            events.push(GameEvent::EliteSpawned { id: hostile.id });
            state.notify("Special Bug Detected", NotificationKind::Info, now);
        }
        state.hostiles.push(hostile);
    }

    // Structures
    let shots = targeting::fire_structures(
        &mut state.resources.structures,
        &state.hostiles,
        &state.nests,
        now,
    );
    if !shots.is_empty() {
        events.push(GameEvent::StructureFired { count: shots.len() });
        state.projectiles.extend(shots);
    }

    // Movement
    let target = state.rocket.center();
    for hostile in &mut state.hostiles {
        hostile.advance(target);
    }
    combat::advance_projectiles(
        &mut state.projectiles,
        state.viewport,
        state.config.bullet.offscreen_margin,
    );

    // Projectile and laser hits
    let impacts = combat::find_impacts(
        &state.projectiles,
        &state.hostiles,
        &state.nests,
        state.config.bullet.radius,
    );
    let outcome = combat::apply_impacts(
        &impacts,
        &mut state.projectiles,
        &mut state.hostiles,
        &mut state.nests,
        state.config.nest.damage_per_hit,
    );
    let mut kills = outcome.kills;
    for pos in outcome.nest_hits {
        events.push(GameEvent::NestDamaged { pos });
    }
    if let Some(laser) = state.laser.filter(|l| l.is_active(now)) {
        kills.extend(combat::sweep_laser(
            &laser,
            &mut state.hostiles,
            &mut state.nests,
        ));
    }
    for kill in kills {
        apply_kill(state, kill, now, &mut events);
    }

    // Bugs reaching the rocket
    let hits = combat::resolve_player_hits(&mut state.rocket, &mut state.hostiles);
    let hit_count = hits.len() as u32;
    for (i, pos) in hits.into_iter().enumerate() {
        let lives = state.rocket.lives + hit_count - 1 - i as u32;
        events.push(GameEvent::PlayerHit { lives });
        explode(state, pos, ParticleColor::Bug, HIT_PARTICLES);
        if state.effects.screen_shake {
            state.shake.intensity = state.config.effects.shake_intensity;
        }
        state.damage_flash_until = Some(now + state.config.effects.damage_flash_ms);
        state.notify(
            format!("Bug hit! {lives} lives left"),
            NotificationKind::Damage,
            now,
        );
    }
    if state.rocket.lives == 0 {
        state.apply(SessionCommand::LivesExhausted);
        log::info!(
            "Game over: score {}, level {}",
            state.score,
            state.level.current
        );
        events.push(GameEvent::GameOver {
            score: state.score,
            level: state.level.current,
        });
        return events;
    }

    combat::remove_offscreen(&mut state.hostiles, state.viewport);

    update_hazards(state, now, &mut events);

    // Deployment
    if state.resources.deploy_ready() {
        let id = state.ids.next();
        let animations = &mut state.deploy_animations;
        let duration = state.config.effects.deploy_animation_ms;
        let structure = state.resources.deploy(
            id,
            state.viewport,
            &state.config,
            &mut state.rng,
            |s| {
                animations.push(DeployAnimation {
                    pos: s.pos,
                    kind: s.kind,
                    started_at: now,
                    duration,
                })
            },
        );
        log::info!(
            "{} deployed at ({:.0}, {:.0})",
            structure.kind.as_str(),
            structure.pos.x,
            structure.pos.y
        );
        events.push(GameEvent::StructureDeployed {
            id: structure.id,
            kind: structure.kind,
        });
        state.notify(
            format!("{} deployed: \"{}\"", structure.kind.as_str(), structure.quote),
            NotificationKind::Deploy,
            now,
        );
    }

    // Level
    if let Some(level) = state
        .level
        .check_level_up(state.resources.total_collected, &state.config.level)
    {
        state.level_up = Some(LevelUpAnimation {
            level,
            started_at: now,
            duration: state.config.effects.level_up_animation_ms,
        });
        events.push(GameEvent::LevelUp { level });
        state.notify(format!("Level {level}!"), NotificationKind::LevelUp, now);
    }

    events
}

fn handle_input(state: &mut GameState, input: &TickInput, now: f64, events: &mut Vec<GameEvent>) {
    let mut dx = 0.0;
    if input.left {
        dx -= state.rocket.speed;
    }
    if input.right {
        dx += state.rocket.speed;
    }
    state.rocket.pos.x += dx;
    state.rocket.clamp_to(state.viewport);

    if input.fire && state.fire_cooldown.try_fire(now) {
        state.projectiles.push(Projectile::player(
            state.rocket.nose(),
            state.config.bullet.speed,
        ));
        events.push(GameEvent::PlayerFired);
    }

    if input.laser && state.laser_cooldown.try_fire(now) {
        state.laser = Some(HorizontalLaser {
            y: state.rocket.center().y,
            started_at: now,
            duration: state.config.laser.duration_ms,
        });
        events.push(GameEvent::LaserFired);
    }
}

fn apply_kill(state: &mut GameState, kill: Kill, now: f64, events: &mut Vec<GameEvent>) {
    let points = kill.score(&state.config.scoring);
    state.score += points;
    explode(state, kill.pos(), kill.color(), KILL_PARTICLES);
    events.push(GameEvent::Destroyed { kill, points });

    match kill {
        Kill::Asteroid { .. } => {
            state.resources.collect();
            events.push(GameEvent::ResourceCollected);
        }
        Kill::Bug { pos, elite: true } if state.config.nebula.enabled => {
            let id = state.ids.next();
            state
                .nests
                .push(combat::nebula(id, pos, now, &state.config));
            log::debug!("Nebula {id} forming at ({:.0}, {:.0})", pos.x, pos.y);
            events.push(GameEvent::HazardFormed {
                id,
                origin: NestOrigin::Nebula,
            });
            state.notify("A nebula is forming!", NotificationKind::Info, now);
        }
        Kill::Bug { .. } | Kill::Nest { .. } => {}
    }
}

/// Dust emission and clustering, then nest production and expiry
fn update_hazards(state: &mut GameState, now: f64, events: &mut Vec<GameEvent>) {
    if state.config.nest.enabled {
        combat::emit_dust(
            &mut state.hostiles,
            &mut state.dust,
            &state.config,
            now,
            &mut state.rng,
        );
        if let Some(centroid) = combat::cluster_dust(&mut state.dust, &state.config, now) {
            let id = state.ids.next();
            state
                .nests
                .push(combat::dust_nest(id, centroid, now, &state.config));
            log::debug!("Bug nest {id} formed at ({:.0}, {:.0})", centroid.x, centroid.y);
            events.push(GameEvent::HazardFormed {
                id,
                origin: NestOrigin::Dust,
            });
            state.notify("A bug nest has formed!", NotificationKind::Info, now);
        }
    }

    let speed_scale = state.speed_scale();
    let report = combat::update_nests(
        &mut state.nests,
        now,
        state.level.bug_speed,
        speed_scale,
        &state.config,
        &mut state.rng,
        &mut state.ids,
    );
    for (id, origin) in report.produced {
        events.push(GameEvent::HazardProduced { id, origin });
    }
    state.hostiles.extend(report.offspring);
}

fn explode(state: &mut GameState, pos: Vec2, color: ParticleColor, count: usize) {
    combat::spawn_explosion(
        &mut state.particles,
        pos,
        color,
        count,
        state.effects.max_particles,
        &mut state.rng,
    );
}

/// Timers that keep running while the simulation is frozen
fn update_cosmetics(state: &mut GameState, now: f64) {
    state.particles.retain_mut(|p| p.update());

    let shake = &mut state.shake;
    if shake.intensity > 0.0 {
        let intensity = shake.intensity;
        shake.offset = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * intensity,
            (state.rng.random::<f32>() - 0.5) * intensity,
        );
        shake.intensity *= 0.9;
        if shake.intensity < 0.5 {
            shake.intensity = 0.0;
            shake.offset = Vec2::ZERO;
        }
    }

    state
        .deploy_animations
        .retain(|a| now - a.started_at < a.duration);
    if state
        .level_up
        .as_ref()
        .is_some_and(|a| now - a.started_at >= a.duration)
    {
        state.level_up = None;
    }
    if state.laser.is_some_and(|l| !l.is_active(now)) {
        state.laser = None;
    }
    if state.damage_flash_until.is_some_and(|until| now >= until) {
        state.damage_flash_until = None;
    }
    state.notifications.retain(|n| !n.is_expired(now));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::platform::Viewport;
    use crate::sim::entities::{Hostile, HostileKind};

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, GameConfig::default(), Viewport::new(1200.0, 900.0));
        state.reset(0.0);
        state.apply(SessionCommand::Start);
        state
    }

    fn hostile(id: u32, kind: HostileKind, pos: Vec2) -> Hostile {
        Hostile {
            id,
            kind,
            pos,
            radius: 20.0,
            speed: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            elite: false,
            emitter: None,
        }
    }

    #[test]
    fn test_frozen_unless_running() {
        let mut state = running_state(1);
        state.apply(SessionCommand::Pause);
        state
            .hostiles
            .push(hostile(1, HostileKind::Asteroid, Vec2::new(100.0, 100.0)));
        state.hostiles[0].speed = 3.0;
        let events = tick(&mut state, &TickInput::default(), 50_000.0);
        assert!(events.is_empty());
        assert_eq!(state.hostiles[0].pos, Vec2::new(100.0, 100.0));
        assert_eq!(state.hostiles.len(), 1);
    }

    #[test]
    fn test_twenty_asteroids_deploy_once() {
        let mut state = running_state(42);
        for i in 0..20 {
            let pos = Vec2::new(60.0 + i as f32 * 50.0, 300.0);
            state.hostiles.push(hostile(100 + i, HostileKind::Asteroid, pos));
            // Player shots move 10px up before collisions are tested
            state.projectiles.push(Projectile::player(pos + Vec2::new(0.0, 10.0), 10.0));
        }

        let events = tick(&mut state, &TickInput::default(), 100.0);

        assert_eq!(state.score, 200);
        assert_eq!(state.resources.total_collected, 20);
        assert_eq!(state.resources.collected, 0);
        assert_eq!(state.resources.structures.len(), 1);
        assert_eq!(state.resources.structures[0].kind, StructureKind::Satellite);
        let deployed = events
            .iter()
            .filter(|e| matches!(e, GameEvent::StructureDeployed { .. }))
            .count();
        assert_eq!(deployed, 1);
        assert_eq!(state.deploy_animations.len(), 1);
    }

    #[test]
    fn test_elite_kill_seeds_delayed_nebula() {
        let mut state = running_state(7);
        let mut now = 0.0;
        while state.spawner.bugs_spawned < 3 {
            now += 5000.0;
            tick(&mut state, &TickInput::default(), now);
        }
        state.hostiles.retain(|h| h.elite);
        assert_eq!(state.hostiles.len(), 1);
        state.hostiles[0].pos = Vec2::new(600.0, 300.0);
        let elite_pos = state.hostiles[0].pos;
        state.projectiles.push(Projectile::player(elite_pos, 10.0));

        let score_before = state.score;
        let killed_at = now + 16.0;
        let events = tick(&mut state, &TickInput::default(), killed_at);
        assert!(events.contains(&GameEvent::Destroyed {
            kill: Kill::Bug {
                pos: state.nests[0].pos,
                elite: true
            },
            points: 35
        }));
        assert_eq!(state.score, score_before + 35);
        assert_eq!(state.nests.len(), 1);
        assert_eq!(state.nests[0].origin, NestOrigin::Nebula);

        let produced = |events: &[GameEvent]| {
            events
                .iter()
                .any(|e| matches!(e, GameEvent::HazardProduced { origin: NestOrigin::Nebula, .. }))
        };
        let events = tick(&mut state, &TickInput::default(), killed_at + 4999.0);
        assert!(!produced(&events));
        let events = tick(&mut state, &TickInput::default(), killed_at + 5000.0);
        assert!(produced(&events));
        assert!(state.nests.iter().all(|n| n.origin != NestOrigin::Nebula));
    }

    #[test]
    fn test_three_hits_end_the_game() {
        let mut state = running_state(3);
        let center = state.rocket.center();

        state
            .hostiles
            .push(hostile(1, HostileKind::Asteroid, Vec2::new(100.0, 200.0)));
        state
            .projectiles
            .push(Projectile::player(Vec2::new(100.0, 210.0), 10.0));
        tick(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.score, 10);

        for (i, now) in [20.0, 30.0, 40.0].into_iter().enumerate() {
            state
                .hostiles
                .push(hostile(10 + i as u32, HostileKind::Bug, center));
            let events = tick(&mut state, &TickInput::default(), now);
            let lives = 2 - i as u32;
            assert!(events.contains(&GameEvent::PlayerHit { lives }));
            if lives > 0 {
                assert!(state.session.is_running());
            } else {
                assert_eq!(state.session, crate::sim::SessionState::GameOver);
                assert!(events.contains(&GameEvent::GameOver { score: 10, level: 1 }));
            }
        }
        assert_eq!(state.score, 10);
        assert!(state.shake.intensity > 0.0);
    }

    #[test]
    fn test_fire_cooldown() {
        let mut state = running_state(9);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        let fired = |events: Vec<GameEvent>| events.contains(&GameEvent::PlayerFired);
        assert!(fired(tick(&mut state, &input, 1000.0)));
        assert!(!fired(tick(&mut state, &input, 1100.0)));
        assert!(fired(tick(&mut state, &input, 1200.0)));
    }

    #[test]
    fn test_laser_clears_row() {
        let mut state = running_state(11);
        let y = state.rocket.center().y;
        state
            .hostiles
            .push(hostile(1, HostileKind::Asteroid, Vec2::new(100.0, y + 5.0)));
        state
            .hostiles
            .push(hostile(2, HostileKind::Asteroid, Vec2::new(900.0, y - 200.0)));
        let input = TickInput {
            laser: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, 500.0);
        assert!(events.contains(&GameEvent::LaserFired));
        assert_eq!(state.score, 10);
        assert_eq!(state.hostiles.len(), 1);
        // Still on cooldown
        let events = tick(&mut state, &input, 5000.0);
        assert!(!events.contains(&GameEvent::LaserFired));
    }

    #[test]
    fn test_rocket_stays_in_bounds() {
        let mut state = running_state(5);
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        for i in 0..200 {
            tick(&mut state, &input, i as f64);
        }
        assert_eq!(state.rocket.pos.x, 0.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = running_state(99);
        let mut b = running_state(99);
        let input = TickInput {
            fire: true,
            right: true,
            ..Default::default()
        };
        let mut now = 0.0;
        for _ in 0..600 {
            now += 16.0;
            let ea = tick(&mut a, &input, now);
            let eb = tick(&mut b, &input, now);
            assert_eq!(ea, eb);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.hostiles.len(), b.hostiles.len());
    }
}
