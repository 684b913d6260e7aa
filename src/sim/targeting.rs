//! Structure targeting and firing

use glam::Vec2;

use super::entities::{DefensiveStructure, Hostile, Nest, Projectile};
use super::geometry::{direction, distance};

/// What a structure locked onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Nest { id: u32, pos: Vec2 },
    Bug { id: u32, pos: Vec2 },
}

impl Target {
    pub fn pos(&self) -> Vec2 {
        match self {
            Target::Nest { pos, .. } | Target::Bug { pos, .. } => *pos,
        }
    }
}

fn nearest<'a, T>(
    from: Vec2,
    range: f32,
    items: impl Iterator<Item = &'a T>,
    pos_of: impl Fn(&T) -> Vec2,
) -> Option<&'a T>
where
    T: 'a,
{
    items
        .map(|item| (distance(from, pos_of(item)), item))
        .filter(|(dist, _)| *dist <= range)
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, item)| item)
}

/// Nearest nest in range wins over any bug; otherwise the nearest bug.
/// Asteroids are never targeted.
pub fn acquire_target(
    structure: &DefensiveStructure,
    hostiles: &[Hostile],
    nests: &[Nest],
) -> Option<Target> {
    if let Some(nest) = nearest(structure.pos, structure.range, nests.iter(), |n| n.pos) {
        return Some(Target::Nest {
            id: nest.id,
            pos: nest.pos,
        });
    }
    nearest(
        structure.pos,
        structure.range,
        hostiles.iter().filter(|h| h.is_bug()),
        |h| h.pos,
    )
    .map(|bug| Target::Bug {
        id: bug.id,
        pos: bug.pos,
    })
}

/// Fire every structure whose cooldown has elapsed and that has a target.
/// Returns the new projectiles; cooldowns of structures that fired are
/// restarted at `now`.
pub fn fire_structures(
    structures: &mut [DefensiveStructure],
    hostiles: &[Hostile],
    nests: &[Nest],
    now: f64,
) -> Vec<Projectile> {
    let mut shots = Vec::new();
    for structure in structures.iter_mut() {
        if !structure.cooldown.ready(now) {
            continue;
        }
        let Some(target) = acquire_target(structure, hostiles, nests) else {
            continue;
        };
        // A target sitting exactly on the structure has no heading
        let Some(dir) = direction(structure.pos, target.pos()) else {
            continue;
        };
        shots.push(Projectile::aimed(
            structure.pos,
            structure.bullet_speed,
            structure.kind.owner(),
            dir,
        ));
        structure.cooldown.fire(now);
    }
    shots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::cooldown::Cooldown;
    use crate::sim::entities::{HostileKind, NestOrigin, Owner, StructureKind};

    fn satellite_at(pos: Vec2) -> DefensiveStructure {
        DefensiveStructure {
            id: 1,
            kind: StructureKind::Satellite,
            pos,
            range: 200.0,
            bullet_speed: 8.0,
            cooldown: Cooldown::ready_now(1000.0),
            quote: String::new(),
        }
    }

    fn hostile(id: u32, kind: HostileKind, pos: Vec2) -> Hostile {
        Hostile {
            id,
            kind,
            pos,
            radius: 20.0,
            speed: 2.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            elite: false,
            emitter: None,
        }
    }

    fn nest(id: u32, pos: Vec2) -> Nest {
        Nest {
            id,
            origin: NestOrigin::Dust,
            pos,
            radius: 30.0,
            health: 50,
            max_health: 50,
            created_at: 0.0,
            production: Cooldown::ready_now(5000.0),
            max_duration: 30000.0,
            min_offspring: 2,
            max_offspring: 3,
            offspring_distance: 50.0,
        }
    }

    #[test]
    fn test_nearest_bug_ignoring_asteroids() {
        let sat = satellite_at(Vec2::ZERO);
        let hostiles = vec![
            hostile(1, HostileKind::Asteroid, Vec2::new(10.0, 0.0)),
            hostile(2, HostileKind::Bug, Vec2::new(150.0, 0.0)),
            hostile(3, HostileKind::Bug, Vec2::new(0.0, 90.0)),
            hostile(4, HostileKind::Bug, Vec2::new(0.0, 250.0)),
        ];
        let target = acquire_target(&sat, &hostiles, &[]);
        assert_eq!(
            target,
            Some(Target::Bug {
                id: 3,
                pos: Vec2::new(0.0, 90.0)
            })
        );
    }

    #[test]
    fn test_nest_has_priority() {
        let sat = satellite_at(Vec2::ZERO);
        let hostiles = vec![hostile(1, HostileKind::Bug, Vec2::new(5.0, 0.0))];
        let nests = vec![nest(7, Vec2::new(190.0, 0.0)), nest(8, Vec2::new(0.0, 210.0))];
        let target = acquire_target(&sat, &hostiles, &nests);
        assert!(matches!(target, Some(Target::Nest { id: 7, .. })));
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut structures = vec![satellite_at(Vec2::ZERO)];
        let hostiles = vec![hostile(1, HostileKind::Bug, Vec2::new(0.0, 100.0))];

        let shots = fire_structures(&mut structures, &hostiles, &[], 1000.0);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].owner, Owner::Satellite);
        assert_eq!(shots[0].direction, Some(Vec2::new(0.0, 1.0)));
        assert_eq!(shots[0].speed, 8.0);

        assert!(fire_structures(&mut structures, &hostiles, &[], 1999.0).is_empty());
        assert_eq!(fire_structures(&mut structures, &hostiles, &[], 2000.0).len(), 1);
    }

    #[test]
    fn test_nothing_in_range_keeps_cooldown_ready() {
        let mut structures = vec![satellite_at(Vec2::ZERO)];
        let hostiles = vec![hostile(1, HostileKind::Bug, Vec2::new(0.0, 500.0))];
        assert!(fire_structures(&mut structures, &hostiles, &[], 0.0).is_empty());
        assert!(structures[0].cooldown.ready(0.0));
    }
}
