//! Entity records
//!
//! Plain data owned by `GameState`. Movement helpers live here because they
//! only touch the entity itself; anything that needs two containers lives in
//! `combat` or `targeting`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cooldown::Cooldown;
use crate::config::RocketConfig;
use crate::platform::Viewport;

/// The player's craft. `pos` is the top-left corner of its bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rocket {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub lives: u32,
}

impl Rocket {
    pub fn new(config: &RocketConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            width: config.width,
            height: config.height,
            speed: config.speed,
            lives: config.initial_lives,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Radius of the inscribed circle used for bug collisions
    pub fn hit_radius(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }

    /// Muzzle position (top center)
    pub fn nose(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.width / 2.0, self.pos.y)
    }

    /// Horizontally centered, lifted above the bottom edge (more on mobile
    /// to clear the touch buttons)
    pub fn place_at_start(&mut self, viewport: Viewport, config: &RocketConfig, mobile: bool) {
        let bottom = if mobile {
            config.bottom_offset_mobile
        } else {
            config.bottom_offset
        };
        self.pos = Vec2::new(
            viewport.width / 2.0 - self.width / 2.0,
            viewport.height - self.height - bottom,
        );
    }

    pub fn clamp_to(&mut self, viewport: Viewport) {
        self.pos.x = self.pos.x.clamp(0.0, (viewport.width - self.width).max(0.0));
        self.pos.y = self.pos.y.clamp(0.0, (viewport.height - self.height).max(0.0));
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Satellite,
    Station,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub speed: f32,
    pub owner: Owner,
    /// Unit heading for structure shots; player shots travel straight up
    pub direction: Option<Vec2>,
}

impl Projectile {
    pub fn player(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            speed,
            owner: Owner::Player,
            direction: None,
        }
    }

    pub fn aimed(pos: Vec2, speed: f32, owner: Owner, direction: Vec2) -> Self {
        Self {
            pos,
            speed,
            owner,
            direction: Some(direction),
        }
    }

    pub fn advance(&mut self) {
        match (self.owner, self.direction) {
            (Owner::Player, _) => self.pos.y -= self.speed,
            (_, Some(dir)) => self.pos += dir * self.speed,
            (_, None) => {}
        }
    }

    pub fn is_offscreen(&self, viewport: Viewport, margin: f32) -> bool {
        self.pos.x < -margin
            || self.pos.x > viewport.width + margin
            || self.pos.y < -margin
            || self.pos.y > viewport.height + margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostileKind {
    /// Falls straight down, yields a resource when shot
    Asteroid,
    /// Homes on the rocket, costs a life on contact
    Bug,
}

/// Dust emission state carried by elite bugs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DustEmitter {
    pub cooldown: Cooldown,
    pub emitted: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    pub id: u32,
    pub kind: HostileKind,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub elite: bool,
    pub emitter: Option<DustEmitter>,
}

impl Hostile {
    pub fn is_bug(&self) -> bool {
        self.kind == HostileKind::Bug
    }

    /// Move one frame. Bugs home on `target` and turn to face it; asteroids
    /// fall and spin.
    pub fn advance(&mut self, target: Vec2) {
        match self.kind {
            HostileKind::Asteroid => {
                self.pos.y += self.speed;
                self.rotation += self.rotation_speed;
            }
            HostileKind::Bug => {
                let offset = target - self.pos;
                let dist = offset.length();
                if dist > 0.0 {
                    self.pos += offset / dist * self.speed;
                    self.rotation = offset.y.atan2(offset.x) + std::f32::consts::FRAC_PI_2;
                }
            }
        }
    }

    /// Beyond the viewport by more than twice the radius
    pub fn is_offscreen(&self, viewport: Viewport) -> bool {
        let margin = self.radius * 2.0;
        self.pos.x < -margin
            || self.pos.x > viewport.width + margin
            || self.pos.y < -margin
            || self.pos.y > viewport.height + margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureKind {
    Satellite,
    Station,
}

const SATELLITE_QUOTES: &[&str] = &[
    "Automate the boring parts, keep the interesting ones",
    "Good tools make good developers great",
    "The best code is the code you never had to write",
    "Testing is an investment, not a cost",
    "Linting catches bugs before they hatch",
    "Documentation is a letter to your future self",
    "Small commits, big impact",
];

const STATION_QUOTES: &[&str] = &[
    "Technical debt compounds like financial debt",
    "Make it work, make it right, make it fast",
    "Premature optimization is the root of all evil",
    "Simplicity is the ultimate sophistication",
    "Design for failure, plan for success",
    "Monoliths aren't evil, just misunderstood",
];

impl StructureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureKind::Satellite => "Satellite",
            StructureKind::Station => "Space Station",
        }
    }

    pub fn owner(&self) -> Owner {
        match self {
            StructureKind::Satellite => Owner::Satellite,
            StructureKind::Station => Owner::Station,
        }
    }

    pub fn quotes(&self) -> &'static [&'static str] {
        match self {
            StructureKind::Satellite => SATELLITE_QUOTES,
            StructureKind::Station => STATION_QUOTES,
        }
    }
}

/// Auto-firing satellite or station. Never moves, lives until reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefensiveStructure {
    pub id: u32,
    pub kind: StructureKind,
    pub pos: Vec2,
    pub range: f32,
    pub bullet_speed: f32,
    pub cooldown: Cooldown,
    pub quote: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NestOrigin {
    /// Formed from a cluster of aged dust; spawns repeatedly until expiry
    Dust,
    /// Left behind by a dead elite bug; spawns once after a delay
    Nebula,
}

/// Stationary hazard that produces bugs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nest {
    pub id: u32,
    pub origin: NestOrigin,
    pub pos: Vec2,
    pub radius: f32,
    pub health: i32,
    pub max_health: i32,
    pub created_at: f64,
    pub production: Cooldown,
    /// Removed unconditionally once this old (ms)
    pub max_duration: f64,
    pub min_offspring: u32,
    pub max_offspring: u32,
    /// Distance from the center at which offspring appear
    pub offspring_distance: f32,
}

impl Nest {
    pub fn age(&self, now: f64) -> f64 {
        now - self.created_at
    }

    pub fn is_expired(&self, now: f64) -> bool {
        self.age(now) >= self.max_duration
    }

    /// Nebulae vanish after their single brood
    pub fn is_one_shot(&self) -> bool {
        self.origin == NestOrigin::Nebula
    }
}

/// Precursor particle emitted by elite bugs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DustParticle {
    pub pos: Vec2,
    pub created_at: f64,
    pub opacity: f32,
    pub size: f32,
}

impl DustParticle {
    pub fn age(&self, now: f64) -> f64 {
        now - self.created_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Rock,
    Bug,
    Nest,
    Nebula,
}

/// Explosion debris
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: ParticleColor,
    /// 1.0 at birth, removed at 0
    pub life: f32,
    pub size: f32,
}

impl Particle {
    /// Returns false once the particle has faded out
    pub fn update(&mut self) -> bool {
        self.pos += self.vel;
        self.vel.y += 0.2;
        self.life -= 0.02;
        self.life > 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployAnimation {
    pub pos: Vec2,
    pub kind: StructureKind,
    pub started_at: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelUpAnimation {
    pub level: u32,
    pub started_at: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    pub offset: Vec2,
    pub intensity: f32,
}

/// Active horizontal laser beam
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HorizontalLaser {
    pub y: f32,
    pub started_at: f64,
    pub duration: f64,
}

impl HorizontalLaser {
    pub fn is_active(&self, now: f64) -> bool {
        now - self.started_at < self.duration
    }

    /// A circle is swept when the beam crosses it
    pub fn hits(&self, pos: Vec2, radius: f32) -> bool {
        (pos.y - self.y).abs() < radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Deploy,
    LevelUp,
    Damage,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: u32,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: f64,
    pub duration: f64,
}

impl Notification {
    pub fn is_expired(&self, now: f64) -> bool {
        now - self.created_at > self.duration
    }

    /// Fade in over 200 ms and out over the last 500 ms
    pub fn opacity(&self, now: f64) -> f32 {
        let age = now - self.created_at;
        let opacity = if age < 200.0 {
            age / 200.0
        } else if age > self.duration - 500.0 {
            (self.duration - age) / 500.0
        } else {
            1.0
        };
        opacity.clamp(0.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bug_at(pos: Vec2) -> Hostile {
        Hostile {
            id: 1,
            kind: HostileKind::Bug,
            pos,
            radius: 20.0,
            speed: 2.0,
            rotation: 0.0,
            rotation_speed: 0.01,
            elite: false,
            emitter: None,
        }
    }

    #[test]
    fn test_bug_homes_on_target() {
        let mut bug = bug_at(Vec2::new(100.0, 0.0));
        bug.advance(Vec2::new(100.0, 100.0));
        assert!((bug.pos - Vec2::new(100.0, 2.0)).length() < 1e-5);
        // Facing straight down
        assert!((bug.rotation - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn test_bug_on_target_does_not_move() {
        let target = Vec2::new(50.0, 50.0);
        let mut bug = bug_at(target);
        bug.advance(target);
        assert_eq!(bug.pos, target);
        assert_eq!(bug.rotation, 0.0);
    }

    #[test]
    fn test_offscreen_uses_double_radius() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut bug = bug_at(Vec2::new(400.0, 640.0));
        assert!(!bug.is_offscreen(viewport));
        bug.pos.y = 640.1;
        assert!(bug.is_offscreen(viewport));
    }

    #[test]
    fn test_projectile_paths() {
        let mut shot = Projectile::player(Vec2::new(10.0, 100.0), 10.0);
        shot.advance();
        assert_eq!(shot.pos, Vec2::new(10.0, 90.0));

        let mut aimed = Projectile::aimed(Vec2::ZERO, 8.0, Owner::Satellite, Vec2::X);
        aimed.advance();
        assert_eq!(aimed.pos, Vec2::new(8.0, 0.0));
    }

    #[test]
    fn test_rocket_start_position() {
        let mut rocket = Rocket::new(&RocketConfig::default());
        rocket.place_at_start(Viewport::new(1000.0, 800.0), &RocketConfig::default(), false);
        assert_eq!(rocket.pos, Vec2::new(470.0, 640.0));
        assert_eq!(rocket.center(), Vec2::new(500.0, 680.0));
        assert_eq!(rocket.hit_radius(), 30.0);
    }
}
