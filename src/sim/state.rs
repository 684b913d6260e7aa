//! Session state machine and per-session containers
//!
//! `GameState` owns every entity container. Subsystems borrow individual
//! fields, so the orchestrator can hand the spawner `&mut ids` while the
//! level ledger is borrowed immutably.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cooldown::Cooldown;
use super::entities::{
    DeployAnimation, DustParticle, Hostile, HorizontalLaser, LevelUpAnimation, Nest, Notification,
    NotificationKind, Particle, Projectile, Rocket, ScreenShake,
};
use super::geometry::rescale;
use super::level::LevelLedger;
use super::resources::ResourceLedger;
use super::spawner::Spawner;
use crate::config::GameConfig;
use crate::platform::Viewport;

/// Where the help overlay returns to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HelpOrigin {
    Running,
    Paused,
}

/// Current screen of the game. Only `Running` advances the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Welcome screen
    NotStarted,
    /// A saved session was found; waiting for continue / new game
    ContinuePrompt,
    Running,
    Paused,
    Help { from: HelpOrigin },
    /// Terminal until restart
    GameOver,
}

/// Inputs to the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    /// A valid save exists at mount
    SaveFound,
    Continue,
    NewGame,
    Pause,
    Resume,
    ToggleHelp,
    /// Close help, otherwise toggle pause
    Escape,
    LivesExhausted,
    Restart,
}

impl SessionState {
    /// Transition table. `None` means the command is not valid here.
    pub fn next(self, cmd: SessionCommand) -> Option<SessionState> {
        use SessionCommand as C;
        use SessionState as S;

        match (self, cmd) {
            (_, C::Restart) => Some(S::NotStarted),
            (S::NotStarted, C::Start) => Some(S::Running),
            (S::NotStarted, C::SaveFound) => Some(S::ContinuePrompt),
            (S::ContinuePrompt, C::Continue | C::NewGame) => Some(S::Running),
            (S::Running, C::Pause | C::Escape) => Some(S::Paused),
            (S::Paused, C::Resume | C::Escape) => Some(S::Running),
            (S::Running, C::ToggleHelp) => Some(S::Help {
                from: HelpOrigin::Running,
            }),
            (S::Paused, C::ToggleHelp) => Some(S::Help {
                from: HelpOrigin::Paused,
            }),
            (S::Help { from }, C::ToggleHelp | C::Escape) => Some(match from {
                HelpOrigin::Running => S::Running,
                HelpOrigin::Paused => S::Paused,
            }),
            (S::Running, C::LivesExhausted) => Some(S::GameOver),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, SessionState::Running)
    }

    /// Past the welcome screen and prompt
    pub fn has_started(&self) -> bool {
        !matches!(self, SessionState::NotStarted | SessionState::ContinuePrompt)
    }
}

/// Monotonic entity id source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds(u32);

impl Default for EntityIds {
    fn default() -> Self {
        Self(1)
    }
}

impl EntityIds {
    pub fn next(&mut self) -> u32 {
        let id = self.0;
        self.0 += 1;
        id
    }
}

/// Player-controlled cosmetic switches (from `Settings`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectToggles {
    pub screen_shake: bool,
    pub max_particles: usize,
}

/// Complete per-session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub seed: u64,
    pub rng: Pcg32,
    pub session: SessionState,
    pub viewport: Viewport,
    pub score: u64,
    pub rocket: Rocket,
    pub projectiles: Vec<Projectile>,
    pub hostiles: Vec<Hostile>,
    pub nests: Vec<Nest>,
    pub dust: Vec<DustParticle>,
    pub resources: ResourceLedger,
    pub level: LevelLedger,
    pub spawner: Spawner,
    pub fire_cooldown: Cooldown,
    pub laser_cooldown: Cooldown,
    pub laser: Option<HorizontalLaser>,
    pub ids: EntityIds,
    /// Visual only
    pub particles: Vec<Particle>,
    pub deploy_animations: Vec<DeployAnimation>,
    pub level_up: Option<LevelUpAnimation>,
    pub shake: ScreenShake,
    pub damage_flash_until: Option<f64>,
    pub notifications: Vec<Notification>,
    pub effects: EffectToggles,
    sized: bool,
}

impl GameState {
    pub fn new(seed: u64, config: GameConfig, viewport: Viewport) -> Self {
        let effects = EffectToggles {
            screen_shake: true,
            max_particles: config.effects.max_particles,
        };
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            session: SessionState::NotStarted,
            viewport: Viewport::new(0.0, 0.0),
            score: 0,
            rocket: Rocket::new(&config.rocket),
            projectiles: Vec::new(),
            hostiles: Vec::new(),
            nests: Vec::new(),
            dust: Vec::new(),
            resources: ResourceLedger::new(config.resource.deploy_threshold),
            level: LevelLedger::new(&config.level),
            spawner: Spawner::new(0.0),
            fire_cooldown: Cooldown::ready_now(config.bullet.fire_cooldown_ms),
            laser_cooldown: Cooldown::ready_now(config.laser.cooldown_ms),
            laser: None,
            ids: EntityIds::default(),
            particles: Vec::new(),
            deploy_animations: Vec::new(),
            level_up: None,
            shake: ScreenShake::default(),
            damage_flash_until: None,
            notifications: Vec::new(),
            effects,
            sized: false,
            config,
        };
        state.on_resize(viewport);
        state
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport.is_mobile(self.config.mobile.breakpoint)
    }

    /// Speed multiplier for newly spawned bugs
    pub fn speed_scale(&self) -> f32 {
        if self.is_mobile() {
            self.config.mobile.speed_multiplier
        } else {
            1.0
        }
    }

    /// Clear everything that belongs to one play attempt. The session state
    /// itself is left to the caller.
    pub fn reset(&mut self, now: f64) {
        self.score = 0;
        let mobile = self.is_mobile();
        self.rocket = Rocket::new(&self.config.rocket);
        self.rocket
            .place_at_start(self.viewport, &self.config.rocket, mobile);
        self.projectiles.clear();
        self.hostiles.clear();
        self.nests.clear();
        self.dust.clear();
        self.resources.reset();
        self.level.reset(&self.config.level);
        self.spawner.reset(now);
        self.fire_cooldown.reset();
        self.laser_cooldown.reset();
        self.laser = None;
        self.particles.clear();
        self.deploy_animations.clear();
        self.level_up = None;
        self.shake = ScreenShake::default();
        self.damage_flash_until = None;
        self.notifications.clear();
    }

    /// Apply a session command; returns whether the state changed
    pub fn apply(&mut self, cmd: SessionCommand) -> bool {
        match self.session.next(cmd) {
            Some(next) => {
                log::debug!("Session {:?} -> {:?} ({:?})", self.session, next, cmd);
                self.session = next;
                true
            }
            None => false,
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind, now: f64) {
        let effects = &self.config.effects;
        let duration = match kind {
            NotificationKind::Deploy => effects.deploy_notification_ms,
            NotificationKind::LevelUp => effects.level_up_notification_ms,
            NotificationKind::Damage => effects.damage_notification_ms,
            NotificationKind::Info => effects.info_notification_ms,
        };
        let id = self.ids.next();
        self.notifications.push(Notification {
            id,
            message: message.into(),
            kind,
            created_at: now,
            duration,
        });
    }

    /// Oldest notifications first, at most the configured number
    pub fn visible_notifications(&self) -> &[Notification] {
        let n = self
            .notifications
            .len()
            .min(self.config.effects.max_visible_notifications);
        &self.notifications[..n]
    }

    pub fn is_flashing(&self, now: f64) -> bool {
        self.damage_flash_until.is_some_and(|until| now < until)
    }

    /// Track a new viewport size. The first sizing places the rocket;
    /// later ones rescale every position proportionally.
    pub fn on_resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        if !self.sized || self.viewport.is_empty() {
            self.viewport = viewport;
            self.sized = true;
            let mobile = self.is_mobile();
            self.rocket
                .place_at_start(viewport, &self.config.rocket, mobile);
            return;
        }

        let ratio = Vec2::new(
            viewport.width / self.viewport.width,
            viewport.height / self.viewport.height,
        );
        self.viewport = viewport;

        self.rocket.pos = rescale(self.rocket.pos, ratio);
        self.rocket.clamp_to(viewport);
        for s in &mut self.resources.structures {
            s.pos = rescale(s.pos, ratio);
        }
        for h in &mut self.hostiles {
            h.pos = rescale(h.pos, ratio);
        }
        for p in &mut self.projectiles {
            p.pos = rescale(p.pos, ratio);
        }
        for n in &mut self.nests {
            n.pos = rescale(n.pos, ratio);
        }
        for d in &mut self.dust {
            d.pos = rescale(d.pos, ratio);
        }
    }
}
