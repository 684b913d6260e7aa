//! Simulation module
//!
//! All gameplay logic lives here. Nothing in `sim` touches the browser:
//! - Time is passed in as wall-clock milliseconds
//! - Randomness comes from the seeded generator in `GameState`
//! - The viewport is an injected value

pub mod combat;
pub mod cooldown;
pub mod entities;
pub mod geometry;
pub mod level;
pub mod resources;
pub mod spawner;
pub mod state;
pub mod targeting;
pub mod tick;

pub use combat::Kill;
pub use cooldown::Cooldown;
pub use entities::{
    DefensiveStructure, DustParticle, Hostile, HostileKind, Nest, NestOrigin, Notification,
    NotificationKind, Owner, Projectile, Rocket, StructureKind,
};
pub use level::LevelLedger;
pub use resources::ResourceLedger;
pub use spawner::Spawner;
pub use state::{GameState, HelpOrigin, SessionCommand, SessionState};
pub use tick::{GameEvent, TickInput, tick};
