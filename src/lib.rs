//! Space Dev - a falling-asteroid defense mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, combat, resources, levels)
//! - `session`: Side effects around the simulation (storage, stats, audio)
//! - `platform`: Viewport, input mapping and wall-clock time
//! - `persistence`: Versioned key-value records with fail-soft access
//! - `config`: Data-driven game balance

pub mod audio;
pub mod config;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use error::StorageError;
pub use highscores::{Leaderboard, LeaderboardEntry};
pub use persistence::GameStorage;
pub use session::{GameOverReport, GameSession};
pub use settings::{QualityPreset, Settings};
