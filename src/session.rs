//! Game session
//!
//! Glue between the pure simulation and everything with side effects:
//! storage, lifetime statistics, the high score, audio and input mapping.
//! Hosts (the wasm loop, the native autopilot, tests) drive a session by
//! feeding it key events and calling `frame` once per animation frame.

use crate::audio::{AudioSink, SoundEffect};
use crate::config::GameConfig;
use crate::highscores::Leaderboard;
use crate::persistence::{GameStorage, LifetimeStats, SessionSave, StatName, StatsTracker};
use crate::platform::{InputState, KeyAction, KeyCommand, TouchButton, Viewport};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Kill, SessionCommand, SessionState, TickInput, tick};

/// What happened at game over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverReport {
    pub score: u64,
    pub level: u32,
    pub new_high_score: bool,
    /// Leaderboard rank (1-indexed), if the score made the board
    pub rank: Option<usize>,
}

pub struct GameSession {
    pub state: GameState,
    pub input: InputState,
    storage: GameStorage,
    stats: StatsTracker,
    settings: Settings,
    audio: Box<dyn AudioSink>,
    /// Save found at mount, waiting for continue / new game
    pending_save: Option<SessionSave>,
    last_auto_save: Option<f64>,
    game_over: Option<GameOverReport>,
    /// Set by `teardown`; input, frames and saves are ignored until the
    /// next `mount`
    detached: bool,
}

impl GameSession {
    pub fn new(
        seed: u64,
        config: GameConfig,
        viewport: Viewport,
        storage: GameStorage,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        Self {
            state: GameState::new(seed, config, viewport),
            input: InputState::default(),
            storage,
            stats: StatsTracker::new(),
            settings: Settings::default(),
            audio,
            pending_save: None,
            last_auto_save: None,
            game_over: None,
            detached: false,
        }
    }

    /// Load preferences and look for a session to continue. Returns true
    /// when the continue prompt is showing.
    pub fn mount(&mut self, now: f64) -> bool {
        self.detached = false;
        let settings = self.storage.load_settings();
        self.apply_settings(settings);

        self.pending_save = self.storage.load_session(now, &self.state.config);
        if self.pending_save.is_some() {
            self.state.apply(SessionCommand::SaveFound);
            log::info!("Saved session found, offering to continue");
            return true;
        }
        false
    }

    /// Welcome screen -> running with a fresh session
    pub fn start(&mut self, now: f64) -> bool {
        if self.detached || !self.state.apply(SessionCommand::Start) {
            return false;
        }
        self.begin(now);
        log::info!("Game started");
        true
    }

    /// Continue prompt -> running with the saved session restored
    pub fn continue_saved(&mut self, now: f64) -> bool {
        if self.detached {
            return false;
        }
        let Some(save) = self.pending_save.take() else {
            return self.new_game(now);
        };
        if !self.state.apply(SessionCommand::Continue) {
            self.pending_save = Some(save);
            return false;
        }
        save.restore_into(&mut self.state, now);
        self.stats.start_session(&mut self.storage, now);
        self.last_auto_save = Some(now);
        self.game_over = None;
        true
    }

    /// Continue prompt -> running, discarding the save
    pub fn new_game(&mut self, now: f64) -> bool {
        if self.detached || !self.state.apply(SessionCommand::NewGame) {
            return false;
        }
        self.pending_save = None;
        self.begin(now);
        log::info!("Saved session discarded, new game started");
        true
    }

    fn begin(&mut self, now: f64) {
        self.state.reset(now);
        self.storage.clear_session();
        self.stats.start_session(&mut self.storage, now);
        self.last_auto_save = Some(now);
        self.game_over = None;
    }

    /// Any state -> welcome screen. An unfinished session is closed out
    /// first so its play time and score are not lost.
    pub fn restart(&mut self, now: f64) {
        if self.detached {
            return;
        }
        if self.stats.is_active() && !matches!(self.state.session, SessionState::GameOver) {
            self.finish(now);
        }
        self.state.apply(SessionCommand::Restart);
        self.state.reset(now);
        self.input.release_all();
        self.pending_save = None;
        self.game_over = None;
        log::info!("Game restarted");
    }

    /// Feed a `keydown`. One-shot commands are applied immediately.
    pub fn key_down(&mut self, key: &str, now: f64) -> KeyAction {
        if self.detached {
            return KeyAction::Ignored;
        }
        self.audio.resume();
        let started = self.state.session.has_started();
        let action = self.input.key_down(key, started);
        if let KeyAction::Command(cmd) = action {
            match cmd {
                KeyCommand::Start => {
                    self.start(now);
                }
                KeyCommand::Escape => {
                    self.state.apply(SessionCommand::Escape);
                }
                KeyCommand::ToggleHelp => {
                    self.state.apply(SessionCommand::ToggleHelp);
                }
                KeyCommand::Restart => self.restart(now),
            }
        }
        action
    }

    pub fn key_up(&mut self, key: &str) -> KeyAction {
        if self.detached {
            return KeyAction::Ignored;
        }
        self.input.key_up(key)
    }

    pub fn touch(&mut self, button: TouchButton, pressed: bool) {
        if self.detached {
            return;
        }
        self.audio.resume();
        self.input.touch(button, pressed);
    }

    /// Auto-pause when the page is hidden or loses focus
    pub fn pause(&mut self) -> bool {
        self.input.release_all();
        let paused = self.state.apply(SessionCommand::Pause);
        if paused {
            log::info!("Paused");
        }
        paused
    }

    pub fn resume(&mut self) -> bool {
        self.state.apply(SessionCommand::Resume)
    }

    /// Run one frame and route its events to statistics and audio
    pub fn frame(&mut self, now: f64) -> Vec<GameEvent> {
        if self.detached {
            return Vec::new();
        }
        let input = TickInput::from(&self.input);
        let events = tick(&mut self.state, &input, now);
        for event in &events {
            self.handle_event(event, now);
        }
        events
    }

    fn handle_event(&mut self, event: &GameEvent, now: f64) {
        match event {
            GameEvent::Destroyed {
                kill: Kill::Asteroid { .. },
                ..
            } => {
                self.stats
                    .increment(&mut self.storage, StatName::AsteroidsDestroyed, 1);
            }
            GameEvent::Destroyed {
                kill: Kill::Bug { .. },
                ..
            } => {
                self.stats.increment(&mut self.storage, StatName::BugsKilled, 1);
            }
            GameEvent::ResourceCollected => {
                self.stats
                    .increment(&mut self.storage, StatName::ResourcesCollected, 1);
            }
            GameEvent::StructureDeployed { .. } => {
                self.stats
                    .increment(&mut self.storage, StatName::StructuresDeployed, 1);
            }
            GameEvent::LevelUp { level } => {
                self.stats.record_level_reached(&mut self.storage, *level);
            }
            GameEvent::GameOver { .. } => self.finish(now),
            _ => {}
        }

        if let Some(effect) = SoundEffect::for_event(event) {
            self.audio.play(effect);
        }
    }

    /// Close the statistics session, submit the high score and offer the
    /// score to the leaderboard
    fn finish(&mut self, now: f64) {
        let score = self.state.score;
        let level = self.state.level.current;
        let new_high_score = self.storage.submit_high_score(score);
        let rank = self.stats.end_session(&mut self.storage, score, level, now);
        self.last_auto_save = None;
        self.game_over = Some(GameOverReport {
            score,
            level,
            new_high_score,
            rank,
        });
    }

    /// Periodic checkpoint. Saves only while running, once the player has
    /// something worth keeping, and no more often than the configured
    /// interval. Returns whether a save was written.
    pub fn auto_save(&mut self, now: f64) -> bool {
        if self.detached || !self.state.session.is_running() {
            return false;
        }
        if self.state.score == 0 && self.state.level.current <= 1 {
            return false;
        }
        let interval = self.state.config.persistence.auto_save_interval_ms;
        if self
            .last_auto_save
            .is_some_and(|last| now - last < interval)
        {
            return false;
        }
        self.save_now(now);
        true
    }

    /// Write the current session immediately
    pub fn save_now(&mut self, now: f64) {
        let save = SessionSave::capture(&self.state, now);
        self.storage.save_session(&save);
        self.last_auto_save = Some(now);
    }

    /// Host is going away: stop checkpointing and drop held input. A
    /// running session keeps its last save so it can be continued.
    pub fn teardown(&mut self, now: f64) {
        if self.detached {
            return;
        }
        if self.state.session.has_started()
            && !matches!(self.state.session, SessionState::GameOver)
            && (self.state.score > 0 || self.state.level.current > 1)
        {
            self.save_now(now);
        }
        self.last_auto_save = None;
        self.input.release_all();
        self.detached = true;
        log::info!("Session torn down");
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.state.on_resize(viewport);
    }

    pub fn game_over(&self) -> Option<GameOverReport> {
        self.game_over
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending_save.is_some()
    }

    pub fn high_score(&self) -> u64 {
        self.storage.high_score().max(self.state.score)
    }

    pub fn statistics(&self) -> LifetimeStats {
        self.storage.load_stats()
    }

    pub fn leaderboard(&self) -> Leaderboard {
        self.storage.load_leaderboard()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply and persist new preferences
    pub fn update_settings(&mut self, settings: Settings) {
        self.storage.save_settings(&settings);
        self.apply_settings(settings);
    }

    fn apply_settings(&mut self, settings: Settings) {
        self.state.effects = settings.effect_toggles();
        self.audio.set_volume(settings.effective_volume());
        self.settings = settings;
    }

    pub fn storage(&self) -> &GameStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut GameStorage {
        &mut self.storage
    }
}
