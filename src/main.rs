//! Space Dev entry point
//!
//! Browser: binds a `GameSession` to the page (DOM HUD, keyboard and touch
//! input, auto-save). Native: runs a headless autopilot game and logs the
//! result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Event, EventTarget, KeyboardEvent};

    use space_dev::audio::WebAudio;
    use space_dev::config::GameConfig;
    use space_dev::highscores::format_relative;
    use space_dev::persistence::{GameStorage, KeyValueStore, LocalStore, MemoryStore};
    use space_dev::platform::{KeyAction, TouchButton, Viewport, now_ms};
    use space_dev::sim::{SessionState, StructureKind};
    use space_dev::GameSession;

    /// An event listener registered on the page, kept so it can be removed
    struct Listener {
        target: EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    }

    /// Page-level state shared by every callback
    struct Host {
        session: GameSession,
        listeners: Vec<Listener>,
        auto_save: Option<(i32, Closure<dyn FnMut()>)>,
        /// Overlay shown on the previous frame; the leaderboard is only
        /// re-read from storage when it changes
        shown: Option<SessionState>,
    }

    type Shared = Rc<RefCell<Host>>;

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn viewport() -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::new(0.0, 0.0);
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Viewport::new(width as f32, height as f32)
    }

    /// Tuning overrides from `<script id="game-config" type="application/json">`
    fn page_config(document: Option<&Document>) -> GameConfig {
        document
            .and_then(|d| d.get_element_by_id("game-config"))
            .and_then(|el| el.text_content())
            .map(|json| GameConfig::from_json(&json))
            .unwrap_or_default()
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    impl Host {
        /// Update HUD elements and overlays in the DOM
        fn update_hud(&mut self) {
            let Some(document) = document() else { return };
            let now = now_ms();
            let state = &self.session.state;

            set_text(&document, "hud-score", &state.score.to_string());
            set_text(&document, "hud-lives", &state.rocket.lives.to_string());
            set_text(&document, "hud-level", &state.level.current.to_string());
            set_text(
                &document,
                "hud-resources",
                &format!(
                    "{}/{}",
                    state.resources.collected, state.resources.next_deploy_at
                ),
            );
            set_text(
                &document,
                "hud-structures",
                &format!(
                    "{} satellites, {} stations",
                    state.resources.count(StructureKind::Satellite),
                    state.resources.count(StructureKind::Station)
                ),
            );
            set_text(&document, "hud-high", &self.session.high_score().to_string());

            if let Some(bar) = document.get_element_by_id("hud-laser") {
                let charge = state.laser_cooldown.progress(now) * 100.0;
                let _ = bar.set_attribute("style", &format!("width: {charge:.0}%"));
            }

            let notices: Vec<&str> = state
                .visible_notifications()
                .iter()
                .map(|n| n.message.as_str())
                .collect();
            set_text(&document, "notifications", &notices.join("\n"));

            let session = state.session;
            set_visible(&document, "welcome", session == SessionState::NotStarted);
            set_visible(
                &document,
                "continue-prompt",
                session == SessionState::ContinuePrompt,
            );
            set_visible(&document, "hud", session.has_started());
            set_visible(&document, "pause-menu", session == SessionState::Paused);
            set_visible(
                &document,
                "help-overlay",
                matches!(session, SessionState::Help { .. }),
            );
            set_visible(&document, "game-over", session == SessionState::GameOver);
            set_visible(&document, "damage-flash", state.is_flashing(now));

            if let Some(report) = self.session.game_over() {
                set_text(&document, "final-score", &report.score.to_string());
                set_text(&document, "final-level", &report.level.to_string());
                let rank = report
                    .rank
                    .map(|r| format!("#{r}"))
                    .unwrap_or_else(|| "-".to_string());
                set_text(&document, "final-rank", &rank);
                set_visible(&document, "new-high-score", report.new_high_score);
            }

            if self.shown != Some(session) {
                self.shown = Some(session);
                self.render_leaderboard(&document, now);
            }
        }

        /// Leaderboard rows plus, when paused, where the current score
        /// would place
        fn render_leaderboard(&self, document: &Document, now: f64) {
            let board = self.session.leaderboard();
            let rows: Vec<String> = board
                .entries
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    format!(
                        "#{} {} (level {}) {}",
                        i + 1,
                        e.score,
                        e.level,
                        format_relative(e.timestamp, now)
                    )
                })
                .collect();
            set_text(document, "leaderboard-list", &rows.join("\n"));

            let best = board
                .top_score()
                .map(|s| format!("Best: {s}"))
                .unwrap_or_default();
            set_text(document, "leaderboard-best", &best);

            let state = &self.session.state;
            let standing = match (state.session, board.potential_rank(state.score)) {
                (SessionState::Paused, Some(rank)) => format!("Currently #{rank}"),
                _ => String::new(),
            };
            set_text(document, "pause-rank", &standing);
        }
    }

    /// Register `handler` for `event` on `target` and keep it for `detach`
    fn listen(
        host: &Shared,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        if target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("Could not listen for {event}");
            return;
        }
        host.borrow_mut().listeners.push(Listener {
            target: target.clone(),
            event,
            callback,
        });
    }

    /// Hide the game, remove every listener and stop checkpointing. The
    /// session keeps its last save.
    fn detach(host: &Shared) {
        stop_auto_save(host);
        let listeners = std::mem::take(&mut host.borrow_mut().listeners);
        for l in &listeners {
            let _ = l
                .target
                .remove_event_listener_with_callback(l.event, l.callback.as_ref().unchecked_ref());
        }
        host.borrow_mut().session.teardown(now_ms());
        if let Some(document) = document() {
            set_visible(&document, "game-root", false);
        }
        log::info!("Detached {} listeners", listeners.len());
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Space Dev starting...");

        let store: Box<dyn KeyValueStore> = match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e} - progress will not be kept");
                Box::new(MemoryStore::new())
            }
        };

        let now = now_ms();
        let mut session = GameSession::new(
            now as u64,
            page_config(document().as_ref()),
            viewport(),
            GameStorage::new(store),
            Box::new(WebAudio::new()),
        );
        session.mount(now);

        let host = Rc::new(RefCell::new(Host {
            session,
            listeners: Vec::new(),
            auto_save: None,
            shown: None,
        }));

        setup_keyboard(&host);
        setup_touch_buttons(&host);
        setup_menu_buttons(&host);
        setup_window_events(&host);
        start_auto_save(&host);

        host.borrow_mut().update_hud();
        request_animation_frame(host);

        log::info!("Space Dev running!");
    }

    fn setup_keyboard(host: &Shared) {
        let Some(window) = web_sys::window() else { return };

        let h = host.clone();
        listen(host, &window, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else { return };
            let action = h.borrow_mut().session.key_down(&event.key(), now_ms());
            if action != KeyAction::Ignored {
                event.prevent_default();
            }
        });

        let h = host.clone();
        listen(host, &window, "keyup", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else { return };
            if h.borrow_mut().session.key_up(&event.key()) != KeyAction::Ignored {
                event.prevent_default();
            }
        });
    }

    /// Press-and-hold buttons for mobile; mouse events cover desktop testing
    fn setup_touch_buttons(host: &Shared) {
        let Some(document) = document() else { return };

        for (id, button) in [
            ("btn-left", TouchButton::Left),
            ("btn-fire", TouchButton::Fire),
            ("btn-right", TouchButton::Right),
        ] {
            let Some(el) = document.get_element_by_id(id) else {
                continue;
            };
            for (event_name, pressed) in [("touchstart", true), ("touchend", false)] {
                let h = host.clone();
                listen(host, &el, event_name, move |event| {
                    event.prevent_default();
                    h.borrow_mut().session.touch(button, pressed);
                });
            }
            for (event_name, pressed) in [("mousedown", true), ("mouseup", false)] {
                let h = host.clone();
                listen(host, &el, event_name, move |_event| {
                    h.borrow_mut().session.touch(button, pressed);
                });
            }
        }
    }

    fn on_click(document: &Document, id: &str, host: &Shared, action: fn(&mut Host, f64)) {
        let Some(btn) = document.get_element_by_id(id) else {
            return;
        };
        let h = host.clone();
        listen(host, &btn, "click", move |_event| {
            let mut h = h.borrow_mut();
            action(&mut *h, now_ms());
            h.update_hud();
        });
    }

    fn setup_menu_buttons(host: &Shared) {
        let Some(document) = document() else { return };

        on_click(&document, "start-btn", host, |h, now| {
            h.session.start(now);
        });
        on_click(&document, "continue-btn", host, |h, now| {
            h.session.continue_saved(now);
        });
        on_click(&document, "new-game-btn", host, |h, now| {
            h.session.new_game(now);
        });
        on_click(&document, "resume-btn", host, |h, _| {
            h.session.resume();
        });
        on_click(&document, "restart-btn", host, |h, now| h.session.restart(now));
    }

    fn setup_window_events(host: &Shared) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Resize rescales everything in place
        let h = host.clone();
        listen(host, &window, "resize", move |_event| {
            h.borrow_mut().session.resize(viewport());
        });

        // Visibility change (tab switch, minimize)
        let h = host.clone();
        let doc = document.clone();
        listen(host, &document, "visibilitychange", move |_event| {
            if doc.visibility_state() == web_sys::VisibilityState::Hidden
                && h.borrow_mut().session.pause()
            {
                log::info!("Auto-paused (tab hidden)");
            }
        });

        // Window blur (click outside)
        let h = host.clone();
        listen(host, &window, "blur", move |_event| {
            if h.borrow_mut().session.pause() {
                log::info!("Auto-paused (window blur)");
            }
        });

        // Leaving the page
        let h = host.clone();
        listen(host, &window, "pagehide", move |_event| detach(&h));
    }

    fn start_auto_save(host: &Shared) {
        let Some(window) = web_sys::window() else { return };
        let interval = host
            .borrow()
            .session
            .state
            .config
            .persistence
            .auto_save_interval_ms;

        let callback_host = host.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            callback_host.borrow_mut().session.auto_save(now_ms());
        });
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            interval as i32,
        ) {
            Ok(handle) => host.borrow_mut().auto_save = Some((handle, closure)),
            Err(_) => log::warn!("Auto-save interval could not be started"),
        }
    }

    fn stop_auto_save(host: &Shared) {
        let auto_save = host.borrow_mut().auto_save.take();
        if let (Some(window), Some((handle, _closure))) = (web_sys::window(), auto_save) {
            window.clear_interval_with_handle(handle);
        }
    }

    fn request_animation_frame(host: Shared) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(host);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Shared) {
        {
            let mut h = host.borrow_mut();
            if h.session.is_detached() {
                log::info!("Game loop stopped");
                return;
            }
            // Simulation runs on wall-clock time so saves and cooldowns agree
            h.session.frame(now_ms());
            h.update_hud();
        }

        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Space Dev (native) starting...");
    log::info!("Native mode runs a headless autopilot - build for wasm32 to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    // Optional tuning file, e.g. SPACE_DEV_CONFIG=hard.json
    let config = std::env::var("SPACE_DEV_CONFIG")
        .ok()
        .and_then(|path| match std::fs::read_to_string(&path) {
            Ok(json) => Some(space_dev::GameConfig::from_json(&json)),
            Err(e) => {
                log::warn!("Could not read {path}: {e}");
                None
            }
        })
        .unwrap_or_default();
    autopilot::run(seed, config);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use space_dev::audio::NullAudio;
    use space_dev::config::GameConfig;
    use space_dev::platform::Viewport;
    use space_dev::sim::SessionState;
    use space_dev::{GameSession, GameStorage};

    /// 60 fps in wall-clock milliseconds
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Ten minutes of play at most
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Play one game with simple steering: chase the lowest hostile, fire
    /// constantly, sweep the laser when the screen gets crowded.
    pub fn run(seed: u64, config: GameConfig) {
        let mut session = GameSession::new(
            seed,
            config,
            Viewport::new(1280.0, 720.0),
            GameStorage::in_memory(),
            Box::new(NullAudio),
        );

        let mut now = 1_000_000.0;
        session.mount(now);
        session.start(now);

        let mut frames = 0;
        while frames < MAX_FRAMES && session.state.session == SessionState::Running {
            steer(&mut session);
            session.frame(now);
            session.auto_save(now);
            now += FRAME_MS;
            frames += 1;
        }

        let state = &session.state;
        log::info!(
            "Autopilot finished after {:.1}s: score {}, level {}, lives {}, {} structures",
            f64::from(frames) * FRAME_MS / 1000.0,
            state.score,
            state.level.current,
            state.rocket.lives,
            state.resources.structures.len()
        );
        if let Some(report) = session.game_over() {
            log::info!("Game over, leaderboard rank {:?}", report.rank);
        } else {
            session.teardown(now);
        }
        let stats = session.statistics();
        log::info!(
            "Stats: {} bugs, {} asteroids, {} resources, {} structures",
            stats.total_bugs_killed,
            stats.total_asteroids_destroyed,
            stats.total_resources_collected,
            stats.total_structures_deployed
        );
    }

    fn steer(session: &mut GameSession) {
        let state = &session.state;
        let rocket_x = state.rocket.center().x;
        let target = state
            .hostiles
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|h| h.pos.x);
        let crowded = state.hostiles.len() >= 6;

        let input = &mut session.input;
        input.fire = true;
        input.laser = crowded;
        input.left = target.is_some_and(|x| x < rocket_x - 5.0);
        input.right = target.is_some_and(|x| x > rocket_x + 5.0);
    }
}
