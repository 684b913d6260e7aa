//! Platform abstraction layer
//!
//! Keeps browser specifics out of the simulation:
//! - Viewport size (injected instead of read from the window)
//! - Key/touch events mapped to held input flags
//! - Wall-clock time

use serde::{Deserialize, Serialize};

/// Visible play area in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Narrow screens spawn slower and move slower
    pub fn is_mobile(&self, breakpoint: f32) -> bool {
        self.width < breakpoint
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Held input flags, shared by keyboard and touch buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub laser: bool,
}

/// One-shot commands produced by key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Start from the welcome screen (space)
    Start,
    /// Escape: close help, otherwise toggle pause
    Escape,
    /// `?` or `/`
    ToggleHelp,
    /// `R`
    Restart,
}

/// Result of feeding a key event through the mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Command(KeyCommand),
    /// A held flag changed
    Held,
    Ignored,
}

/// Touch/mouse press-and-hold buttons on mobile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    Left,
    Fire,
    Right,
}

impl InputState {
    /// Handle a `keydown`. `started` is false while the welcome screen is up.
    pub fn key_down(&mut self, key: &str, started: bool) -> KeyAction {
        let is_space = key == " " || key == "Spacebar";
        if !started && is_space {
            return KeyAction::Command(KeyCommand::Start);
        }
        match key {
            "?" | "/" if started => return KeyAction::Command(KeyCommand::ToggleHelp),
            "Escape" => return KeyAction::Command(KeyCommand::Escape),
            "r" | "R" => return KeyAction::Command(KeyCommand::Restart),
            _ => {}
        }
        self.set_key(key, true)
    }

    /// Handle a `keyup`
    pub fn key_up(&mut self, key: &str) -> KeyAction {
        self.set_key(key, false)
    }

    fn set_key(&mut self, key: &str, down: bool) -> KeyAction {
        match key {
            "ArrowLeft" | "a" | "A" => self.left = down,
            "ArrowRight" | "d" | "D" => self.right = down,
            " " | "Spacebar" => self.fire = down,
            "b" | "B" => self.laser = down,
            _ => return KeyAction::Ignored,
        }
        KeyAction::Held
    }

    /// Touch buttons map 1:1 onto the keyboard flags
    pub fn touch(&mut self, button: TouchButton, pressed: bool) {
        match button {
            TouchButton::Left => self.left = pressed,
            TouchButton::Fire => self.fire = pressed,
            TouchButton::Right => self.right = pressed,
        }
    }

    /// Drop all held flags (on blur or teardown)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_starts_then_fires() {
        let mut input = InputState::default();
        assert_eq!(
            input.key_down(" ", false),
            KeyAction::Command(KeyCommand::Start)
        );
        assert!(!input.fire);

        assert_eq!(input.key_down(" ", true), KeyAction::Held);
        assert!(input.fire);
        input.key_up(" ");
        assert!(!input.fire);
    }

    #[test]
    fn test_help_only_after_start() {
        let mut input = InputState::default();
        assert_eq!(input.key_down("?", false), KeyAction::Ignored);
        assert_eq!(
            input.key_down("/", true),
            KeyAction::Command(KeyCommand::ToggleHelp)
        );
    }

    #[test]
    fn test_movement_keys_and_touch_share_flags() {
        let mut input = InputState::default();
        input.key_down("a", true);
        input.key_down("ArrowRight", true);
        assert!(input.left && input.right);

        input.key_up("A");
        assert!(!input.left);

        input.touch(TouchButton::Left, true);
        assert!(input.left);
        input.release_all();
        assert_eq!(input, InputState::default());
    }

    #[test]
    fn test_mobile_breakpoint() {
        assert!(Viewport::new(767.0, 900.0).is_mobile(768.0));
        assert!(!Viewport::new(768.0, 900.0).is_mobile(768.0));
    }
}
