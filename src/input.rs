//! Device input normalization
//!
//! Pointer, touch and keyboard events are folded into an [`InputState`],
//! which yields one device-agnostic [`ControlSignal`] per simulation frame.

use crate::consts::MOVE_SPEED;
use crate::settings::{InputMode, Settings};
use crate::sim::ControlSignal;

/// A tap shorter than this fires instead of steering
pub const TAP_MAX_MILLIS: f64 = 200.0;
/// A tap that drifted further than this is a drag
pub const TAP_MAX_TRAVEL: f32 = 20.0;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Fire,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Fire),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TouchDrag {
    origin_x: f32,
    current_x: f32,
    started_at: f64,
}

/// Raw device state accumulated between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last pointer position in logical screen pixels
    pointer_x: Option<f32>,
    touch: Option<TouchDrag>,
    left: bool,
    right: bool,
    fire_held: bool,
    /// One-shot fire from a click or tap, consumed by the next frame
    fire_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything (new session)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn pointer_moved(&mut self, x: f32) {
        self.pointer_x = Some(x);
    }

    pub fn clicked(&mut self) {
        self.fire_pending = true;
    }

    pub fn touch_started(&mut self, x: f32, now_ms: f64) {
        self.touch = Some(TouchDrag {
            origin_x: x,
            current_x: x,
            started_at: now_ms,
        });
    }

    pub fn touch_moved(&mut self, x: f32) {
        if let Some(drag) = &mut self.touch {
            drag.current_x = x;
        }
    }

    /// End the drag; a quick short touch counts as a tap and fires
    pub fn touch_ended(&mut self, now_ms: f64) {
        let Some(drag) = self.touch.take() else {
            return;
        };
        let quick = now_ms - drag.started_at < TAP_MAX_MILLIS;
        let short = (drag.current_x - drag.origin_x).abs() < TAP_MAX_TRAVEL;
        if quick && short {
            self.fire_pending = true;
        }
    }

    pub fn key_down(&mut self, key: Key) {
        self.set_key(key, true);
    }

    pub fn key_up(&mut self, key: Key) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: Key, down: bool) {
        match key {
            Key::Left => self.left = down,
            Key::Right => self.right = down,
            Key::Fire => self.fire_held = down,
        }
    }

    /// Held direction keys as an intent, if any
    fn key_intent(&self) -> Option<f32> {
        if self.left {
            Some(-1.0)
        } else if self.right {
            Some(1.0)
        } else {
            None
        }
    }

    /// Pointer offset from the player's center, scaled to an intent
    fn pointer_intent(&self, player_center_x: f32, settings: &Settings) -> f32 {
        let Some(x) = self.pointer_x else {
            return 0.0;
        };
        let offset = x - player_center_x;
        if offset.abs() <= settings.pointer_dead_zone {
            return 0.0;
        }
        speed_to_intent(offset * settings.pointer_gain)
    }

    /// Drag distance from the touch origin, scaled to an intent
    fn touch_intent(&self, settings: &Settings) -> f32 {
        match self.touch {
            Some(drag) => speed_to_intent((drag.current_x - drag.origin_x) * settings.touch_sensitivity),
            None => 0.0,
        }
    }

    /// Build this frame's control signal. Consumes a pending click or tap.
    pub fn control(&mut self, player_center_x: f32, settings: &Settings) -> ControlSignal {
        let horizontal = match settings.input_mode {
            InputMode::Pointer => self
                .key_intent()
                .unwrap_or_else(|| self.pointer_intent(player_center_x, settings)),
            InputMode::Touch => self.touch_intent(settings),
            InputMode::Keyboard => self.key_intent().unwrap_or(0.0),
        };
        let fire = self.fire_held || std::mem::take(&mut self.fire_pending);
        ControlSignal { horizontal, fire }
    }
}

/// Clamp a px/frame speed to the player's range and express it as [-1, 1]
fn speed_to_intent(speed: f32) -> f32 {
    speed.clamp(-MOVE_SPEED, MOVE_SPEED) / MOVE_SPEED
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(mode: InputMode) -> Settings {
        Settings {
            input_mode: mode,
            ..Settings::default()
        }
    }

    #[test]
    fn test_pointer_dead_zone() {
        let settings = settings(InputMode::Pointer);
        let mut input = InputState::new();
        input.pointer_moved(104.0);
        assert_eq!(input.control(100.0, &settings).horizontal, 0.0);

        input.pointer_moved(115.0);
        let signal = input.control(100.0, &settings);
        assert!((signal.horizontal - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_saturates() {
        let settings = settings(InputMode::Pointer);
        let mut input = InputState::new();
        input.pointer_moved(0.0);
        assert_eq!(input.control(400.0, &settings).horizontal, -1.0);
    }

    #[test]
    fn test_keys_override_pointer() {
        let settings = settings(InputMode::Pointer);
        let mut input = InputState::new();
        input.pointer_moved(400.0);
        input.key_down(Key::Left);
        assert_eq!(input.control(100.0, &settings).horizontal, -1.0);
        input.key_up(Key::Left);
        assert_eq!(input.control(100.0, &settings).horizontal, 1.0);
    }

    #[test]
    fn test_keyboard_mode_ignores_pointer() {
        let settings = settings(InputMode::Keyboard);
        let mut input = InputState::new();
        input.pointer_moved(400.0);
        assert_eq!(input.control(100.0, &settings).horizontal, 0.0);
        input.key_down(Key::from_dom("d").unwrap());
        assert_eq!(input.control(100.0, &settings).horizontal, 1.0);
    }

    #[test]
    fn test_touch_drag_steers() {
        let settings = settings(InputMode::Touch);
        let mut input = InputState::new();
        input.touch_started(200.0, 0.0);
        input.touch_moved(275.0);
        let signal = input.control(0.0, &settings);
        assert!((signal.horizontal - 0.5).abs() < 1e-6);
        assert!(!signal.fire);

        input.touch_ended(1_000.0);
        assert_eq!(input.control(0.0, &settings).horizontal, 0.0);
        assert!(!input.control(0.0, &settings).fire);
    }

    #[test]
    fn test_quick_tap_fires_once() {
        let settings = settings(InputMode::Touch);
        let mut input = InputState::new();
        input.touch_started(200.0, 1_000.0);
        input.touch_moved(210.0);
        input.touch_ended(1_150.0);
        assert!(input.control(0.0, &settings).fire);
        assert!(!input.control(0.0, &settings).fire);
    }

    #[test]
    fn test_slow_or_long_touch_does_not_fire() {
        let settings = settings(InputMode::Touch);
        let mut input = InputState::new();
        input.touch_started(200.0, 0.0);
        input.touch_ended(TAP_MAX_MILLIS);
        assert!(!input.control(0.0, &settings).fire);

        input.touch_started(200.0, 0.0);
        input.touch_moved(230.0);
        input.touch_ended(50.0);
        assert!(!input.control(0.0, &settings).fire);
    }

    #[test]
    fn test_space_held_and_click() {
        let settings = settings(InputMode::Pointer);
        let mut input = InputState::new();
        input.key_down(Key::Fire);
        assert!(input.control(0.0, &settings).fire);
        assert!(input.control(0.0, &settings).fire);
        input.key_up(Key::Fire);
        assert!(!input.control(0.0, &settings).fire);

        input.clicked();
        assert!(input.control(0.0, &settings).fire);
        assert!(!input.control(0.0, &settings).fire);
    }

    #[test]
    fn test_unknown_keys() {
        assert_eq!(Key::from_dom("Escape"), None);
        assert_eq!(Key::from_dom(" "), Some(Key::Fire));
        assert_eq!(Key::from_dom("ArrowLeft"), Some(Key::Left));
    }
}
