//! Per-frame input snapshot.
//!
//! The platform layer feeds raw key, button and pointer events between
//! frames; the context reads the snapshot during `update` and then ages it
//! with [`InputSnapshot::begin_frame`].

#![allow(missing_docs)]

use crate::geometry::Vec2;

/// Edge-aware state of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    /// Up, and was up last frame.
    #[default]
    Released,
    /// Went down this frame.
    Pressed,
    /// Down for more than one frame.
    Held,
    /// Went up this frame.
    JustReleased,
}

impl KeyState {
    /// Returns true for `Pressed` and `Held`.
    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, Self::Pressed | Self::Held)
    }

    /// State one frame later with no new event.
    #[must_use]
    pub const fn aged(self) -> Self {
        match self {
            Self::Pressed | Self::Held => Self::Held,
            Self::JustReleased | Self::Released => Self::Released,
        }
    }
}

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

impl MouseButton {
    /// Number of buttons tracked.
    pub const COUNT: usize = 3;

    const fn index(self) -> usize {
        self as usize
    }
}

/// Keyboard key. Values are stable, platform-agnostic identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape key.
    Escape,
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Space bar.
    Space,
    /// Alphabetic keys.
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    /// Number keys.
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,
    /// Function keys.
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
}

impl Key {
    /// Number of keys tracked.
    pub const COUNT: usize = Key::F12 as usize + 1;

    const fn index(self) -> usize {
        self as usize
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Control key is held.
    pub ctrl: bool,
    /// Alt key is held.
    pub alt: bool,
    /// Super/Command key is held.
    pub super_key: bool,
}

/// Input state for the current frame.
#[derive(Debug, Clone)]
pub struct InputSnapshot {
    keys: [KeyState; Key::COUNT],
    buttons: [KeyState; MouseButton::COUNT],
    mouse_position: Vec2,
    mouse_delta: Vec2,
    scroll_delta: Vec2,
    /// Button-down edges since `begin_frame`, so a press and release
    /// between two updates still counts.
    presses: [u8; MouseButton::COUNT],
    /// Modifier keys state.
    pub modifiers: Modifiers,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            keys: [KeyState::Released; Key::COUNT],
            buttons: [KeyState::Released; MouseButton::COUNT],
            mouse_position: Vec2::ZERO,
            mouse_delta: Vec2::ZERO,
            scroll_delta: Vec2::ZERO,
            presses: [0; MouseButton::COUNT],
            modifiers: Modifiers::default(),
        }
    }
}

impl InputSnapshot {
    /// Creates a new empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a new frame: edges become levels and per-frame deltas reset.
    pub fn begin_frame(&mut self) {
        for state in self.keys.iter_mut().chain(self.buttons.iter_mut()) {
            *state = state.aged();
        }
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
        self.presses = [0; MouseButton::COUNT];
    }

    /// Records a key press. Repeats while held are ignored.
    pub fn press_key(&mut self, key: Key) {
        let state = &mut self.keys[key.index()];
        if !state.is_down() {
            *state = KeyState::Pressed;
        }
    }

    /// Records a key release.
    pub fn release_key(&mut self, key: Key) {
        let state = &mut self.keys[key.index()];
        if state.is_down() {
            *state = KeyState::JustReleased;
        }
    }

    /// Records a mouse button press.
    pub fn press_button(&mut self, button: MouseButton) {
        let state = &mut self.buttons[button.index()];
        if !state.is_down() {
            *state = KeyState::Pressed;
            let presses = &mut self.presses[button.index()];
            *presses = presses.saturating_add(1);
        }
    }

    /// Records a mouse button release.
    pub fn release_button(&mut self, button: MouseButton) {
        let state = &mut self.buttons[button.index()];
        if state.is_down() {
            *state = KeyState::JustReleased;
        }
    }

    /// Moves the pointer; the movement accumulates into this frame's delta.
    /// Non-finite coordinates are ignored.
    pub fn set_mouse_position(&mut self, position: Vec2) {
        if !position.is_finite() {
            return;
        }
        self.mouse_delta = self.mouse_delta + (position - self.mouse_position);
        self.mouse_position = position;
    }

    /// Records scroll input.
    pub fn scroll(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.scroll_delta = self.scroll_delta + Vec2::new(dx, dy);
        }
    }

    #[must_use]
    pub fn key_state(&self, key: Key) -> KeyState {
        self.keys[key.index()]
    }

    /// Returns true if the key went down this frame.
    #[must_use]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.key_state(key) == KeyState::Pressed
    }

    /// Returns true while the key is down.
    #[must_use]
    pub fn key_down(&self, key: Key) -> bool {
        self.key_state(key).is_down()
    }

    /// Returns true if the key went up this frame.
    #[must_use]
    pub fn key_released(&self, key: Key) -> bool {
        self.key_state(key) == KeyState::JustReleased
    }

    #[must_use]
    pub fn button_state(&self, button: MouseButton) -> KeyState {
        self.buttons[button.index()]
    }

    /// Returns true if the button went down this frame.
    #[must_use]
    pub fn mouse_clicked(&self, button: MouseButton) -> bool {
        self.button_state(button) == KeyState::Pressed
    }

    /// Times the button went down since `begin_frame`, including presses
    /// already released again.
    #[must_use]
    pub fn press_count(&self, button: MouseButton) -> u32 {
        u32::from(self.presses[button.index()])
    }

    /// Returns true while the button is down.
    #[must_use]
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.button_state(button).is_down()
    }

    /// Returns true if the button went up this frame.
    #[must_use]
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.button_state(button) == KeyState::JustReleased
    }

    #[must_use]
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Pointer movement since the last `begin_frame`.
    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    #[must_use]
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_click() {
        let mut input = InputSnapshot::new();

        input.press_button(MouseButton::Left);
        assert!(input.mouse_clicked(MouseButton::Left));
        assert!(input.mouse_down(MouseButton::Left));

        input.begin_frame();
        assert!(!input.mouse_clicked(MouseButton::Left));
        assert_eq!(input.button_state(MouseButton::Left), KeyState::Held);

        input.release_button(MouseButton::Left);
        assert!(input.mouse_released(MouseButton::Left));
        assert!(!input.mouse_down(MouseButton::Left));

        input.begin_frame();
        assert_eq!(input.button_state(MouseButton::Left), KeyState::Released);
    }

    #[test]
    fn test_press_edges_survive_release_in_same_frame() {
        let mut input = InputSnapshot::new();

        input.press_button(MouseButton::Left);
        input.release_button(MouseButton::Left);
        assert!(!input.mouse_clicked(MouseButton::Left));
        assert!(input.mouse_released(MouseButton::Left));
        assert_eq!(input.press_count(MouseButton::Left), 1);
        assert_eq!(input.press_count(MouseButton::Right), 0);

        input.press_button(MouseButton::Left);
        input.press_button(MouseButton::Left);
        assert_eq!(input.press_count(MouseButton::Left), 2);

        input.begin_frame();
        assert_eq!(input.press_count(MouseButton::Left), 0);
    }

    #[test]
    fn test_key_repeat_is_ignored() {
        let mut input = InputSnapshot::new();
        input.press_key(Key::A);
        input.begin_frame();
        input.press_key(Key::A);
        assert_eq!(input.key_state(Key::A), KeyState::Held);
        input.release_key(Key::Z);
        assert_eq!(input.key_state(Key::Z), KeyState::Released);
    }

    #[test]
    fn test_mouse_delta_accumulates_per_frame() {
        let mut input = InputSnapshot::new();
        input.set_mouse_position(Vec2::new(10.0, 5.0));
        input.set_mouse_position(Vec2::new(15.0, 5.0));
        assert_eq!(input.mouse_delta(), Vec2::new(15.0, 5.0));

        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        input.set_mouse_position(Vec2::new(f32::NAN, 0.0));
        assert_eq!(input.mouse_position(), Vec2::new(15.0, 5.0));
    }

    #[test]
    fn test_key_indices_are_distinct() {
        assert_eq!(Key::COUNT, 62);
        assert_eq!(Key::Escape.index(), 0);
        assert_eq!(Key::F12.index(), Key::COUNT - 1);
    }
}
