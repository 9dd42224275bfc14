//! Keyboard Input Module
//!
//! Held-key tracking for the fixed key set gameplay reads. Decoupled from
//! winit; the optional `winit` feature provides the code mapping.

use std::collections::HashSet;

/// Generic key codes, independent of the windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Movement keys
    W,
    A,
    S,
    D,
    Space,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,

    // Other gameplay keys
    E,
    Q,
    Escape,
    Tab,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Movement intent derived from held keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    /// W - move forward
    pub forward: bool,
    /// S - move backward
    pub backward: bool,
    /// A - strafe left
    pub left: bool,
    /// D - strafe right
    pub right: bool,
    /// Space - jump
    pub jump: bool,
    /// Shift - run
    pub sprint: bool,
}

impl MovementKeys {
    pub fn any_pressed(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.jump
    }
}

/// Set of keys currently held down.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press or release. Returns `true` if the held state changed.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if key == KeyCode::Unknown {
            return false;
        }
        if pressed {
            self.held.insert(key)
        } else {
            self.held.remove(&key)
        }
    }

    #[inline]
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Either shift key.
    pub fn shift_held(&self) -> bool {
        self.is_held(KeyCode::ShiftLeft) || self.is_held(KeyCode::ShiftRight)
    }

    pub fn movement(&self) -> MovementKeys {
        MovementKeys {
            forward: self.is_held(KeyCode::W),
            backward: self.is_held(KeyCode::S),
            left: self.is_held(KeyCode::A),
            right: self.is_held(KeyCode::D),
            jump: self.is_held(KeyCode::Space),
            sprint: self.shift_held(),
        }
    }

    /// Release everything (focus loss).
    pub fn reset(&mut self) {
        self.held.clear();
    }
}

#[cfg(feature = "winit")]
impl From<winit::keyboard::KeyCode> for KeyCode {
    fn from(code: winit::keyboard::KeyCode) -> Self {
        use winit::keyboard::KeyCode as W;
        match code {
            W::KeyW => KeyCode::W,
            W::KeyA => KeyCode::A,
            W::KeyS => KeyCode::S,
            W::KeyD => KeyCode::D,
            W::Space => KeyCode::Space,
            W::ShiftLeft => KeyCode::ShiftLeft,
            W::ShiftRight => KeyCode::ShiftRight,
            W::ControlLeft => KeyCode::ControlLeft,
            W::ControlRight => KeyCode::ControlRight,
            W::KeyE => KeyCode::E,
            W::KeyQ => KeyCode::Q,
            W::Escape => KeyCode::Escape,
            W::Tab => KeyCode::Tab,
            _ => KeyCode::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut keyboard = KeyboardState::new();
        assert!(keyboard.handle_key(KeyCode::W, true));
        assert!(!keyboard.handle_key(KeyCode::W, true));
        assert!(keyboard.is_held(KeyCode::W));
        assert!(keyboard.movement().forward);
        assert!(keyboard.handle_key(KeyCode::W, false));
        assert!(!keyboard.movement().any_pressed());
    }

    #[test]
    fn either_shift_sprints() {
        let mut keyboard = KeyboardState::new();
        keyboard.handle_key(KeyCode::ShiftRight, true);
        assert!(keyboard.movement().sprint);
        keyboard.reset();
        assert!(!keyboard.shift_held());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut keyboard = KeyboardState::new();
        assert!(!keyboard.handle_key(KeyCode::Unknown, true));
        assert!(!keyboard.is_held(KeyCode::Unknown));
    }
}
