//! FPS-style Mouse State Tracker
//!
//! Tracks captured mouse input: raw motion accumulates until reset, and
//! button presses are recorded as edges that last until the end of the
//! frame.

use glam::Vec2;

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Additional mouse buttons (button 4, 5, etc.)
    Other(u16),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ButtonFlags {
    left: bool,
    middle: bool,
    right: bool,
}

impl ButtonFlags {
    fn slot(&mut self, button: MouseButton) -> Option<&mut bool> {
        match button {
            MouseButton::Left => Some(&mut self.left),
            MouseButton::Middle => Some(&mut self.middle),
            MouseButton::Right => Some(&mut self.right),
            MouseButton::Other(_) => None,
        }
    }

    fn get(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Middle => self.middle,
            MouseButton::Right => self.right,
            MouseButton::Other(_) => false,
        }
    }
}

/// Captured-cursor mouse state with delta accumulation and press edges.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    /// Accumulated motion since the last reset.
    delta: Vec2,
    /// Whether the cursor is captured (hidden and confined).
    captured: bool,
    held: ButtonFlags,
    /// Buttons that went down since the last `end_frame`.
    pressed: ButtonFlags,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate raw mouse motion. Call from the event loop.
    #[inline]
    pub fn accumulate_delta(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() && dy.is_finite() {
            self.delta += Vec2::new(dx, dy);
        }
    }

    /// Accumulated delta without consuming it.
    #[inline]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Return the accumulated delta and reset it to zero.
    #[inline]
    pub fn consume_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.delta)
    }

    #[inline]
    pub fn reset_delta(&mut self) {
        self.delta = Vec2::ZERO;
    }

    /// Record a button transition. A press while already held is not a new edge.
    pub fn set_button(&mut self, button: MouseButton, down: bool) {
        let was_down = self.held.get(button);
        if let Some(slot) = self.held.slot(button) {
            *slot = down;
        }
        if down && !was_down {
            if let Some(slot) = self.pressed.slot(button) {
                *slot = true;
            }
        }
    }

    #[inline]
    pub fn is_held(&self, button: MouseButton) -> bool {
        self.held.get(button)
    }

    /// Whether `button` went down this frame.
    #[inline]
    pub fn was_pressed(&self, button: MouseButton) -> bool {
        self.pressed.get(button)
    }

    /// Mark the cursor captured or released. Releasing drops pending motion
    /// so recapturing does not jump the view.
    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
        if !captured {
            self.delta = Vec2::ZERO;
        }
    }

    #[inline]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Clear per-frame press edges.
    pub fn end_frame(&mut self) {
        self.pressed = ButtonFlags::default();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(feature = "winit")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Back => MouseButton::Other(4),
            winit::event::MouseButton::Forward => MouseButton::Other(5),
            winit::event::MouseButton::Other(n) => MouseButton::Other(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_and_consume() {
        let mut state = MouseState::new();
        state.accumulate_delta(10.0, 5.0);
        state.accumulate_delta(3.0, -2.0);
        assert_eq!(state.delta(), Vec2::new(13.0, 3.0));
        assert_eq!(state.consume_delta(), Vec2::new(13.0, 3.0));
        assert_eq!(state.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_press_is_an_edge() {
        let mut state = MouseState::new();
        state.set_button(MouseButton::Left, true);
        assert!(state.was_pressed(MouseButton::Left));
        state.end_frame();
        assert!(!state.was_pressed(MouseButton::Left));
        assert!(state.is_held(MouseButton::Left));

        // Repeated down while held does not re-trigger
        state.set_button(MouseButton::Left, true);
        assert!(!state.was_pressed(MouseButton::Left));

        state.set_button(MouseButton::Left, false);
        state.set_button(MouseButton::Left, true);
        assert!(state.was_pressed(MouseButton::Left));
    }

    #[test]
    fn test_release_capture_clears_delta() {
        let mut state = MouseState::new();
        state.set_captured(true);
        state.accumulate_delta(10.0, 5.0);
        state.set_captured(false);
        assert!(!state.is_captured());
        assert_eq!(state.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_extra_buttons_are_ignored() {
        let mut state = MouseState::new();
        state.set_button(MouseButton::Other(4), true);
        assert!(!state.was_pressed(MouseButton::Other(4)));
    }
}
