//! Input Module
//!
//! Gameplay polls input through [`InputService`]; nothing is pushed into the
//! core. [`InputState`] is the reference implementation the host fills from
//! its event loop (directly, or through the `winit` feature's code mapping).
//!
//! # Example
//!
//! ```rust,ignore
//! use invasion_engine::input::{InputState, KeyCode, MouseButton};
//!
//! let mut input = InputState::new();
//!
//! // Event loop
//! input.keyboard.handle_key(KeyCode::W, true);
//! input.mouse.accumulate_delta(4.0, -2.0);
//! input.mouse.set_button(MouseButton::Left, true);
//!
//! // Once per frame, before ticking the simulation
//! input.begin_frame(1.0 / 60.0);
//! ```

pub mod keyboard;
pub mod mouse_state;

pub use keyboard::{KeyCode, KeyboardState, MovementKeys};
pub use mouse_state::{MouseButton, MouseState};

use glam::Vec2;

/// Polled input consumed by entities during a tick.
pub trait InputService {
    /// Seconds covered by this tick.
    fn delta_time(&self) -> f32;

    fn key_held(&self, key: KeyCode) -> bool;

    /// Whether `button` went down this frame.
    fn mouse_pressed(&self, button: MouseButton) -> bool;

    /// Mouse motion since the last reset.
    fn mouse_delta(&self) -> Vec2;

    fn reset_mouse_delta(&mut self);

    fn set_cursor_locked(&mut self, locked: bool);

    fn cursor_locked(&self) -> bool;

    /// Called by the simulation after a tick to drop per-frame edges.
    fn end_frame(&mut self);
}

/// Combined keyboard and mouse state plus the frame's delta time.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
    delta_time: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delta time for the coming tick. Negative or non-finite
    /// values are treated as zero.
    pub fn begin_frame(&mut self, delta_time: f32) {
        self.delta_time = if delta_time.is_finite() {
            delta_time.max(0.0)
        } else {
            0.0
        };
    }

    /// Reset all input state to defaults.
    pub fn reset(&mut self) {
        self.keyboard.reset();
        self.mouse.reset();
    }

    pub fn movement(&self) -> MovementKeys {
        self.keyboard.movement()
    }
}

impl InputService for InputState {
    fn delta_time(&self) -> f32 {
        self.delta_time
    }

    fn key_held(&self, key: KeyCode) -> bool {
        self.keyboard.is_held(key)
    }

    fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse.was_pressed(button)
    }

    fn mouse_delta(&self) -> Vec2 {
        self.mouse.delta()
    }

    fn reset_mouse_delta(&mut self) {
        self.mouse.reset_delta();
    }

    fn set_cursor_locked(&mut self, locked: bool) {
        self.mouse.set_captured(locked);
    }

    fn cursor_locked(&self) -> bool {
        self.mouse.is_captured()
    }

    fn end_frame(&mut self) {
        self.mouse.end_frame();
    }
}
