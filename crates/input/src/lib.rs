//! Input handling for keyboard and mouse.

use glam::Vec2;
use std::collections::HashSet;

/// Arrow presses with Shift held move this many slider steps.
pub const COARSE_MULTIPLIER: i32 = 10;

/// Where Home/End send the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleJump {
    Start,
    End,
}

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,
    /// Mouse buttons released this frame.
    mouse_released: HashSet<MouseButton>,

    /// Cursor position in window coordinates.
    mouse_position: Vec2,
    /// Cursor movement during the last frame.
    mouse_delta: Vec2,
    accumulated_delta: Vec2,

    /// Wheel lines during the last frame (positive = away from the user).
    scroll_lines: f32,
    accumulated_scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once per frame after the frame's events are handled.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.mouse_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
        self.scroll_lines = self.accumulated_scroll;
        self.accumulated_scroll = 0.0;
    }

    /// Process a keyboard event. Key repeat counts as a fresh press.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState, repeat: bool) {
        match state {
            ElementState::Pressed => {
                if repeat || !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
                self.mouse_released.insert(button);
            }
        }
    }

    /// Process cursor movement. The delta is derived from consecutive positions.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        let new_position = Vec2::new(position.0 as f32, position.1 as f32);
        self.accumulated_delta += new_position - self.mouse_position;
        self.mouse_position = new_position;
    }

    /// Cursor re-entered the window: jump without producing a delta.
    pub fn warp_cursor(&mut self, position: (f64, f64)) {
        self.mouse_position = Vec2::new(position.0 as f32, position.1 as f32);
    }

    /// Process a mouse wheel event, in lines.
    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        self.accumulated_scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
        };
    }

    /// Forget held state (window lost focus).
    pub fn release_all(&mut self) {
        self.keys_held.clear();
        self.mouse_held.clear();
    }

    // Query methods

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released.contains(&button)
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn scroll_lines(&self) -> f32 {
        self.scroll_lines
    }

    pub fn is_shift_held(&self) -> bool {
        self.is_key_held(KeyCode::ShiftLeft) || self.is_key_held(KeyCode::ShiftRight)
    }

    /// Net slider movement this frame in fine steps (Right positive, Shift ×10).
    pub fn scale_steps(&self) -> i32 {
        let mut steps = 0;
        if self.is_key_pressed(KeyCode::ArrowRight) {
            steps += 1;
        }
        if self.is_key_pressed(KeyCode::ArrowLeft) {
            steps -= 1;
        }
        if self.is_shift_held() {
            steps *= COARSE_MULTIPLIER;
        }
        steps
    }

    /// Home/End pressed this frame. End wins if both are.
    pub fn scale_jump(&self) -> Option<ScaleJump> {
        if self.is_key_pressed(KeyCode::End) {
            Some(ScaleJump::End)
        } else if self.is_key_pressed(KeyCode::Home) {
            Some(ScaleJump::Start)
        } else {
            None
        }
    }

    /// Check if the info panel toggle was pressed (I).
    pub fn is_panel_toggle_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyI)
    }

    /// Check if a Ship Mind query was requested (Q).
    pub fn is_query_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyQ)
    }

    /// Check if quit was pressed (Escape).
    pub fn is_quit_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }

    /// Left button held: drag to orbit or to move the slider.
    pub fn is_drag_held(&self) -> bool {
        self.is_mouse_held(MouseButton::Left)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton, MouseScrollDelta};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut InputState, key: KeyCode) {
        input.process_keyboard(key, ElementState::Pressed, false);
    }

    #[test]
    fn pressed_is_one_shot_held_persists() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyQ);
        assert!(input.is_query_pressed());
        input.begin_frame();
        assert!(!input.is_query_pressed());
        assert!(input.is_key_held(KeyCode::KeyQ));
        input.process_keyboard(KeyCode::KeyQ, ElementState::Released, false);
        assert!(input.is_key_released(KeyCode::KeyQ));
        assert!(!input.is_key_held(KeyCode::KeyQ));
    }

    #[test]
    fn key_repeat_counts_as_press() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::ArrowRight);
        input.begin_frame();
        input.process_keyboard(KeyCode::ArrowRight, ElementState::Pressed, true);
        assert_eq!(input.scale_steps(), 1);
    }

    #[test]
    fn scale_steps_with_shift() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::ShiftLeft);
        press(&mut input, KeyCode::ArrowLeft);
        assert_eq!(input.scale_steps(), -COARSE_MULTIPLIER);
    }

    #[test]
    fn opposite_arrows_cancel() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::ArrowLeft);
        press(&mut input, KeyCode::ArrowRight);
        assert_eq!(input.scale_steps(), 0);
    }

    #[test]
    fn scale_jump_prefers_end() {
        let mut input = InputState::new();
        assert_eq!(input.scale_jump(), None);
        press(&mut input, KeyCode::Home);
        assert_eq!(input.scale_jump(), Some(ScaleJump::Start));
        press(&mut input, KeyCode::End);
        assert_eq!(input.scale_jump(), Some(ScaleJump::End));
    }

    #[test]
    fn cursor_delta_accumulates_per_frame() {
        let mut input = InputState::new();
        input.warp_cursor((10.0, 10.0));
        input.process_cursor_position((15.0, 12.0));
        input.process_cursor_position((20.0, 8.0));
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::new(10.0, -2.0));
        assert_eq!(input.mouse_position(), Vec2::new(20.0, 8.0));
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn scroll_lines_cleared_each_frame() {
        let mut input = InputState::new();
        input.process_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));
        input.process_scroll(MouseScrollDelta::LineDelta(0.0, -0.5));
        input.begin_frame();
        assert_eq!(input.scroll_lines(), 1.5);
        input.begin_frame();
        assert_eq!(input.scroll_lines(), 0.0);
    }

    #[test]
    fn release_all_drops_held_buttons() {
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_mouse_pressed(MouseButton::Left));
        assert!(input.is_drag_held());
        input.release_all();
        assert!(!input.is_drag_held());
    }
}
