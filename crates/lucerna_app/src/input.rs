use std::collections::HashSet;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// Keyboard and mouse state, fed by the runner from winit window events.
///
/// `just_pressed` / `just_clicked` report edges since the previous frame;
/// the runner clears them with [`InputState::end_frame`] once every
/// callback has run.
#[derive(Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    mouse_buttons: HashSet<MouseButton>,
    mouse_clicked: HashSet<MouseButton>,
    mouse_pos: (f64, f64),
    /// movement since last time `consume_mouse_delta` was called
    mouse_delta: (f32, f32),
    scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Records the parts of `event` that affect input state.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.update_key(code, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.update_mouse_button(*button, *state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.set_mouse_position(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll += match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => *y,
                    winit::event::MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
            }
            WindowEvent::Focused(false) => {
                self.keys_down.clear();
                self.mouse_buttons.clear();
            }
            _ => {}
        }
    }

    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            // key repeat arrives as more presses; only the first is an edge
            if self.keys_down.insert(key) {
                self.keys_pressed.insert(key);
            }
        } else {
            self.keys_down.remove(&key);
        }
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// `true` only on the frame `key` went down.
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn update_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            if self.mouse_buttons.insert(button) {
                self.mouse_clicked.insert(button);
            }
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// `true` only on the frame `button` went down.
    pub fn just_clicked(&self, button: MouseButton) -> bool {
        self.mouse_clicked.contains(&button)
    }

    /// Update the current mouse cursor position (window coordinates).
    pub fn set_mouse_position(&mut self, x: f64, y: f64) {
        let (px, py) = self.mouse_pos;
        self.mouse_pos = (x, y);
        self.mouse_delta.0 += (x - px) as f32;
        self.mouse_delta.1 += (y - py) as f32;
    }

    pub fn mouse_position(&self) -> (f64, f64) {
        self.mouse_pos
    }

    /// Retrieve and reset the mouse movement delta (in pixels) since the
    /// last call.
    pub fn consume_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Retrieve and reset accumulated wheel lines.
    pub fn consume_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll)
    }

    /// Forget this frame's edges.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_clicked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_tracking() {
        let mut state = InputState::new();
        assert!(!state.key_held(KeyCode::KeyA));
        state.update_key(KeyCode::KeyA, true);
        assert!(state.key_held(KeyCode::KeyA));
        assert!(state.just_pressed(KeyCode::KeyA));

        state.end_frame();
        state.update_key(KeyCode::KeyA, true);
        assert!(state.key_held(KeyCode::KeyA));
        assert!(!state.just_pressed(KeyCode::KeyA), "repeat is not an edge");

        state.update_key(KeyCode::KeyA, false);
        assert!(!state.key_held(KeyCode::KeyA));
    }

    #[test]
    fn mouse_tracking() {
        let mut state = InputState::new();
        assert!(!state.is_button_down(MouseButton::Left));
        state.update_mouse_button(MouseButton::Left, true);
        assert!(state.is_button_down(MouseButton::Left));
        assert!(state.just_clicked(MouseButton::Left));
        state.end_frame();
        assert!(!state.just_clicked(MouseButton::Left));
        state.update_mouse_button(MouseButton::Left, false);
        assert!(!state.is_button_down(MouseButton::Left));

        state.set_mouse_position(10.0, 20.0);
        assert_eq!(state.mouse_position(), (10.0, 20.0));
        let _ = state.consume_mouse_delta();
        state.set_mouse_position(15.0, 25.0);
        state.set_mouse_position(17.0, 24.0);
        assert_eq!(state.consume_mouse_delta(), (7.0, 4.0));
        assert_eq!(state.consume_mouse_delta(), (0.0, 0.0));
    }
}
