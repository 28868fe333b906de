use std::collections::HashSet;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller, ScrollCommand};

/// Adapter that bridges Winit events to the Controller trait and scroll commands
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// All pressed buttons as a vec (for efficient get_down_keys)
    pressed_vec: Vec<Button>,
}

impl WinitController {
    /// Create a new WinitController with no pressed keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent, returning the page movement it asks for
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<ScrollCommand> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(keycode) = event.physical_key else {
                    return None;
                };
                let button = Self::keycode_to_button(keycode)?;
                match event.state {
                    ElementState::Pressed => {
                        self.press(button);
                        ScrollCommand::for_press(button, self)
                    }
                    ElementState::Released => {
                        self.release(button);
                        None
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => Some(Self::wheel_to_command(*delta)),
            WindowEvent::Focused(false) => {
                self.pressed_keys.clear();
                self.pressed_vec.clear();
                None
            }
            _ => None,
        }
    }

    fn press(&mut self, button: Button) {
        if self.pressed_keys.insert(button) {
            self.pressed_vec.push(button);
        }
    }

    fn release(&mut self, button: Button) {
        if self.pressed_keys.remove(&button) {
            self.pressed_vec.retain(|&b| b != button);
        }
    }

    /// Winit reports positive deltas as "reveal content above", so the sign flips
    pub fn wheel_to_command(delta: MouseScrollDelta) -> ScrollCommand {
        match delta {
            MouseScrollDelta::LineDelta(_, y) => ScrollCommand::Lines(-y),
            MouseScrollDelta::PixelDelta(position) => ScrollCommand::Pixels(-position.y as f32),
        }
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::ArrowUp => Some(Button::ArrowUp),
            KeyCode::ArrowDown => Some(Button::ArrowDown),
            KeyCode::PageUp => Some(Button::PageUp),
            KeyCode::PageDown => Some(Button::PageDown),
            KeyCode::Home => Some(Button::Home),
            KeyCode::End => Some(Button::End),
            KeyCode::Space => Some(Button::Space),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Button::Shift),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    // Note: KeyEvent has private fields, so keyboard paths are covered through press/release

    #[test]
    fn test_new_controller_empty() {
        let controller = WinitController::new();
        assert!(!controller.is_down(Button::Space));
        assert_eq!(controller.get_down_keys().len(), 0);
    }

    #[test]
    fn test_press_release_tracking() {
        let mut controller = WinitController::new();
        controller.press(Button::Shift);
        controller.press(Button::Shift);
        assert_eq!(controller.get_down_keys(), &[Button::Shift]);

        controller.release(Button::Shift);
        assert!(!controller.is_down(Button::Shift));
        assert!(controller.get_down_keys().is_empty());
    }

    #[test]
    fn test_wheel_down_scrolls_down() {
        assert_eq!(
            WinitController::wheel_to_command(MouseScrollDelta::LineDelta(0.0, -2.0)),
            ScrollCommand::Lines(2.0)
        );
        assert_eq!(
            WinitController::wheel_to_command(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 30.0))),
            ScrollCommand::Pixels(-30.0)
        );
    }

    #[test]
    fn test_focus_loss_releases_everything() {
        let mut controller = WinitController::new();
        controller.press(Button::Shift);
        assert_eq!(controller.process_event(&WindowEvent::Focused(false)), None);
        assert!(controller.get_down_keys().is_empty());
    }
}
