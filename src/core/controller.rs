/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    Space,
    Shift,
    Escape,
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];
}

/// One discrete request to move the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollCommand {
    /// Wheel movement in lines; positive scrolls down
    Lines(f32),
    /// Trackpad movement in physical pixels; positive scrolls down
    Pixels(f32),
    PageUp,
    PageDown,
    Home,
    End,
}

impl ScrollCommand {
    /// Command a freshly pressed button stands for, given what else is held
    pub fn for_press(button: Button, controller: &dyn Controller) -> Option<Self> {
        match button {
            Button::ArrowUp => Some(Self::Lines(-1.0)),
            Button::ArrowDown => Some(Self::Lines(1.0)),
            Button::PageUp => Some(Self::PageUp),
            Button::PageDown => Some(Self::PageDown),
            Button::Home => Some(Self::Home),
            Button::End => Some(Self::End),
            Button::Space if controller.is_down(Button::Shift) => Some(Self::PageUp),
            Button::Space => Some(Self::PageDown),
            Button::Shift | Button::Escape => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockController {
        pressed: Vec<Button>,
    }

    impl Controller for MockController {
        fn is_down(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }

        fn get_down_keys(&self) -> &[Button] {
            &self.pressed
        }
    }

    #[test]
    fn test_arrows_scroll_one_line() {
        let controller = MockController { pressed: vec![] };
        assert_eq!(
            ScrollCommand::for_press(Button::ArrowDown, &controller),
            Some(ScrollCommand::Lines(1.0))
        );
        assert_eq!(
            ScrollCommand::for_press(Button::ArrowUp, &controller),
            Some(ScrollCommand::Lines(-1.0))
        );
    }

    #[test]
    fn test_space_pages_and_shift_reverses() {
        let idle = MockController { pressed: vec![] };
        assert_eq!(
            ScrollCommand::for_press(Button::Space, &idle),
            Some(ScrollCommand::PageDown)
        );

        let shifted = MockController {
            pressed: vec![Button::Shift],
        };
        assert_eq!(
            ScrollCommand::for_press(Button::Space, &shifted),
            Some(ScrollCommand::PageUp)
        );
    }

    #[test]
    fn test_modifiers_do_not_scroll() {
        let controller = MockController { pressed: vec![] };
        assert_eq!(ScrollCommand::for_press(Button::Shift, &controller), None);
        assert_eq!(ScrollCommand::for_press(Button::Escape, &controller), None);
    }

    #[test]
    fn test_controller_is_down() {
        let controller = MockController {
            pressed: vec![Button::PageDown, Button::Shift],
        };

        assert!(controller.is_down(Button::PageDown));
        assert!(controller.is_down(Button::Shift));
        assert!(!controller.is_down(Button::Home));
        assert_eq!(controller.get_down_keys().len(), 2);
    }
}
