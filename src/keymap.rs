use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::clock::Clock;
use crate::controller::{Controller, Intent};

/// What a key press means to the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Intent(Intent),
    Quit,
}

/// Button state the keymap needs to resolve Enter
#[derive(Debug, Clone, Copy, Default)]
pub struct Buttons {
    pub start_enabled: bool,
    pub submit_enabled: bool,
    pub input_visible: bool,
}

impl<C: Clock> From<&Controller<C>> for Buttons {
    fn from(ctrl: &Controller<C>) -> Self {
        Self {
            start_enabled: ctrl.start_enabled(),
            submit_enabled: ctrl.submit_enabled(),
            input_visible: ctrl.input_visible(),
        }
    }
}

/// Map a key press to an action.
///
/// Enter presses whichever of Start/Submit is enabled, Tab is the mode
/// button, and printable keys go to the input field while it is shown.
pub fn action_for(key: &KeyEvent, buttons: Buttons) -> Option<KeyAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(KeyAction::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Tab => Some(KeyAction::Intent(Intent::ToggleMode)),
        KeyCode::Enter if buttons.start_enabled => Some(KeyAction::Intent(Intent::Start)),
        KeyCode::Enter if buttons.submit_enabled => Some(KeyAction::Intent(Intent::Submit)),
        KeyCode::Backspace if buttons.input_visible => {
            Some(KeyAction::Intent(Intent::Backspace))
        }
        KeyCode::Char(c) if buttons.input_visible => Some(KeyAction::Intent(Intent::Type(c))),
        _ => None,
    }
}
