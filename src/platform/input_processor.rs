//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit events into engine `InputEvent`s.
//
// Architecture:
//   winit WindowEvent → InputProcessor → InputEvent → InputBuffer
//
// Modifier state is sticky: it is cached from ModifiersChanged and
// stamped onto every subsequent key and button event. Keys without an
// engine mapping are filtered out.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{ElementState, KeyEvent, MouseButton as WinitMouseButton};
use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== InputProcessor ======================================================

pub(crate) struct InputProcessor {
    modifiers: Modifiers,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self { modifiers: Modifiers::NONE }
    }

    pub(crate) fn update_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = modifiers_from(state);
    }

    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Converts a keyboard event. Returns `None` for unmapped keys.
    pub(crate) fn key(&self, event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        let key = key_from(code)?;
        Some(self.key_event(key, event.state))
    }

    pub(crate) fn mouse_button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let button = button_from(button);
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }

    pub(crate) fn cursor(&self, x: f64, y: f64) -> InputEvent {
        InputEvent::MouseMoved { x: x as f32, y: y as f32 }
    }

    fn key_event(&self, key: KeyCode, state: ElementState) -> InputEvent {
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
            ElementState::Released => InputEvent::KeyUp { key, modifiers },
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

fn modifiers_from(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        // Command on macOS reports as ctrl
        ctrl: state.control_key() || state.super_key(),
        alt: state.alt_key(),
    }
}

fn button_from(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        _ => MouseButton::Other,
    }
}

#[rustfmt::skip]
fn key_from(code: WinitKeyCode) -> Option<KeyCode> {
    use WinitKeyCode as W;

    let key = match code {
        W::KeyA => KeyCode::KeyA, W::KeyB => KeyCode::KeyB, W::KeyC => KeyCode::KeyC,
        W::KeyD => KeyCode::KeyD, W::KeyE => KeyCode::KeyE, W::KeyF => KeyCode::KeyF,
        W::KeyG => KeyCode::KeyG, W::KeyH => KeyCode::KeyH, W::KeyI => KeyCode::KeyI,
        W::KeyJ => KeyCode::KeyJ, W::KeyK => KeyCode::KeyK, W::KeyL => KeyCode::KeyL,
        W::KeyM => KeyCode::KeyM, W::KeyN => KeyCode::KeyN, W::KeyO => KeyCode::KeyO,
        W::KeyP => KeyCode::KeyP, W::KeyQ => KeyCode::KeyQ, W::KeyR => KeyCode::KeyR,
        W::KeyS => KeyCode::KeyS, W::KeyT => KeyCode::KeyT, W::KeyU => KeyCode::KeyU,
        W::KeyV => KeyCode::KeyV, W::KeyW => KeyCode::KeyW, W::KeyX => KeyCode::KeyX,
        W::KeyY => KeyCode::KeyY, W::KeyZ => KeyCode::KeyZ,

        W::Digit0 => KeyCode::Digit0, W::Digit1 => KeyCode::Digit1, W::Digit2 => KeyCode::Digit2,
        W::Digit3 => KeyCode::Digit3, W::Digit4 => KeyCode::Digit4, W::Digit5 => KeyCode::Digit5,
        W::Digit6 => KeyCode::Digit6, W::Digit7 => KeyCode::Digit7, W::Digit8 => KeyCode::Digit8,
        W::Digit9 => KeyCode::Digit9,

        W::F1 => KeyCode::F1, W::F2 => KeyCode::F2, W::F3 => KeyCode::F3,
        W::F4 => KeyCode::F4, W::F5 => KeyCode::F5, W::F6 => KeyCode::F6,
        W::F7 => KeyCode::F7, W::F8 => KeyCode::F8, W::F9 => KeyCode::F9,
        W::F10 => KeyCode::F10, W::F11 => KeyCode::F11, W::F12 => KeyCode::F12,

        W::ArrowUp => KeyCode::ArrowUp, W::ArrowDown => KeyCode::ArrowDown,
        W::ArrowLeft => KeyCode::ArrowLeft, W::ArrowRight => KeyCode::ArrowRight,
        W::Home => KeyCode::Home, W::End => KeyCode::End,
        W::PageUp => KeyCode::PageUp, W::PageDown => KeyCode::PageDown,

        W::Space => KeyCode::Space, W::Enter => KeyCode::Enter, W::Escape => KeyCode::Escape,
        W::Tab => KeyCode::Tab, W::Backspace => KeyCode::Backspace,
        W::Delete => KeyCode::Delete, W::Insert => KeyCode::Insert,

        _ => return None,
    };
    Some(key)
}

//=========================================================================
// Unit Tests
//=========================================================================
