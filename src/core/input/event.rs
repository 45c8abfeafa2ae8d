//=========================================================================
// Event Types
//=========================================================================
//
// Portable representation of everything the dispatcher can pull from its
// event source.
//
// Event Flow:
// ```text
// Platform Layer (Winit)          SceneRegistry (any thread)
//         ↓                               ↓
//    InputEvent                    Event::SceneChanged
//         ↓                               ↓
//    Event::Input ──────→ EventInjector ←─┘
//                              ↓
//                        Dispatcher::tick
// ```
//
// Input events are `Copy` and heap-free. The marker events share the
// same transport as genuine input so ordering between a click and the
// scene change it triggers is preserved.
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Side, thumb and macro buttons.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key, independent of layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum KeyCode {
    //--- Alphanumeric -----------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Function Row -----------------------------------------------------

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Navigation -------------------------------------------------------

    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown,

    //--- Editing & Control ------------------------------------------------

    Space, Enter, Escape, Tab, Backspace, Delete, Insert,

    /// Keys the platform reports but the engine does not map.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier keys held while an input event fired.
///
/// Left and right variants are not distinguished. On macOS, Command
/// reports as `ctrl` and Option as `alt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };

    /// Returns true if any modifier is held.
    pub const fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

//=== InputEvent ==========================================================

/// Low-level input produced by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown { key: KeyCode, modifiers: Modifiers },
    KeyUp { key: KeyCode, modifiers: Modifiers },
    MouseButtonDown { button: MouseButton, modifiers: Modifiers },
    MouseButtonUp { button: MouseButton, modifiers: Modifiers },

    /// Cursor position in window pixels, top-left origin.
    MouseMoved { x: f32, y: f32 },

    /// Platform event with no engine mapping. Delivered, never acted on.
    Unidentified,
}

impl InputEvent {
    /// Cursor position carried by `MouseMoved`.
    pub fn cursor(&self) -> Option<(f32, f32)> {
        match *self {
            Self::MouseMoved { x, y } => Some((x, y)),
            _ => None,
        }
    }

    /// Returns true for events that must be delivered one by one.
    ///
    /// Cursor movement is continuous: only the latest position in a
    /// frame matters.
    pub fn is_discrete(&self) -> bool {
        !matches!(self, Self::MouseMoved { .. })
    }

    /// Modifier state for key and button events.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match *self {
            Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. }
            | Self::MouseButtonDown { modifiers, .. }
            | Self::MouseButtonUp { modifiers, .. } => Some(modifiers),
            _ => None,
        }
    }
}

//=== Event ===============================================================

/// Everything the dispatcher can receive from its event source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Keyboard or mouse input.
    Input(InputEvent),

    /// Marker injected by `SceneRegistry::request_transition`. Consumed by
    /// the dispatcher; controllers never see it.
    SceneChanged,

    /// Terminates the dispatch loop.
    Quit,

    /// Application-defined event, delivered to controllers like input.
    User(u32),
}

/// Type tag of an [`Event`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Input,
    SceneChanged,
    Quit,
    User,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Input(_) => EventKind::Input,
            Self::SceneChanged => EventKind::SceneChanged,
            Self::Quit => EventKind::Quit,
            Self::User(_) => EventKind::User,
        }
    }

    /// The wrapped input event, if any.
    pub fn as_input(&self) -> Option<&InputEvent> {
        match self {
            Self::Input(input) => Some(input),
            _ => None,
        }
    }
}

impl From<InputEvent> for Event {
    fn from(input: InputEvent) -> Self {
        Self::Input(input)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_each_variant() {
        let click = Event::Input(InputEvent::MouseButtonDown {
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        });

        assert_eq!(click.kind(), EventKind::Input);
        assert_eq!(Event::SceneChanged.kind(), EventKind::SceneChanged);
        assert_eq!(Event::Quit.kind(), EventKind::Quit);
        assert_eq!(Event::User(7).kind(), EventKind::User);
    }

    #[test]
    fn cursor_only_on_mouse_moved() {
        let moved = InputEvent::MouseMoved { x: 4.0, y: 2.5 };
        let key = InputEvent::KeyDown { key: KeyCode::Space, modifiers: Modifiers::SHIFT };

        assert_eq!(moved.cursor(), Some((4.0, 2.5)));
        assert_eq!(key.cursor(), None);
        assert!(!moved.is_discrete());
        assert!(key.is_discrete());
    }

    #[test]
    fn modifiers_reported_for_keys_and_buttons() {
        let key = InputEvent::KeyUp { key: KeyCode::KeyS, modifiers: Modifiers::CTRL };
        assert_eq!(key.modifiers(), Some(Modifiers::CTRL));
        assert_eq!(InputEvent::Unidentified.modifiers(), None);
        assert!(Modifiers::CTRL.any());
        assert!(!Modifiers::default().any());
    }

    #[test]
    fn input_converts_into_event() {
        let input = InputEvent::KeyDown { key: KeyCode::Enter, modifiers: Modifiers::NONE };
        let event: Event = input.into();

        assert_eq!(event.as_input(), Some(&input));
        assert_eq!(Event::Quit.as_input(), None);
    }
}
