//=========================================================================
// Button
//=========================================================================
//
// Stateful object whose sprite follows the cursor.
//
// State graph (explicit in both directions):
// ```text
//   Normal ⇄ Hovered ⇄ Pressed
// ```
//
//   cursor enters rect          Normal  → Hovered   (on_hovered)
//   cursor leaves rect          Hovered → Normal    (on_unhovered)
//   left press inside           Hovered → Pressed   (on_pressed)
//   left release inside         Pressed → Hovered   (on_released)
//   left release outside        Pressed → Hovered → Normal (on_unhovered)
//
// Hovered and pressed sprites are optional; an unbound state keeps
// showing the previous sprite.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::warn;

//=== Internal Dependencies ===============================================

use super::Object;
use crate::core::error::Result;
use crate::core::input::{Event, InputEvent, MouseButton};
use crate::core::render::Sprite;
use crate::core::state::{Managed, StateMachine};

//=== ButtonState =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Normal,
    Hovered,
    Pressed,
}

/// Hook run after a button changes state.
pub type ButtonHook = Box<dyn FnMut(&mut Object) + Send>;

//=== Button ==============================================================

/// Builder for a button [`Object`].
///
/// # Examples
///
/// ```
/// use keystage::prelude::*;
///
/// let normal = Sprite::new(TextureHandle(1), 64, 24);
/// let hovered = Sprite::new(TextureHandle(2), 64, 24);
///
/// let (object, machine) = Button::new("start", normal)
///     .at(10, 10)
///     .hovered_sprite(hovered)
///     .build()
///     .unwrap();
///
/// assert_eq!(object.rect(), Rect::new(10, 10, 64, 24));
/// assert_eq!(machine.active_state().unwrap(), ButtonState::Normal);
/// ```
pub struct Button {
    name: String,
    position: (i32, i32),
    normal: Sprite,
    hovered: Option<Sprite>,
    pressed: Option<Sprite>,
    hooks: Hooks,
}

#[derive(Default)]
struct Hooks {
    pressed: Option<ButtonHook>,
    released: Option<ButtonHook>,
    hovered: Option<ButtonHook>,
    unhovered: Option<ButtonHook>,
}

impl Button {
    pub fn new(name: impl Into<String>, normal: Sprite) -> Self {
        Self {
            name: name.into(),
            position: (0, 0),
            normal,
            hovered: None,
            pressed: None,
            hooks: Hooks::default(),
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = (x, y);
        self
    }

    pub fn hovered_sprite(mut self, sprite: Sprite) -> Self {
        self.hovered = Some(sprite);
        self
    }

    pub fn pressed_sprite(mut self, sprite: Sprite) -> Self {
        self.pressed = Some(sprite);
        self
    }

    pub fn on_pressed(mut self, hook: impl FnMut(&mut Object) + Send + 'static) -> Self {
        self.hooks.pressed = Some(Box::new(hook));
        self
    }

    pub fn on_released(mut self, hook: impl FnMut(&mut Object) + Send + 'static) -> Self {
        self.hooks.released = Some(Box::new(hook));
        self
    }

    pub fn on_hovered(mut self, hook: impl FnMut(&mut Object) + Send + 'static) -> Self {
        self.hooks.hovered = Some(Box::new(hook));
        self
    }

    pub fn on_unhovered(mut self, hook: impl FnMut(&mut Object) + Send + 'static) -> Self {
        self.hooks.unhovered = Some(Box::new(hook));
        self
    }

    /// Builds the object and returns it with the machine driving its skin.
    pub fn build(self) -> Result<(Object, Arc<StateMachine<ButtonState, Sprite>>)> {
        let machine = Arc::new(StateMachine::new());
        machine.initialize(ButtonState::Normal, self.normal)?;
        if let Some(sprite) = self.hovered {
            machine.bind(ButtonState::Hovered, sprite);
        }
        if let Some(sprite) = self.pressed {
            machine.bind(ButtonState::Pressed, sprite);
        }
        machine.define_bidirectional(ButtonState::Normal, ButtonState::Hovered);
        machine.define_bidirectional(ButtonState::Hovered, ButtonState::Pressed);

        let mut tracker = CursorTracker {
            machine: Arc::clone(&machine),
            cursor: None,
            hooks: self.hooks,
        };

        let (x, y) = self.position;
        let object = Object::new(self.name)
            .with_position(x, y)
            .with_skin(Managed::stateful(Arc::clone(&machine)))
            .on_event(move |object, event| tracker.handle(object, event));

        Ok((object, machine))
    }
}

//=== CursorTracker =======================================================

struct CursorTracker {
    machine: Arc<StateMachine<ButtonState, Sprite>>,
    cursor: Option<(f32, f32)>,
    hooks: Hooks,
}

impl CursorTracker {
    fn handle(&mut self, object: &mut Object, event: &Event) {
        let Some(input) = event.as_input() else {
            return;
        };
        let Ok(state) = self.machine.active_state() else {
            return;
        };

        match *input {
            InputEvent::MouseMoved { x, y } => {
                self.cursor = Some((x, y));
                let inside = object.rect().contains(x, y);
                match state {
                    ButtonState::Normal if inside => {
                        self.step(object, ButtonState::Hovered);
                        fire(&mut self.hooks.hovered, object);
                    }
                    ButtonState::Hovered if !inside => {
                        self.step(object, ButtonState::Normal);
                        fire(&mut self.hooks.unhovered, object);
                    }
                    _ => {}
                }
            }

            InputEvent::MouseButtonDown { button: MouseButton::Left, .. } => {
                if state == ButtonState::Hovered && self.cursor_inside(object) {
                    self.step(object, ButtonState::Pressed);
                    fire(&mut self.hooks.pressed, object);
                }
            }

            InputEvent::MouseButtonUp { button: MouseButton::Left, .. } => {
                if state != ButtonState::Pressed {
                    return;
                }
                self.step(object, ButtonState::Hovered);
                if self.cursor_inside(object) {
                    fire(&mut self.hooks.released, object);
                } else {
                    self.step(object, ButtonState::Normal);
                    fire(&mut self.hooks.unhovered, object);
                }
            }

            _ => {}
        }
    }

    fn cursor_inside(&self, object: &Object) -> bool {
        self.cursor
            .map(|(x, y)| object.rect().contains(x, y))
            .unwrap_or(false)
    }

    fn step(&self, object: &mut Object, to: ButtonState) {
        if let Err(err) = self.machine.transition(to) {
            warn!("Button {}: {}", object.name(), err);
            return;
        }
        if let Err(err) = object.fit_to_skin() {
            warn!("Button {}: {}", object.name(), err);
        }
    }
}

fn fire(hook: &mut Option<ButtonHook>, object: &mut Object) {
    if let Some(hook) = hook {
        hook(object);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::Modifiers;
    use crate::core::render::TextureHandle;
    use std::sync::Mutex;

    const NORMAL: Sprite = Sprite::new(TextureHandle(1), 100, 40);
    const HOVERED: Sprite = Sprite::new(TextureHandle(2), 100, 40);
    const PRESSED: Sprite = Sprite::new(TextureHandle(3), 100, 40);

    fn moved(x: f32, y: f32) -> Event {
        Event::Input(InputEvent::MouseMoved { x, y })
    }

    fn left(down: bool) -> Event {
        let modifiers = Modifiers::NONE;
        let button = MouseButton::Left;
        Event::Input(if down {
            InputEvent::MouseButtonDown { button, modifiers }
        } else {
            InputEvent::MouseButtonUp { button, modifiers }
        })
    }

    fn full_button(log: &Arc<Mutex<Vec<&'static str>>>) -> (Object, Arc<StateMachine<ButtonState, Sprite>>) {
        let (pressed, released, hovered, unhovered) =
            (Arc::clone(log), Arc::clone(log), Arc::clone(log), Arc::clone(log));

        Button::new("start", NORMAL)
            .at(0, 0)
            .hovered_sprite(HOVERED)
            .pressed_sprite(PRESSED)
            .on_pressed(move |_| pressed.lock().unwrap().push("pressed"))
            .on_released(move |_| released.lock().unwrap().push("released"))
            .on_hovered(move |_| hovered.lock().unwrap().push("hovered"))
            .on_unhovered(move |_| unhovered.lock().unwrap().push("unhovered"))
            .build()
            .unwrap()
    }

    #[test]
    fn click_cycle_walks_the_state_graph() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (mut object, machine) = full_button(&log);

        object.dispatch(&moved(50.0, 20.0));
        assert_eq!(machine.active_state().unwrap(), ButtonState::Hovered);
        assert_eq!(*machine.active().unwrap(), HOVERED);

        object.dispatch(&left(true));
        assert_eq!(machine.active_state().unwrap(), ButtonState::Pressed);

        object.dispatch(&left(false));
        assert_eq!(machine.active_state().unwrap(), ButtonState::Hovered);

        object.dispatch(&moved(500.0, 20.0));
        assert_eq!(machine.active_state().unwrap(), ButtonState::Normal);

        assert_eq!(*log.lock().unwrap(), vec!["hovered", "pressed", "released", "unhovered"]);
    }

    #[test]
    fn press_outside_is_ignored() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (mut object, machine) = full_button(&log);

        object.dispatch(&moved(500.0, 500.0));
        object.dispatch(&left(true));

        assert_eq!(machine.active_state().unwrap(), ButtonState::Normal);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn release_outside_returns_to_normal_without_release_hook() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (mut object, machine) = full_button(&log);

        object.dispatch(&moved(10.0, 10.0));
        object.dispatch(&left(true));
        // Dragging out keeps the button pressed until release
        object.dispatch(&moved(500.0, 10.0));
        assert_eq!(machine.active_state().unwrap(), ButtonState::Pressed);

        object.dispatch(&left(false));
        assert_eq!(machine.active_state().unwrap(), ButtonState::Normal);
        assert_eq!(*log.lock().unwrap(), vec!["hovered", "pressed", "unhovered"]);
    }

    #[test]
    fn unbound_states_keep_the_previous_sprite() {
        let (mut object, machine) = Button::new("plain", NORMAL).build().unwrap();

        object.dispatch(&moved(1.0, 1.0));
        object.dispatch(&left(true));

        assert_eq!(machine.active_state().unwrap(), ButtonState::Pressed);
        assert_eq!(*machine.active().unwrap(), NORMAL);
    }

    #[test]
    fn non_input_events_are_ignored() {
        let (mut object, machine) = Button::new("plain", NORMAL).build().unwrap();

        object.dispatch(&Event::User(3));
        object.dispatch(&Event::SceneChanged);

        assert_eq!(machine.active_state().unwrap(), ButtonState::Normal);
    }
}
