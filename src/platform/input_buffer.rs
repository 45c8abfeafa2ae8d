//=========================================================================
// Input Buffer
//=========================================================================
//
// Per-frame staging area for converted input, flushed on the platform's
// frame boundary (RedrawRequested).
//
// Rules:
// - Identical consecutive discrete events collapse into one
// - Consecutive cursor moves coalesce: only the latest position is kept
// - A pending cursor move is committed before the next discrete event,
//   so a click is always preceded by the position it happened at
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    events: Vec<InputEvent>,
    cursor: Option<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        const BASE_CAPACITY: usize = 64;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
            cursor: None,
        }
    }

    /// Stages an event according to the buffering rules above.
    pub(crate) fn push(&mut self, event: InputEvent) {
        if !event.is_discrete() {
            self.cursor = Some(event);
            return;
        }

        if let Some(cursor) = self.cursor.take() {
            self.events.push(cursor);
        }
        if self.events.last() != Some(&event) {
            self.events.push(event);
        }
    }

    /// Returns the staged events in order and empties the buffer.
    pub(crate) fn drain(&mut self) -> Vec<InputEvent> {
        let mut events = std::mem::take(&mut self.events);
        events.extend(self.cursor.take());
        events
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len() + usize::from(self.cursor.is_some())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty() && self.cursor.is_none()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, Modifiers, MouseButton};

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::MouseMoved { x, y }
    }

    #[test]
    fn consecutive_duplicates_collapse() {
        let mut buffer = InputBuffer::new();
        buffer.push(key_down(KeyCode::KeyA));
        buffer.push(key_down(KeyCode::KeyA));
        buffer.push(key_down(KeyCode::KeyB));
        buffer.push(key_down(KeyCode::KeyA));

        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn cursor_moves_coalesce_to_latest() {
        let mut buffer = InputBuffer::new();
        buffer.push(moved(1.0, 1.0));
        buffer.push(moved(2.0, 3.0));

        assert_eq!(buffer.drain(), vec![moved(2.0, 3.0)]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn cursor_is_committed_before_a_click() {
        let click = InputEvent::MouseButtonDown {
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        };

        let mut buffer = InputBuffer::new();
        buffer.push(moved(1.0, 1.0));
        buffer.push(moved(5.0, 5.0));
        buffer.push(click);
        buffer.push(moved(9.0, 9.0));

        assert_eq!(buffer.drain(), vec![moved(5.0, 5.0), click, moved(9.0, 9.0)]);
    }

    #[test]
    fn drain_keeps_capacity() {
        let mut buffer = InputBuffer::new();
        for i in 0..200 {
            let key = if i % 2 == 0 { KeyCode::KeyA } else { KeyCode::KeyB };
            buffer.push(key_down(key));
        }
        assert_eq!(buffer.drain().len(), 200);

        buffer.push(key_down(KeyCode::Space));
        assert_eq!(buffer.len(), 1);
    }
}
