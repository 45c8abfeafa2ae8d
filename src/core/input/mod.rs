//=========================================================================
// Input System
//=========================================================================
//
// Event types and the channel that carries them to the dispatcher.
//
// Components:
//   event   → InputEvent, Event (input + engine markers), EventKind
//   source  → EventSource trait, EventInjector / ChannelEventSource
//
//=========================================================================

//=== Module Declarations =================================================

mod event;
mod source;

//=== Public API ==========================================================

pub use event::{Event, EventKind, InputEvent, KeyCode, Modifiers, MouseButton};
pub use source::{event_channel, ChannelEventSource, EventInjector, EventSource};
