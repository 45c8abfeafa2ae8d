//=========================================================================
// Core Systems
//=========================================================================
//
// Runtime state and coordination layer. Everything in here runs without
// a window: the platform layer only feeds events in through an
// `EventInjector` and receives draw calls through a `Surface`.
//
// Layers (leaves first):
//   error        → Error taxonomy (hard vs soft)
//   state        → StateMachine<K, V>, Managed<K, V>
//   render       → Surface / AssetStore contracts, Sprite, Rect
//   message_bus  → named bounded FIFO queues
//   input        → events and the bounded event channel
//   controller   → Controller trait, Object, Button
//   scene        → Scene, SceneRegistry (deferred transitions)
//   dispatcher   → frame loop
//   globals      → GlobalContext handed to the host
//
//=========================================================================

//=== Module Declarations =================================================

pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod globals;
pub mod input;
pub mod message_bus;
pub mod render;
pub mod scene;
pub mod state;

//=== Public API ==========================================================

pub use controller::{Button, ButtonState, Controller, ControllerContext, Object, ObjectSet};
pub use dispatcher::{DispatchState, Dispatcher, FrameStats, TickControl};
pub use error::{Error, Result};
pub use globals::GlobalContext;
pub use input::{event_channel, Event, EventInjector, EventKind, EventSource, InputEvent};
pub use message_bus::{Message, MessageBus};
pub use render::{Rect, Skin, Sprite, Surface, TextureHandle};
pub use scene::{Scene, SceneRegistry};
pub use state::{Managed, StateKey, StateMachine};
