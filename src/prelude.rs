//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use keystage::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder, EngineError};
pub use crate::core::globals::GlobalContext;
pub use crate::core::error::{Error, Result};

// State
pub use crate::core::state::{Managed, StateKey, StateMachine};

// Controllers and objects
pub use crate::core::controller::{Button, ButtonState, Controller, ControllerContext, Object, ObjectSet};

// Input and transport
pub use crate::core::input::{
    event_channel, Event, EventInjector, EventKind, EventSource, InputEvent, KeyCode, Modifiers,
    MouseButton,
};

// Messaging
pub use crate::core::message_bus::{Message, MessageBus};

// Scenes and dispatch
pub use crate::core::dispatcher::{Dispatcher, TickControl};
pub use crate::core::scene::{Scene, SceneRegistry};

// Rendering contracts
pub use crate::core::render::{
    AssetStore, MemoryAssetStore, Rect, RecordingSurface, Skin, Sprite, Surface, TextureHandle,
};
