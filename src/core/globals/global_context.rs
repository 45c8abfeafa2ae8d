//=========================================================================
// Global Context
//=========================================================================
//
// Process-wide resources handed to the host during `Engine::init`.
//
// Everything here is constructed once by the engine and passed by handle
// (never looked up ambiently):
// - bus: named message queues shared by every controller
// - scenes: registry of scenes and their transition graph
// - injector: producer half of the dispatcher's event channel
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Internal Dependencies ===============================================

use crate::core::input::EventInjector;
use crate::core::message_bus::MessageBus;
use crate::core::scene::SceneRegistry;
use crate::core::state::StateKey;

//=== GlobalContext =======================================================

/// Shared resources the host wires scenes and controllers against.
///
/// All handles are cheap to clone; controllers typically keep their own
/// clone of `scenes` to request transitions and of `bus` to send
/// messages from outside their `update` hook.
pub struct GlobalContext<K: StateKey> {
    /// Message bus shared by every scene.
    pub bus: Arc<MessageBus>,

    /// Scene registry. The first scene added becomes the root scene.
    pub scenes: SceneRegistry<K>,

    /// Injects application events (e.g. `Event::User`) into the loop.
    pub injector: EventInjector,
}

impl<K: StateKey> GlobalContext<K> {
    /// Creates a context whose bus holds `message_capacity` messages per
    /// destination.
    pub(crate) fn new(message_capacity: usize, injector: EventInjector) -> Self {
        let bus = Arc::new(MessageBus::with_capacity(message_capacity));
        let scenes = SceneRegistry::new(Arc::clone(&bus), injector.clone());
        Self { bus, scenes, injector }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
