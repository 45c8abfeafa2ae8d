//=========================================================================
// Controller System
//=========================================================================
//
// Controllers are the behavior units of a scene. Each one owns a set of
// named objects and an inbound message queue bound to its name on the
// message bus.
//
// Lifecycle (driven by the dispatcher, on the dispatch thread):
//   start   → once, the first time the owning scene becomes active
//   update  → once per delivered event
//   objects → callbacks, after every controller in the scene has updated
//   render  → once per frame (default draws every visible object)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::sync::Arc;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::{Error, Result};
use crate::core::input::Event;
use crate::core::message_bus::{Message, MessageBus, MessageQueue};
use crate::core::render::Surface;

//=== Module Declarations =================================================

mod button;
mod object;

//=== Public API ==========================================================

pub use button::{Button, ButtonHook, ButtonState};
pub use object::{EventCallback, Object, ObjectSet};

//=== Controller Trait ====================================================

/// Per-scene behavior with access to its objects and mailbox.
///
/// Errors returned from any hook propagate out of the dispatch loop and
/// stop it.
///
/// # Examples
///
/// ```
/// use keystage::prelude::*;
///
/// struct Counter {
///     count: u32,
/// }
///
/// impl Controller for Counter {
///     fn update(&mut self, cx: &mut ControllerContext<'_>, _event: &Event) -> Result<()> {
///         while let Some(msg) = cx.recv_message() {
///             if let Some(step) = msg.payload::<u32>() {
///                 self.count += step;
///             }
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Controller: Send {
    /// Runs once before the first update of the owning scene.
    fn start(&mut self, cx: &mut ControllerContext<'_>) -> Result<()> {
        let _ = cx;
        Ok(())
    }

    /// Handles one delivered event.
    fn update(&mut self, cx: &mut ControllerContext<'_>, event: &Event) -> Result<()>;

    /// Draws the controller's objects.
    fn render(&self, objects: &ObjectSet, surface: &mut dyn Surface) -> Result<()> {
        objects.render(surface)
    }
}

//=== ControllerContext ===================================================

/// Borrowed view handed to controller hooks.
pub struct ControllerContext<'a> {
    name: &'a str,
    objects: &'a mut ObjectSet,
    mailbox: &'a MessageQueue,
    bus: &'a MessageBus,
}

impl<'a> ControllerContext<'a> {
    /// Name the controller is registered under (and its mailbox name).
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn objects(&self) -> &ObjectSet {
        &*self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectSet {
        &mut *self.objects
    }

    /// Looks up an owned object, failing with `NotFound`.
    pub fn object_mut(&mut self, name: &str) -> Result<&mut Object> {
        self.objects
            .get_mut(name)
            .ok_or_else(|| Error::not_found("object", name))
    }

    /// Pops the oldest pending message. Never blocks.
    pub fn recv_message(&mut self) -> Option<Message> {
        self.mailbox.pop()
    }

    pub fn pending_messages(&self) -> usize {
        self.mailbox.len()
    }

    /// Sends through the bus. See [`MessageBus::send`].
    pub fn send<P: Any + Send>(&self, destination: &str, payload: P) -> Result<bool> {
        self.bus.send(destination, payload)
    }

    pub fn bus(&self) -> &MessageBus {
        self.bus
    }
}

//=== ControllerSlot ======================================================

/// A registered controller together with what the scene binds to it.
pub(crate) struct ControllerSlot {
    name: String,
    controller: Box<dyn Controller>,
    objects: ObjectSet,
    mailbox: Arc<MessageQueue>,
}

impl ControllerSlot {
    pub(crate) fn new(name: String, controller: Box<dyn Controller>, mailbox: Arc<MessageQueue>) -> Self {
        debug!("Controller {} bound to its mailbox", name);
        Self {
            name,
            controller,
            objects: ObjectSet::new(),
            mailbox,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn objects(&self) -> &ObjectSet {
        &self.objects
    }

    pub(crate) fn objects_mut(&mut self) -> &mut ObjectSet {
        &mut self.objects
    }

    pub(crate) fn start(&mut self, bus: &MessageBus) -> Result<()> {
        let Self { name, controller, objects, mailbox } = self;
        let mut cx = ControllerContext { name: name.as_str(), objects, mailbox: &**mailbox, bus };
        controller.start(&mut cx)
    }

    /// Runs the controller's `update` hook only. Object callbacks run in a
    /// separate pass, see [`dispatch_objects`](Self::dispatch_objects).
    pub(crate) fn update(&mut self, bus: &MessageBus, event: &Event) -> Result<()> {
        let Self { name, controller, objects, mailbox } = self;
        let mut cx = ControllerContext { name: name.as_str(), objects, mailbox: &**mailbox, bus };
        controller.update(&mut cx, event)
    }

    pub(crate) fn dispatch_objects(&mut self, event: &Event) {
        self.objects.dispatch(event);
    }

    pub(crate) fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        self.controller.render(&self.objects, surface)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
