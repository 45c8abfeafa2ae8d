//=========================================================================
// Scene
//=========================================================================
//
// Named collection of controllers, bound to a scene key in the registry.
//
// Scenes are shared (`Arc<Scene>`) between the registry's state machine
// and the host. Locking is two-level:
//   roster  → registration order, names, deferred objects
//   slot    → one mutex per controller, held only while its hook runs
//
// Passes snapshot the slot handles, release the roster, then lock one
// slot at a time. A slot is never locked while the roster is held, so
// hooks may call back into their own scene. Every controller stays
// addressable by name during a pass; only a controller looking up its
// own slot from inside its own hook is refused (`ControllerBusy`).
//
// Event delivery is two passes: every controller's `update`, then every
// object callback of every controller.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::controller::{Controller, ControllerSlot, Object, ObjectSet};
use crate::core::error::{Error, Result};
use crate::core::input::Event;
use crate::core::message_bus::MessageBus;
use crate::core::render::Surface;

//=== Roster ==============================================================

type SharedSlot = Arc<Mutex<ControllerSlot>>;

#[derive(Clone)]
struct Entry {
    name: String,
    slot: SharedSlot,
}

#[derive(Default)]
struct Roster {
    /// Registration order.
    entries: Vec<Entry>,
    /// Slots whose hook is running, and on which thread.
    in_hook: Vec<(ThreadId, String)>,
    /// Objects a controller added to itself from inside its own hook.
    deferred: Vec<(String, Object)>,
}

impl Roster {
    fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    fn in_own_hook(&self, name: &str) -> bool {
        let me = thread::current().id();
        self.in_hook.iter().any(|(thread, n)| *thread == me && n == name)
    }
}

fn lock_slot(slot: &SharedSlot) -> MutexGuard<'_, ControllerSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

//=== Scene ===============================================================

pub struct Scene {
    name: String,
    bus: Arc<MessageBus>,
    roster: Mutex<Roster>,
    started: AtomicBool,
}

impl Scene {
    /// Creates an empty scene whose controllers register on `bus`.
    pub fn new(name: impl Into<String>, bus: Arc<MessageBus>) -> Self {
        Self {
            name: name.into(),
            bus,
            roster: Mutex::new(Roster::default()),
            started: AtomicBool::new(false),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers `controller` under `name` and binds its mailbox.
    ///
    /// A controller registered during a pass joins from the next pass on.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateRegistration`] if `name` is already taken in
    /// this scene.
    pub fn add_controller(&self, name: &str, controller: impl Controller + 'static) -> Result<()> {
        let mut roster = self.lock();
        if roster.entry(name).is_some() {
            return Err(Error::duplicate("controller", name));
        }

        let mailbox = self.bus.queue_for(name);
        let slot = ControllerSlot::new(name.to_string(), Box::new(controller), mailbox);
        roster.entries.push(Entry {
            name: name.to_string(),
            slot: Arc::new(Mutex::new(slot)),
        });

        debug!("Scene {}: registered controller {}", self.name, name);
        Ok(())
    }

    /// Gives `object` to the controller registered as `controller`.
    ///
    /// Called from inside that controller's own hook, the object is
    /// inserted once the hook returns; a name collision is then logged
    /// and the object dropped.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown controller and
    /// [`Error::DuplicateRegistration`] if it already owns an object with
    /// the same name.
    pub fn add_object(&self, controller: &str, object: Object) -> Result<()> {
        let slot = {
            let mut roster = self.lock();
            let slot = match roster.entry(controller) {
                Some(entry) => Arc::clone(&entry.slot),
                None => return Err(Error::not_found("controller", controller)),
            };
            if roster.in_own_hook(controller) {
                roster.deferred.push((controller.to_string(), object));
                return Ok(());
            }
            slot
        };

        let mut slot = lock_slot(&slot);
        slot.objects_mut().insert(object)
    }

    //--- Query API --------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Controller names in registration order.
    pub fn controller_names(&self) -> Vec<String> {
        self.lock().entries.iter().map(|entry| entry.name.clone()).collect()
    }

    pub fn contains_controller(&self, name: &str) -> bool {
        self.lock().entry(name).is_some()
    }

    /// Runs `f` with the objects owned by `controller`.
    ///
    /// Works during a pass as well: if another thread is running that
    /// controller's hook, this waits for the hook to return.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown controller and
    /// [`Error::ControllerBusy`] when called from inside that same
    /// controller's hook.
    pub fn with_objects<R>(&self, controller: &str, f: impl FnOnce(&ObjectSet) -> R) -> Result<R> {
        let slot = {
            let roster = self.lock();
            let entry = roster
                .entry(controller)
                .ok_or_else(|| Error::not_found("controller", controller))?;
            if roster.in_own_hook(controller) {
                return Err(Error::ControllerBusy(controller.to_string()));
            }
            Arc::clone(&entry.slot)
        };

        let slot = lock_slot(&slot);
        Ok(f(slot.objects()))
    }

    /// Returns true once `start` has run.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    //--- Lifecycle --------------------------------------------------------

    /// Runs every controller's `start` hook, the first time only.
    pub fn start(&self) -> Result<()> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        debug!("Scene {}: starting controllers", self.name);
        for entry in self.snapshot() {
            self.run_hook(&entry, |slot| slot.start(&self.bus))?;
        }
        Ok(())
    }

    /// Delivers one event: every controller's `update` first, then every
    /// object callback, both in registration order.
    pub(crate) fn deliver(&self, event: &Event) -> Result<()> {
        let entries = self.snapshot();
        for entry in &entries {
            self.run_hook(entry, |slot| slot.update(&self.bus, event))?;
        }
        for entry in &entries {
            self.run_hook(entry, |slot| {
                slot.dispatch_objects(event);
                Ok(())
            })?;
        }
        Ok(())
    }

    /// Renders every controller's visible objects.
    pub(crate) fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        for entry in self.snapshot() {
            self.run_hook(&entry, |slot| slot.render(&mut *surface))?;
        }
        Ok(())
    }

    //--- Internal Helpers -------------------------------------------------

    fn snapshot(&self) -> Vec<Entry> {
        self.lock().entries.clone()
    }

    /// Runs `hook` with the slot locked and the roster released, then
    /// applies objects the controller added to itself meanwhile.
    fn run_hook<R>(&self, entry: &Entry, hook: impl FnOnce(&mut ControllerSlot) -> Result<R>) -> Result<R> {
        let me = thread::current().id();
        self.lock().in_hook.push((me, entry.name.clone()));

        let result = hook(&mut *lock_slot(&entry.slot));

        let deferred: Vec<Object> = {
            let mut roster = self.lock();
            if let Some(pos) = roster
                .in_hook
                .iter()
                .position(|(thread, name)| *thread == me && *name == entry.name)
            {
                roster.in_hook.swap_remove(pos);
            }

            let (mine, others): (Vec<_>, Vec<_>) = std::mem::take(&mut roster.deferred)
                .into_iter()
                .partition(|(name, _)| *name == entry.name);
            roster.deferred = others;
            mine.into_iter().map(|(_, object)| object).collect()
        };

        if !deferred.is_empty() {
            let mut slot = lock_slot(&entry.slot);
            for object in deferred {
                if let Err(err) = slot.objects_mut().insert(object) {
                    warn!("Scene {}: dropping deferred object: {}", self.name, err);
                }
            }
        }

        result
    }

    fn lock(&self) -> MutexGuard<'_, Roster> {
        self.roster.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("controllers", &self.controller_names())
            .field("started", &self.is_started())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
