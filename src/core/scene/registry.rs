//=========================================================================
// Scene Registry
//=========================================================================
//
// State machine of scenes plus a deferred-transition path.
//
// Architecture:
// ```text
//   any thread                         dispatch thread
//   ──────────                         ───────────────
//   request_transition(to)
//     ├─ lock pending
//     ├─ pending.push(to)
//     └─ inject(SceneChanged) ───→ event stream ───→ Dispatcher::tick
//                                                        ↓
//                                     commit_pending_transition()
//                                       ├─ lock pending, pop oldest
//                                       └─ machine.transition(to)
// ```
//
// The pending queue and the marker stream are kept consistent by the
// single `pending` mutex: a request whose marker cannot be injected is
// withdrawn before the lock is released.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{Scene, TransitionQueue};
use crate::core::error::{Error, Result};
use crate::core::input::{Event, EventInjector};
use crate::core::message_bus::MessageBus;
use crate::core::state::{StateKey, StateMachine};

//=== SceneRegistry =======================================================

/// Scenes keyed by `K`, with thread-safe deferred switching.
///
/// Cloning is cheap and every clone refers to the same registry, so
/// controllers and helper threads may hold their own handle.
pub struct SceneRegistry<K: StateKey> {
    machine: Arc<StateMachine<K, Scene>>,
    pending: Arc<Mutex<TransitionQueue<K>>>,
    injector: EventInjector,
    bus: Arc<MessageBus>,
}

impl<K: StateKey> SceneRegistry<K> {
    /// Creates an empty registry whose scenes register on `bus` and whose
    /// transition markers travel through `injector`.
    pub fn new(bus: Arc<MessageBus>, injector: EventInjector) -> Self {
        Self {
            machine: Arc::new(StateMachine::new()),
            pending: Arc::new(Mutex::new(TransitionQueue::new())),
            injector,
            bus,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a new scene under `key`.
    ///
    /// The first scene registered becomes the initial (root) scene.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateRegistration`] if `key` or `name` is taken.
    pub fn add_scene(&self, key: K, name: &str) -> Result<Arc<Scene>> {
        if self.machine.is_bound(key) {
            return Err(Error::duplicate("scene", format!("{:?}", key)));
        }
        if self.machine.bound_values().iter().any(|s| s.name() == name) {
            return Err(Error::duplicate("scene", name));
        }

        let scene = Arc::new(Scene::new(name, Arc::clone(&self.bus)));
        let scene = if self.machine.is_initialized() {
            self.machine.bind_shared(key, scene)
        } else {
            match self.machine.initialize_shared(key, Arc::clone(&scene)) {
                Ok(scene) => {
                    info!("Root scene: {} ({:?})", name, key);
                    scene
                }
                Err(Error::AlreadyInitialized) => self.machine.bind_shared(key, scene),
                Err(err) => return Err(err),
            }
        };

        debug!("Registered scene {} ({:?})", name, key);
        Ok(scene)
    }

    /// Declares the directed edge `from → to`. Symmetry is never inferred.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if either scene is unregistered.
    pub fn define_transition(&self, from: K, to: K) -> Result<()> {
        self.require(from)?;
        self.require(to)?;
        self.machine.define_transition(from, to);
        Ok(())
    }

    /// Declares both `a → b` and `b → a`.
    pub fn define_bidirectional(&self, a: K, b: K) -> Result<()> {
        self.define_transition(a, b)?;
        self.define_transition(b, a)
    }

    //--- Deferred Transitions ---------------------------------------------

    /// Requests a switch to `to`, committed later on the dispatch thread.
    ///
    /// Safe to call from any thread, including from inside a controller
    /// hook. Edge legality is checked at commit time.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `to` is not a registered scene
    /// - [`Error::SignalRejected`] if the marker could not be injected;
    ///   the request is withdrawn
    pub fn request_transition(&self, to: K) -> Result<()> {
        self.require(to)?;

        let mut pending = self.lock_pending();
        pending.push(to);
        if let Err(err) = self.injector.inject(Event::SceneChanged) {
            pending.retract();
            return Err(err);
        }

        debug!("Scene transition to {:?} requested ({} pending)", to, pending.len());
        Ok(())
    }

    /// Applies the oldest pending transition.
    ///
    /// Returns the newly active scene, or `None` (with a warning) if the
    /// marker arrived with nothing pending. Only the dispatcher should call
    /// this; it does not start the scene.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalTransition`] if no edge leads from the current scene
    /// to the requested one.
    pub fn commit_pending_transition(&self) -> Result<Option<Arc<Scene>>> {
        let mut pending = self.lock_pending();
        let Some(to) = pending.pop() else {
            warn!("Scene change signalled with no pending transition");
            return Ok(None);
        };

        let scene = self.machine.transition_and_get(to)?;
        drop(pending);

        info!("Scene changed to {} ({:?})", scene.name(), to);
        Ok(Some(scene))
    }

    //--- Query API --------------------------------------------------------

    /// The currently active scene.
    pub fn active(&self) -> Result<Arc<Scene>> {
        self.machine.active()
    }

    pub fn active_state(&self) -> Result<K> {
        self.machine.active_state()
    }

    /// Scene registered under `key`.
    pub fn scene(&self, key: K) -> Result<Arc<Scene>> {
        self.machine
            .value_for(key)
            .map_err(|_| Error::not_found("scene", format!("{:?}", key)))
    }

    pub fn contains(&self, key: K) -> bool {
        self.machine.is_bound(key)
    }

    /// Returns true if `to` may follow `from`.
    pub fn can_transition(&self, from: K, to: K) -> bool {
        self.machine.can_transition(from, to)
    }

    pub fn is_initialized(&self) -> bool {
        self.machine.is_initialized()
    }

    /// Number of requested transitions not yet committed.
    pub fn pending_transitions(&self) -> usize {
        self.lock_pending().len()
    }

    pub fn bus(&self) -> &Arc<MessageBus> {
        &self.bus
    }

    //--- Internal Helpers -------------------------------------------------

    fn require(&self, key: K) -> Result<()> {
        if self.machine.is_bound(key) {
            Ok(())
        } else {
            Err(Error::not_found("scene", format!("{:?}", key)))
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, TransitionQueue<K>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: StateKey> Clone for SceneRegistry<K> {
    fn clone(&self) -> Self {
        Self {
            machine: Arc::clone(&self.machine),
            pending: Arc::clone(&self.pending),
            injector: self.injector.clone(),
            bus: Arc::clone(&self.bus),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
