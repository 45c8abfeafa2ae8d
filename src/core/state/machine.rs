//=========================================================================
// State Machine
//=========================================================================
//
// Keyed state machine binding shared values to state keys.
//
// Architecture:
//   bindings:    HashMap<K, Arc<V>>      (which value a state shows)
//   transitions: HashMap<K, HashSet<K>>  (directed, never symmetric)
//   previous:    Arc<V>                  (fallback for unbound states)
//
// Binding and transition legality are independent: every variant can be
// bound up front, edges wired later. A state without a binding shows the
// value of the last bound state the machine left.
//
// All operations take `&self`; one mutex per instance serializes them.
// The lock never spans user code.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::StateKey;
use crate::core::error::{Error, Result};

//=== Machine Data ========================================================

struct MachineData<K: StateKey, V> {
    /// `None` until `initialize` succeeds.
    current: Option<K>,
    bindings: HashMap<K, Arc<V>>,
    transitions: HashMap<K, HashSet<K>>,
    /// Value of the last bound state that was active. Set by `initialize`.
    previous: Option<Arc<V>>,
}

impl<K: StateKey, V> MachineData<K, V> {
    fn active_value(&self, current: K) -> Result<Arc<V>> {
        match self.bindings.get(&current) {
            Some(value) => Ok(Arc::clone(value)),
            None => self.previous.clone().ok_or(Error::NotInitialized),
        }
    }
}

//=== StateMachine ========================================================

/// Binds values of type `V` to state keys `K` and tracks the active one.
///
/// Values are reference-counted so a value stays valid for external
/// holders after the machine moves away from its state.
///
/// # Example
///
/// ```rust
/// use keystage::core::state::StateMachine;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Light { Off, On }
///
/// let machine = StateMachine::new();
/// machine.initialize(Light::Off, "dark")?;
/// machine.bind(Light::On, "bright");
/// machine.define_transition(Light::Off, Light::On);
///
/// machine.transition(Light::On)?;
/// assert_eq!(*machine.active()?, "bright");
/// # Ok::<(), keystage::core::Error>(())
/// ```
pub struct StateMachine<K: StateKey, V> {
    data: Mutex<MachineData<K, V>>,
}

impl<K: StateKey, V> StateMachine<K, V> {
    //--- Construction -----------------------------------------------------

    /// Creates an uninitialized machine with no bindings or edges.
    pub fn new() -> Self {
        Self {
            data: Mutex::new(MachineData {
                current: None,
                bindings: HashMap::new(),
                transitions: HashMap::new(),
                previous: None,
            }),
        }
    }

    /// Binds `value` to `initial` and makes it both current and previous.
    ///
    /// Fails with [`Error::AlreadyInitialized`] on a second call.
    pub fn initialize(&self, initial: K, value: V) -> Result<Arc<V>> {
        self.initialize_shared(initial, Arc::new(value))
    }

    /// Like [`initialize`](Self::initialize) for an already shared value.
    pub fn initialize_shared(&self, initial: K, value: Arc<V>) -> Result<Arc<V>> {
        let mut data = self.lock();
        if data.current.is_some() {
            return Err(Error::AlreadyInitialized);
        }

        data.bindings.insert(initial, Arc::clone(&value));
        data.previous = Some(Arc::clone(&value));
        data.current = Some(initial);

        debug!("State machine initialized in {:?}", initial);
        Ok(value)
    }

    //--- Configuration ----------------------------------------------------

    /// Binds `value` to `state`, replacing any earlier binding.
    ///
    /// Does not touch the transition graph and is legal before or after
    /// initialization.
    pub fn bind(&self, state: K, value: V) -> Arc<V> {
        self.bind_shared(state, Arc::new(value))
    }

    /// Like [`bind`](Self::bind) for an already shared value.
    pub fn bind_shared(&self, state: K, value: Arc<V>) -> Arc<V> {
        self.lock().bindings.insert(state, Arc::clone(&value));
        value
    }

    /// Declares the directed edge `from → to`. Repeated calls are no-ops.
    pub fn define_transition(&self, from: K, to: K) {
        self.lock().transitions.entry(from).or_default().insert(to);
    }

    /// Declares both `a → b` and `b → a`.
    pub fn define_bidirectional(&self, a: K, b: K) {
        let mut data = self.lock();
        data.transitions.entry(a).or_default().insert(b);
        data.transitions.entry(b).or_default().insert(a);
    }

    //--- Transitions ------------------------------------------------------

    /// Moves to `to` if the edge `current → to` was declared.
    ///
    /// If the outgoing state has a bound value, that value becomes the
    /// fallback for unbound states. On failure the current state is left
    /// unchanged.
    pub fn transition(&self, to: K) -> Result<()> {
        let mut data = self.lock();
        Self::transition_locked(&mut data, to)
    }

    /// Transitions and snapshots the new active value under one lock.
    pub fn transition_and_get(&self, to: K) -> Result<Arc<V>> {
        let mut data = self.lock();
        Self::transition_locked(&mut data, to)?;
        data.active_value(to)
    }

    fn transition_locked(data: &mut MachineData<K, V>, to: K) -> Result<()> {
        let from = data.current.ok_or(Error::NotInitialized)?;

        let legal = data
            .transitions
            .get(&from)
            .is_some_and(|targets| targets.contains(&to));

        if !legal {
            return Err(Error::IllegalTransition {
                from: format!("{:?}", from),
                to: format!("{:?}", to),
            });
        }

        match data.bindings.get(&from) {
            Some(outgoing) => data.previous = Some(Arc::clone(outgoing)),
            None => info!(
                "Leaving {:?} which has no bound value, keeping previous value",
                from
            ),
        }

        debug!("State transition {:?} -> {:?}", from, to);
        data.current = Some(to);
        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    /// Returns the value shown in the current state.
    ///
    /// That is the current state's binding, or the previous bound value
    /// if the current state has none.
    pub fn active(&self) -> Result<Arc<V>> {
        let data = self.lock();
        let current = data.current.ok_or(Error::NotInitialized)?;
        data.active_value(current)
    }

    /// Returns the current state key.
    pub fn active_state(&self) -> Result<K> {
        self.lock().current.ok_or(Error::NotInitialized)
    }

    /// Returns the value bound to `state`.
    pub fn value_for(&self, state: K) -> Result<Arc<V>> {
        self.lock()
            .bindings
            .get(&state)
            .cloned()
            .ok_or_else(|| Error::not_found("state", format!("{:?}", state)))
    }

    /// Returns true once `initialize` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.lock().current.is_some()
    }

    /// Returns true if `state` has a bound value.
    pub fn is_bound(&self, state: K) -> bool {
        self.lock().bindings.contains_key(&state)
    }

    /// Returns true if the edge `from → to` was declared.
    pub fn can_transition(&self, from: K, to: K) -> bool {
        self.lock()
            .transitions
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }

    /// Returns every state with a bound value, in no particular order.
    pub fn bound_states(&self) -> Vec<K> {
        self.lock().bindings.keys().copied().collect()
    }

    /// Returns every bound value, in no particular order.
    pub fn bound_values(&self) -> Vec<Arc<V>> {
        self.lock().bindings.values().cloned().collect()
    }

    //--- Internal Helpers -------------------------------------------------

    // Guarded data is plain maps; a panic elsewhere cannot leave them torn.
    fn lock(&self) -> MutexGuard<'_, MachineData<K, V>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: StateKey, V> Default for StateMachine<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Skin {
        Normal,
        Hovered,
        Pressed,
    }

    fn wired() -> StateMachine<Skin, &'static str> {
        let machine = StateMachine::new();
        machine.initialize(Skin::Normal, "normal").unwrap();
        machine.define_bidirectional(Skin::Normal, Skin::Hovered);
        machine.define_bidirectional(Skin::Hovered, Skin::Pressed);
        machine
    }

    //--- Initialization ---------------------------------------------------

    #[test]
    fn queries_fail_before_initialize() {
        let machine: StateMachine<Skin, u32> = StateMachine::new();
        assert!(!machine.is_initialized());
        assert!(matches!(machine.active(), Err(Error::NotInitialized)));
        assert!(matches!(machine.active_state(), Err(Error::NotInitialized)));
        assert!(matches!(
            machine.transition(Skin::Hovered),
            Err(Error::NotInitialized)
        ));
    }

    #[test]
    fn initialize_sets_current_and_active() {
        let machine = StateMachine::new();
        machine.initialize(Skin::Normal, 7u32).unwrap();

        assert!(machine.is_initialized());
        assert_eq!(machine.active_state().unwrap(), Skin::Normal);
        assert_eq!(*machine.active().unwrap(), 7);
    }

    #[test]
    fn second_initialize_fails() {
        let machine = StateMachine::new();
        machine.initialize(Skin::Normal, 1u32).unwrap();

        let err = machine.initialize(Skin::Hovered, 2).unwrap_err();
        assert!(matches!(err, Error::AlreadyInitialized));
        assert_eq!(machine.active_state().unwrap(), Skin::Normal);
        assert_eq!(*machine.active().unwrap(), 1);
    }

    #[test]
    fn bind_before_initialize_is_kept() {
        let machine = StateMachine::new();
        machine.bind(Skin::Hovered, "hovered");
        machine.initialize(Skin::Normal, "normal").unwrap();
        machine.define_transition(Skin::Normal, Skin::Hovered);

        machine.transition(Skin::Hovered).unwrap();
        assert_eq!(*machine.active().unwrap(), "hovered");
    }

    //--- Transitions ------------------------------------------------------

    #[test]
    fn undeclared_edge_is_illegal_and_keeps_state() {
        let machine = wired();

        let err = machine.transition(Skin::Pressed).unwrap_err();
        assert!(matches!(err, Error::IllegalTransition { .. }));
        assert_eq!(machine.active_state().unwrap(), Skin::Normal);
    }

    #[test]
    fn edges_are_not_symmetric() {
        let machine = StateMachine::new();
        machine.initialize(Skin::Normal, 0u8).unwrap();
        machine.define_transition(Skin::Normal, Skin::Hovered);

        assert!(machine.can_transition(Skin::Normal, Skin::Hovered));
        assert!(!machine.can_transition(Skin::Hovered, Skin::Normal));

        machine.transition(Skin::Hovered).unwrap();
        assert!(machine.transition(Skin::Normal).is_err());
    }

    #[test]
    fn duplicate_edge_declaration_is_idempotent() {
        let machine = StateMachine::new();
        machine.initialize(Skin::Normal, 0u8).unwrap();
        machine.define_transition(Skin::Normal, Skin::Hovered);
        machine.define_transition(Skin::Normal, Skin::Hovered);

        assert!(machine.can_transition(Skin::Normal, Skin::Hovered));
        assert!(!machine.can_transition(Skin::Normal, Skin::Pressed));
    }

    #[test]
    fn unbound_state_shows_previous_value() {
        let machine = wired();
        machine.bind(Skin::Hovered, "hovered");

        machine.transition(Skin::Hovered).unwrap();
        machine.transition(Skin::Pressed).unwrap();

        // Pressed is unbound: falls back to what Hovered showed.
        assert_eq!(machine.active_state().unwrap(), Skin::Pressed);
        assert_eq!(*machine.active().unwrap(), "hovered");
    }

    #[test]
    fn previous_value_survives_unbound_chains() {
        let machine = wired();

        machine.transition(Skin::Hovered).unwrap();
        machine.transition(Skin::Pressed).unwrap();
        machine.transition(Skin::Hovered).unwrap();

        assert_eq!(*machine.active().unwrap(), "normal");
    }

    #[test]
    fn transition_and_get_returns_new_active_value() {
        let machine = wired();
        machine.bind(Skin::Hovered, "hovered");

        let value = machine.transition_and_get(Skin::Hovered).unwrap();
        assert_eq!(*value, "hovered");
    }

    //--- Lookups ----------------------------------------------------------

    #[test]
    fn value_for_unbound_state_is_not_found() {
        let machine = wired();
        assert_eq!(*machine.value_for(Skin::Normal).unwrap(), "normal");
        assert!(matches!(
            machine.value_for(Skin::Pressed),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn values_are_shared_with_external_holders() {
        let machine = StateMachine::new();
        let held = machine.initialize(Skin::Normal, String::from("normal")).unwrap();
        assert!(Arc::ptr_eq(&held, &machine.active().unwrap()));

        machine.bind(Skin::Normal, String::from("replacement"));
        assert_eq!(*held, "normal");
        assert_eq!(*machine.active().unwrap(), "replacement");
    }

    #[test]
    fn concurrent_readers_observe_a_bound_value() {
        let machine = Arc::new(wired());
        machine.bind(Skin::Hovered, "hovered");

        let reader = {
            let machine = Arc::clone(&machine);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    let value = machine.active().unwrap();
                    assert!(*value == "normal" || *value == "hovered");
                }
            })
        };

        for _ in 0..500 {
            machine.transition(Skin::Hovered).unwrap();
            machine.transition(Skin::Normal).unwrap();
        }

        reader.join().unwrap();
    }
}
