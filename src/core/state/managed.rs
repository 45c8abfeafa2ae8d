//=========================================================================
// Managed Values
//=========================================================================
//
// One handle for values that either never change (`Stateless`) or are
// selected by a state machine (`Stateful`). Callers ask for `active()`
// and need not know which variant they hold.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Internal Dependencies ===============================================

use super::{StateKey, StateMachine};
use crate::core::error::Result;
use crate::core::render::{Skin, Sprite};

//=== Managed =============================================================

/// A value that is fixed, or switched by a [`StateMachine`].
pub enum Managed<K: StateKey, V> {
    /// Always shows the same value.
    Stateless(Arc<V>),

    /// Shows whatever the machine currently considers active.
    Stateful(Arc<StateMachine<K, V>>),
}

impl<K: StateKey, V> Managed<K, V> {
    /// Wraps a single fixed value.
    pub fn stateless(value: V) -> Self {
        Self::Stateless(Arc::new(value))
    }

    /// Wraps a shared state machine.
    pub fn stateful(machine: Arc<StateMachine<K, V>>) -> Self {
        Self::Stateful(machine)
    }

    /// Returns the currently shown value.
    ///
    /// Fails with `NotInitialized` only for an uninitialized machine.
    pub fn active(&self) -> Result<Arc<V>> {
        match self {
            Self::Stateless(value) => Ok(Arc::clone(value)),
            Self::Stateful(machine) => machine.active(),
        }
    }

    /// Returns the machine behind a stateful value.
    pub fn machine(&self) -> Option<&Arc<StateMachine<K, V>>> {
        match self {
            Self::Stateless(_) => None,
            Self::Stateful(machine) => Some(machine),
        }
    }
}

impl<K: StateKey, V> Clone for Managed<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Stateless(value) => Self::Stateless(Arc::clone(value)),
            Self::Stateful(machine) => Self::Stateful(Arc::clone(machine)),
        }
    }
}

impl<K: StateKey> Skin for Managed<K, Sprite> {
    fn sprite(&self) -> Result<Arc<Sprite>> {
        self.active()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::core::render::TextureHandle;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Phase {
        Idle,
        Busy,
    }

    fn sprite(id: u64) -> Sprite {
        Sprite::new(TextureHandle(id), 10, 10)
    }

    #[test]
    fn stateless_always_returns_same_value() {
        let managed: Managed<Phase, u32> = Managed::stateless(3);
        assert_eq!(*managed.active().unwrap(), 3);
        assert!(managed.machine().is_none());
    }

    #[test]
    fn stateful_follows_machine() {
        let machine = Arc::new(StateMachine::new());
        machine.initialize(Phase::Idle, "idle").unwrap();
        machine.bind(Phase::Busy, "busy");
        machine.define_transition(Phase::Idle, Phase::Busy);

        let managed = Managed::stateful(Arc::clone(&machine));
        assert_eq!(*managed.active().unwrap(), "idle");

        machine.transition(Phase::Busy).unwrap();
        assert_eq!(*managed.active().unwrap(), "busy");
    }

    #[test]
    fn uninitialized_machine_reports_not_initialized() {
        let managed: Managed<Phase, u32> = Managed::stateful(Arc::new(StateMachine::new()));
        assert!(matches!(managed.active(), Err(Error::NotInitialized)));
    }

    #[test]
    fn managed_sprite_is_a_skin() {
        let machine = Arc::new(StateMachine::new());
        machine.initialize(Phase::Idle, sprite(1)).unwrap();
        machine.bind(Phase::Busy, sprite(2));
        machine.define_transition(Phase::Idle, Phase::Busy);

        let skin: Box<dyn Skin> = Box::new(Managed::stateful(Arc::clone(&machine)));
        assert_eq!(skin.sprite().unwrap().texture, TextureHandle(1));

        machine.transition(Phase::Busy).unwrap();
        assert_eq!(skin.sprite().unwrap().texture, TextureHandle(2));
    }
}
