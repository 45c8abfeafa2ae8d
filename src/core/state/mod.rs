//=========================================================================
// State System
//=========================================================================
//
// Generic keyed state machines, used for scene selection and for
// switching the visual variant of an object.
//
// Components:
//   StateMachine<K, V>  → bindings + directed transition graph
//   Managed<K, V>       → Stateless(V) | Stateful(StateMachine<K, V>)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Module Declarations =================================================

mod machine;
mod managed;

//=== Public API ==========================================================

pub use machine::StateMachine;
pub use managed::Managed;

//=== State Key Trait =====================================================

/// Marker trait for state identifiers.
///
/// Keys select bound values in a [`StateMachine`] and identify scenes in
/// the scene registry. Typically implemented by application enums;
/// automatically implemented for any type meeting the bounds.
pub trait StateKey: Clone + Copy + Eq + Hash + Debug + Send + Sync + 'static {}

// Blanket implementation
impl<T: Clone + Copy + Eq + Hash + Debug + Send + Sync + 'static> StateKey for T {}
