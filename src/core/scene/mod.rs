//=========================================================================
// Scene System
//=========================================================================
//
// Scenes and the registry that switches between them.
//
// Architecture:
//   SceneRegistry<K>
//     ├─ machine: StateMachine<K, Scene>      (active scene + edges)
//     ├─ pending: TransitionQueue<K>          (deferred requests)
//     └─ injector: EventInjector              (SceneChanged markers)
//
//   Scene
//     └─ controllers (registration order) → objects
//
//=========================================================================

//=== Module Declarations =================================================

mod registry;
#[allow(clippy::module_inception)]
mod scene;
mod transition_queue;

//=== Public API ==========================================================

pub use registry::SceneRegistry;
pub use scene::Scene;
pub use transition_queue::TransitionQueue;
