//=========================================================================
// Global Engine State
//=========================================================================
//
// Shared resources constructed once at startup and injected by handle.
//
// Architecture:
//   GlobalContext: MessageBus + SceneRegistry + EventInjector
//                  (handed to the host in Engine::init)
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;

//=== Public API ==========================================================

pub use global_context::GlobalContext;
