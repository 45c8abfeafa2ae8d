//=========================================================================
// Keystage - Library Root
//
// Frame-based interactive application runtime: keyed state machines for
// scenes and object appearance, a bounded message bus between named
// controllers, and a deterministic dispatch loop.
//
// Typical usage:
// ```no_run
// use keystage::prelude::*;
//
// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
// enum Screen { Main }
//
// EngineBuilder::<Screen>::new()
//     .build()
//     .init(|ctx| { ctx.scenes.add_scene(Screen::Main, "Main").ok(); })
//     .run(RecordingSurface::new())
//     .ok();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every windowless system (state, bus, scenes, dispatcher).
// It is public so hosts can drive a `Dispatcher` directly, e.g. in tests.
//
pub mod core;
pub mod logging;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` is the winit integration and stays private: its only output
// is events injected through the shared `EventInjector`.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineError};
pub use logging::{init_logging, LoggingConfig};
pub use platform::PlatformError;
