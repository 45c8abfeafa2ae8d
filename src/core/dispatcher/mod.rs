//=========================================================================
// Dispatch System
//=========================================================================
//
// The frame loop and its optional instrumentation.
//
// Architecture:
//   EventSource ──poll──→ Dispatcher ──deliver──→ active Scene
//                            │
//                            └──render──→ Surface (clear/draw_at/present)
//
//=========================================================================

//=== Module Declarations =================================================

#[allow(clippy::module_inception)]
mod dispatcher;
mod frame_stats;

//=== Public API ==========================================================

pub use dispatcher::{DispatchState, Dispatcher, ExitCallback, TickControl};
pub use frame_stats::{FrameStats, SAMPLE_FRAMES};
