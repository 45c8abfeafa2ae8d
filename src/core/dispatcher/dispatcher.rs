//=========================================================================
// Dispatcher
//=========================================================================
//
// Single-threaded frame loop over the active scene.
//
// Per tick, in fixed order:
// ```text
//   1. drain every pending event from the source
//        Quit          → exit callback, Stopped, return Exit
//        SceneChanged  → commit_pending_transition (+ start new scene)
//        anything else → Controller::update, then object callbacks
//   2. clear → render visible objects → present
// ```
//
// Errors from controller hooks or from committing an illegal transition
// are not caught: the tick returns them and the dispatcher stops.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use super::FrameStats;
use crate::core::error::Result;
use crate::core::input::{Event, EventSource};
use crate::core::render::Surface;
use crate::core::scene::SceneRegistry;
use crate::core::state::StateKey;

//=== Constants ===========================================================

/// Events drained in a single tick above which a backlog is reported.
const BACKLOG_WARNING: usize = 100;

//=== Types ===============================================================

/// Called with the quit event before the loop stops.
pub type ExitCallback = Box<dyn FnMut(&Event) + Send>;

/// Outcome of a single [`Dispatcher::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

/// Lifecycle of the loop. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Running,
    Stopped,
}

//=== Dispatcher ==========================================================

pub struct Dispatcher<K: StateKey, S: Surface> {
    scenes: SceneRegistry<K>,
    source: Box<dyn EventSource + Send>,
    surface: S,
    exit_callback: Option<ExitCallback>,
    state: DispatchState,
    root_started: bool,
    frame_stats: Option<FrameStats>,
    frame_duration: Option<Duration>,
}

impl<K: StateKey, S: Surface> Dispatcher<K, S> {
    //--- Construction -----------------------------------------------------

    /// Creates a dispatcher without pacing, statistics or exit callback.
    pub fn new(scenes: SceneRegistry<K>, source: impl EventSource + Send + 'static, surface: S) -> Self {
        Self {
            scenes,
            source: Box::new(source),
            surface,
            exit_callback: None,
            state: DispatchState::Running,
            root_started: false,
            frame_stats: None,
            frame_duration: None,
        }
    }

    pub fn with_exit_callback(mut self, callback: impl FnMut(&Event) + Send + 'static) -> Self {
        self.exit_callback = Some(Box::new(callback));
        self
    }

    pub(crate) fn with_boxed_exit_callback(mut self, callback: Option<ExitCallback>) -> Self {
        self.exit_callback = callback;
        self
    }

    /// Enables FPS sampling.
    pub fn with_frame_stats(mut self) -> Self {
        self.frame_stats = Some(FrameStats::new());
        self
    }

    /// Caps [`run`](Self::run) at `fps` frames per second.
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0.0`.
    pub fn with_frame_pacing(mut self, fps: f64) -> Self {
        assert!(fps > 0.0, "Target FPS must be positive, got {}", fps);
        self.frame_duration = Some(Duration::from_secs_f64(1.0 / fps));
        self
    }

    //--- Execution --------------------------------------------------------

    /// Ticks until a quit event arrives or a hook fails.
    pub fn run(&mut self) -> Result<()> {
        info!("Dispatcher running");

        loop {
            let frame_start = Instant::now();

            if let TickControl::Exit = self.tick()? {
                break;
            }

            if let Some(frame_duration) = self.frame_duration {
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }

        info!("Dispatcher stopped");
        Ok(())
    }

    /// Runs exactly one iteration of the loop.
    ///
    /// The root scene is started before the first iteration. Once stopped,
    /// every further call returns `Exit` without touching the source.
    pub fn tick(&mut self) -> Result<TickControl> {
        if self.state == DispatchState::Stopped {
            return Ok(TickControl::Exit);
        }

        match self.step() {
            Ok(control) => Ok(control),
            Err(err) => {
                error!("Dispatcher stopped on error: {}", err);
                self.state = DispatchState::Stopped;
                Err(err)
            }
        }
    }

    fn step(&mut self) -> Result<TickControl> {
        if !self.root_started {
            self.scenes.active()?.start()?;
            self.root_started = true;
        }

        //--- Step 1: Drain events ---------------------------------------
        let mut drained = 0usize;
        while let Some(event) = self.source.poll() {
            drained += 1;
            match event {
                Event::Quit => {
                    info!("Quit received, stopping dispatcher");
                    if let Some(callback) = self.exit_callback.as_mut() {
                        callback(&event);
                    }
                    self.state = DispatchState::Stopped;
                    return Ok(TickControl::Exit);
                }
                Event::SceneChanged => {
                    if let Some(scene) = self.scenes.commit_pending_transition()? {
                        scene.start()?;
                    }
                }
                _ => self.scenes.active()?.deliver(&event)?,
            }
        }

        if drained >= BACKLOG_WARNING {
            warn!("Event backlog: drained {} events this frame", drained);
        }

        //--- Step 2: Draw -----------------------------------------------
        let scene = self.scenes.active()?;
        self.surface.clear();
        scene.render(&mut self.surface)?;
        self.surface.present();

        if let Some(stats) = self.frame_stats.as_mut() {
            stats.record_frame();
        }

        Ok(TickControl::Continue)
    }

    //--- Query API --------------------------------------------------------

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DispatchState::Running
    }

    pub fn scenes(&self) -> &SceneRegistry<K> {
        &self.scenes
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn frame_stats(&self) -> Option<&FrameStats> {
        self.frame_stats.as_ref()
    }

    /// Consumes the dispatcher, handing back its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
