//=========================================================================
// Keystage Engine
//
// Main entry point and coordinator for the runtime.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run()──>  [Runtime]
//         │                          │                                        │
//         ├─ with_title()            └─ GlobalContext                         ├─ dispatcher thread
//         ├─ with_channel_capacity()    (bus, scenes, injector)               └─ winit loop (main)
//         └─ with_target_fps()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::thread;
use std::time::Duration;

use log::{error, info, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::dispatcher::{Dispatcher, ExitCallback};
use crate::core::input::{event_channel, ChannelEventSource, Event, EventInjector};
use crate::core::render::Surface;
use crate::core::state::StateKey;
use crate::core::{self, GlobalContext};
use crate::platform::{Platform, PlatformError, WindowConfig};

//=== EngineError =========================================================

/// Failures of the windowed runtime.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("dispatcher failed: {0}")]
    Dispatcher(#[from] core::Error),

    #[error("dispatcher thread could not be spawned: {0}")]
    Spawn(#[source] io::Error),

    #[error("dispatcher thread panicked")]
    DispatcherPanicked,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: `"Keystage"`, window 680x480
/// - **Channel capacity**: 256 events
/// - **Message capacity**: 1024 messages per destination
/// - **Frame pacing**: 60 FPS
/// - **Frame statistics**: off
///
/// # Examples
///
/// ```no_run
/// use keystage::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Screen { Menu }
///
/// EngineBuilder::<Screen>::new()
///     .with_title("Demo")
///     .with_target_fps(120.0)
///     .build()
///     .init(|ctx| {
///         ctx.scenes.add_scene(Screen::Menu, "Menu").ok();
///     })
///     .run(RecordingSurface::new())
///     .ok();
/// ```
pub struct EngineBuilder<K: StateKey> {
    title: String,
    window_size: (u32, u32),
    channel_capacity: usize,
    message_capacity: usize,
    target_fps: Option<f64>,
    frame_stats: bool,
    exit_callback: Option<ExitCallback>,
    _phantom: std::marker::PhantomData<K>,
}

impl<K: StateKey> EngineBuilder<K> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Keystage".to_string(),
            window_size: (680, 480),
            channel_capacity: 256,
            message_capacity: 1024,
            target_fps: Some(60.0),
            frame_stats: false,
            exit_callback: None,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Sets the initial logical window size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.window_size = (width, height);
        self
    }

    /// Sets the capacity of the input event channel.
    ///
    /// When the dispatcher falls behind, injections beyond this capacity
    /// are rejected instead of blocking the window thread.
    ///
    /// Default: 256
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the per-destination capacity of the message bus.
    ///
    /// Default: 1024
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_message_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Message capacity must be positive");
        self.message_capacity = capacity;
        self
    }

    /// Caps the dispatcher at `fps` frames per second.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0.0`.
    pub fn with_target_fps(mut self, fps: f64) -> Self {
        assert!(fps > 0.0, "Target FPS must be positive, got {}", fps);
        self.target_fps = Some(fps);
        self
    }

    /// Lets the dispatcher spin as fast as it can.
    pub fn without_frame_pacing(mut self) -> Self {
        self.target_fps = None;
        self
    }

    pub fn with_frame_stats(mut self, enabled: bool) -> Self {
        self.frame_stats = enabled;
        self
    }

    /// Called with the quit event right before the dispatcher stops.
    pub fn with_exit_callback(mut self, callback: impl FnMut(&Event) + Send + 'static) -> Self {
        self.exit_callback = Some(Box::new(callback));
        self
    }

    /// Builds the engine, creating the event channel and global context.
    pub fn build(self) -> Engine<K> {
        info!(
            "Building engine (channel: {}, messages: {}, fps: {:?})",
            self.channel_capacity, self.message_capacity, self.target_fps
        );

        let (injector, source) = event_channel(self.channel_capacity);
        let context = GlobalContext::new(self.message_capacity, injector);

        Engine {
            context,
            source,
            window: WindowConfig {
                title: self.title,
                width: self.window_size.0,
                height: self.window_size.1,
            },
            target_fps: self.target_fps,
            frame_stats: self.frame_stats,
            exit_callback: self.exit_callback,
        }
    }
}

impl<K: StateKey> Default for EngineBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Keystage runtime.
///
/// # Architecture
///
/// ```text
/// Engine
///   ├─► Dispatcher (own thread, paced)
///   │     └─► active Scene → Controllers → Surface
///   │
///   └─► Platform (main thread, winit event loop)
///         └─► Window, input → EventInjector
///
/// Communication: bounded event channel (Event)
/// ```
pub struct Engine<K: StateKey> {
    context: GlobalContext<K>,
    source: ChannelEventSource,
    window: WindowConfig,
    target_fps: Option<f64>,
    frame_stats: bool,
    exit_callback: Option<ExitCallback>,
}

impl<K: StateKey> Engine<K> {
    //--- Initialization ---------------------------------------------------

    /// Wires scenes, controllers and objects before the engine runs.
    ///
    /// The first scene added becomes the root scene.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GlobalContext<K>),
    {
        info!("Initializing engine context");
        init_fn(&mut self.context);
        info!(
            "Engine initialization complete ({} destinations)",
            self.context.bus.destinations().len()
        );
        self
    }

    pub fn context(&self) -> &GlobalContext<K> {
        &self.context
    }

    /// Handle for injecting events from outside the engine, e.g. a test
    /// driver or a worker thread.
    pub fn injector(&self) -> EventInjector {
        self.context.injector.clone()
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and blocks until the application exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Spawns the dispatcher thread, which owns `surface`
    /// 2. Runs the winit event loop on the calling thread
    /// 3. On window close: `Quit` is injected → dispatcher stops
    /// 4. Joins the dispatcher thread
    ///
    /// # Errors
    ///
    /// Returns the platform error if the event loop failed, otherwise the
    /// dispatcher's error if it stopped on a failure.
    pub fn run<S: Surface + 'static>(self, surface: S) -> Result<(), EngineError> {
        info!("Starting engine runtime (fps: {:?})", self.target_fps);

        let injector = self.context.injector.clone();
        let platform = Platform::new(injector.clone(), self.window.clone());
        let mut dispatcher = self.into_dispatcher(surface);

        //--- 1. Spawn the dispatcher thread ------------------------------
        let handle = thread::Builder::new()
            .name("keystage-dispatcher".to_string())
            .spawn(move || dispatcher.run())
            .map_err(EngineError::Spawn)?;
        info!("Dispatcher thread spawned");

        //--- 2. Run the platform ------------------------------------------
        let platform_result = platform.run();
        if let Err(e) = &platform_result {
            error!("Platform error: {}", e);
        }
        info!("Platform event loop exited");

        //--- 3. Make sure the dispatcher sees a quit ----------------------
        while !handle.is_finished() {
            if injector.inject(Event::Quit).is_ok() {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }

        //--- 4. Join ------------------------------------------------------
        let dispatch_result = match handle.join() {
            Ok(result) => result.map_err(EngineError::from),
            Err(_) => Err(EngineError::DispatcherPanicked),
        };
        if let Err(e) = &dispatch_result {
            error!("Dispatcher terminated abnormally: {}", e);
        }

        info!("Engine shutdown complete");
        platform_result?;
        dispatch_result
    }

    /// Runs the dispatcher on the calling thread without a window.
    ///
    /// Only events injected through [`injector`](Self::injector) (or the
    /// context's injector) reach the loop, so something must eventually
    /// inject `Event::Quit`. Returns the surface once the loop stops.
    pub fn run_headless<S: Surface>(self, surface: S) -> core::Result<S> {
        info!("Starting headless engine runtime");

        let mut dispatcher = self.into_dispatcher(surface);
        dispatcher.run()?;
        Ok(dispatcher.into_surface())
    }

    fn into_dispatcher<S: Surface>(self, surface: S) -> Dispatcher<K, S> {
        let mut dispatcher = Dispatcher::new(self.context.scenes, self.source, surface)
            .with_boxed_exit_callback(self.exit_callback);
        if let Some(fps) = self.target_fps {
            dispatcher = dispatcher.with_frame_pacing(fps);
        }
        if self.frame_stats {
            dispatcher = dispatcher.with_frame_stats();
        }
        dispatcher
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::controller::{Controller, ControllerContext};
    use crate::core::render::RecordingSurface;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        Main,
        Pause,
    }

    struct Starter(Arc<AtomicBool>);

    impl Controller for Starter {
        fn start(&mut self, _: &mut ControllerContext<'_>) -> core::Result<()> {
            self.0.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn update(&mut self, _: &mut ControllerContext<'_>, _: &Event) -> core::Result<()> {
            Ok(())
        }
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::<TestScene>::new();
        assert_eq!(builder.title, "Keystage");
        assert_eq!(builder.window_size, (680, 480));
        assert_eq!(builder.channel_capacity, 256);
        assert_eq!(builder.message_capacity, 1024);
        assert_eq!(builder.target_fps, Some(60.0));
        assert!(!builder.frame_stats);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let builder = EngineBuilder::<TestScene>::new()
            .with_title("Demo")
            .with_window_size(800, 600)
            .with_channel_capacity(32)
            .with_message_capacity(8)
            .with_target_fps(120.0)
            .with_frame_stats(true);

        assert_eq!(builder.title, "Demo");
        assert_eq!(builder.window_size, (800, 600));
        assert_eq!(builder.channel_capacity, 32);
        assert_eq!(builder.message_capacity, 8);
        assert_eq!(builder.target_fps, Some(120.0));
        assert!(builder.frame_stats);
    }

    #[test]
    fn builder_without_frame_pacing() {
        let builder = EngineBuilder::<TestScene>::new().without_frame_pacing();
        assert_eq!(builder.target_fps, None);
    }

    #[test]
    #[should_panic(expected = "Target FPS must be positive")]
    fn builder_with_target_fps_panics_on_zero() {
        EngineBuilder::<TestScene>::new().with_target_fps(0.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::<TestScene>::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Message capacity must be positive")]
    fn builder_with_message_capacity_panics_on_zero() {
        EngineBuilder::<TestScene>::new().with_message_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_window_size_panics_on_zero() {
        EngineBuilder::<TestScene>::new().with_window_size(0, 480);
    }

    //=====================================================================
    // Engine Tests
    //=====================================================================

    #[test]
    fn build_applies_capacities() {
        let engine = EngineBuilder::<TestScene>::new()
            .with_channel_capacity(2)
            .with_message_capacity(3)
            .build();

        assert_eq!(engine.context().bus.capacity(), 3);

        let injector = engine.injector();
        injector.inject(Event::User(1)).unwrap();
        injector.inject(Event::User(2)).unwrap();
        assert!(injector.inject(Event::User(3)).is_err());
    }

    #[test]
    fn init_wires_the_context() {
        let engine = EngineBuilder::<TestScene>::new().build().init(|ctx| {
            ctx.scenes.add_scene(TestScene::Main, "Main").unwrap();
            ctx.scenes.add_scene(TestScene::Pause, "Pause").unwrap();
            ctx.scenes.define_bidirectional(TestScene::Main, TestScene::Pause).unwrap();
        });

        let scenes = &engine.context().scenes;
        assert_eq!(scenes.active_state().unwrap(), TestScene::Main);
        assert!(scenes.can_transition(TestScene::Pause, TestScene::Main));
    }

    #[test]
    fn run_headless_stops_on_quit() {
        let started = Arc::new(AtomicBool::new(false));
        let exits = Arc::new(AtomicUsize::new(0));

        let exit_count = Arc::clone(&exits);
        let flag = Arc::clone(&started);
        let engine = EngineBuilder::<TestScene>::new()
            .without_frame_pacing()
            .with_exit_callback(move |_| {
                exit_count.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .init(move |ctx| {
                let scene = ctx.scenes.add_scene(TestScene::Main, "Main").unwrap();
                scene.add_controller("starter", Starter(flag)).unwrap();
            });

        engine.injector().inject(Event::Quit).unwrap();
        let surface = engine.run_headless(RecordingSurface::new()).unwrap();

        assert!(started.load(Ordering::SeqCst));
        assert_eq!(exits.load(Ordering::SeqCst), 1);
        assert_eq!(surface.frames_presented(), 0);
    }

    #[test]
    fn run_headless_without_scenes_fails() {
        let engine = EngineBuilder::<TestScene>::new().without_frame_pacing().build();
        engine.injector().inject(Event::Quit).unwrap();

        let result = engine.run_headless(RecordingSurface::new());
        assert!(matches!(result, Err(core::Error::NotInitialized)));
    }
}
