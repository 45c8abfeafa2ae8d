//=========================================================================
// Platform Subsystem
//
// Bridges winit (OS-level events) with the dispatcher thread through the
// shared event channel.
//
// Architecture:
// ```text
//  Main Thread:                     Dispatcher Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  winit Event Loop        │    │  Dispatcher      │
//  │   ↓                      │    │   ↓              │
//  │  InputProcessor          │    │  active Scene    │
//  │   └─ sticky modifiers    │    │   ↓              │
//  │   ↓                      │    │  Controllers     │
//  │  InputBuffer             │    │   ↓              │
//  │   ├─ dedup discrete      │    │  Surface         │
//  │   └─ coalesce cursor     │    └──────────────────┘
//  │   ↓                      │             ↑
//  │  RedrawRequested (flush) │             │
//  │   ↓                      │             │
//  │  EventInjector ──────────┼─────────────┘
//  └──────────────────────────┘    Event
// ```
//
// The injector is the same type the scene registry uses for transition
// markers, so platform input and markers share one FIFO.
//
// winit requires the event loop on the main thread (macOS/iOS), so this
// runs on the thread that called `Engine::run()`.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use log::*;
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::input::{Event, EventInjector};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== PlatformError =======================================================

/// Event loop failures. Both are fatal for the windowed runtime.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),
}

//=== WindowConfig ========================================================

#[derive(Debug, Clone)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Window owner and input aggregator.
///
/// Not `Send`: it must stay on the main thread. The only thing crossing
/// the thread boundary is what goes through the injector.
pub(crate) struct Platform {
    /// Created lazily in `resumed()` (mobile compatibility).
    window: Option<Window>,
    config: WindowConfig,
    buffer: InputBuffer,
    processor: InputProcessor,
    injector: EventInjector,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(injector: EventInjector, config: WindowConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            config,
            buffer: InputBuffer::new(),
            processor: InputProcessor::new(),
            injector,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Injects the buffered input in order.
    ///
    /// The channel never blocks the window thread: once an injection is
    /// rejected, the rest of the frame's input is dropped with a warning.
    fn flush_input(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        trace!(target: "platform::input", "Flushing {} input events", self.buffer.len());
        let events = self.buffer.drain();
        let total = events.len();

        for (sent, input) in events.into_iter().enumerate() {
            if let Err(e) = self.injector.inject(Event::Input(input)) {
                warn!(
                    target: "platform::input",
                    "Dropping {} of {} input events: {}",
                    total - sent,
                    total,
                    e
                );
                return;
            }
        }
    }

    fn request_quit(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(e) = self.injector.inject(Event::Quit) {
            warn!(target: "platform", "Quit not delivered to dispatcher: {}", e);
        }
        event_loop.exit();
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== winit Integration ===================================================

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window \"{}\" created: {}x{} @ {}x DPI",
                    self.config.title,
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.request_quit(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.flush_input();
                self.request_quit(event_loop);
            }

            WindowEvent::ModifiersChanged(state) => {
                self.processor.update_modifiers(state.state());
                trace!(target: "platform::input", "Modifiers changed: {:?}", self.processor.modifiers());
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.buffer.push(self.processor.cursor(position.x, position.y));
            }

            WindowEvent::KeyboardInput { event, .. } => match self.processor.key(&event) {
                Some(input) => self.buffer.push(input),
                None => trace!(target: "platform::input", "Unmapped key ignored"),
            },

            WindowEvent::MouseInput { state, button, .. } => {
                self.buffer.push(self.processor.mouse_button(button, state));
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary
                self.flush_input();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
