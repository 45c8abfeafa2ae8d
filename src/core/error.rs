//=========================================================================
// Core Errors
//=========================================================================
//
// Error taxonomy shared by every core system.
//
// Two families:
//   Hard  → topology bugs (uninitialized machine, illegal edge, name
//           collision). Propagated with `?` and never caught internally.
//   Soft  → backpressure (full queue). Surfaced as ordinary return
//           values by the public API; the variant exists so queues can
//           report *why* an enqueue was refused.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Error ===============================================================

/// Errors raised by the state, messaging, scene and dispatch systems.
#[derive(Debug, Error)]
pub enum Error {
    /// A state machine was queried or transitioned before `initialize`.
    #[error("state machine used before initialization")]
    NotInitialized,

    /// `initialize` was called a second time.
    #[error("state machine is already initialized")]
    AlreadyInitialized,

    /// No edge `from → to` has been declared.
    #[error("illegal transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },

    /// Lookup of an unbound state, unknown scene, controller or object.
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },

    /// No component ever registered a queue under this destination name.
    #[error("message destination {0} not found")]
    DestinationNotFound(String),

    /// Name collision while registering a scene, controller or object.
    #[error("{kind} {name} is already registered")]
    DuplicateRegistration { kind: &'static str, name: String },

    /// Destination queue is full. Soft: the bus turns this into `false`.
    #[error("pending messages to {destination} exceeded capacity {capacity}")]
    CapacityExceeded { destination: String, capacity: usize },

    /// The input channel refused an injected event (full or closed).
    #[error("event channel rejected injected event: {reason}")]
    SignalRejected { reason: String },

    /// Asset store could not produce a drawable for `path`.
    #[error("failed to load asset {path}: {reason}")]
    AssetLoad { path: String, reason: String },

    /// A controller's update or start hook reported a failure.
    #[error("controller {controller} failed: {reason}")]
    Controller { controller: String, reason: String },

    /// A controller asked its scene for its own objects from inside one
    /// of its hooks. The hook already holds them through its context.
    #[error("controller {0} is running a hook; use its context instead")]
    ControllerBusy(String),
}

impl Error {
    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound { kind, name: name.into() }
    }

    /// Shorthand for [`Error::DuplicateRegistration`].
    pub fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        Self::DuplicateRegistration { kind, name: name.into() }
    }

    /// Shorthand for [`Error::Controller`], for use inside `update` hooks.
    pub fn controller(controller: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Controller {
            controller: controller.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for backpressure conditions that do not indicate a bug.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, Error>;

//=========================================================================
// Tests
//=========================================================================
