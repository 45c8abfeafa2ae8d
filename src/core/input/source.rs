//=========================================================================
// Event Transport
//=========================================================================
//
// Bounded crossbeam channel between event producers (the winit platform,
// scene transition requests, host code) and the dispatcher.
//
// Architecture:
//   EventInjector (Clone, any thread) ──try_send──→ bounded channel
//                                                        ↓
//   Dispatcher ←──poll (try_recv)── ChannelEventSource (single consumer)
//
// Neither side ever blocks: a full channel rejects the injection and an
// empty one ends the dispatcher's drain for the frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use log::trace;

//=== Internal Dependencies ===============================================

use super::Event;
use crate::core::error::{Error, Result};

//=== EventSource =========================================================

/// Pollable stream of discrete events feeding the dispatcher.
pub trait EventSource {
    /// Returns the next pending event without blocking.
    fn poll(&mut self) -> Option<Event>;

    /// Number of events currently waiting, if the source can tell.
    fn pending(&self) -> usize {
        0
    }
}

//=== event_channel =======================================================

/// Creates a bounded event channel holding at most `capacity` events.
///
/// # Panics
///
/// Panics if `capacity` is zero, since a rendezvous channel would make
/// every non-blocking injection fail.
pub fn event_channel(capacity: usize) -> (EventInjector, ChannelEventSource) {
    assert!(capacity > 0, "event channel capacity must be > 0");
    let (sender, receiver) = bounded(capacity);
    (EventInjector { sender }, ChannelEventSource { receiver })
}

//=== EventInjector =======================================================

/// Producer half of the event channel. Cheap to clone and `Send`.
#[derive(Clone)]
pub struct EventInjector {
    sender: Sender<Event>,
}

impl EventInjector {
    /// Queues `event` for the dispatcher.
    ///
    /// # Errors
    ///
    /// [`Error::SignalRejected`] if the channel is full or the dispatcher
    /// side has been dropped.
    pub fn inject(&self, event: Event) -> Result<()> {
        match self.sender.try_send(event) {
            Ok(()) => {
                trace!("Injected {:?}", event.kind());
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(Error::SignalRejected {
                reason: format!("channel full ({} pending)", self.sender.len()),
            }),
            Err(TrySendError::Disconnected(_)) => Err(Error::SignalRejected {
                reason: "dispatcher disconnected".to_string(),
            }),
        }
    }

    /// Number of events injected but not yet polled.
    pub fn pending(&self) -> usize {
        self.sender.len()
    }
}

impl std::fmt::Debug for EventInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventInjector")
            .field("pending", &self.sender.len())
            .finish()
    }
}

//=== ChannelEventSource ==================================================

/// Consumer half of the event channel.
pub struct ChannelEventSource {
    receiver: Receiver<Event>,
}

impl EventSource for ChannelEventSource {
    fn poll(&mut self) -> Option<Event> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    fn pending(&self) -> usize {
        self.receiver.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
