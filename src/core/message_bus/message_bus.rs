//=========================================================================
// Message Bus
//=========================================================================
//
// Registry of named, bounded FIFO queues for actor-style messaging.
//
// Architecture:
//   Any thread → send(dest, payload) → HashMap<String, Arc<MessageQueue>>
//                                                  ↓
//   Owning controller (dispatch thread) ← pop() on its own update
//
// Pattern: register (queue_for) → send (N producers) → drain (1 owner)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Message, MessageQueue};
use crate::core::error::{Error, Result};

//=== Constants ===========================================================

/// Default number of pending messages a destination may hold.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

//=========================================================================

/// Named, bounded message queues shared by every component.
///
/// Queues are created lazily the first time a destination name is
/// referenced through [`queue_for`](Self::queue_for) and live as long as
/// the bus. Sending to a name nobody registered is an error; sending to a
/// full queue is not (it returns `false` and logs a warning).
pub struct MessageBus {
    queues: Mutex<HashMap<String, Arc<MessageQueue>>>,
    capacity: usize,
}

impl MessageBus {
    /// Creates a bus whose queues hold [`DEFAULT_QUEUE_CAPACITY`] messages.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Creates a bus whose queues hold at most `capacity` messages each.
    pub fn with_capacity(capacity: usize) -> Self {
        MessageBus {
            queues: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Returns the queue for `name`, creating an empty one on first use.
    pub fn queue_for(&self, name: &str) -> Arc<MessageQueue> {
        let mut queues = self.lock();
        if let Some(queue) = queues.get(name) {
            return Arc::clone(queue);
        }

        debug!("Registering message queue for {}", name);
        let queue = Arc::new(MessageQueue::new(name, self.capacity));
        queues.insert(name.to_string(), Arc::clone(&queue));
        queue
    }

    //--- Message Operations -----------------------------------------------

    /// Sends `payload` to `destination`.
    ///
    /// Returns `Ok(false)` if the destination's queue is full, and fails
    /// with [`Error::DestinationNotFound`] if no queue was ever registered
    /// under that name.
    pub fn send<P: Any + Send>(&self, destination: &str, payload: P) -> Result<bool> {
        self.post(Message::new(destination, payload))
    }

    /// Routes an already built message by its destination.
    pub fn post(&self, msg: Message) -> Result<bool> {
        // Release the registry lock before touching the queue
        let queue = self
            .lock()
            .get(msg.destination())
            .cloned()
            .ok_or_else(|| Error::DestinationNotFound(msg.destination().to_string()))?;

        match queue.push(msg) {
            Ok(()) => Ok(true),
            Err(err) if err.is_soft() => {
                warn!("{}, dropping message", err);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    //--- Query API --------------------------------------------------------

    /// Returns true if a queue was registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Number of messages pending for `name` (0 if unregistered).
    pub fn pending(&self, name: &str) -> usize {
        let queue = self.lock().get(name).cloned();
        queue.map(|q| q.len()).unwrap_or(0)
    }

    /// Registered destination names, in no particular order.
    pub fn destinations(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Per-destination capacity applied to new queues.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops all pending messages on every queue, keeping registrations.
    pub fn clear_all(&self) {
        let queues: Vec<Arc<MessageQueue>> = self.lock().values().cloned().collect();
        for queue in queues {
            queue.clear();
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<MessageQueue>>> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
