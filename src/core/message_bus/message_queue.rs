//=========================================================================
// Message Queue
//=========================================================================
//
// Bounded FIFO inbox owned by one destination name.
//
// Producers on any thread push; the owning controller pops on the
// dispatch thread. At capacity, pushes are refused rather than blocking
// so a stalled consumer never stalls its producers.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

//=== Internal Dependencies ===============================================

use super::Message;
use crate::core::error::{Error, Result};

//=========================================================================

/// Bounded, thread-safe FIFO of pending messages for one destination.
pub struct MessageQueue {
    name: String,
    capacity: usize,
    messages: Mutex<VecDeque<Message>>,
}

impl MessageQueue {
    /// Creates an empty queue for `name` holding at most `capacity` messages.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            messages: Mutex::new(VecDeque::new()),
        }
    }

    //--- Message Operations -----------------------------------------------

    /// Appends a message, failing with `CapacityExceeded` when full.
    pub fn push(&self, msg: Message) -> Result<()> {
        let mut messages = self.lock();
        if messages.len() >= self.capacity {
            return Err(Error::CapacityExceeded {
                destination: self.name.clone(),
                capacity: self.capacity,
            });
        }
        messages.push_back(msg);
        Ok(())
    }

    /// Removes and returns the oldest message. Never blocks on emptiness.
    pub fn pop(&self) -> Option<Message> {
        self.lock().pop_front()
    }

    /// Drops every pending message, preserving allocated capacity.
    pub fn clear(&self) {
        self.lock().clear();
    }

    //--- Query API --------------------------------------------------------

    /// Destination name this queue belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum number of pending messages.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of messages currently pending.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//=========================================================================
// Tests
//=========================================================================
