//=========================================================================
// Transition Queue
//=========================================================================
//
// FIFO of requested scene keys awaiting commit on the dispatch thread.
//
// Each entry is paired with exactly one `SceneChanged` marker in the
// event stream; the registry keeps the two in step under one mutex.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

//=== Internal Dependencies ===============================================

use crate::core::state::StateKey;

//=== TransitionQueue =====================================================

/// Pending scene transitions, oldest first.
#[derive(Debug)]
pub struct TransitionQueue<K: StateKey> {
    queue: VecDeque<K>,
}

impl<K: StateKey> TransitionQueue<K> {
    pub fn new() -> Self {
        Self { queue: VecDeque::new() }
    }

    /// Queues a transition to `to`.
    pub fn push(&mut self, to: K) {
        self.queue.push_back(to);
    }

    /// Takes the oldest request.
    pub fn pop(&mut self) -> Option<K> {
        self.queue.pop_front()
    }

    /// Withdraws the newest request, used when its marker was rejected.
    pub(crate) fn retract(&mut self) -> Option<K> {
        self.queue.pop_back()
    }

    pub fn peek(&self) -> Option<&K> {
        self.queue.front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }
}

impl<K: StateKey> Default for TransitionQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_is_fifo_and_retract_is_lifo() {
        let mut queue = TransitionQueue::new();
        queue.push(1u8);
        queue.push(2);
        queue.push(3);

        assert_eq!(queue.retract(), Some(3));
        assert_eq!(queue.peek(), Some(&1));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }
}
