//=========================================================================
// Message Bus System
//=========================================================================
//
// Actor-style messaging between named components.
//
// Architecture:
//   MessageBus
//     └─ queues: HashMap<String, Arc<MessageQueue>>
//                                  └─ VecDeque<Message> (bounded)
//
// Delivery is at-most-once enqueue, best effort: a full queue drops the
// new message and tells the sender.
//
//=========================================================================

//=== Module Declarations =================================================

mod message;
mod message_bus;
mod message_queue;

//=== Public API ==========================================================

pub use message::Message;
pub use message_bus::{MessageBus, DEFAULT_QUEUE_CAPACITY};
pub use message_queue::MessageQueue;
