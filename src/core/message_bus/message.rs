//=========================================================================
// Message
//=========================================================================
//
// Envelope routed by the bus: a destination name plus a type-erased
// payload. Receivers downcast to the payload type they expect.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;

//=== Message =============================================================

/// A payload addressed to a named component.
pub struct Message {
    destination: String,
    payload: Box<dyn Any + Send>,
}

impl Message {
    /// Creates a message for `destination` carrying `payload`.
    pub fn new<P: Any + Send>(destination: impl Into<String>, payload: P) -> Self {
        Self {
            destination: destination.into(),
            payload: Box::new(payload),
        }
    }

    /// Name of the component this message is addressed to.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Returns true if the payload is a `P`.
    pub fn is<P: Any>(&self) -> bool {
        self.payload.is::<P>()
    }

    /// Borrows the payload as `P`, or `None` on type mismatch.
    pub fn payload<P: Any>(&self) -> Option<&P> {
        self.payload.downcast_ref::<P>()
    }

    /// Takes the payload as `P`, handing the message back on mismatch.
    pub fn into_payload<P: Any>(self) -> Result<P, Self> {
        let Self { destination, payload } = self;
        match payload.downcast::<P>() {
            Ok(value) => Ok(*value),
            Err(payload) => Err(Self { destination, payload }),
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Increment(u32);

    #[test]
    fn payload_downcasts_to_its_type() {
        let msg = Message::new("counter", Increment(2));

        assert_eq!(msg.destination(), "counter");
        assert!(msg.is::<Increment>());
        assert_eq!(msg.payload::<Increment>(), Some(&Increment(2)));
        assert!(msg.payload::<String>().is_none());
    }

    #[test]
    fn into_payload_returns_message_on_mismatch() {
        let msg = Message::new("counter", String::from("message"));

        let msg = msg.into_payload::<Increment>().unwrap_err();
        assert_eq!(msg.destination(), "counter");
        assert_eq!(msg.into_payload::<String>().unwrap(), "message");
    }
}
