//! Event - the unit of notification
//!
//! A named, timestamped value carrying a replaceable payload.

use chrono::{DateTime, Utc};

/// Event capability consumed by the dispatcher
///
/// The dispatcher only routes on [`Event::name`]; payload and timestamp are
/// for handlers.
pub trait Event: Send + Sync + 'static {
    /// Payload carried by the event
    type Payload;

    /// Routing key
    fn name(&self) -> &str;

    /// Current payload
    fn payload(&self) -> &Self::Payload;

    /// Replace the payload
    fn set_payload(&mut self, payload: Self::Payload);

    /// Creation time, fixed at construction
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// General-purpose event generic over its payload type
///
/// # Examples
/// ```
/// use contracts::{BasicEvent, Event};
///
/// let mut event = BasicEvent::new("order.created", "pending");
/// event.set_payload("paid");
/// assert_eq!(event.name(), "order.created");
/// assert_eq!(*event.payload(), "paid");
/// ```
#[derive(Debug, Clone)]
pub struct BasicEvent<P> {
    name: String,
    payload: P,
    occurred_at: DateTime<Utc>,
}

impl<P> BasicEvent<P> {
    /// Create an event stamped with the current time
    pub fn new(name: impl Into<String>, payload: P) -> Self {
        Self::with_timestamp(name, payload, Utc::now())
    }

    /// Create an event with an explicit timestamp
    pub fn with_timestamp(name: impl Into<String>, payload: P, occurred_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            payload,
            occurred_at,
        }
    }

    /// Consume the event and return its payload
    pub fn into_payload(self) -> P {
        self.payload
    }
}

impl<P: Send + Sync + 'static> Event for BasicEvent<P> {
    type Payload = P;

    fn name(&self) -> &str {
        &self.name
    }

    fn payload(&self) -> &P {
        &self.payload
    }

    fn set_payload(&mut self, payload: P) {
        self.payload = payload;
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
