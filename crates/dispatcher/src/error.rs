//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatcherError {
    /// The same handler is already registered for this event name
    #[error("handler already registered for event '{event_name}'")]
    AlreadyRegistered { event_name: String },
}

impl DispatcherError {
    /// Create an already-registered error
    pub fn already_registered(event_name: impl Into<String>) -> Self {
        Self::AlreadyRegistered {
            event_name: event_name.into(),
        }
    }
}
