//! LogHandler - logs event summary via tracing

use async_trait::async_trait;
use contracts::{Event, EventHandler};
use tracing::{info, instrument};

/// Handler that logs every event it receives, for debugging
pub struct LogHandler {
    name: String,
}

impl LogHandler {
    /// Create a new LogHandler with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Handler name
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<E: Event> EventHandler<E> for LogHandler {
    #[instrument(
        name = "log_handler_handle",
        skip(self, event),
        fields(handler = %self.name, event = %event.name())
    )]
    async fn handle(&self, event: &E) {
        info!(
            handler = %self.name,
            event = %event.name(),
            occurred_at = %event.occurred_at(),
            "Event received"
        );
    }
}
