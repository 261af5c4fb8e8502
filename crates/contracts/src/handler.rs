//! EventHandler trait - dispatcher callback interface

use std::sync::Arc;

use async_trait::async_trait;

use crate::Event;

/// Handler invoked once per matching dispatched event
///
/// Handlers run concurrently with every other handler registered for the
/// same event. Returning from `handle` signals completion; a handler that never
/// returns blocks the dispatch that invoked it.
///
/// There is no error channel back to the dispatcher. Fallible handlers must
/// log or escalate failures themselves.
#[async_trait]
pub trait EventHandler<E: Event>: Send + Sync {
    /// Handle one event
    async fn handle(&self, event: &E);
}

/// Shared handler reference stored by the registry
///
/// Registrations are told apart by the address of the shared allocation,
/// so clones of one `Arc` are the same handler.
pub type SharedHandler<E> = Arc<dyn EventHandler<E>>;
