//! FnHandler - closure adapter

use async_trait::async_trait;
use contracts::{Event, EventHandler};

/// Handler backed by a synchronous closure
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use contracts::{BasicEvent, Event};
/// use dispatcher::{EventDispatcher, FnHandler};
///
/// let dispatcher = EventDispatcher::<BasicEvent<u32>>::new();
/// let handler = Arc::new(FnHandler::new(|event: &BasicEvent<u32>| {
///     println!("{} -> {}", event.name(), event.payload());
/// }));
/// dispatcher.register("tick", handler.clone()).unwrap();
/// assert!(dispatcher.has("tick", &handler));
/// ```
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F> {
    /// Wrap `f`
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<E, F> EventHandler<E> for FnHandler<F>
where
    E: Event,
    F: Fn(&E) + Send + Sync,
{
    async fn handle(&self, event: &E) {
        (self.f)(event)
    }
}
