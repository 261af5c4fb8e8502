//! EventDispatcher - handler registry and fan-out dispatch

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, error, instrument, trace, warn};

use contracts::{DispatcherConfig, Event, SharedHandler};

use crate::error::DispatcherError;
use crate::metrics::{DispatchMetrics, DispatchMetricsSnapshot};

/// Registry mapping event names to handlers, with concurrent dispatch
///
/// All methods take `&self`; the registry is internally synchronized, so one
/// dispatcher can be shared across tasks behind an `Arc`.
///
/// Handlers are identified by the address of their `Arc` allocation.
/// Registering the same `Arc` twice under one name is rejected, two
/// different allocations are always distinct registrations.
pub struct EventDispatcher<E: Event> {
    /// Event name -> handlers in registration order
    registry: DashMap<String, Vec<SharedHandler<E>>>,
    config: DispatcherConfig,
    metrics: Arc<DispatchMetrics>,
}

impl<E: Event> EventDispatcher<E> {
    /// Create a dispatcher with default configuration
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Create a dispatcher with custom configuration
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            registry: DashMap::new(),
            config,
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Register `handler` for `event_name`
    ///
    /// # Errors
    /// [`DispatcherError::AlreadyRegistered`] if this handler is already
    /// registered for `event_name`. The registry is left unchanged.
    pub fn register(
        &self,
        event_name: impl Into<String>,
        handler: SharedHandler<E>,
    ) -> Result<(), DispatcherError> {
        let event_name = event_name.into();
        {
            let mut handlers = self.registry.entry(event_name.clone()).or_default();
            if handlers.iter().any(|h| is_same_handler(h, &handler)) {
                warn!(event = %event_name, "Handler already registered");
                return Err(DispatcherError::already_registered(event_name));
            }
            handlers.push(handler);
            debug!(event = %event_name, handlers = handlers.len(), "Handler registered");
        }
        observability::record_registry_size(self.registry.len());
        Ok(())
    }

    /// Remove `handler` from `event_name`
    ///
    /// Keeps the order of the remaining handlers. Unknown names or handlers
    /// are ignored. The name stays present even when its list becomes empty.
    pub fn remove<H: ?Sized>(&self, event_name: &str, handler: &Arc<H>) {
        if let Some(mut handlers) = self.registry.get_mut(event_name) {
            if let Some(pos) = handlers.iter().position(|h| is_same_handler(h, handler)) {
                handlers.remove(pos);
                debug!(event = %event_name, handlers = handlers.len(), "Handler removed");
            }
        }
    }

    /// Whether `handler` is registered for `event_name`
    pub fn has<H: ?Sized>(&self, event_name: &str, handler: &Arc<H>) -> bool {
        self.registry
            .get(event_name)
            .is_some_and(|handlers| handlers.iter().any(|h| is_same_handler(h, handler)))
    }

    /// Drop every registration
    pub fn clear(&self) {
        self.registry.clear();
        debug!("Registry cleared");
        observability::record_registry_size(0);
    }

    /// Number of handlers registered for `event_name`
    pub fn handler_count(&self, event_name: &str) -> usize {
        self.registry
            .get(event_name)
            .map_or(0, |handlers| handlers.len())
    }

    /// Snapshot of the handlers for `event_name`, in registration order
    pub fn handlers(&self, event_name: &str) -> Vec<SharedHandler<E>> {
        self.registry
            .get(event_name)
            .map(|handlers| handlers.value().clone())
            .unwrap_or_default()
    }

    /// Event names present in the registry, including emptied ones
    pub fn event_names(&self) -> Vec<String> {
        self.registry.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of event names present in the registry
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether the registry holds no event names
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Get dispatch metrics
    pub fn metrics(&self) -> DispatchMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Invoke every handler registered for `event.name()` and wait for all
    ///
    /// Handlers run concurrently, one task each, with no defined order.
    /// Returns immediately when no handler is registered. Handler panics are
    /// logged and counted but never reported to the caller.
    ///
    /// Without a configured handler timeout this waits for every handler
    /// indefinitely. Dropping the returned future stops the wait but not the
    /// handlers already started; they run to completion in the background.
    #[instrument(
        name = "event_dispatcher_dispatch",
        skip(self, event),
        fields(event = %event.name())
    )]
    pub async fn dispatch(&self, event: Arc<E>) {
        self.metrics.inc_dispatch_count();

        let handlers = self.handlers(event.name());
        if handlers.is_empty() {
            trace!("No handlers registered, dispatch skipped");
            return;
        }

        let handler_count = handlers.len();
        let timeout = self.config.handler_timeout();
        let started = Instant::now();

        // JoinHandles detach on drop, so handlers outlive a dropped dispatch
        let tasks: Vec<_> = handlers
            .into_iter()
            .map(|handler| {
                tokio::spawn(invoke(
                    handler,
                    Arc::clone(&event),
                    timeout,
                    Arc::clone(&self.metrics),
                ))
            })
            .collect();

        for task in tasks {
            if let Err(e) = task.await {
                self.metrics.inc_panic_count();
                observability::record_handler_outcome(event.name(), "panic");
                error!(error = ?e, "Handler task panicked");
            }
        }

        let elapsed = started.elapsed();
        observability::record_dispatch(event.name(), handler_count, elapsed);
        debug!(
            handlers = handler_count,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Dispatch complete"
        );
    }
}

impl<E: Event> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one handler, optionally bounded by `timeout`, and record its outcome
async fn invoke<E: Event>(
    handler: SharedHandler<E>,
    event: Arc<E>,
    timeout: Option<Duration>,
    metrics: Arc<DispatchMetrics>,
) {
    let completed = match timeout {
        Some(limit) => tokio::time::timeout(limit, handler.handle(&event))
            .await
            .is_ok(),
        None => {
            handler.handle(&event).await;
            true
        }
    };

    if completed {
        metrics.inc_completed_count();
        observability::record_handler_outcome(event.name(), "completed");
    } else {
        metrics.inc_timeout_count();
        observability::record_handler_outcome(event.name(), "timeout");
        warn!(event = %event.name(), timeout = ?timeout, "Handler timed out");
    }
}

/// Identity comparison on the shared allocation, ignoring vtables
fn is_same_handler<E: Event, H: ?Sized>(registered: &SharedHandler<E>, candidate: &Arc<H>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(registered), Arc::as_ptr(candidate))
}
