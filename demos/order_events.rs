//! Order Events Example
//!
//! Registers a few handlers for order lifecycle events, dispatches a batch of
//! events and prints a dispatch summary.
//!
//! Run with: cargo run --bin order_events [-- dispatcher.toml]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use config_loader::ConfigLoader;
use contracts::{BasicEvent, Event, EventHandler, Settings};
use dispatcher::{EventDispatcher, FnHandler, LogHandler};
use observability::DispatchStats;

#[derive(Debug, Clone)]
struct Order {
    id: u64,
    amount_cents: u64,
}

type OrderEvent = BasicEvent<Order>;

/// Accumulates revenue from paid orders
#[derive(Default)]
struct RevenueHandler {
    total_cents: AtomicU64,
}

#[async_trait]
impl EventHandler<OrderEvent> for RevenueHandler {
    async fn handle(&self, event: &OrderEvent) {
        self.total_cents
            .fetch_add(event.payload().amount_cents, Ordering::Relaxed);
    }
}

/// Simulates a slow downstream notification
struct EmailHandler;

#[async_trait]
impl EventHandler<OrderEvent> for EmailHandler {
    async fn handle(&self, event: &OrderEvent) {
        tokio::time::sleep(Duration::from_millis(20)).await;
        tracing::info!(order_id = event.payload().id, "Confirmation email sent");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // ==== Stage 1: Load settings from file or defaults ====
    let settings = match std::env::args().nth(1) {
        Some(path) => ConfigLoader::load_from_path(std::path::Path::new(&path))
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => Settings::default(),
    };

    observability::init_with_config(&settings.logging)?;
    tracing::info!("Starting Order Events Demo");

    // ==== Stage 2: Register handlers ====
    let dispatcher = EventDispatcher::<OrderEvent>::with_config(settings.dispatcher);

    let revenue = Arc::new(RevenueHandler::default());
    let email = Arc::new(EmailHandler);
    let audit = Arc::new(LogHandler::new("audit"));
    let cancelled = Arc::new(FnHandler::new(|event: &OrderEvent| {
        tracing::warn!(order_id = event.payload().id, "Order cancelled");
    }));

    dispatcher.register("order.paid", revenue.clone())?;
    dispatcher.register("order.paid", email.clone())?;
    dispatcher.register("order.paid", audit.clone())?;
    dispatcher.register("order.cancelled", audit.clone())?;
    dispatcher.register("order.cancelled", cancelled.clone())?;

    if let Err(e) = dispatcher.register("order.paid", revenue.clone()) {
        tracing::info!(error = %e, "Duplicate registration rejected as expected");
    }

    // ==== Stage 3: Dispatch ====
    let mut stats = DispatchStats::new();
    let events = [
        ("order.paid", Order { id: 1, amount_cents: 1_250 }),
        ("order.paid", Order { id: 2, amount_cents: 4_999 }),
        ("order.cancelled", Order { id: 3, amount_cents: 0 }),
        ("order.refunded", Order { id: 1, amount_cents: 1_250 }),
    ];

    for (name, order) in events {
        let event = Arc::new(BasicEvent::new(name, order));
        let handler_count = dispatcher.handler_count(event.name());
        let started = Instant::now();
        dispatcher.dispatch(event).await;
        stats.update(handler_count, started.elapsed());
    }

    // Unsubscribe email and dispatch once more
    dispatcher.remove("order.paid", &email);
    dispatcher
        .dispatch(Arc::new(BasicEvent::new(
            "order.paid",
            Order { id: 4, amount_cents: 300 },
        )))
        .await;

    // ==== Stage 4: Report ====
    tracing::info!(
        revenue_cents = revenue.total_cents.load(Ordering::Relaxed),
        metrics = ?dispatcher.metrics(),
        "Demo finished"
    );
    println!("{}", stats.summary());

    Ok(())
}
