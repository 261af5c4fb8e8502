//! # Dispatcher
//!
//! In-process event dispatch.
//!
//! Responsible for:
//! - Keeping the event name -> handlers registry
//! - Fan-out of each event to every registered handler
//! - Waiting for all handlers before `dispatch` returns

pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod metrics;

pub use contracts::{BasicEvent, Event, EventHandler, SharedHandler};
pub use dispatcher::EventDispatcher;
pub use error::DispatcherError;
pub use handlers::{FnHandler, LogHandler};
pub use metrics::{DispatchMetrics, DispatchMetricsSnapshot};
