//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only, reverse dependencies are prohibited.
//!
//! ## Event Model
//! - An event is routed by its `name`
//! - The payload is generic and may be replaced until the event is dispatched
//! - `occurred_at` is stamped once at construction (UTC)

mod error;
mod event;
mod handler;
mod settings;

pub use error::*;
pub use event::{BasicEvent, Event};
pub use handler::{EventHandler, SharedHandler};
pub use settings::*;
