//! WebSocket infrastructure for the live alert stream.
//!
//! Provides the subscriber registry (fan-out of alert events), the keep-alive
//! ping task and the HTTP upgrade handler used by the notifications routes.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::{BroadcastReport, DeliveryFailure, SubscriberRegistry};
