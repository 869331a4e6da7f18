pub mod auth;
pub mod devices;
pub mod heartbeat;
pub mod notifications;
