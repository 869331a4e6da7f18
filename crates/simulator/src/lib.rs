//! `devpulse-simulator` library crate.
//!
//! Re-exports internal modules for integration testing. The binary
//! entrypoints live in `main.rs` (heartbeat producer) and `bin/watch.rs`
//! (alert stream tail).

pub mod config;
pub mod generator;
pub mod sender;
pub mod watch;
