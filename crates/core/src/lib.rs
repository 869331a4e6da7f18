//! Pure domain logic for devpulse.
//!
//! Nothing in this crate touches the network or the database. The `db` and
//! `api` crates feed it rows and payloads and act on what it returns.

pub mod alert;
pub mod error;
pub mod heartbeat;
pub mod metric;
pub mod rules;
pub mod types;
pub mod validation;
