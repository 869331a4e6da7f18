//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod alert_repo;
pub mod device_repo;
pub mod heartbeat_repo;
pub mod rule_repo;
pub mod user_repo;

pub use alert_repo::AlertRepo;
pub use device_repo::DeviceRepo;
pub use heartbeat_repo::HeartbeatRepo;
pub use rule_repo::RuleRepo;
pub use user_repo::UserRepo;
