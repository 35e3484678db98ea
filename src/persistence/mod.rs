//! Persistence layer modules.

pub mod log_store;
pub mod snapshot;

pub use log_store::{LogStore, RecentMessages};
pub use snapshot::SnapshotStore;
