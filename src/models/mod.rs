//! Domain model module declarations.

pub mod entry;
pub mod partner;

pub use entry::LogEntry;
pub use partner::PartnerEndpoint;
