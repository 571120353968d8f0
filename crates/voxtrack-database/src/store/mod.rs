//! Usage store implementations.

pub mod document;
pub mod gateway;
pub mod memory;
pub mod mongo;

pub use gateway::{StoreDispatch, UsageStore};
pub use memory::MemoryUsageStore;
pub use mongo::MongoUsageStore;

/// Collection holding one document per installation, keyed by machine id.
pub const INSTALLATIONS: &str = "installations";

/// Collection holding one document per session, keyed by session id.
pub const SESSIONS: &str = "sessions";
