//! # voxtrack-database
//!
//! MongoDB connection management and the usage store: the capability
//! trait the HTTP layer talks to, its MongoDB implementation, and an
//! in-memory implementation with identical semantics.

pub mod connection;
pub mod store;

pub use connection::MongoConnection;
pub use store::{MemoryUsageStore, MongoUsageStore, StoreDispatch, UsageStore};
