//! # voxtrack-entity
//!
//! Domain records for voxtrack. Every struct in this crate represents a
//! stored document or a value embedded in one. Records are independent of
//! the storage driver; the database crate maps them to its own layout.

pub mod installation;
pub mod session;
