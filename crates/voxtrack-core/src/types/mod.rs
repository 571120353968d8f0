//! Core type definitions used across the voxtrack workspace.

pub mod id;

pub use id::SessionId;
