//! Installation domain entities.

pub mod model;

pub use model::{Installation, InstallationInfo};
