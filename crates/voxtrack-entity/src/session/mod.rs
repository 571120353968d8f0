//! Session domain entities.

pub mod model;
pub mod request;

pub use model::Session;
pub use request::RequestSnapshot;
