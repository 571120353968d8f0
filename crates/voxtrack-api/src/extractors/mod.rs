//! Custom Axum extractors.

pub mod form;
pub mod meta;
pub mod store;

pub use form::{FormFields, StrictForm};
pub use meta::RequestMeta;
pub use store::RequestStore;
