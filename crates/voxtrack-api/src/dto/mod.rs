//! Form bodies accepted by the tracking endpoints.

pub mod request;

pub use request::{NewInstallationForm, NewSessionForm, SessionUpdateForm};
