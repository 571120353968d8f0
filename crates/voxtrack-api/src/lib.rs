//! # voxtrack-api
//!
//! HTTP API layer for voxtrack built on Axum.
//!
//! Provides the usage-tracking endpoints, health routes, extractors
//! (strict form fields, per-request store, request metadata), request
//! logging, and the mapping from [`voxtrack_core::AppError`] to
//! plain-text responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
