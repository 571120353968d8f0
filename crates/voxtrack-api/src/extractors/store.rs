//! `RequestStore` extractor: the usage store handle for one request.

use std::convert::Infallible;
use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::{error, info, warn};

use voxtrack_core::error::AppError;
use voxtrack_database::store::{StoreDispatch, UsageStore};

use crate::error::ApiError;
use crate::state::AppState;

/// Per-request clone of the shared store, database already selected.
#[derive(Debug, Clone)]
pub struct RequestStore(StoreDispatch);

impl RequestStore {
    /// Turn a store error into a response error.
    ///
    /// Client errors (conflict, not found, validation) pass through with
    /// their own message. Anything else is logged, answered with
    /// `public_message`, and triggers a background reconnect that the
    /// response does not wait for.
    pub fn reject(&self, err: AppError, public_message: impl Into<String>) -> ApiError {
        if err.kind.is_client_error() {
            return ApiError(err);
        }

        error!(kind = %err.kind, error = %err.message, "Storage operation failed");

        let store = self.0.clone();
        tokio::spawn(async move {
            match store.refresh().await {
                Ok(()) => info!("Store reconnect succeeded"),
                Err(e) => warn!(error = %e, "Store reconnect failed"),
            }
        });

        ApiError(err.with_message(public_message))
    }
}

impl Deref for RequestStore {
    type Target = StoreDispatch;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for RequestStore {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.store.clone()))
    }
}
