//! `StrictForm` extractor: a URL-encoded form with an exact field set.

use std::collections::BTreeSet;

use axum::Form;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use voxtrack_core::error::AppError;

use crate::error::ApiError;

/// A form type with a fixed set of accepted field names.
pub trait FormFields: DeserializeOwned + Validate {
    /// Names that must all be present, and nothing else.
    const FIELDS: &'static [&'static str];

    /// Message returned when the submitted form does not fit.
    fn retry_message() -> String {
        format!("Retry with POST parameters: {}", Self::FIELDS.join(", "))
    }
}

/// URL-encoded form body whose distinct field names must equal
/// `T::FIELDS` exactly.
///
/// Missing or unknown fields, empty values, and bodies that are not
/// `application/x-www-form-urlencoded` are all rejected with the form's
/// retry message. When a name is repeated the first value wins. The raw
/// pairs are kept for request snapshots.
#[derive(Debug, Clone)]
pub struct StrictForm<T> {
    /// Parsed and validated form.
    pub value: T,
    /// Submitted pairs in order, repeats included.
    pub pairs: Vec<(String, String)>,
}

impl<T: FormFields> StrictForm<T> {
    /// Check the pairs against `T::FIELDS` and build `T`.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, AppError> {
        let reject = || AppError::validation(T::retry_message());

        let submitted: BTreeSet<&str> = pairs.iter().map(|(name, _)| name.as_str()).collect();
        let expected: BTreeSet<&str> = T::FIELDS.iter().copied().collect();
        if submitted != expected {
            return Err(reject());
        }

        let mut fields = Map::new();
        for (name, value) in &pairs {
            fields
                .entry(name.clone())
                .or_insert_with(|| Value::String(value.clone()));
        }

        let value: T = serde_json::from_value(Value::Object(fields)).map_err(|_| reject())?;
        value.validate().map_err(|_| reject())?;

        Ok(Self { value, pairs })
    }
}

impl<S, T> FromRequest<S> for StrictForm<T>
where
    S: Send + Sync,
    T: FormFields,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|_| AppError::validation(T::retry_message()))?;

        Ok(Self::from_pairs(pairs)?)
    }
}
