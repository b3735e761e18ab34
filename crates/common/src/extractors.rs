//! Custom axum extractors for Parlor
//!
//! Every malformed input is rejected as `Error::InvalidArgument`, so clients
//! always get the structured error body.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::Error;

/// JSON extractor that validates the deserialized value automatically.
///
/// Deserialization and validation failures both return 400.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| Error::InvalidArgument(e.body_text()))?;
        value
            .validate()
            .map_err(|e| Error::InvalidArgument(describe(&e)))?;
        Ok(ValidatedJson(value))
    }
}

/// Path extractor whose rejection uses the structured error body
#[derive(Debug)]
pub struct ValidatedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| Error::InvalidArgument(format!("Invalid path parameter: {}", e.body_text())))?;
        Ok(ValidatedPath(value))
    }
}

/// One `field: reason` clause per invalid field, sorted by field name
fn describe(errors: &ValidationErrors) -> String {
    let mut clauses: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reasons: Vec<String> = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            format!("{}: {}", field, reasons.join(", "))
        })
        .collect();
    clauses.sort();

    if clauses.is_empty() {
        "Validation failed".to_string()
    } else {
        format!("Validation failed: {}", clauses.join("; "))
    }
}
