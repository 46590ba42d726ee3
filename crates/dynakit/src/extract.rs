//! axum integration.
//!
//! [`QueryBinder`] hands a handler a [`RecordParamHelper`] over the request's
//! query string, and [`ApiError`] turns a [`StoreError`] into a response
//! with the matching status code.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dynakit_core::{store_error_to_status_code, RecordParamHelper, StoreError};

/// Extractor wrapping a [`RecordParamHelper`] built from the URI query.
///
/// Never rejects: a request without a query yields an empty parameter set.
#[derive(Debug, Clone)]
pub struct QueryBinder(pub RecordParamHelper);

impl<S> FromRequestParts<S> for QueryBinder
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        Ok(Self(RecordParamHelper::from_query(query)))
    }
}

/// Response wrapper for store errors.
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(store_error_to_status_code(&self.0))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Store error");
        }

        (status, self.0.to_string()).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}
