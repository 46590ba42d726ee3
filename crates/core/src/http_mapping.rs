//! Pure functions for mapping store errors to HTTP status codes.

use crate::StoreError;

/// Maps a [`StoreError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists`, `ConditionFailed` -> 409 (Conflict)
/// - `Throttled`, `ConnectionFailed` -> 503 (Service Unavailable)
/// - `InvalidRequest`, `Expression` -> 400 (Bad Request)
/// - `TableNotFound`, `Service` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use dynakit_core::{store_error_to_status_code, StoreError};
///
/// let error = StoreError::NotFound {
///     item_type: "Order".to_string(),
///     key: "[c-1]".to_string(),
/// };
/// assert_eq!(store_error_to_status_code(&error), 404);
/// ```
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::NotFound { .. } => 404,
        StoreError::AlreadyExists { .. } | StoreError::ConditionFailed(_) => 409,
        StoreError::Throttled(_) | StoreError::ConnectionFailed(_) => 503,
        StoreError::InvalidRequest(_) | StoreError::Expression(_) => 400,
        StoreError::TableNotFound(_) | StoreError::Service { .. } => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExpressionError;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = StoreError::NotFound {
            item_type: "Order".to_string(),
            key: "[c-1]".to_string(),
        };
        assert_eq!(store_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_conflicts_map_to_409() {
        let error = StoreError::AlreadyExists {
            item_type: "Order".to_string(),
            key: "[c-1]".to_string(),
        };
        assert_eq!(store_error_to_status_code(&error), 409);
        assert_eq!(
            store_error_to_status_code(&StoreError::ConditionFailed("x".to_string())),
            409
        );
    }

    #[test]
    fn test_transient_failures_map_to_503() {
        assert_eq!(
            store_error_to_status_code(&StoreError::Throttled("x".to_string())),
            503
        );
        assert_eq!(
            store_error_to_status_code(&StoreError::ConnectionFailed("x".to_string())),
            503
        );
    }

    #[test]
    fn test_bad_input_maps_to_400() {
        assert_eq!(
            store_error_to_status_code(&StoreError::InvalidRequest("x".to_string())),
            400
        );
        assert_eq!(
            store_error_to_status_code(&StoreError::Expression(ExpressionError::EmptyUpdate)),
            400
        );
    }

    #[test]
    fn test_service_errors_map_to_500() {
        let error = StoreError::Service {
            operation: "Query",
            message: "boom".to_string(),
        };
        assert_eq!(store_error_to_status_code(&error), 500);
        assert_eq!(
            store_error_to_status_code(&StoreError::TableNotFound("t".to_string())),
            500
        );
    }
}
