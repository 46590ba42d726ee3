//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to [`StoreError`]. Service messages are carried
//! through untouched; only the variant is chosen here.

use std::error::Error;
use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use dynakit_core::StoreError;

/// Separates service errors from transport failures.
///
/// Dispatch and timeout failures become `ConnectionFailed`; any other
/// non-service failure is reported as a `Service` error for `operation`.
fn split_sdk_error<E, R>(err: SdkError<E, R>, operation: &'static str) -> Result<E, StoreError>
where
    E: Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(context) => Ok(context.into_err()),
        other => {
            let message = format!("{}", DisplayErrorContext(&other));
            if matches!(
                other,
                SdkError::DispatchFailure(_) | SdkError::TimeoutError(_)
            ) {
                Err(StoreError::ConnectionFailed(message))
            } else {
                Err(StoreError::Service { operation, message })
            }
        }
    }
}

fn message_of(err: &(dyn Error + 'static)) -> String {
    format!("{}", DisplayErrorContext(err))
}

fn service(operation: &'static str, err: &(dyn Error + 'static)) -> StoreError {
    StoreError::Service {
        operation,
        message: message_of(err),
    }
}

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> StoreError {
    let err = match split_sdk_error(err, "GetItem") {
        Ok(err) => err,
        Err(mapped) => return mapped,
    };
    match err {
        GetItemError::ResourceNotFoundException(e) => StoreError::TableNotFound(message_of(&e)),
        GetItemError::ProvisionedThroughputExceededException(e) => {
            StoreError::Throttled(message_of(&e))
        }
        GetItemError::RequestLimitExceeded(e) => StoreError::Throttled(message_of(&e)),
        err => service("GetItem", &err),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> StoreError {
    let err = match split_sdk_error(err, "PutItem") {
        Ok(err) => err,
        Err(mapped) => return mapped,
    };
    match err {
        PutItemError::ConditionalCheckFailedException(e) => {
            StoreError::ConditionFailed(message_of(&e))
        }
        PutItemError::ResourceNotFoundException(e) => StoreError::TableNotFound(message_of(&e)),
        PutItemError::ProvisionedThroughputExceededException(e) => {
            StoreError::Throttled(message_of(&e))
        }
        PutItemError::RequestLimitExceeded(e) => StoreError::Throttled(message_of(&e)),
        err => service("PutItem", &err),
    }
}

/// Map an UpdateItem SDK error to StoreError.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
) -> StoreError {
    let err = match split_sdk_error(err, "UpdateItem") {
        Ok(err) => err,
        Err(mapped) => return mapped,
    };
    match err {
        UpdateItemError::ConditionalCheckFailedException(e) => {
            StoreError::ConditionFailed(message_of(&e))
        }
        UpdateItemError::ResourceNotFoundException(e) => {
            StoreError::TableNotFound(message_of(&e))
        }
        UpdateItemError::ProvisionedThroughputExceededException(e) => {
            StoreError::Throttled(message_of(&e))
        }
        UpdateItemError::RequestLimitExceeded(e) => StoreError::Throttled(message_of(&e)),
        err => service("UpdateItem", &err),
    }
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> StoreError {
    let err = match split_sdk_error(err, "DeleteItem") {
        Ok(err) => err,
        Err(mapped) => return mapped,
    };
    match err {
        DeleteItemError::ConditionalCheckFailedException(e) => {
            StoreError::ConditionFailed(message_of(&e))
        }
        DeleteItemError::ResourceNotFoundException(e) => {
            StoreError::TableNotFound(message_of(&e))
        }
        DeleteItemError::ProvisionedThroughputExceededException(e) => {
            StoreError::Throttled(message_of(&e))
        }
        DeleteItemError::RequestLimitExceeded(e) => StoreError::Throttled(message_of(&e)),
        err => service("DeleteItem", &err),
    }
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(err: SdkError<QueryError, R>) -> StoreError {
    let err = match split_sdk_error(err, "Query") {
        Ok(err) => err,
        Err(mapped) => return mapped,
    };
    match err {
        QueryError::ResourceNotFoundException(e) => StoreError::TableNotFound(message_of(&e)),
        QueryError::ProvisionedThroughputExceededException(e) => {
            StoreError::Throttled(message_of(&e))
        }
        QueryError::RequestLimitExceeded(e) => StoreError::Throttled(message_of(&e)),
        err => service("Query", &err),
    }
}

/// Map a Scan SDK error to StoreError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(err: SdkError<ScanError, R>) -> StoreError {
    let err = match split_sdk_error(err, "Scan") {
        Ok(err) => err,
        Err(mapped) => return mapped,
    };
    match err {
        ScanError::ResourceNotFoundException(e) => StoreError::TableNotFound(message_of(&e)),
        ScanError::ProvisionedThroughputExceededException(e) => {
            StoreError::Throttled(message_of(&e))
        }
        ScanError::RequestLimitExceeded(e) => StoreError::Throttled(message_of(&e)),
        err => service("Scan", &err),
    }
}
