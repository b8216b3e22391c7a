//! Delete operations.
//!
//! See https://docs.mongodb.com/manual/reference/method/db.collection.deleteOne

use common::errors::{classify_driver_error, ConnectorResult};
use common::models::operation::DeleteRequest;
use common::response::acknowledgement;
use common::utils::DocumentCodec;
use mongodb::options::DeleteOptions;
use serde_json::Value;

use crate::operations::{decode_collation, require_text, validate_request};
use crate::registry::ConnectionRegistry;

const DELETE_ERROR_MESSAGE: &str =
    "Error occurred while deleting the document from the database.";
const EMPTY_QUERY_MESSAGE: &str =
    "The query to match the documents cannot be null or empty.";
const INVALID_QUERY_MESSAGE: &str =
    "The query to match the documents cannot be a JSON array. Please provide a JSON object.";

/// Deletes the first matching document.
pub(crate) async fn delete_one(
    registry: &ConnectionRegistry,
    request: DeleteRequest,
) -> ConnectorResult<Value> {
    run_delete(registry, request, false).await
}

/// Deletes every matching document.
pub(crate) async fn delete_many(
    registry: &ConnectionRegistry,
    request: DeleteRequest,
) -> ConnectorResult<Value> {
    run_delete(registry, request, true).await
}

async fn run_delete(
    registry: &ConnectionRegistry,
    request: DeleteRequest,
    many: bool,
) -> ConnectorResult<Value> {
    validate_request(&request)?;
    let query_text = require_text(request.query.as_deref(), EMPTY_QUERY_MESSAGE)?;

    let handle = registry.resolve(request.connection_name.as_deref()).await?;

    let query =
        DocumentCodec::decode_required(Some(query_text), EMPTY_QUERY_MESSAGE, INVALID_QUERY_MESSAGE)
            .map_err(|error| error.with_operation_message(DELETE_ERROR_MESSAGE))?;
    let collation = decode_collation(request.collation.as_deref())
        .map_err(|error| error.with_operation_message(DELETE_ERROR_MESSAGE))?;

    let mut options = DeleteOptions::default();
    options.collation = collation;

    let collection = handle.collection(&request.collection);
    let (result, operation) = if many {
        let result = collection
            .delete_many(query)
            .with_options(options)
            .await
            .map_err(|error| classify_driver_error(error, DELETE_ERROR_MESSAGE))?;
        (result, "DeleteMany")
    } else {
        let result = collection
            .delete_one(query)
            .with_options(options)
            .await
            .map_err(|error| classify_driver_error(error, DELETE_ERROR_MESSAGE))?;
        (result, "DeleteOne")
    };

    tracing::debug!(deleted = result.deleted_count, "delete result");
    Ok(acknowledgement(operation))
}
