//! Update operations.
//!
//! See https://docs.mongodb.com/manual/reference/method/db.collection.updateOne

use common::errors::{classify_driver_error, ConnectorResult};
use common::models::operation::UpdateRequest;
use common::response::acknowledgement;
use common::utils::DocumentCodec;
use mongodb::options::UpdateOptions;
use serde_json::Value;

use crate::operations::{decode_collation, require_text, validate_request};
use crate::registry::ConnectionRegistry;

const UPDATE_ERROR_MESSAGE: &str =
    "Error occurred while updating the document in the database.";
const EMPTY_QUERY_MESSAGE: &str =
    "The query to match the documents cannot be null or empty.";
const INVALID_QUERY_MESSAGE: &str =
    "The query to match the documents cannot be a JSON array. Please provide a JSON object.";
const EMPTY_UPDATE_MESSAGE: &str = "The update document cannot be null or empty.";
const INVALID_UPDATE_MESSAGE: &str =
    "The update document cannot be a JSON array. Please provide a JSON object.";

/// Updates the first matching document.
pub(crate) async fn update_one(
    registry: &ConnectionRegistry,
    request: UpdateRequest,
) -> ConnectorResult<Value> {
    run_update(registry, request, false).await
}

/// Updates every matching document.
pub(crate) async fn update_many(
    registry: &ConnectionRegistry,
    request: UpdateRequest,
) -> ConnectorResult<Value> {
    run_update(registry, request, true).await
}

async fn run_update(
    registry: &ConnectionRegistry,
    request: UpdateRequest,
    many: bool,
) -> ConnectorResult<Value> {
    validate_request(&request)?;
    let query_text = require_text(request.query.as_deref(), EMPTY_QUERY_MESSAGE)?;
    let update_text = require_text(request.update.as_deref(), EMPTY_UPDATE_MESSAGE)?;

    let handle = registry.resolve(request.connection_name.as_deref()).await?;

    let query =
        DocumentCodec::decode_required(Some(query_text), EMPTY_QUERY_MESSAGE, INVALID_QUERY_MESSAGE)
            .map_err(|error| error.with_operation_message(UPDATE_ERROR_MESSAGE))?;
    let update = DocumentCodec::decode_required(
        Some(update_text),
        EMPTY_UPDATE_MESSAGE,
        INVALID_UPDATE_MESSAGE,
    )
    .map_err(|error| error.with_operation_message(UPDATE_ERROR_MESSAGE))?;
    let collation = decode_collation(request.collation.as_deref())
        .map_err(|error| error.with_operation_message(UPDATE_ERROR_MESSAGE))?;

    let mut options = UpdateOptions::default();
    options.upsert = request.upsert;
    options.collation = collation;

    let collection = handle.collection(&request.collection);
    let (result, operation) = if many {
        let result = collection
            .update_many(query, update)
            .with_options(options)
            .await
            .map_err(|error| classify_driver_error(error, UPDATE_ERROR_MESSAGE))?;
        (result, "UpdateMany")
    } else {
        let result = collection
            .update_one(query, update)
            .with_options(options)
            .await
            .map_err(|error| classify_driver_error(error, UPDATE_ERROR_MESSAGE))?;
        (result, "UpdateOne")
    };

    tracing::debug!(
        matched = result.matched_count,
        modified = result.modified_count,
        "update result"
    );
    Ok(acknowledgement(operation))
}
