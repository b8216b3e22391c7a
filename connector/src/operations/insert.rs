//! Insert operations.
//!
//! See https://docs.mongodb.com/manual/reference/method/db.collection.insertOne

use common::errors::{classify_driver_error, ConnectorResult};
use common::models::operation::{InsertManyRequest, InsertOneRequest};
use common::response::acknowledgement;
use common::utils::DocumentCodec;
use mongodb::options::InsertManyOptions;
use serde_json::Value;

use crate::operations::{require_text, validate_request};
use crate::registry::ConnectionRegistry;

const INSERT_ERROR_MESSAGE: &str =
    "Error occurred while inserting the document to the database";
const EMPTY_DOCUMENT_MESSAGE: &str = "The document to be inserted cannot be null or empty.";
const INVALID_DOCUMENT_MESSAGE: &str =
    "The document to be inserted cannot be a JSON array. Please provide a JSON object.";
const EMPTY_DOCUMENTS_MESSAGE: &str = "The documents to be inserted cannot be null or empty.";
const INVALID_DOCUMENTS_MESSAGE: &str =
    "The documents to be inserted must be a JSON array of objects.";

/// Inserts a single document and acknowledges with a fixed payload (the
/// inserted identifier is deliberately not returned).
pub(crate) async fn insert_one(
    registry: &ConnectionRegistry,
    request: InsertOneRequest,
) -> ConnectorResult<Value> {
    validate_request(&request)?;
    // Pre-flight: an empty document halts the handler before the connection
    // is even resolved.
    let text = require_text(request.document.as_deref(), EMPTY_DOCUMENT_MESSAGE)?;

    let handle = registry.resolve(request.connection_name.as_deref()).await?;

    let document =
        DocumentCodec::decode_required(Some(text), EMPTY_DOCUMENT_MESSAGE, INVALID_DOCUMENT_MESSAGE)
            .map_err(|error| error.with_operation_message(INSERT_ERROR_MESSAGE))?;

    handle
        .collection(&request.collection)
        .insert_one(document)
        .await
        .map_err(|error| classify_driver_error(error, INSERT_ERROR_MESSAGE))?;

    let payload = acknowledgement("InsertOne");
    tracing::debug!(result = %payload, "insert one result");
    Ok(payload)
}

/// Inserts a batch of documents and acknowledges with a fixed payload.
pub(crate) async fn insert_many(
    registry: &ConnectionRegistry,
    request: InsertManyRequest,
) -> ConnectorResult<Value> {
    validate_request(&request)?;
    let text = require_text(request.documents.as_deref(), EMPTY_DOCUMENTS_MESSAGE)?;

    let handle = registry.resolve(request.connection_name.as_deref()).await?;

    let documents = DocumentCodec::decode_required_array(
        Some(text),
        EMPTY_DOCUMENTS_MESSAGE,
        INVALID_DOCUMENTS_MESSAGE,
    )
    .map_err(|error| error.with_operation_message(INSERT_ERROR_MESSAGE))?;

    let mut options = InsertManyOptions::default();
    options.ordered = request.ordered;

    handle
        .collection(&request.collection)
        .insert_many(documents)
        .with_options(options)
        .await
        .map_err(|error| classify_driver_error(error, INSERT_ERROR_MESSAGE))?;

    let payload = acknowledgement("InsertMany");
    tracing::debug!(result = %payload, "insert many result");
    Ok(payload)
}
