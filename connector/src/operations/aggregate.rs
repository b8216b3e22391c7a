//! Aggregation operation.
//!
//! See https://docs.mongodb.com/manual/reference/method/db.collection.aggregate

use common::errors::{classify_driver_error, ConnectorResult};
use common::models::operation::AggregateRequest;
use common::utils::DocumentCodec;
use futures::TryStreamExt;
use mongodb::bson::Document;
use serde_json::Value;

use crate::operations::{require_text, validate_request};
use crate::registry::ConnectionRegistry;

const AGGREGATE_ERROR_MESSAGE: &str =
    "Error occurred while performing the aggregation on the database.";
const EMPTY_PIPELINE_MESSAGE: &str = "The aggregation pipeline cannot be null or empty.";
const INVALID_PIPELINE_MESSAGE: &str =
    "The aggregation pipeline must be a JSON array of stage objects.";

/// Runs an aggregation pipeline and returns the results as a JSON array.
pub(crate) async fn aggregate(
    registry: &ConnectionRegistry,
    request: AggregateRequest,
) -> ConnectorResult<Value> {
    validate_request(&request)?;
    let pipeline_text = require_text(request.pipeline.as_deref(), EMPTY_PIPELINE_MESSAGE)?;

    let handle = registry.resolve(request.connection_name.as_deref()).await?;

    let pipeline = DocumentCodec::decode_required_array(
        Some(pipeline_text),
        EMPTY_PIPELINE_MESSAGE,
        INVALID_PIPELINE_MESSAGE,
    )
    .map_err(|error| error.with_operation_message(AGGREGATE_ERROR_MESSAGE))?;

    let cursor = handle
        .collection(&request.collection)
        .aggregate(pipeline)
        .await
        .map_err(|error| classify_driver_error(error, AGGREGATE_ERROR_MESSAGE))?;

    let documents: Vec<Document> = cursor
        .try_collect()
        .await
        .map_err(|error| classify_driver_error(error, AGGREGATE_ERROR_MESSAGE))?;

    let payload = DocumentCodec::encode_many(documents);
    tracing::debug!(result = %payload, "aggregate result");
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::errors::ConnectorError;
    use common::ConnectorConfig;

    #[tokio::test]
    async fn empty_pipeline_halts_before_resolution() {
        let registry = ConnectionRegistry::new(ConnectorConfig::default());
        let request = AggregateRequest {
            collection: "orders".to_string(),
            ..Default::default()
        };
        match aggregate(&registry, request).await {
            Err(ConnectorError::Validation(message)) => {
                assert_eq!(message, EMPTY_PIPELINE_MESSAGE);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
