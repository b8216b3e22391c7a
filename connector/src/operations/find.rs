//! Find operations.
//!
//! See https://docs.mongodb.com/manual/reference/method/db.collection.find

use common::errors::{classify_driver_error, ConnectorResult};
use common::models::operation::{FindOneRequest, FindRequest};
use common::utils::DocumentCodec;
use futures::TryStreamExt;
use mongodb::bson::Document;
use mongodb::options::{FindOneOptions, FindOptions};
use serde_json::Value;

use crate::operations::{decode_collation, validate_request};
use crate::registry::ConnectionRegistry;

const FIND_ERROR_MESSAGE: &str =
    "Error occurred while searching for the document in the database.";

/// Returns the first document matching the query, or JSON `null` when
/// nothing matches. A missing query matches every document.
pub(crate) async fn find_one(
    registry: &ConnectionRegistry,
    request: FindOneRequest,
) -> ConnectorResult<Value> {
    validate_request(&request)?;
    let handle = registry.resolve(request.connection_name.as_deref()).await?;

    let query = DocumentCodec::decode_query(request.query.as_deref())
        .map_err(|error| error.with_operation_message(FIND_ERROR_MESSAGE))?;
    let projection = DocumentCodec::decode_optional(request.projection.as_deref())
        .map_err(|error| error.with_operation_message(FIND_ERROR_MESSAGE))?;
    let collation = decode_collation(request.collation.as_deref())
        .map_err(|error| error.with_operation_message(FIND_ERROR_MESSAGE))?;

    let mut options = FindOneOptions::default();
    options.projection = projection;
    options.collation = collation;

    let result = handle
        .collection(&request.collection)
        .find_one(query)
        .with_options(options)
        .await
        .map_err(|error| classify_driver_error(error, FIND_ERROR_MESSAGE))?;

    let payload = match result {
        Some(document) => DocumentCodec::encode(document),
        None => Value::Null,
    };
    tracing::debug!(result = %payload, "find one result");
    Ok(payload)
}

/// Returns every document matching the query as a JSON array.
pub(crate) async fn find(
    registry: &ConnectionRegistry,
    request: FindRequest,
) -> ConnectorResult<Value> {
    validate_request(&request)?;
    let handle = registry.resolve(request.connection_name.as_deref()).await?;

    let query = DocumentCodec::decode_query(request.query.as_deref())
        .map_err(|error| error.with_operation_message(FIND_ERROR_MESSAGE))?;
    let projection = DocumentCodec::decode_optional(request.projection.as_deref())
        .map_err(|error| error.with_operation_message(FIND_ERROR_MESSAGE))?;
    let sort = DocumentCodec::decode_optional(request.sort.as_deref())
        .map_err(|error| error.with_operation_message(FIND_ERROR_MESSAGE))?;
    let collation = decode_collation(request.collation.as_deref())
        .map_err(|error| error.with_operation_message(FIND_ERROR_MESSAGE))?;

    let mut options = FindOptions::default();
    options.projection = projection;
    options.sort = sort;
    options.collation = collation;
    options.limit = request.limit;
    options.skip = request.skip;

    let cursor = handle
        .collection(&request.collection)
        .find(query)
        .with_options(options)
        .await
        .map_err(|error| classify_driver_error(error, FIND_ERROR_MESSAGE))?;

    let documents: Vec<Document> = cursor
        .try_collect()
        .await
        .map_err(|error| classify_driver_error(error, FIND_ERROR_MESSAGE))?;

    let payload = DocumentCodec::encode_many(documents);
    tracing::debug!(result = %payload, "find result");
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::errors::ConnectorError;
    use common::models::connection::CreateConnectionRequest;
    use common::ConnectorConfig;

    fn offline_registry() -> ConnectionRegistry {
        ConnectionRegistry::new(ConnectorConfig::default())
    }

    async fn registered_registry() -> ConnectionRegistry {
        let registry = offline_registry();
        registry
            .register(CreateConnectionRequest {
                name: "local".to_string(),
                connection_string: Some("mongodb://127.0.0.1:27017/connector_test".to_string()),
                host: None,
                port: None,
                username: None,
                password: None,
                database: None,
                max_pool_size: None,
                min_pool_size: None,
                connect_timeout_secs: None,
                server_selection_timeout_secs: None,
                tls: None,
            })
            .await
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn missing_collection_name_halts_before_resolution() {
        let registry = offline_registry();
        let request = FindOneRequest::default();
        assert!(matches!(
            find_one(&registry, request).await,
            Err(ConnectorError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unresolved_connection_is_connectivity() {
        let registry = offline_registry();
        let request = FindOneRequest {
            collection: "users".to_string(),
            ..Default::default()
        };
        match find_one(&registry, request).await {
            Err(ConnectorError::Connectivity(message)) => {
                assert_eq!(message, "MongoDB connection has not been instantiated.");
            }
            other => panic!("expected connectivity error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_query_is_parse_with_generic_message() {
        let registry = registered_registry().await;
        let request = FindOneRequest {
            collection: "users".to_string(),
            query: Some("{broken".to_string()),
            connection_name: Some("local".to_string()),
            ..Default::default()
        };
        match find_one(&registry, request).await {
            Err(ConnectorError::Parse(message)) => assert_eq!(message, FIND_ERROR_MESSAGE),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_sort_is_parse_with_generic_message() {
        let registry = registered_registry().await;
        let request = FindRequest {
            collection: "users".to_string(),
            sort: Some("[1]".to_string()),
            connection_name: Some("local".to_string()),
            ..Default::default()
        };
        match find(&registry, request).await {
            Err(ConnectorError::Parse(message)) => assert_eq!(message, FIND_ERROR_MESSAGE),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
