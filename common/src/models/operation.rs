//! Operation request models.
//!
//! One typed request struct per database verb. Required parameters are
//! plain fields validated non-empty; optional parameters are `Option`s.
//! JSON-document parameters stay as caller-supplied text here and are
//! decoded by the document codec inside the handler.

use serde::Deserialize;
use validator::Validate;

/// Request for finding a single document.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FindOneRequest {
    /// Target collection name.
    #[validate(length(min = 1, message = "Collection name is required"))]
    pub collection: String,

    /// Query filter as JSON text; empty or absent matches every document.
    pub query: Option<String>,

    /// Projection document as JSON text, passed through to the driver.
    pub projection: Option<String>,

    /// Collation document as JSON text, passed through to the driver.
    pub collation: Option<String>,

    /// Logical connection name from the invocation context; absent selects
    /// the default connection.
    pub connection_name: Option<String>,
}

/// Request for finding every matching document.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FindRequest {
    /// Target collection name.
    #[validate(length(min = 1, message = "Collection name is required"))]
    pub collection: String,

    /// Query filter as JSON text; empty or absent matches every document.
    pub query: Option<String>,

    /// Projection document as JSON text, passed through to the driver.
    pub projection: Option<String>,

    /// Sort document as JSON text, passed through to the driver.
    pub sort: Option<String>,

    /// Collation document as JSON text, passed through to the driver.
    pub collation: Option<String>,

    /// Maximum number of documents to return.
    pub limit: Option<i64>,

    /// Number of matching documents to skip.
    pub skip: Option<u64>,

    /// Logical connection name from the invocation context.
    pub connection_name: Option<String>,
}

/// Request for inserting a single document.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct InsertOneRequest {
    /// Target collection name.
    #[validate(length(min = 1, message = "Collection name is required"))]
    pub collection: String,

    /// Document to insert as JSON text; must decode to a single object.
    pub document: Option<String>,

    /// Logical connection name from the invocation context.
    pub connection_name: Option<String>,
}

/// Request for inserting several documents at once.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct InsertManyRequest {
    /// Target collection name.
    #[validate(length(min = 1, message = "Collection name is required"))]
    pub collection: String,

    /// Documents to insert as JSON text; must decode to an array of objects.
    pub documents: Option<String>,

    /// Whether the server stops at the first failed insert.
    pub ordered: Option<bool>,

    /// Logical connection name from the invocation context.
    pub connection_name: Option<String>,
}

/// Request for updating the first matching document.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRequest {
    /// Target collection name.
    #[validate(length(min = 1, message = "Collection name is required"))]
    pub collection: String,

    /// Filter selecting the documents to update, as JSON text.
    pub query: Option<String>,

    /// Update-operator document as JSON text (e.g. `{"$set": {...}}`).
    pub update: Option<String>,

    /// Whether to insert a new document when nothing matches.
    pub upsert: Option<bool>,

    /// Collation document as JSON text, passed through to the driver.
    pub collation: Option<String>,

    /// Logical connection name from the invocation context.
    pub connection_name: Option<String>,
}

/// Request for deleting matching documents.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DeleteRequest {
    /// Target collection name.
    #[validate(length(min = 1, message = "Collection name is required"))]
    pub collection: String,

    /// Filter selecting the documents to delete, as JSON text.
    pub query: Option<String>,

    /// Collation document as JSON text, passed through to the driver.
    pub collation: Option<String>,

    /// Logical connection name from the invocation context.
    pub connection_name: Option<String>,
}

/// Request for running an aggregation pipeline.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AggregateRequest {
    /// Target collection name.
    #[validate(length(min = 1, message = "Collection name is required"))]
    pub collection: String,

    /// Pipeline stages as JSON text; must decode to an array of objects.
    pub pipeline: Option<String>,

    /// Logical connection name from the invocation context.
    pub connection_name: Option<String>,
}
