//! Document codec.
//!
//! Converts caller-supplied JSON text (relaxed extended JSON accepted) into
//! BSON documents and back. Pure functions: decoding performs no I/O and
//! emits nothing.

use mongodb::bson::{Bson, Document};
use serde_json::Value;

use crate::errors::{ConnectorError, ConnectorResult};

const NON_DOCUMENT_MESSAGE: &str = "The input must decode to a JSON object";

/// Decodes operation parameters into BSON documents.
pub struct DocumentCodec;

impl DocumentCodec {
    /// Decodes a query filter. Empty or absent text is the match-all
    /// document `{}`, not an error.
    pub fn decode_query(text: Option<&str>) -> ConnectorResult<Document> {
        match non_empty(text) {
            Some(text) => decode_object(text, "The query must be a JSON object"),
            None => Ok(Document::new()),
        }
    }

    /// Decodes a required document parameter.
    ///
    /// Empty or absent text is a validation failure with `empty_message`,
    /// raised before any parse attempt. A top-level JSON array is a
    /// validation failure with `array_message`, distinguished from plain
    /// parse failures.
    pub fn decode_required(
        text: Option<&str>,
        empty_message: &str,
        array_message: &str,
    ) -> ConnectorResult<Document> {
        let text = non_empty(text)
            .ok_or_else(|| ConnectorError::Validation(empty_message.to_string()))?;

        let value: Value = serde_json::from_str(text)
            .map_err(|error| ConnectorError::Parse(error.to_string()))?;
        match value {
            Value::Array(_) => Err(ConnectorError::Validation(array_message.to_string())),
            Value::Object(_) => value_to_document(value, NON_DOCUMENT_MESSAGE),
            other => Err(ConnectorError::Parse(format!(
                "Expected a JSON object, found: {}",
                other
            ))),
        }
    }

    /// Decodes a required array-of-documents parameter (insert-many
    /// payloads, aggregation pipelines).
    ///
    /// Empty or absent text is a validation failure with `empty_message`; a
    /// top-level value that is not an array of objects is a validation
    /// failure with `shape_message`.
    pub fn decode_required_array(
        text: Option<&str>,
        empty_message: &str,
        shape_message: &str,
    ) -> ConnectorResult<Vec<Document>> {
        let text = non_empty(text)
            .ok_or_else(|| ConnectorError::Validation(empty_message.to_string()))?;

        let value: Value = serde_json::from_str(text)
            .map_err(|error| ConnectorError::Parse(error.to_string()))?;
        let entries = match value {
            Value::Array(entries) => entries,
            _ => return Err(ConnectorError::Validation(shape_message.to_string())),
        };

        entries
            .into_iter()
            .map(|entry| match entry {
                Value::Object(_) => value_to_document(entry, shape_message),
                _ => Err(ConnectorError::Validation(shape_message.to_string())),
            })
            .collect()
    }

    /// Decodes an optional pass-through option (projection, sort, collation
    /// source). Empty or absent text is `None`.
    pub fn decode_optional(text: Option<&str>) -> ConnectorResult<Option<Document>> {
        match non_empty(text) {
            Some(text) => decode_object(text, "The option must be a JSON object").map(Some),
            None => Ok(None),
        }
    }

    /// Encodes a result document as relaxed extended JSON.
    pub fn encode(document: Document) -> Value {
        Bson::Document(document).into_relaxed_extjson()
    }

    /// Encodes a sequence of result documents as a JSON array.
    pub fn encode_many(documents: Vec<Document>) -> Value {
        Value::Array(documents.into_iter().map(Self::encode).collect())
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|text| !text.is_empty())
}

fn decode_object(text: &str, shape_message: &str) -> ConnectorResult<Document> {
    let value: Value =
        serde_json::from_str(text).map_err(|error| ConnectorError::Parse(error.to_string()))?;
    match value {
        Value::Object(_) => value_to_document(value, shape_message),
        other => Err(ConnectorError::Parse(format!(
            "{}, found: {}",
            shape_message, other
        ))),
    }
}

fn value_to_document(value: Value, shape_message: &str) -> ConnectorResult<Document> {
    match Bson::try_from(value) {
        // An extended-JSON wrapper object can decode to a scalar, which is
        // still not a document.
        Ok(Bson::Document(document)) => Ok(document),
        Ok(_) => Err(ConnectorError::Parse(shape_message.to_string())),
        Err(error) => Err(ConnectorError::Parse(error.to_string())),
    }
}
