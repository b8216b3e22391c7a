//! Operation handlers, one module per database verb.
//!
//! Every handler follows the same sequence: validate the request, resolve
//! the connection handle, decode the document parameters, invoke a single
//! driver call, then encode the result. Any failure short-circuits into the
//! classified error taxonomy; a handler produces exactly one outcome.

pub mod aggregate;
pub mod delete;
pub mod find;
pub mod insert;
pub mod update;

use common::errors::{ConnectorError, ConnectorResult};
use common::utils::DocumentCodec;
use mongodb::bson::from_document;
use mongodb::options::Collation;
use validator::Validate;

/// Runs the declarative request validation, normalizing failures into the
/// connector taxonomy.
pub(crate) fn validate_request<T: Validate>(request: &T) -> ConnectorResult<()> {
    request
        .validate()
        .map_err(|error| ConnectorError::Validation(error.to_string()))
}

/// Pre-flight presence check for a required text parameter. Runs before the
/// connection is resolved and halts the handler on failure.
pub(crate) fn require_text<'a>(
    text: Option<&'a str>,
    empty_message: &str,
) -> ConnectorResult<&'a str> {
    text.filter(|text| !text.is_empty())
        .ok_or_else(|| ConnectorError::Validation(empty_message.to_string()))
}

/// Decodes an opaque collation option into the driver's collation type.
pub(crate) fn decode_collation(text: Option<&str>) -> ConnectorResult<Option<Collation>> {
    match DocumentCodec::decode_optional(text)? {
        Some(document) => from_document::<Collation>(document)
            .map(Some)
            .map_err(|error| ConnectorError::Parse(error.to_string())),
        None => Ok(None),
    }
}
