//! Connector error taxonomy and driver-error classification.
//!
//! Every failure raised during an operation is normalized into
//! [`ConnectorError`] before it leaves the connector; no raw driver error
//! crosses the boundary. The classification precedence mirrors the connector
//! family's historical behavior: validation failures keep their own message,
//! malformed arguments are treated as connectivity-class problems, and
//! server-reported errors propagate their numeric code verbatim.

use mongodb::error::{Error as DriverError, ErrorKind, WriteFailure};
use serde::Serialize;
use thiserror::Error;

/// Result alias used across the connector crates.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Closed error taxonomy for the connector.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectorError {
    /// Caller input rejected by the connector's own rules (empty document,
    /// non-object JSON, missing parameter). The message is user-facing.
    #[error("{0}")]
    Validation(String),

    /// Input text that is not valid structured data.
    #[error("{0}")]
    Parse(String),

    /// Connection unresolvable, or the driver rejected an argument as
    /// illegal. Historically grouped with connectivity problems.
    #[error("{0}")]
    Connectivity(String),

    /// Server-reported failure; the numeric code is propagated verbatim.
    #[error("{message} (server error code {code})")]
    Database { code: i32, message: String },

    /// Anything that does not fit the categories above.
    #[error("{0}")]
    Unknown(String),
}

/// Error code exposed to the hosting flow alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Connector-level validation failure.
    Validation,
    /// Connectivity/configuration-class failure.
    Connectivity,
    /// Server error code, propagated as-is.
    Server(i32),
    /// Uncategorized failure.
    Unknown,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Validation => write!(f, "MONGODB:VALIDATION"),
            ErrorCode::Connectivity => write!(f, "MONGODB:CONNECTIVITY"),
            ErrorCode::Server(code) => write!(f, "{}", code),
            ErrorCode::Unknown => write!(f, "MONGODB:UNKNOWN"),
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl ConnectorError {
    /// Maps the error variant to its exposed code.
    ///
    /// Parse failures report `MONGODB:CONNECTIVITY`: the connector family
    /// has always filed malformed input under configuration problems rather
    /// than server errors.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConnectorError::Validation(_) => ErrorCode::Validation,
            ConnectorError::Parse(_) | ConnectorError::Connectivity(_) => ErrorCode::Connectivity,
            ConnectorError::Database { code, .. } => ErrorCode::Server(*code),
            ConnectorError::Unknown(_) => ErrorCode::Unknown,
        }
    }

    /// Replaces the message of a parse-class failure with the per-verb
    /// generic operation message. Parser detail is logged, never exposed to
    /// the hosting flow; validation messages stay verbatim.
    pub fn with_operation_message(self, message: &str) -> Self {
        match self {
            ConnectorError::Parse(detail) => {
                tracing::debug!(detail = %detail, "input decoding failed");
                ConnectorError::Parse(message.to_string())
            }
            other => other,
        }
    }
}

/// Normalizes a driver error into the connector taxonomy.
///
/// Precedence, first match wins:
/// 1. an illegal argument (including BSON codec failures) is a
///    connectivity-class problem;
/// 2. a server failure carrying a numeric error code propagates that code;
/// 3. everything else is unknown.
///
/// `operation_message` is the generic per-verb message; the underlying
/// driver error is logged here and then discarded.
pub fn classify_driver_error(error: DriverError, operation_message: &str) -> ConnectorError {
    tracing::error!(error = %error, "mongodb driver call failed");

    match error.kind.as_ref() {
        ErrorKind::InvalidArgument { .. }
        | ErrorKind::BsonDeserialization(_)
        | ErrorKind::BsonSerialization(_) => {
            ConnectorError::Connectivity(operation_message.to_string())
        }
        ErrorKind::Command(command_error) => ConnectorError::Database {
            code: command_error.code,
            message: operation_message.to_string(),
        },
        ErrorKind::Write(failure) => match failure {
            WriteFailure::WriteError(write_error) => ConnectorError::Database {
                code: write_error.code,
                message: operation_message.to_string(),
            },
            WriteFailure::WriteConcernError(concern_error) => ConnectorError::Database {
                code: concern_error.code,
                message: operation_message.to_string(),
            },
            _ => ConnectorError::Unknown(operation_message.to_string()),
        },
        ErrorKind::InsertMany(insert_error) => {
            let write_code = insert_error
                .write_errors
                .as_ref()
                .and_then(|errors| errors.first())
                .map(|error| error.code);
            let concern_code = insert_error
                .write_concern_error
                .as_ref()
                .map(|error| error.code);
            match write_code.or(concern_code) {
                Some(code) => ConnectorError::Database {
                    code,
                    message: operation_message.to_string(),
                },
                None => ConnectorError::Unknown(operation_message.to_string()),
            }
        }
        _ => ConnectorError::Unknown(operation_message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_keeps_its_own_message() {
        let error = ConnectorError::Validation("the document cannot be empty".into());
        assert_eq!(error.code(), ErrorCode::Validation);
        assert_eq!(error.to_string(), "the document cannot be empty");
    }

    #[test]
    fn parse_reports_connectivity_code() {
        let error = ConnectorError::Parse("bad json".into());
        assert_eq!(error.code(), ErrorCode::Connectivity);
    }

    #[test]
    fn server_code_is_propagated_verbatim() {
        let error = ConnectorError::Database {
            code: 11000,
            message: "duplicate key".into(),
        };
        assert_eq!(error.code(), ErrorCode::Server(11000));
        assert_eq!(error.code().to_string(), "11000");
    }

    #[test]
    fn symbolic_codes_render_with_prefix() {
        assert_eq!(ErrorCode::Validation.to_string(), "MONGODB:VALIDATION");
        assert_eq!(ErrorCode::Connectivity.to_string(), "MONGODB:CONNECTIVITY");
        assert_eq!(ErrorCode::Unknown.to_string(), "MONGODB:UNKNOWN");
    }
}
