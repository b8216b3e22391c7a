//! Operation payload types.
//!
//! The connector hands a single JSON payload back to the hosting flow:
//! either the data result of the driver call or, on failure, a structured
//! fault carrying the classified code and message.

use serde::Serialize;
use serde_json::Value;

use crate::errors::{ConnectorError, ErrorCode};

/// Structured fault written to the host's fault channel.
#[derive(Debug, Clone, Serialize)]
pub struct FaultPayload {
    /// Classified error code (symbolic, or a bare server code).
    pub code: ErrorCode,

    /// Human-readable error message.
    pub message: String,
}

impl From<&ConnectorError> for FaultPayload {
    fn from(error: &ConnectorError) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
        }
    }
}

impl FaultPayload {
    /// Serializes the fault as JSON text.
    pub fn to_json_text(&self) -> String {
        serde_json::json!({ "code": self.code, "message": self.message }).to_string()
    }
}

/// Fixed acknowledgement payload for write operations, e.g.
/// `{"InsertOneResult":"Successful"}`.
pub fn acknowledgement(operation: &str) -> Value {
    let mut payload = serde_json::Map::new();
    payload.insert(
        format!("{}Result", operation),
        Value::String("Successful".to_string()),
    );
    Value::Object(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acknowledgement_has_fixed_shape() {
        let payload = acknowledgement("InsertOne");
        assert_eq!(
            payload,
            serde_json::json!({ "InsertOneResult": "Successful" })
        );
    }

    #[test]
    fn fault_carries_classified_code() {
        let error = ConnectorError::Database {
            code: 8000,
            message: "Error occurred while inserting the document to the database".to_string(),
        };
        let fault = FaultPayload::from(&error);
        assert_eq!(fault.code, ErrorCode::Server(8000));
        let text = fault.to_json_text();
        assert!(text.contains("\"code\":\"8000\""));
    }

    #[test]
    fn validation_fault_renders_symbolic_code() {
        let error = ConnectorError::Validation("The document cannot be null or empty.".into());
        let fault = FaultPayload::from(&error);
        assert!(fault.to_json_text().contains("MONGODB:VALIDATION"));
        assert_eq!(fault.message, "The document cannot be null or empty.");
    }
}
