//! Wire models of the API under test
//!
//! Bodies are validated field by field so that a schema violation names the
//! offending keys instead of surfacing as an opaque deserialization error.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Response body validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("expected a JSON array")]
    NotAnArray,

    #[error("missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("field '{field}' should be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field 'timestamp' is not a date/time: {0}")]
    InvalidTimestamp(String),
}

/// A status check record as returned by `/api/status`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub id: String,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusRecord {
    pub const REQUIRED_FIELDS: [&'static str; 3] = ["id", "client_name", "timestamp"];

    /// Validate a JSON value into a record
    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        let object = value.as_object().ok_or(SchemaError::NotAnObject)?;

        let missing: Vec<&'static str> = Self::REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !object.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError::MissingFields(missing));
        }

        let id = record_id(&object["id"]).ok_or(SchemaError::WrongType {
            field: "id",
            expected: "a string or integer",
        })?;

        let client_name = object["client_name"]
            .as_str()
            .ok_or(SchemaError::WrongType {
                field: "client_name",
                expected: "a string",
            })?
            .to_string();

        let raw_timestamp = object["timestamp"].as_str().ok_or(SchemaError::WrongType {
            field: "timestamp",
            expected: "a string",
        })?;
        let timestamp = parse_timestamp(raw_timestamp)
            .ok_or_else(|| SchemaError::InvalidTimestamp(raw_timestamp.to_string()))?;

        Ok(Self {
            id,
            client_name,
            timestamp,
        })
    }
}

/// Body of `GET /api/`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootMessage {
    pub message: String,
}

impl RootMessage {
    pub const EXPECTED: &'static str = "Hello World";

    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        let object = value.as_object().ok_or(SchemaError::NotAnObject)?;
        let message = object
            .get("message")
            .ok_or_else(|| SchemaError::MissingFields(vec!["message"]))?
            .as_str()
            .ok_or(SchemaError::WrongType {
                field: "message",
                expected: "a string",
            })?;

        Ok(Self {
            message: message.to_string(),
        })
    }

    pub fn is_expected(&self) -> bool {
        self.message == Self::EXPECTED
    }
}

/// Validate that a listing body is an array
pub fn status_list(value: &Value) -> Result<&Vec<Value>, SchemaError> {
    value.as_array().ok_or(SchemaError::NotAnArray)
}

/// Normalise an `id` value to text; strings and integers are accepted
pub fn record_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

/// Parse RFC 3339, or a naive ISO-8601 date/time read as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
