//! Query error types.
//!
//! Condition setters never fail; these errors only come from decoding
//! externally supplied data (stored trees, raw query strings).

use thiserror::Error;

/// Errors raised while decoding query input.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("predicate tree must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("group '{key}' must be an array of objects")]
    MalformedGroup { key: String },

    #[error("field '{field}' has an invalid condition: {reason}")]
    MalformedCondition { field: String, reason: String },

    #[error("invalid query string: {0}")]
    InvalidQueryString(String),
}

/// Result type alias using QueryError.
pub type QueryResult<T> = Result<T, QueryError>;

/// Name of a JSON value's kind, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
