/// Error types raised while building analyzer inputs
///
/// Analysis itself never fails: every error here is raised at construction time,
/// before a `Measurement` or `TextDocument` exists.

use thiserror::Error;

/// Errors raised when constructing analyzer inputs from caller data
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyzerError {
    /// A field was supplied with the wrong runtime type
    #[error("{field} must be {expected}, got {found}")]
    InvalidArgumentType {
        field: String,
        expected: String,
        found: String,
    },

    /// A field had the right type but an unusable value
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// A required field was absent from structured input
    #[error("Missing field: {0}")]
    MissingField(String),
}

impl AnalyzerError {
    pub(crate) fn wrong_type(field: &str, expected: &str, value: &serde_json::Value) -> Self {
        AnalyzerError::InvalidArgumentType {
            field: field.to_string(),
            expected: expected.to_string(),
            found: json_type_name(value).to_string(),
        }
    }
}

/// Name of the JSON type of a value, used in error messages
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Convenience alias for analyzer results
pub type Result<T> = std::result::Result<T, AnalyzerError>;
