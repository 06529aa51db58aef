//! Error types raised by the schema registry and the serialization engine
//!
//! Every failure is fatal for the top-level invocation that raised it. The
//! recursion-guard cut is not an error and never shows up here.

use serde_json::Value;
use thiserror::Error;

/// Result alias used throughout the crate
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while registering schemas or serializing data
///
/// # Examples
///
/// ```
/// use sculpt_core::SchemaError;
///
/// let err = SchemaError::SchemaNotDefined("photo".to_string());
/// assert_eq!(err.to_string(), "Schema \"photo\" is not defined!");
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
	/// A schema name was resolved that is absent from the registry
	#[error("Schema \"{0}\" is not defined!")]
	SchemaNotDefined(String),

	/// A delegation descriptor carried a `$ref` that is not a string
	#[error("Expected \"$ref\" to be string, get {} type", type_name(.0))]
	WrongRefType(Value),

	/// A formatter entry is neither a transform function nor a delegation descriptor
	#[error("Expected formatter to be function or object, get {} type", type_name(.0))]
	WrongFormatter(Value),

	/// Strict mode is active and an attribute resolved to nothing
	#[error("Attribute \"{0}\" required in strict mode")]
	AttributeNotFound(String),

	/// A structural precondition on the input was violated
	#[error("Expected \"{field}\" to be {expected}, get {} type", type_name(.actual))]
	WrongType {
		field: String,
		expected: String,
		actual: Value,
	},

	/// A fallible transform function reported a failure
	#[error("Formatter for \"{field}\" failed: {message}")]
	Formatter { field: String, message: String },

	/// A schema definition document could not be parsed
	#[error("Invalid schema definition: {0}")]
	Definition(String),

	/// A model could not be converted into plain data
	#[error("Failed to convert value: {0}")]
	Conversion(String),
}

impl SchemaError {
	/// Create a [`SchemaError::WrongType`] for the given field
	pub fn wrong_type(field: impl Into<String>, expected: impl Into<String>, actual: &Value) -> Self {
		SchemaError::WrongType {
			field: field.into(),
			expected: expected.into(),
			actual: actual.clone(),
		}
	}

	/// Create a [`SchemaError::Formatter`] from any displayable failure
	pub fn formatter(field: impl Into<String>, message: impl std::fmt::Display) -> Self {
		SchemaError::Formatter {
			field: field.into(),
			message: message.to_string(),
		}
	}

	/// Check if this error comes from strict-mode attribute resolution
	pub fn is_attribute_not_found(&self) -> bool {
		matches!(self, SchemaError::AttributeNotFound(_))
	}
}

/// Name of the JSON type of a value, as used in error messages
pub fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(SchemaError::SchemaNotDefined("user".into()), "Schema \"user\" is not defined!")]
	#[case(SchemaError::WrongRefType(json!(42)), "Expected \"$ref\" to be string, get number type")]
	#[case(
		SchemaError::WrongFormatter(json!("upper")),
		"Expected formatter to be function or object, get string type"
	)]
	#[case(
		SchemaError::AttributeNotFound("email".into()),
		"Attribute \"email\" required in strict mode"
	)]
	#[case(
		SchemaError::wrong_type("data", "object or array", &json!(true)),
		"Expected \"data\" to be object or array, get boolean type"
	)]
	fn test_error_display(#[case] err: SchemaError, #[case] expected: &str) {
		assert_eq!(err.to_string(), expected);
	}

	#[rstest]
	fn test_formatter_error_keeps_field() {
		// Arrange
		let source = "bad digit";

		// Act
		let err = SchemaError::formatter("age", source);

		// Assert
		assert_eq!(
			err,
			SchemaError::Formatter {
				field: "age".to_string(),
				message: "bad digit".to_string(),
			}
		);
		assert!(!err.is_attribute_not_found());
	}

	#[rstest]
	#[case(json!(null), "null")]
	#[case(json!([1, 2]), "array")]
	#[case(json!({"a": 1}), "object")]
	#[case(json!(1.5), "number")]
	fn test_type_name(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(type_name(&value), expected);
	}
}
