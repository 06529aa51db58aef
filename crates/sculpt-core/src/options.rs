//! Per-call serialization options
//!
//! Options never mutate a schema. They narrow or widen the effective attribute
//! list for one invocation, override strict mode, and carry data that
//! transform functions may read.

use crate::error::{SchemaError, SchemaResult};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Options passed to a single serialization call
///
/// # Examples
///
/// ```
/// use sculpt_core::SerializeOptions;
///
/// let options = SerializeOptions::new().omit(["password"]).strict(false);
/// assert_eq!(options.omit_list(), Some(&["password".to_string()][..]));
/// assert_eq!(options.strict_override(), Some(false));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SerializeOptions {
	omit: Option<Vec<String>>,
	only: Option<Vec<String>>,
	strict: Option<bool>,
	pass_parent: bool,
	parent: Option<Value>,
	context: Map<String, Value>,
}

impl SerializeOptions {
	/// Create empty options
	pub fn new() -> Self {
		Self::default()
	}

	/// Exclude the given fields from the effective attribute list
	pub fn omit<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.omit = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	/// Replace the effective attribute list with the given fields
	pub fn only<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.only = Some(fields.into_iter().map(Into::into).collect());
		self
	}

	/// Override the schema's strict flag for this call
	pub fn strict(mut self, strict: bool) -> Self {
		self.strict = Some(strict);
		self
	}

	/// Ask a delegating formatter to hand the enclosing value to the nested schema
	pub fn pass_parent(mut self) -> Self {
		self.pass_parent = true;
		self
	}

	/// Add a free-form value readable by transform functions
	pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
		self.context.insert(key.into(), value);
		self
	}

	pub fn omit_list(&self) -> Option<&[String]> {
		self.omit.as_deref()
	}

	pub fn only_list(&self) -> Option<&[String]> {
		self.only.as_deref()
	}

	pub fn strict_override(&self) -> Option<bool> {
		self.strict
	}

	pub fn passes_parent(&self) -> bool {
		self.pass_parent
	}

	/// The enclosing value injected by a `pass_parent` delegation
	pub fn parent(&self) -> Option<&Value> {
		self.parent.as_ref()
	}

	/// Look up a free-form context value
	pub fn context(&self, key: &str) -> Option<&Value> {
		self.context.get(key)
	}

	/// Build a fresh copy of these options carrying `parent`
	///
	/// The original options are left untouched so sibling delegations never
	/// observe each other's parent.
	pub fn with_parent(&self, parent: Value) -> Self {
		Self {
			parent: Some(parent),
			..self.clone()
		}
	}

	/// Parse options from an untyped document
	///
	/// `null` yields empty options. Recognized keys are `omit`, `only`,
	/// `strict`, `passParent` (or `pass_parent`) and `parent`; every other key
	/// lands in the free-form context. A non-boolean `strict` is ignored.
	///
	/// # Examples
	///
	/// ```
	/// use sculpt_core::SerializeOptions;
	/// use serde_json::json;
	///
	/// let options = SerializeOptions::from_value(&json!({"only": ["email"], "locale": "en"})).unwrap();
	/// assert_eq!(options.only_list(), Some(&["email".to_string()][..]));
	/// assert_eq!(options.context("locale"), Some(&json!("en")));
	///
	/// assert!(SerializeOptions::from_value(&json!("nope")).is_err());
	/// ```
	pub fn from_value(value: &Value) -> SchemaResult<Self> {
		match value {
			Value::Null => return Ok(Self::default()),
			Value::Object(_) => {}
			other => return Err(SchemaError::wrong_type("options", "object", other)),
		}

		let raw = RawOptions::deserialize(value)
			.map_err(|_| SchemaError::wrong_type("options", "object", value))?;
		Ok(Self {
			omit: raw.omit.map(|list| field_list("options.omit", &list)).transpose()?,
			only: raw.only.map(|list| field_list("options.only", &list)).transpose()?,
			strict: raw.strict,
			pass_parent: raw.pass_parent.unwrap_or(false),
			parent: raw.parent,
			context: raw.context,
		})
	}
}

/// Options document as written by callers
#[derive(Deserialize)]
struct RawOptions {
	#[serde(default)]
	omit: Option<Value>,
	#[serde(default)]
	only: Option<Value>,
	#[serde(default, deserialize_with = "lenient_bool")]
	strict: Option<bool>,
	#[serde(
		default,
		rename = "passParent",
		alias = "pass_parent",
		deserialize_with = "lenient_bool"
	)]
	pass_parent: Option<bool>,
	#[serde(default)]
	parent: Option<Value>,
	#[serde(flatten)]
	context: Map<String, Value>,
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Value::deserialize(deserializer)?.as_bool())
}

fn field_list(field: &str, value: &Value) -> SchemaResult<Vec<String>> {
	Vec::<String>::deserialize(value).map_err(|_| {
		let expected = if value.is_array() { "array of strings" } else { "array" };
		SchemaError::wrong_type(field, expected, value)
	})
}
