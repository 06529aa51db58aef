//! Schema definitions and formatters
//!
//! A [`Schema`] describes how one kind of data is shaped into an output
//! object: which attributes to emit, whether missing attributes are fatal,
//! and how individual fields are computed.

use crate::error::{SchemaError, SchemaResult};
use crate::options::SerializeOptions;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Transform function signature: `(source, options, output so far) -> value`
pub type TransformFn =
	dyn Fn(&Value, &SerializeOptions, &Map<String, Value>) -> SchemaResult<Value> + Send + Sync;

/// Getter signature: derives the value handed to a delegated schema
pub type GetterFn = dyn Fn(&Value) -> Value + Send + Sync;

/// A per-field rule
#[derive(Clone)]
pub enum Formatter {
	/// Compute the field with a function
	Transform(Arc<TransformFn>),
	/// Render the field with another registered schema
	Delegate(Delegation),
}

impl fmt::Debug for Formatter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Formatter::Transform(_) => f.write_str("Transform(<fn>)"),
			Formatter::Delegate(delegation) => f.debug_tuple("Delegate").field(delegation).finish(),
		}
	}
}

/// A `$ref` descriptor: render a field with the named schema
///
/// # Examples
///
/// ```
/// use sculpt_core::{Delegation, SerializeOptions};
/// use serde_json::json;
///
/// let gallery = Delegation::to("photo")
///     .options(SerializeOptions::new().only(["url"]))
///     .getter(|data| data["photos"].clone());
/// assert_eq!(gallery.reference(), "photo");
/// assert!(gallery.has_getter());
/// ```
#[derive(Clone)]
pub struct Delegation {
	reference: String,
	options: SerializeOptions,
	getter: Option<Arc<GetterFn>>,
}

impl Delegation {
	/// Delegate to the schema registered as `reference`
	pub fn to(reference: impl Into<String>) -> Self {
		Self {
			reference: reference.into(),
			options: SerializeOptions::default(),
			getter: None,
		}
	}

	/// Options for the nested call
	pub fn options(mut self, options: SerializeOptions) -> Self {
		self.options = options;
		self
	}

	/// Derive the nested value from the enclosing one instead of reading the field by key
	pub fn getter<F>(mut self, getter: F) -> Self
	where
		F: Fn(&Value) -> Value + Send + Sync + 'static,
	{
		self.getter = Some(Arc::new(getter));
		self
	}

	pub fn reference(&self) -> &str {
		&self.reference
	}

	pub fn nested_options(&self) -> &SerializeOptions {
		&self.options
	}

	pub fn has_getter(&self) -> bool {
		self.getter.is_some()
	}

	pub(crate) fn extract(&self, source: &Value) -> Option<Value> {
		self.getter.as_ref().map(|getter| getter(source))
	}
}

impl fmt::Debug for Delegation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Delegation")
			.field("reference", &self.reference)
			.field("options", &self.options)
			.field("getter", &self.getter.is_some())
			.finish()
	}
}

/// Declarative description of how to shape one kind of data
///
/// # Examples
///
/// ```
/// use sculpt_core::{Delegation, Schema};
/// use serde_json::json;
///
/// let user = Schema::new()
///     .attributes(["name", "email", "photo"])
///     .strict(true)
///     .formatter("email", |data, _, _| {
///         json!(data["email"].as_str().unwrap_or_default().to_lowercase())
///     })
///     .delegate("photo", Delegation::to("photo"));
/// assert!(user.is_strict());
/// assert_eq!(user.formatters().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
	attributes: Option<Vec<String>>,
	extra_attributes: Vec<String>,
	strict: bool,
	formatters: IndexMap<String, Formatter>,
}

impl Schema {
	pub fn new() -> Self {
		Self::default()
	}

	/// Fields to emit; without this the input object's own keys are used
	pub fn attributes<I, S>(mut self, attributes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.attributes = Some(attributes.into_iter().map(Into::into).collect());
		self
	}

	/// Fields appended to the effective list when not already present
	pub fn extra_attributes<I, S>(mut self, attributes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.extra_attributes = attributes.into_iter().map(Into::into).collect();
		self
	}

	pub fn strict(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}

	/// Compute `field` with an infallible transform function
	pub fn formatter<F>(self, field: impl Into<String>, transform: F) -> Self
	where
		F: Fn(&Value, &SerializeOptions, &Map<String, Value>) -> Value + Send + Sync + 'static,
	{
		self.try_formatter(field, move |data, options, output| {
			Ok::<_, SchemaError>(transform(data, options, output))
		})
	}

	/// Compute `field` with a transform function that may fail
	///
	/// Failures abort the invocation as [`SchemaError::Formatter`].
	pub fn try_formatter<F, E>(self, field: impl Into<String>, transform: F) -> Self
	where
		F: Fn(&Value, &SerializeOptions, &Map<String, Value>) -> Result<Value, E>
			+ Send
			+ Sync
			+ 'static,
		E: fmt::Display,
	{
		let field = field.into();
		let name = field.clone();
		self.with_formatter(
			field,
			Formatter::Transform(Arc::new(
				move |data: &Value, options: &SerializeOptions, output: &Map<String, Value>| {
					transform(data, options, output).map_err(|e| SchemaError::formatter(&name, e))
				},
			)),
		)
	}

	/// Render `field` with another schema
	pub fn delegate(self, field: impl Into<String>, delegation: Delegation) -> Self {
		self.with_formatter(field, Formatter::Delegate(delegation))
	}

	/// Insert a formatter, replacing any previous one for `field` in place
	pub fn with_formatter(mut self, field: impl Into<String>, formatter: Formatter) -> Self {
		self.formatters.insert(field.into(), formatter);
		self
	}

	pub fn declared_attributes(&self) -> Option<&[String]> {
		self.attributes.as_deref()
	}

	pub fn declared_extra_attributes(&self) -> &[String] {
		&self.extra_attributes
	}

	pub fn is_strict(&self) -> bool {
		self.strict
	}

	/// Formatters in declaration order
	pub fn formatters(&self) -> &IndexMap<String, Formatter> {
		&self.formatters
	}
}
