//! Declarative schema definitions
//!
//! Schemas can be described in JSON or TOML documents keyed by schema name:
//!
//! ```toml
//! [user]
//! attributes = ["name", "email", "photo"]
//! strict = true
//!
//! [user.formatters]
//! photo = { "$ref" = "photo", options = { only = ["url"] } }
//! ```
//!
//! Documents carry attributes, extra attributes, the strict flag and
//! delegation formatters. Transform functions are code and are attached after
//! loading with [`SchemaRegistry::attach_formatter`].

use crate::error::{SchemaError, SchemaResult};
use crate::options::SerializeOptions;
use crate::registry::SchemaRegistry;
use crate::schema::{Delegation, Schema};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// One schema as written in a definition document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
	#[serde(default)]
	pub attributes: Option<Vec<String>>,
	#[serde(default, alias = "extraAttributes")]
	pub extra_attributes: Vec<String>,
	#[serde(default)]
	pub strict: bool,
	#[serde(default)]
	pub formatters: IndexMap<String, Value>,
}

impl SchemaDefinition {
	/// Validate the definition and build a [`Schema`]
	///
	/// Each formatter must be a `{ "$ref": <name>, "options"?: {...} }`
	/// object. A non-string `$ref` fails with [`SchemaError::WrongRefType`];
	/// any other shape fails with [`SchemaError::WrongFormatter`].
	pub fn into_schema(self) -> SchemaResult<Schema> {
		let mut schema = Schema::new()
			.extra_attributes(self.extra_attributes)
			.strict(self.strict);
		if let Some(attributes) = self.attributes {
			schema = schema.attributes(attributes);
		}
		for (field, formatter) in self.formatters {
			schema = schema.delegate(field, parse_delegation(&formatter)?);
		}
		Ok(schema)
	}
}

fn parse_delegation(formatter: &Value) -> SchemaResult<Delegation> {
	let Value::Object(descriptor) = formatter else {
		return Err(SchemaError::WrongFormatter(formatter.clone()));
	};
	let reference = match descriptor.get("$ref") {
		Some(Value::String(reference)) => reference,
		Some(other) => return Err(SchemaError::WrongRefType(other.clone())),
		None => return Err(SchemaError::WrongRefType(Value::Null)),
	};
	let options = match descriptor.get("options") {
		Some(options) => SerializeOptions::from_value(options)?,
		None => SerializeOptions::default(),
	};
	Ok(Delegation::to(reference.as_str()).options(options))
}

/// Parse a JSON document of named schema definitions
pub fn parse_json(document: &str) -> SchemaResult<IndexMap<String, SchemaDefinition>> {
	serde_json::from_str(document).map_err(|e| SchemaError::Definition(e.to_string()))
}

/// Parse a TOML document of named schema definitions
pub fn parse_toml(document: &str) -> SchemaResult<IndexMap<String, SchemaDefinition>> {
	toml::from_str(document).map_err(|e| SchemaError::Definition(e.to_string()))
}

impl SchemaRegistry {
	/// Register every schema of a JSON definition document
	///
	/// Nothing is registered unless the whole document is valid. Returns the
	/// registered names in document order.
	///
	/// # Examples
	///
	/// ```
	/// use sculpt_core::{SchemaRegistry, SerializeOptions};
	/// use serde_json::json;
	///
	/// let mut registry = SchemaRegistry::new();
	/// let names = registry
	///     .load_json(r#"{
	///         "user": {"attributes": ["name", "photo"], "formatters": {"photo": {"$ref": "photo"}}},
	///         "photo": {"attributes": ["path"]}
	///     }"#)
	///     .unwrap();
	/// assert_eq!(names, vec!["user", "photo"]);
	///
	/// let out = registry
	///     .serialize(
	///         "user",
	///         &json!({"name": "a", "photo": {"path": "/p", "size": 3}}),
	///         &SerializeOptions::default(),
	///     )
	///     .unwrap();
	/// assert_eq!(out, json!({"name": "a", "photo": {"path": "/p"}}));
	/// ```
	pub fn load_json(&mut self, document: &str) -> SchemaResult<Vec<String>> {
		self.load_definitions(parse_json(document)?)
	}

	/// Register every schema of a TOML definition document
	pub fn load_toml(&mut self, document: &str) -> SchemaResult<Vec<String>> {
		self.load_definitions(parse_toml(document)?)
	}

	/// Register already parsed definitions
	pub fn load_definitions(
		&mut self,
		definitions: IndexMap<String, SchemaDefinition>,
	) -> SchemaResult<Vec<String>> {
		let schemas = definitions
			.into_iter()
			.map(|(name, definition)| definition.into_schema().map(|schema| (name, schema)))
			.collect::<SchemaResult<Vec<_>>>()?;

		let mut names = Vec::with_capacity(schemas.len());
		for (name, schema) in schemas {
			names.push(name.clone());
			self.add(name, schema);
		}
		tracing::debug!(count = names.len(), "loaded schema definitions");
		Ok(names)
	}
}
