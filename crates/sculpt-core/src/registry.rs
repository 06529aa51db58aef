//! Schema registry
//!
//! The registry is an ordinary value: construct as many as you need, each with
//! its own set of named schemas. Serialization borrows it immutably, so one
//! registry can serve many callers at once.

use crate::engine::SerializationEngine;
use crate::error::{SchemaError, SchemaResult};
use crate::guard::RecursionGuard;
use crate::options::SerializeOptions;
use crate::schema::{Formatter, Schema};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Named collection of schemas
///
/// # Examples
///
/// ```
/// use sculpt_core::{Schema, SchemaRegistry, SerializeOptions};
/// use serde_json::json;
///
/// let mut registry = SchemaRegistry::new();
/// registry.add(
///     "photo",
///     Schema::new()
///         .attributes(["url"])
///         .formatter("url", |data, _, _| {
///             let path = data["path"].as_str().unwrap_or("");
///             let kind = data["type"].as_str().unwrap_or("");
///             json!(format!("{path}.{kind}"))
///         }),
/// );
///
/// let photo = registry
///     .serialize("photo", &json!({"path": "/p", "type": "jpg"}), &SerializeOptions::default())
///     .unwrap();
/// assert_eq!(photo, json!({"url": "/p.jpg"}));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
	schemas: HashMap<String, Arc<Schema>>,
}

/// Outcome of looking a schema up on behalf of a delegation
#[derive(Debug)]
pub enum Resolution<'r> {
	/// The schema may be resolved; the guard holds one entry for it
	Serializer(BoundSerializer<'r>),
	/// The schema is already on the active path; skip the field
	Skip,
}

/// A serialize operation bound to one registered schema
///
/// Obtained from [`SchemaRegistry::get`], which pushed the schema name onto
/// the guard. [`BoundSerializer::serialize`] pops it again, whether the
/// serialization succeeds or fails.
#[derive(Debug, Clone, Copy)]
pub struct BoundSerializer<'r> {
	name: &'r str,
	schema: &'r Schema,
}

impl<'r> BoundSerializer<'r> {
	pub fn name(&self) -> &'r str {
		self.name
	}

	pub fn schema(&self) -> &'r Schema {
		self.schema
	}

	/// Serialize `data` with the bound schema and leave its guard entry
	pub fn serialize(
		self,
		engine: &mut SerializationEngine<'r>,
		data: &Value,
		options: &SerializeOptions,
	) -> SchemaResult<Value> {
		let result = engine.serialize_data(self.schema, data, options);
		engine.leave(self.name);
		result
	}
}

impl SchemaRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `schema` under `name`, replacing any previous schema
	pub fn add(&mut self, name: impl Into<String>, schema: Schema) {
		let name = name.into();
		let replaced = self.schemas.insert(name.clone(), Arc::new(schema)).is_some();
		tracing::debug!(schema = %name, replaced, "registered schema");
	}

	/// Remove the schema registered under `name`
	///
	/// Returns whether a schema was registered.
	pub fn remove(&mut self, name: &str) -> bool {
		let existed = self.schemas.remove(name).is_some();
		if existed {
			tracing::debug!(schema = %name, "removed schema");
		}
		existed
	}

	pub fn contains(&self, name: &str) -> bool {
		self.schemas.contains_key(name)
	}

	/// Registered schema names, sorted
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	pub fn len(&self) -> usize {
		self.schemas.len()
	}

	pub fn is_empty(&self) -> bool {
		self.schemas.is_empty()
	}

	/// Look a schema up without touching any recursion guard
	pub fn schema(&self, name: &str) -> Option<&Schema> {
		self.schemas.get(name).map(Arc::as_ref)
	}

	/// Add or replace one formatter of an already registered schema
	///
	/// The stored schema is replaced by an updated copy. This is how transform
	/// functions are attached to schemas loaded from definition documents.
	pub fn attach_formatter(
		&mut self,
		name: &str,
		field: impl Into<String>,
		formatter: Formatter,
	) -> SchemaResult<()> {
		let schema = self
			.schemas
			.get_mut(name)
			.ok_or_else(|| SchemaError::SchemaNotDefined(name.to_string()))?;
		let updated = schema.as_ref().clone().with_formatter(field, formatter);
		*schema = Arc::new(updated);
		Ok(())
	}

	/// Enter `name` on the guard and bind its schema
	///
	/// Pushes `name`. If that makes `name` occur more than once on the
	/// active path the push is undone and [`Resolution::Skip`] is returned.
	/// An unknown name fails with [`SchemaError::SchemaNotDefined`], also
	/// leaving the guard as it was.
	pub fn get<'r>(
		&'r self,
		name: &str,
		guard: &mut RecursionGuard,
	) -> SchemaResult<Resolution<'r>> {
		if !guard.enter(name) {
			tracing::debug!(schema = %name, path = ?guard.path(), "recursion cut, skipping delegated field");
			return Ok(Resolution::Skip);
		}

		match self.schemas.get_key_value(name) {
			Some((key, schema)) => Ok(Resolution::Serializer(BoundSerializer {
				name: key.as_str(),
				schema: schema.as_ref(),
			})),
			None => {
				guard.pop();
				Err(SchemaError::SchemaNotDefined(name.to_string()))
			}
		}
	}

	/// Entry point for one schema name
	///
	/// # Examples
	///
	/// ```
	/// use sculpt_core::{Schema, SchemaRegistry, SerializeOptions};
	/// use serde_json::json;
	///
	/// let mut registry = SchemaRegistry::new();
	/// registry.add("user", Schema::new().attributes(["name"]));
	///
	/// let user = registry.entry("user");
	/// let out = user.call(&json!({"name": "Ann", "password": "x"}), &SerializeOptions::default());
	/// assert_eq!(out.unwrap(), json!({"name": "Ann"}));
	/// ```
	pub fn entry(&self, name: impl Into<String>) -> EntryPoint<'_> {
		EntryPoint {
			registry: self,
			name: name.into(),
		}
	}

	/// Serialize `data` with the schema registered as `name`
	///
	/// Each call starts from an empty recursion guard.
	pub fn serialize(
		&self,
		name: &str,
		data: &Value,
		options: &SerializeOptions,
	) -> SchemaResult<Value> {
		SerializationEngine::new(self).serialize(name, data, options)
	}

	/// Serialize with options given as an untyped document
	///
	/// The document must be an object (or null); see
	/// [`SerializeOptions::from_value`].
	pub fn serialize_value(&self, name: &str, data: &Value, options: &Value) -> SchemaResult<Value> {
		let options = SerializeOptions::from_value(options)?;
		self.serialize(name, data, &options)
	}

	/// Convert a model to plain data and serialize it
	///
	/// # Examples
	///
	/// ```
	/// use sculpt_core::{Schema, SchemaRegistry, SerializeOptions};
	/// use serde::Serialize;
	/// use serde_json::json;
	///
	/// #[derive(Serialize)]
	/// struct User { id: i64, name: String, password: String }
	///
	/// let mut registry = SchemaRegistry::new();
	/// registry.add("user", Schema::new().attributes(["id", "name"]));
	///
	/// let user = User { id: 1, name: "Alice".into(), password: "secret".into() };
	/// let out = registry.serialize_model("user", &user, &SerializeOptions::default()).unwrap();
	/// assert_eq!(out, json!({"id": 1, "name": "Alice"}));
	/// ```
	pub fn serialize_model<T>(
		&self,
		name: &str,
		model: &T,
		options: &SerializeOptions,
	) -> SchemaResult<Value>
	where
		T: Serialize + ?Sized,
	{
		let data = serde_json::to_value(model).map_err(|e| SchemaError::Conversion(e.to_string()))?;
		self.serialize(name, &data, options)
	}
}

/// Callable entry point bound to one schema name
#[derive(Debug, Clone)]
pub struct EntryPoint<'r> {
	registry: &'r SchemaRegistry,
	name: String,
}

impl EntryPoint<'_> {
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Serialize `data`, starting from an empty recursion guard
	pub fn call(&self, data: &Value, options: &SerializeOptions) -> SchemaResult<Value> {
		self.registry.serialize(&self.name, data, options)
	}
}
