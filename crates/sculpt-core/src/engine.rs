//! Recursive serialization engine
//!
//! One [`SerializationEngine`] drives one top-level invocation. It owns the
//! recursion guard for that invocation, so concurrent invocations against
//! the same registry never share guard state.

use crate::dispatch;
use crate::error::{SchemaError, SchemaResult};
use crate::guard::RecursionGuard;
use crate::options::SerializeOptions;
use crate::registry::{BoundSerializer, Resolution, SchemaRegistry};
use crate::resolver::effective_attributes;
use crate::schema::Schema;
use serde_json::{Map, Value};

/// Drives the resolution of one top-level call and every delegation below it
#[derive(Debug)]
pub struct SerializationEngine<'r> {
	registry: &'r SchemaRegistry,
	guard: RecursionGuard,
}

impl<'r> SerializationEngine<'r> {
	pub fn new(registry: &'r SchemaRegistry) -> Self {
		Self {
			registry,
			guard: RecursionGuard::new(),
		}
	}

	/// Active resolution path
	pub fn guard(&self) -> &RecursionGuard {
		&self.guard
	}

	/// Serialize `data` with the schema registered as `name`
	///
	/// The guard is reset first, so every call is a fresh top-level
	/// invocation. `data` must be an object, an array or null.
	pub fn serialize(
		&mut self,
		name: &str,
		data: &Value,
		options: &SerializeOptions,
	) -> SchemaResult<Value> {
		self.guard.reset();
		let output = self.resolve(name, data, options)?;
		debug_assert!(self.guard.is_empty(), "unbalanced recursion guard");
		// A fresh guard never cuts the outermost schema
		Ok(output.unwrap_or(Value::Null))
	}

	/// Resolve `name` against `data`
	///
	/// Returns `None` when the guard cuts the resolution because `name` is
	/// already on the active path.
	pub(crate) fn resolve(
		&mut self,
		name: &str,
		data: &Value,
		options: &SerializeOptions,
	) -> SchemaResult<Option<Value>> {
		match self.bind(name)? {
			Some(bound) => bound.serialize(self, data, options).map(Some),
			None => Ok(None),
		}
	}

	/// Enter `name` on the active path and bind its schema
	///
	/// `None` means the guard cut the resolution. A bound serializer holds a
	/// guard entry until it is serialized or released with [`Self::leave`].
	pub(crate) fn bind(&mut self, name: &str) -> SchemaResult<Option<BoundSerializer<'r>>> {
		match self.registry.get(name, &mut self.guard)? {
			Resolution::Skip => Ok(None),
			Resolution::Serializer(bound) => {
				tracing::trace!(schema = %name, depth = self.guard.depth(), "entering schema");
				Ok(Some(bound))
			}
		}
	}

	pub(crate) fn leave(&mut self, name: &str) {
		let popped = self.guard.pop();
		debug_assert_eq!(popped.as_deref(), Some(name));
		tracing::trace!(schema = %name, depth = self.guard.depth(), "leaving schema");
	}

	/// Apply `schema` to an object, to each element of an array, or pass null through
	pub(crate) fn serialize_data(
		&mut self,
		schema: &Schema,
		data: &Value,
		options: &SerializeOptions,
	) -> SchemaResult<Value> {
		match data {
			Value::Null => Ok(Value::Null),
			Value::Object(map) => self.serialize_object(schema, data, map, options).map(Value::Object),
			Value::Array(items) => items
				.iter()
				.map(|item| match item {
					Value::Null => Ok(Value::Null),
					Value::Object(map) => {
						self.serialize_object(schema, item, map, options).map(Value::Object)
					}
					other => Err(SchemaError::wrong_type("data", "object or array", other)),
				})
				.collect::<SchemaResult<Vec<_>>>()
				.map(Value::Array),
			other => Err(SchemaError::wrong_type("data", "object or array", other)),
		}
	}

	fn serialize_object(
		&mut self,
		schema: &Schema,
		source: &Value,
		data: &Map<String, Value>,
		options: &SerializeOptions,
	) -> SchemaResult<Map<String, Value>> {
		let attributes = effective_attributes(schema, options, data);
		let mut formatted = dispatch::apply_formatters(self, schema, source, data, options, &attributes)?;
		let strict = options.strict_override().unwrap_or(schema.is_strict());

		let mut output = Map::with_capacity(attributes.len());
		for attribute in attributes {
			if let Some(value) = formatted.remove(&attribute) {
				output.insert(attribute, value);
				continue;
			}
			match data.get(&attribute) {
				Some(raw) => {
					output.insert(attribute, raw.clone());
				}
				None if strict => {
					tracing::warn!(attribute = %attribute, "missing attribute in strict mode");
					return Err(SchemaError::AttributeNotFound(attribute));
				}
				None => {}
			}
		}
		Ok(output)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::Delegation;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn registry() -> SchemaRegistry {
		let mut registry = SchemaRegistry::new();
		registry.add(
			"user",
			Schema::new()
				.attributes(["name", "email", "photo"])
				.delegate("photo", Delegation::to("photo")),
		);
		registry.add(
			"photo",
			Schema::new().attributes(["url"]).formatter("url", |data, _, _| {
				json!(format!(
					"{}.{}",
					data["path"].as_str().unwrap_or_default(),
					data["type"].as_str().unwrap_or_default()
				))
			}),
		);
		registry
	}

	#[rstest]
	#[case(json!(1))]
	#[case(json!("user"))]
	#[case(json!(false))]
	fn test_scalar_data_is_rejected(registry: SchemaRegistry, #[case] data: Value) {
		let mut engine = SerializationEngine::new(&registry);

		let err = engine.serialize("user", &data, &SerializeOptions::default()).unwrap_err();

		assert_eq!(err, SchemaError::wrong_type("data", "object or array", &data));
		assert!(engine.guard().is_empty());
	}

	#[rstest]
	fn test_null_passes_through(registry: SchemaRegistry) {
		let mut engine = SerializationEngine::new(&registry);

		let out = engine.serialize("user", &Value::Null, &SerializeOptions::default()).unwrap();

		assert_eq!(out, Value::Null);
	}

	#[rstest]
	fn test_scalar_array_element_is_rejected(registry: SchemaRegistry) {
		let mut engine = SerializationEngine::new(&registry);

		let err = engine
			.serialize("user", &json!([{"name": "a"}, 3]), &SerializeOptions::default())
			.unwrap_err();

		assert_eq!(err, SchemaError::wrong_type("data", "object or array", &json!(3)));
	}

	#[rstest]
	fn test_guard_balanced_after_array_with_nested_arrays(registry: SchemaRegistry) {
		// Arrange
		let data = json!([
			{"name": "a", "photo": [{"path": "/1", "type": "png"}, null, {"path": "/2", "type": "gif"}]},
			null,
			{"name": "b", "photo": {"path": "/3", "type": "jpg"}}
		]);
		let mut engine = SerializationEngine::new(&registry);

		// Act
		let out = engine.serialize("user", &data, &SerializeOptions::default()).unwrap();

		// Assert
		assert!(engine.guard().is_empty());
		assert_eq!(
			out,
			json!([
				{"name": "a", "photo": [{"url": "/1.png"}, null, {"url": "/2.gif"}]},
				null,
				{"name": "b", "photo": {"url": "/3.jpg"}}
			])
		);
	}

	#[rstest]
	fn test_engine_reuse_starts_fresh(registry: SchemaRegistry) {
		let mut engine = SerializationEngine::new(&registry);
		let _ = engine.serialize("user", &json!({"photo": 5}), &SerializeOptions::default());

		let out = engine
			.serialize("user", &json!({"name": "again"}), &SerializeOptions::default())
			.unwrap();

		assert_eq!(out, json!({"name": "again"}));
		assert!(engine.guard().is_empty());
	}
}
