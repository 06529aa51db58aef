//! Formatter dispatch
//!
//! Runs a schema's formatters, in declaration order, for the fields that are
//! part of the effective attribute list. Each transform sees the output
//! computed so far, so a later formatter can derive its value from an earlier
//! one.

use crate::engine::SerializationEngine;
use crate::error::SchemaResult;
use crate::options::SerializeOptions;
use crate::schema::{Delegation, Formatter, Schema};
use serde_json::{Map, Value};
use std::borrow::Cow;

pub(crate) fn apply_formatters(
	engine: &mut SerializationEngine<'_>,
	schema: &Schema,
	source: &Value,
	data: &Map<String, Value>,
	options: &SerializeOptions,
	attributes: &[String],
) -> SchemaResult<Map<String, Value>> {
	let mut output = Map::new();
	for (field, formatter) in schema.formatters() {
		if !attributes.contains(field) {
			continue;
		}
		let value = match formatter {
			Formatter::Transform(transform) => Some(transform(source, options, &output)?),
			Formatter::Delegate(delegation) => delegate(engine, field, delegation, source, data)?,
		};
		if let Some(value) = value {
			output.insert(field.clone(), value);
		}
	}
	Ok(output)
}

/// Render one field with the delegation's target schema
///
/// The target schema is bound before the source is inspected, so an unknown
/// reference fails even when the field is absent. `None` means the field is
/// left to raw-attribute handling: either the guard cut the resolution, or
/// the source has nothing to delegate.
fn delegate(
	engine: &mut SerializationEngine<'_>,
	field: &str,
	delegation: &Delegation,
	source: &Value,
	data: &Map<String, Value>,
) -> SchemaResult<Option<Value>> {
	let Some(bound) = engine.bind(delegation.reference())? else {
		return Ok(None);
	};

	let target = match delegation.extract(source) {
		Some(derived) => Cow::Owned(derived),
		None => match data.get(field) {
			Some(raw) => Cow::Borrowed(raw),
			None => {
				engine.leave(bound.name());
				return Ok(None);
			}
		},
	};

	let nested = delegation.nested_options();
	let options = if nested.passes_parent() {
		Cow::Owned(nested.with_parent(source.clone()))
	} else {
		Cow::Borrowed(nested)
	};

	bound.serialize(engine, &target, &options).map(Some)
}
