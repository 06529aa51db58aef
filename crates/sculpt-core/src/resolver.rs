//! Effective attribute list computation

use crate::options::SerializeOptions;
use crate::schema::Schema;
use indexmap::IndexSet;
use serde_json::{Map, Value};

/// Compute the ordered, de-duplicated list of fields to emit for one object
///
/// The schema's declared attributes (or, when absent, the object's own keys)
/// are extended with `extra_attributes`, then `omit` is subtracted. `only`
/// replaces the whole list last, so it wins over everything else.
///
/// # Examples
///
/// ```
/// use sculpt_core::{Schema, SerializeOptions, effective_attributes};
/// use serde_json::json;
///
/// let schema = Schema::new().attributes(["name", "email"]).extra_attributes(["avatar"]);
/// let data = json!({});
/// let options = SerializeOptions::new().omit(["email"]);
///
/// let attributes = effective_attributes(&schema, &options, data.as_object().unwrap());
/// assert_eq!(attributes, vec!["name", "avatar"]);
/// ```
pub fn effective_attributes(
	schema: &Schema,
	options: &SerializeOptions,
	data: &Map<String, Value>,
) -> Vec<String> {
	if let Some(only) = options.only_list() {
		return only.iter().cloned().collect::<IndexSet<_>>().into_iter().collect();
	}

	let mut attributes: IndexSet<String> = match schema.declared_attributes() {
		Some(declared) => declared.iter().cloned().collect(),
		None => data.keys().cloned().collect(),
	};
	attributes.extend(schema.declared_extra_attributes().iter().cloned());

	if let Some(omit) = options.omit_list() {
		attributes.retain(|attribute| !omit.contains(attribute));
	}

	attributes.into_iter().collect()
}
