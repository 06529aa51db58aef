//! End-to-end tests: schemas loaded from definition documents through the facade

use rstest::rstest;
use sculpt::{Delegation, Formatter, Schema, SchemaError, SchemaRegistry, SerializeOptions};
use serde_json::{Value, json};

const SCHEMAS: &str = r#"
[user]
attributes = ["name", "email", "photo"]
strict = true

[user.formatters]
photo = { "$ref" = "photo", options = { only = ["path"] } }

[photo]
attributes = ["path", "type"]
"#;

fn lowercase_email() -> Formatter {
	Schema::new()
		.formatter("email", |data, _, _| {
			json!(data["email"].as_str().unwrap_or_default().to_lowercase())
		})
		.formatters()["email"]
		.clone()
}

#[rstest]
fn test_toml_schemas_with_attached_formatter() {
	// Arrange
	let mut registry = SchemaRegistry::new();
	let names = registry.load_toml(SCHEMAS).unwrap();
	registry
		.attach_formatter("user", "email", lowercase_email())
		.unwrap();

	// Act
	let out = registry
		.serialize(
			"user",
			&json!({
				"name": "Tester",
				"email": "TEST@email.com",
				"photo": {"path": "/p", "type": "jpg"}
			}),
			&SerializeOptions::default(),
		)
		.unwrap();

	// Assert
	assert_eq!(names, vec!["user", "photo"]);
	assert_eq!(
		out,
		json!({"name": "Tester", "email": "test@email.com", "photo": {"path": "/p"}})
	);
}

#[rstest]
fn test_loaded_strict_flag_applies() {
	let mut registry = SchemaRegistry::new();
	registry.load_toml(SCHEMAS).unwrap();

	let err = registry
		.serialize("user", &json!({"name": "Tester"}), &SerializeOptions::default())
		.unwrap_err();

	assert_eq!(err, SchemaError::AttributeNotFound("email".to_string()));
}

#[rstest]
fn test_code_and_documents_mix() {
	// Arrange
	let mut registry = SchemaRegistry::new();
	registry.load_json(r#"{"photo": {"attributes": ["path"]}}"#).unwrap();
	registry.add(
		"album",
		Schema::new()
			.attributes(["title", "cover"])
			.delegate("cover", Delegation::to("photo").getter(|data| data["photos"][0].clone())),
	);

	// Act
	let out = registry
		.serialize(
			"album",
			&json!({"title": "Summer", "photos": [{"path": "/1"}, {"path": "/2"}]}),
			&SerializeOptions::default(),
		)
		.unwrap();

	// Assert
	assert_eq!(out, json!({"title": "Summer", "cover": {"path": "/1"}}));
}

#[rstest]
#[case(r#"{"user": {"formatters": {"photo": {"$ref": 1}}}}"#, SchemaError::WrongRefType(json!(1)))]
#[case(r#"{"user": {"formatters": {"photo": true}}}"#, SchemaError::WrongFormatter(json!(true)))]
#[case(
	r#"{"user": {"formatters": {"photo": {"$ref": "photo", "options": {"only": "path"}}}}}"#,
	SchemaError::WrongType {
		field: "options.only".to_string(),
		expected: "array".to_string(),
		actual: Value::String("path".to_string()),
	}
)]
fn test_invalid_documents(#[case] document: &str, #[case] expected: SchemaError) {
	let mut registry = SchemaRegistry::new();

	let err = registry.load_json(document).unwrap_err();

	assert_eq!(err, expected);
	assert!(registry.is_empty());
}
