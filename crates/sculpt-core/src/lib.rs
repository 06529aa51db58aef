//! # sculpt-core
//!
//! Schema registry and recursive serialization engine for sculpt.
//!
//! A schema describes how to reshape one kind of nested object/array data into
//! an output object: which attributes to keep, how individual fields are
//! computed, and which fields are rendered by other named schemas.
//!
//! ## Features
//!
//! - **Attribute filtering**: declared attribute lists, `extra_attributes`,
//!   and per-call `omit`/`only`
//! - **Formatters**: transform functions that see the source value, the call
//!   options and the output computed so far
//! - **Delegation**: `$ref`-style formatters rendering a field with another
//!   registered schema, optionally through a getter
//! - **Recursion guard**: cyclic schema graphs terminate; a schema already on
//!   the active path is skipped instead of entered again
//! - **Strict mode**: missing attributes become hard failures
//! - **Definition documents**: schemas loaded from JSON or TOML
//!
//! ## Examples
//!
//! ```rust
//! use sculpt_core::{Delegation, Schema, SchemaRegistry, SerializeOptions};
//! use serde_json::json;
//!
//! let mut registry = SchemaRegistry::new();
//! registry.add(
//!     "user",
//!     Schema::new()
//!         .attributes(["name", "email", "photo"])
//!         .formatter("email", |data, _, _| {
//!             json!(data["email"].as_str().unwrap_or_default().to_lowercase())
//!         })
//!         .delegate("photo", Delegation::to("photo")),
//! );
//! registry.add("photo", Schema::new().attributes(["path"]));
//!
//! let user = json!({
//!     "name": "Tester",
//!     "email": "TEST@email.com",
//!     "password": "12345",
//!     "photo": [{"path": "/img1", "type": "jpeg"}, null]
//! });
//! let out = registry.serialize("user", &user, &SerializeOptions::default()).unwrap();
//! assert_eq!(
//!     out,
//!     json!({"name": "Tester", "email": "test@email.com", "photo": [{"path": "/img1"}, null]})
//! );
//! ```

pub mod definition;
mod dispatch;
pub mod engine;
pub mod error;
pub mod guard;
pub mod options;
pub mod registry;
pub mod resolver;
pub mod schema;

// Re-export commonly used types
pub use definition::{SchemaDefinition, parse_json, parse_toml};
pub use engine::SerializationEngine;
pub use error::{SchemaError, SchemaResult};
pub use guard::RecursionGuard;
pub use options::SerializeOptions;
pub use registry::{BoundSerializer, EntryPoint, Resolution, SchemaRegistry};
pub use resolver::effective_attributes;
pub use schema::{Delegation, Formatter, GetterFn, Schema, TransformFn};
