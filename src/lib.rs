//! # Sculpt
//!
//! Reshape arbitrary nested object/array data into filtered output objects
//! according to declarative, named schemas.
//!
//! Sculpt is a facade over its member crates. The engine itself lives in
//! `sculpt-core`; this crate re-exports it under [`core`] and at the root.
//!
//! ## Feature Flags
//!
//! - `core` (default) - Schema registry and serialization engine
//!
//! ## Quick Start
//!
//! ```rust
//! use sculpt::{Delegation, Schema, SchemaRegistry, SerializeOptions};
//! use serde_json::json;
//!
//! let mut registry = SchemaRegistry::new();
//! registry.add(
//!     "a",
//!     Schema::new().attributes(["b"]).delegate("b", Delegation::to("b")),
//! );
//! registry.add(
//!     "b",
//!     Schema::new().attributes(["a"]).delegate("a", Delegation::to("a")),
//! );
//!
//! // The cycle a -> b -> a is cut; the inner `a` keeps its raw value
//! let out = registry
//!     .serialize("a", &json!({"b": {"a": 123}}), &SerializeOptions::default())
//!     .unwrap();
//! assert_eq!(out, json!({"b": {"a": 123}}));
//! ```

#[cfg(feature = "core")]
pub use sculpt_core as core;

#[cfg(feature = "core")]
pub use sculpt_core::{
	BoundSerializer, Delegation, EntryPoint, Formatter, RecursionGuard, Resolution, Schema,
	SchemaDefinition, SchemaError, SchemaRegistry, SchemaResult, SerializationEngine,
	SerializeOptions,
};
