//! # nestform
//!
//! Nested form objects for Rust.
//!
//! A form wraps a record and its associated records, exposes their fields as
//! a tree of forms, binds nested-attributes submissions onto that tree and
//! reports validation errors under flattened dotted keys.
//!
//! ## Feature Flags
//!
//! - `forms` (default) - Schemas, population and validation
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```rust
//! use nestform::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let schema = Schema::builder("AlbumForm")
//!     .nested("artist", |artist| artist.property("name").validates_presence_of("name"))
//!     .build()
//!     .unwrap();
//! let album = Record::new().with_association("artist", Arc::new(Record::new()));
//!
//! let mut form = NestedForm::new(schema, Arc::new(album));
//! let params = json!({"artist_attributes": {"name": "Blink 182"}});
//!
//! assert!(form.validate(params.as_object().unwrap()).unwrap());
//! ```

#[cfg(feature = "forms")]
pub mod forms;

/// Commonly used types.
pub mod prelude {
	#[cfg(feature = "forms")]
	pub use nestform_forms::{
		Errors, FieldValue, FormConfig, FormError, FormResult, Model, NestedForm, Params, Record,
		Schema, SchemaError, UnknownIndexPolicy,
	};
}
