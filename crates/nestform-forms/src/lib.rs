//! Nested form objects
//!
//! This crate binds nested-attributes submissions onto trees of form objects
//! and validates them:
//! - Declarative schemas with scalar fields, nested forms and nested collections
//! - Form trees built from record trees through the [`Model`] trait
//! - `<field>_attributes` payload binding that never creates or resets forms
//! - Deconstructed `(1i)/(2i)/(3i)` date parameter coercion
//! - Validation of the whole tree with errors flattened to dotted keys
//!
//! ```
//! use nestform_forms::{NestedForm, Record, Schema};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let schema = Schema::builder("AlbumForm")
//!     .nested("artist", |artist| artist.property("name").validates_presence_of("name"))
//!     .collection("songs", |song| {
//!         song.property("title")
//!             .date("release_date")
//!             .validates_presence_of("title")
//!     })
//!     .build()
//!     .unwrap();
//!
//! let album = Record::new()
//!     .with_association("artist", Arc::new(Record::new().with_attribute("name", "Propagandhi")))
//!     .with_collection("songs", [Arc::new(Record::new())]);
//! let mut form = NestedForm::new(schema, Arc::new(album));
//!
//! let params = json!({
//!     "artist_attributes": {"name": "Blink 182"},
//!     "songs_attributes": {"0": {
//!         "title": "",
//!         "release_date(1i)": "1997",
//!         "release_date(2i)": "9",
//!         "release_date(3i)": "27",
//!     }},
//! });
//! let valid = form.validate(params.as_object().unwrap()).unwrap();
//!
//! assert!(!valid);
//! assert_eq!(form.nested("artist").unwrap()["name"].as_str(), Some("Blink 182"));
//! assert_eq!(
//!     serde_json::to_value(form.errors()).unwrap(),
//!     json!({"songs.title": ["can't be blank"]})
//! );
//! ```

pub mod config;
pub mod date_parts;
pub mod errors;
pub mod form;
pub mod model;
pub mod populate;
pub mod schema;
pub mod validation;
pub mod validators;
pub mod value;

pub use config::{FormConfig, UnknownIndexPolicy};
pub use date_parts::DateParts;
pub use errors::{BASE_KEY, Errors, FormError, FormResult};
pub use form::{FormState, NestedForm};
pub use model::{Model, Record};
pub use populate::Params;
pub use schema::{
	ATTRIBUTES_SUFFIX, FieldKind, NestedSchema, ScalarKind, Schema, SchemaBuilder, SchemaError,
	SchemaNode,
};
pub use validators::{
	CustomValidator, FieldError, FieldResult, FormatValidator, LengthValidator,
	PresenceValidator, Validator,
};
pub use value::FieldValue;
