//! Validation across a form tree
//!
//! Every form reachable from the root is validated once per pass. Each form
//! keeps the errors of its own subtree; a parent prefixes its children's keys
//! with the nested field name, so the root ends up with one flat mapping:
//!
//! | failing field                    | key               |
//! |----------------------------------|-------------------|
//! | `name` on the root               | `name`            |
//! | `name` in nested `artist`        | `artist.name`     |
//! | `title` in any item of `songs`   | `songs.title`     |
//! | `name` in `label` inside `band`  | `band.label.name` |

use crate::errors::{BASE_KEY, Errors, FormResult};
use crate::form::{FormState, NestedForm};
use crate::populate::Params;
use crate::value::FieldValue;
use tracing::debug;

impl NestedForm {
	/// Populates the form from `params`, then validates the whole tree.
	///
	/// Returns `Ok(true)` when no validator failed. Errors from a previous
	/// call are discarded.
	///
	/// # Examples
	///
	/// ```
	/// use nestform_forms::{NestedForm, Record, Schema};
	/// use serde_json::json;
	/// use std::sync::Arc;
	///
	/// let schema = Schema::builder("AlbumForm")
	///     .nested("artist", |artist| artist.property("name").validates_presence_of("name"))
	///     .build()
	///     .unwrap();
	/// let album = Record::new().with_association("artist", Arc::new(Record::new()));
	/// let mut form = NestedForm::new(schema, Arc::new(album));
	///
	/// let params = json!({"artist_attributes": {"name": ""}});
	/// assert!(!form.validate(params.as_object().unwrap()).unwrap());
	/// assert_eq!(form.errors().get("artist.name").unwrap(), ["can't be blank"]);
	/// ```
	pub fn validate(&mut self, params: &Params) -> FormResult<bool> {
		self.populate(params)?;
		Ok(self.run_validations())
	}

	/// Validates the current values of the whole tree without populating.
	pub fn run_validations(&mut self) -> bool {
		let dedup = self.config.dedup_messages;
		let mut errors = Errors::new();

		for (field, validators) in self.schema.validated_fields() {
			let value = self.values.get(field).unwrap_or(&FieldValue::Null);
			for validator in validators {
				if let Err(err) = validator.validate(value) {
					errors.add(field, err.message(), dedup);
				}
			}
		}

		for clean in self.schema.clean_functions() {
			if let Err(err) = clean(&self.values) {
				errors.add(BASE_KEY, err.message(), dedup);
			}
		}

		for (field, form) in self.singles.iter_mut() {
			if let Some(form) = form {
				form.run_validations();
				errors.merge_nested(field, &form.errors, dedup);
			}
		}

		for (field, forms) in self.collections.iter_mut() {
			for form in forms.iter_mut() {
				form.run_validations();
				errors.merge_nested(field, &form.errors, dedup);
			}
		}

		debug!(form = self.schema.name(), errors = errors.len(), "validated");
		self.errors = errors;
		self.state = FormState::Validated;
		self.errors.is_empty()
	}
}
