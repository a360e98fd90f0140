//! Binding nested-attributes payloads onto a form tree
//!
//! Payloads follow the nested-attributes convention:
//!
//! ```text
//! {
//!   "title": "Dude Ranch",
//!   "artist_attributes": {"name": "Blink 182"},
//!   "songs_attributes": {"0": {"title": "Damnit", "release_date(1i)": "1997", ...}}
//! }
//! ```
//!
//! The walker only mutates sub-forms that were materialized from the record
//! tree. It never creates forms, and it ignores keys and shapes it does not
//! understand.

use crate::config::UnknownIndexPolicy;
use crate::date_parts::{date_part_field, extract_date_parts, parse_date};
use crate::errors::{FormError, FormResult};
use crate::form::{FormState, NestedForm};
use crate::schema::{ATTRIBUTES_SUFFIX, FieldKind, ScalarKind, SchemaNode};
use crate::value::FieldValue;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// An untyped submission payload.
pub type Params = serde_json::Map<String, Value>;

impl NestedForm {
	/// Applies `params` to this form and its sub-forms.
	///
	/// Fields absent from `params` keep their current values. On error,
	/// assignments made before the failing key remain in place.
	///
	/// # Examples
	///
	/// ```
	/// use nestform_forms::{NestedForm, Record, Schema};
	/// use serde_json::json;
	/// use std::sync::Arc;
	///
	/// let schema = Schema::builder("AlbumForm")
	///     .property("title")
	///     .collection("songs", |song| song.property("title"))
	///     .build()
	///     .unwrap();
	/// let album = Record::new().with_collection("songs", [Arc::new(Record::new())]);
	/// let mut form = NestedForm::new(schema, Arc::new(album));
	///
	/// let params = json!({"songs_attributes": {"0": {"title": "Damnit"}}});
	/// form.populate(params.as_object().unwrap()).unwrap();
	///
	/// assert_eq!(form.collection("songs").unwrap()[0]["title"].as_str(), Some("Damnit"));
	/// assert!(form["title"].is_null());
	/// ```
	pub fn populate(&mut self, params: &Params) -> FormResult<()> {
		self.state = FormState::Unvalidated;
		let schema = Arc::clone(&self.schema);

		let mut coerced = HashSet::new();
		for parts in extract_date_parts(params) {
			match schema.field(parts.field()) {
				Some(node) if node.is_scalar() => {
					let date = parts.coerce()?;
					trace!(form = schema.name(), field = node.name(), ?date, "assigned date parts");
					self.values
						.insert(node.name().to_string(), date.map_or(FieldValue::Null, FieldValue::Date));
					coerced.insert(node.name().to_string());
				}
				_ => debug!(
					form = schema.name(),
					field = parts.field(),
					"ignoring date parts for undeclared field"
				),
			}
		}

		for (key, value) in params {
			let nested = key
				.strip_suffix(ATTRIBUTES_SUFFIX)
				.and_then(|field| schema.field(field))
				.filter(|node| !node.is_scalar());
			if let Some(node) = nested {
				self.populate_nested(node, value)?;
				continue;
			}

			match schema.field(key) {
				Some(node) if node.is_scalar() => {
					if coerced.contains(key) {
						debug!(form = schema.name(), field = %key, "date parts take precedence over plain value");
						continue;
					}
					self.assign_scalar(node, value)?;
				}
				Some(node) => {
					if params.contains_key(&format!("{key}{ATTRIBUTES_SUFFIX}")) {
						debug!(form = schema.name(), field = %key, "shadowed by nested attributes key");
						continue;
					}
					self.populate_nested(node, value)?;
				}
				None if date_part_field(key).is_some() => {}
				None => debug!(form = schema.name(), key = %key, "ignoring undeclared key"),
			}
		}
		Ok(())
	}

	pub(crate) fn populate_nested(&mut self, node: &SchemaNode, value: &Value) -> FormResult<()> {
		let name = node.name();
		match node.kind() {
			FieldKind::Scalar(_) => self.assign_scalar(node, value),
			FieldKind::NestedSingle(_) => {
				let Some(params) = value.as_object() else {
					debug!(field = name, "expected an object for nested form, ignoring");
					return Ok(());
				};
				match self.nested_mut(name) {
					Some(form) => form.populate(params),
					None => {
						debug!(field = name, "no nested form materialized, ignoring");
						Ok(())
					}
				}
			}
			FieldKind::NestedCollection(_) => {
				let Some(items) = value.as_object() else {
					debug!(field = name, "expected an index map for nested collection, ignoring");
					return Ok(());
				};
				let policy = self.config.unknown_index;
				let Some(forms) = self.collections.get_mut(name) else {
					return Ok(());
				};
				for (index, item) in items {
					let Ok(position) = index.parse::<usize>() else {
						debug!(field = name, index = %index, "ignoring non-numeric collection index");
						continue;
					};
					let Some(params) = item.as_object() else {
						debug!(field = name, position, "expected an object for collection item, ignoring");
						continue;
					};
					let len = forms.len();
					match forms.get_mut(position) {
						Some(form) => form.populate(params)?,
						None => match policy {
							UnknownIndexPolicy::Ignore => {
								warn!(field = name, position, len, "collection index out of range, ignoring");
							}
							UnknownIndexPolicy::Reject => {
								return Err(FormError::UnknownCollectionIndex {
									field: name.to_string(),
									index: position,
									len,
								});
							}
						},
					}
				}
				Ok(())
			}
		}
	}

	fn assign_scalar(&mut self, node: &SchemaNode, value: &Value) -> FormResult<()> {
		let FieldKind::Scalar(kind) = node.kind() else {
			return Ok(());
		};
		let value = match (kind, value) {
			(ScalarKind::Date, Value::String(raw)) if raw.trim().is_empty() => FieldValue::Null,
			(ScalarKind::Date, Value::String(raw)) => FieldValue::Date(parse_date(
				node.name(),
				raw,
				self.config.date_input_formats.as_slice(),
			)?),
			(_, other) => FieldValue::from_json(other),
		};
		trace!(field = node.name(), ?value, "assigned");
		self.values.insert(node.name().to_string(), value);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::FormConfig;
	use crate::model::Record;
	use crate::schema::Schema;
	use chrono::NaiveDate;
	use rstest::{fixture, rstest};
	use serde_json::json;

	fn params(value: Value) -> Params {
		match value {
			Value::Object(map) => map,
			_ => panic!("expected an object"),
		}
	}

	#[fixture]
	fn schema() -> Arc<Schema> {
		Schema::builder("AlbumForm")
			.property("title")
			.date("released_on")
			.nested("artist", |artist| artist.property("name"))
			.collection("songs", |song| song.property("title").property("release_date"))
			.nested("label", |label| label.property("name"))
			.build()
			.unwrap()
	}

	fn album() -> Arc<Record> {
		let songs = [
			Arc::new(Record::new().with_attribute("title", "Carousel")),
			Arc::new(Record::new().with_attribute("title", "Josie")),
		];
		Arc::new(
			Record::new()
				.with_attribute("title", "Dude Ranch")
				.with_association(
					"artist",
					Arc::new(Record::new().with_attribute("name", "Blink 182")),
				)
				.with_collection("songs", songs),
		)
	}

	#[fixture]
	fn form(schema: Arc<Schema>) -> NestedForm {
		NestedForm::new(schema, album())
	}

	#[rstest]
	fn test_empty_payload_changes_nothing(mut form: NestedForm) {
		// Act
		form.populate(&Params::new()).unwrap();

		// Assert
		assert!(!form.has_changed());
		assert_eq!(form.collection("songs").unwrap().len(), 2);
	}

	#[rstest]
	fn test_collection_index_addresses_position(mut form: NestedForm) {
		// Act
		form.populate(&params(json!({"songs_attributes": {"1": {"title": "Dammit"}}})))
			.unwrap();

		// Assert
		let songs = form.collection("songs").unwrap();
		assert_eq!(songs[0]["title"].as_str(), Some("Carousel"));
		assert_eq!(songs[1]["title"].as_str(), Some("Dammit"));
	}

	#[rstest]
	fn test_plain_nested_key_is_accepted(mut form: NestedForm) {
		form.populate(&params(json!({"artist": {"name": "+44"}})))
			.unwrap();

		assert_eq!(form.nested("artist").unwrap()["name"].as_str(), Some("+44"));
	}

	#[rstest]
	fn test_attributes_key_wins_over_plain_nested_key(mut form: NestedForm) {
		form.populate(&params(json!({
			"artist": {"name": "+44"},
			"artist_attributes": {"name": "Box Car Racer"},
		})))
		.unwrap();

		assert_eq!(
			form.nested("artist").unwrap()["name"].as_str(),
			Some("Box Car Racer")
		);
	}

	#[rstest]
	#[case::unknown_key(json!({"producer": "Mark Trombino"}))]
	#[case::unknown_nested(json!({"producer_attributes": {"name": "Mark Trombino"}}))]
	#[case::scalar_with_suffix(json!({"title_attributes": {"x": "y"}}))]
	#[case::single_not_object(json!({"artist_attributes": "Blink 182"}))]
	#[case::collection_not_object(json!({"songs_attributes": ["Damnit"]}))]
	#[case::item_not_object(json!({"songs_attributes": {"0": "Damnit"}}))]
	#[case::non_numeric_index(json!({"songs_attributes": {"first": {"title": "Damnit"}}}))]
	#[case::no_sub_form(json!({"label_attributes": {"name": "Cargo"}}))]
	#[case::date_parts_for_undeclared(json!({"recorded_on(1i)": "1997"}))]
	fn test_malformed_or_unknown_branches_are_ignored(
		mut form: NestedForm,
		#[case] payload: Value,
	) {
		// Act
		let result = form.populate(&params(payload));

		// Assert
		assert!(result.is_ok());
		assert!(!form.has_changed());
		assert!(form.nested("label").is_none());
	}

	#[rstest]
	fn test_out_of_range_index_ignored_by_default(mut form: NestedForm) {
		let result = form.populate(&params(json!({"songs_attributes": {"2": {"title": "Dammit"}}})));

		assert!(result.is_ok());
		assert_eq!(form.collection("songs").unwrap().len(), 2);
	}

	#[rstest]
	fn test_out_of_range_index_rejected_by_policy(schema: Arc<Schema>) {
		// Arrange
		let config = FormConfig::new().with_unknown_index(UnknownIndexPolicy::Reject);
		let mut form = NestedForm::with_config(schema, album(), config);

		// Act
		let result = form.populate(&params(json!({"songs_attributes": {"5": {"title": "Dammit"}}})));

		// Assert
		assert!(matches!(
			result,
			Err(FormError::UnknownCollectionIndex { ref field, index: 5, len: 2 }) if field == "songs"
		));
		assert_eq!(form.collection("songs").unwrap().len(), 2);
	}

	#[rstest]
	fn test_non_string_scalars_kept_as_json(mut form: NestedForm) {
		form.populate(&params(json!({"title": 182}))).unwrap();

		assert_eq!(form["title"], FieldValue::Json(json!(182)));
	}

	#[rstest]
	fn test_null_clears_scalar(mut form: NestedForm) {
		form.populate(&params(json!({"title": null}))).unwrap();

		assert!(form["title"].is_null());
	}

	#[rstest]
	fn test_date_field_parses_plain_value(mut form: NestedForm) {
		form.populate(&params(json!({"released_on": "1997-06-17"})))
			.unwrap();

		assert_eq!(form["released_on"].as_date(), NaiveDate::from_ymd_opt(1997, 6, 17));
	}

	#[rstest]
	fn test_date_field_blank_plain_value_is_null(mut form: NestedForm) {
		form.populate(&params(json!({"released_on": ""}))).unwrap();

		assert!(form["released_on"].is_null());
	}

	#[rstest]
	fn test_date_field_unparsable_value_errors(mut form: NestedForm) {
		let result = form.populate(&params(json!({"released_on": "summer 97"})));

		assert!(matches!(result, Err(FormError::InvalidDate { ref field, .. }) if field == "released_on"));
	}

	#[rstest]
	fn test_date_parts_win_over_plain_value(mut form: NestedForm) {
		// Arrange
		let payload = params(json!({
			"released_on": "2001-01-01",
			"released_on(1i)": "1997",
			"released_on(2i)": "6",
			"released_on(3i)": "17",
		}));

		// Act
		form.populate(&payload).unwrap();

		// Assert
		assert_eq!(form["released_on"].as_date(), NaiveDate::from_ymd_opt(1997, 6, 17));
	}

	#[rstest]
	fn test_date_parts_apply_to_text_fields(mut form: NestedForm) {
		form.populate(&params(json!({
			"songs_attributes": {"0": {
				"release_date(1i)": "1997",
				"release_date(2i)": "9",
				"release_date(3i)": "27",
			}}
		})))
		.unwrap();

		assert_eq!(
			form.collection("songs").unwrap()[0]["release_date"].as_date(),
			NaiveDate::from_ymd_opt(1997, 9, 27)
		);
	}

	#[rstest]
	fn test_malformed_date_part_aborts(mut form: NestedForm) {
		let result = form.populate(&params(json!({
			"released_on(1i)": "nineteen",
			"released_on(2i)": "6",
			"released_on(3i)": "17",
		})));

		assert!(matches!(result, Err(FormError::MalformedDatePart { part: "year", .. })));
	}

	#[rstest]
	fn test_populate_resets_validation_state(mut form: NestedForm) {
		// Arrange
		form.run_validations();
		assert!(form.is_validated());

		// Act
		form.populate(&Params::new()).unwrap();

		// Assert
		assert!(!form.is_validated());
	}
}
