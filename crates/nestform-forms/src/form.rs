use crate::config::FormConfig;
use crate::errors::{Errors, FormError, FormResult};
use crate::model::Model;
use crate::schema::{FieldKind, Schema};
use crate::value::FieldValue;
use indexmap::IndexMap;
use std::ops::Index;
use std::sync::Arc;

/// Validation lifecycle of a form instance.
///
/// Errors are only meaningful in [`FormState::Validated`]. Populating or
/// assigning fields moves the form back to [`FormState::Unvalidated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
	#[default]
	Unvalidated,
	Validated,
}

/// A form instance wrapping one record, with one sub-form per nested record.
///
/// Scalar values are read from the record at construction and afterwards
/// only change through [`populate`](NestedForm::populate),
/// [`validate`](NestedForm::validate) or [`set_value`](NestedForm::set_value).
/// The record itself is never written to.
///
/// # Examples
///
/// ```
/// use nestform_forms::{NestedForm, Record, Schema};
/// use std::sync::Arc;
///
/// let schema = Schema::builder("AlbumForm")
///     .property("title")
///     .nested("artist", |artist| artist.property("name"))
///     .build()
///     .unwrap();
/// let album = Record::new()
///     .with_attribute("title", "Less Talk, More Rock")
///     .with_association("artist", Arc::new(Record::new().with_attribute("name", "Propagandhi")));
///
/// let form = NestedForm::new(schema, Arc::new(album));
/// assert_eq!(form["title"].as_str(), Some("Less Talk, More Rock"));
/// assert_eq!(form.nested("artist").unwrap()["name"].as_str(), Some("Propagandhi"));
/// ```
#[derive(Debug)]
pub struct NestedForm {
	pub(crate) schema: Arc<Schema>,
	model: Arc<dyn Model>,
	pub(crate) config: Arc<FormConfig>,
	pub(crate) values: IndexMap<String, FieldValue>,
	initial: IndexMap<String, FieldValue>,
	pub(crate) singles: IndexMap<String, Option<NestedForm>>,
	pub(crate) collections: IndexMap<String, Vec<NestedForm>>,
	pub(crate) errors: Errors,
	pub(crate) state: FormState,
}

impl NestedForm {
	/// Builds the form tree for `model` with the default [`FormConfig`].
	pub fn new(schema: Arc<Schema>, model: Arc<dyn Model>) -> Self {
		Self::with_config(schema, model, FormConfig::default())
	}

	pub fn with_config(schema: Arc<Schema>, model: Arc<dyn Model>, config: FormConfig) -> Self {
		Self::build(schema, model, Arc::new(config))
	}

	fn build(schema: Arc<Schema>, model: Arc<dyn Model>, config: Arc<FormConfig>) -> Self {
		let mut values = IndexMap::new();
		let mut singles = IndexMap::new();
		let mut collections = IndexMap::new();

		for node in schema.fields() {
			let name = node.name();
			match node.kind() {
				FieldKind::Scalar(_) => {
					values.insert(name.to_string(), model.attribute(name).unwrap_or_default());
				}
				FieldKind::NestedSingle(nested) => {
					let form = model.association(name).map(|record| {
						Self::build(Arc::clone(nested.schema()), record, Arc::clone(&config))
					});
					singles.insert(name.to_string(), form);
				}
				FieldKind::NestedCollection(nested) => {
					let forms = model
						.association_many(name)
						.into_iter()
						.map(|record| {
							Self::build(Arc::clone(nested.schema()), record, Arc::clone(&config))
						})
						.collect();
					collections.insert(name.to_string(), forms);
				}
			}
		}

		Self {
			initial: values.clone(),
			schema,
			model,
			config,
			values,
			singles,
			collections,
			errors: Errors::new(),
			state: FormState::Unvalidated,
		}
	}

	pub fn schema(&self) -> &Arc<Schema> {
		&self.schema
	}

	/// The record this form was built from.
	pub fn model(&self) -> &Arc<dyn Model> {
		&self.model
	}

	/// Returns `true` if this form wraps exactly `model` (pointer identity).
	pub fn wraps<M: Model + ?Sized>(&self, model: &Arc<M>) -> bool {
		std::ptr::addr_eq(Arc::as_ptr(&self.model), Arc::as_ptr(model))
	}

	pub fn config(&self) -> &FormConfig {
		&self.config
	}

	pub fn value(&self, name: &str) -> Option<&FieldValue> {
		self.values.get(name)
	}

	pub fn values(&self) -> &IndexMap<String, FieldValue> {
		&self.values
	}

	/// The value read from the record at construction.
	pub fn initial_value(&self, name: &str) -> Option<&FieldValue> {
		self.initial.get(name)
	}

	/// Assigns a scalar field directly.
	///
	/// # Examples
	///
	/// ```
	/// use nestform_forms::{FormError, NestedForm, Record, Schema};
	/// use std::sync::Arc;
	///
	/// let schema = Schema::builder("LabelForm").property("name").build().unwrap();
	/// let mut form = NestedForm::new(schema, Arc::new(Record::new()));
	///
	/// form.set_value("name", "Epitaph").unwrap();
	/// assert_eq!(form["name"].as_str(), Some("Epitaph"));
	/// assert!(matches!(form.set_value("city", "LA"), Err(FormError::UnknownField(_))));
	/// ```
	pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) -> FormResult<()> {
		match self.schema.field(name) {
			Some(node) if node.is_scalar() => {
				self.values.insert(name.to_string(), value.into());
				self.state = FormState::Unvalidated;
				Ok(())
			}
			_ => Err(FormError::UnknownField(name.to_string())),
		}
	}

	/// The sub-form of a nested single field. `None` for undeclared fields
	/// and for records without the associated object.
	pub fn nested(&self, name: &str) -> Option<&NestedForm> {
		self.singles.get(name).and_then(Option::as_ref)
	}

	pub fn nested_mut(&mut self, name: &str) -> Option<&mut NestedForm> {
		self.singles.get_mut(name).and_then(Option::as_mut)
	}

	pub fn collection(&self, name: &str) -> Option<&[NestedForm]> {
		self.collections.get(name).map(Vec::as_slice)
	}

	pub fn collection_mut(&mut self, name: &str) -> Option<&mut [NestedForm]> {
		self.collections.get_mut(name).map(Vec::as_mut_slice)
	}

	/// Errors of the last validation pass, flattened for this form's subtree.
	pub fn errors(&self) -> &Errors {
		&self.errors
	}

	pub fn state(&self) -> FormState {
		self.state
	}

	pub fn is_validated(&self) -> bool {
		self.state == FormState::Validated
	}

	/// `true` once validated without errors. Unvalidated forms are not valid.
	pub fn is_valid(&self) -> bool {
		self.is_validated() && self.errors.is_empty()
	}

	/// Whether a scalar differs from the value read from the record.
	pub fn changed(&self, name: &str) -> bool {
		self.values.get(name) != self.initial.get(name)
	}

	/// Whether any scalar in this form or its sub-forms has changed.
	pub fn has_changed(&self) -> bool {
		self.values.keys().any(|name| self.changed(name))
			|| self.singles.values().flatten().any(NestedForm::has_changed)
			|| self
				.collections
				.values()
				.flatten()
				.any(NestedForm::has_changed)
	}

	/// Whether the form exposes the `<field>_attributes` pseudo-setter.
	pub fn responds_to_setter(&self, setter: &str) -> bool {
		self.schema.responds_to_setter(setter)
	}

	/// Applies `value` as if it had been submitted under `setter`.
	///
	/// # Examples
	///
	/// ```
	/// use nestform_forms::{NestedForm, Record, Schema};
	/// use serde_json::json;
	/// use std::sync::Arc;
	///
	/// let schema = Schema::builder("AlbumForm")
	///     .nested("artist", |artist| artist.property("name"))
	///     .build()
	///     .unwrap();
	/// let album = Record::new().with_association("artist", Arc::new(Record::new()));
	/// let mut form = NestedForm::new(schema, Arc::new(album));
	///
	/// form.assign_attributes("artist_attributes", &json!({"name": "Blink 182"})).unwrap();
	/// assert_eq!(form.nested("artist").unwrap()["name"].as_str(), Some("Blink 182"));
	/// assert!(form.assign_attributes("label_attributes", &json!({})).is_err());
	/// ```
	pub fn assign_attributes(&mut self, setter: &str, value: &serde_json::Value) -> FormResult<()> {
		let schema = Arc::clone(&self.schema);
		let node = schema
			.setter_target(setter)
			.ok_or_else(|| FormError::UnknownSetter(setter.to_string()))?;
		self.state = FormState::Unvalidated;
		self.populate_nested(node, value)
	}

	/// Snapshot of the current values of the whole tree as JSON.
	///
	/// Collections become arrays; nested fields without a record become
	/// `null`.
	pub fn to_value(&self) -> serde_json::Value {
		let mut map = serde_json::Map::new();
		for node in self.schema.fields() {
			let name = node.name();
			let value = match node.kind() {
				FieldKind::Scalar(_) => self
					.values
					.get(name)
					.map_or(serde_json::Value::Null, FieldValue::to_json),
				FieldKind::NestedSingle(_) => self
					.nested(name)
					.map_or(serde_json::Value::Null, NestedForm::to_value),
				FieldKind::NestedCollection(_) => serde_json::Value::Array(
					self.collection(name)
						.unwrap_or_default()
						.iter()
						.map(NestedForm::to_value)
						.collect(),
				),
			};
			map.insert(name.to_string(), value);
		}
		serde_json::Value::Object(map)
	}
}

/// Scalar value access by field name.
///
/// # Panics
///
/// Panics if `name` is not a declared scalar field.
impl Index<&str> for NestedForm {
	type Output = FieldValue;

	fn index(&self, name: &str) -> &Self::Output {
		self.value(name)
			.unwrap_or_else(|| panic!("Field '{}' not found", name))
	}
}
