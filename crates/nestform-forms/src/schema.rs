//! Form schemas
//!
//! A [`Schema`] is the declared shape of a form type: its scalar fields, its
//! nested single forms and nested collections, and the validators attached
//! to its fields. Schemas are built once through [`SchemaBuilder`] and shared
//! as `Arc<Schema>` by every form instance of that type.
//!
//! ```
//! use nestform_forms::Schema;
//!
//! let label = Schema::builder("LabelForm").property("name").build().unwrap();
//!
//! let album = Schema::builder("AlbumForm")
//!     .nested("artist", |artist| artist.property("name").validates_presence_of("name"))
//!     .collection("songs", |song| song.property("title").date("release_date"))
//!     .nested_form("label", label)
//!     .build()
//!     .unwrap();
//!
//! assert!(album.field("artist").is_some());
//! assert_eq!(album.field("label").unwrap().custom_form_class(), Some("LabelForm"));
//! assert!(album.responds_to_setter("songs_attributes"));
//! ```

use crate::validators::{FieldResult, PresenceValidator, Validator};
use crate::value::FieldValue;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Suffix of the pseudo-setters exposed for nested fields.
pub const ATTRIBUTES_SUFFIX: &str = "_attributes";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
	#[error("Field `{field}` is declared more than once in `{form}`")]
	DuplicateField { form: String, field: String },
	#[error("Validator attached to undeclared field `{field}` in `{form}`")]
	UnknownField { form: String, field: String },
	#[error("Validator attached to nested field `{field}` in `{form}`")]
	NotScalar { form: String, field: String },
}

/// How a scalar's single-value submissions are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScalarKind {
	#[default]
	Text,
	Date,
}

/// The sub-form type of a nested field.
#[derive(Debug, Clone)]
pub struct NestedSchema {
	schema: Arc<Schema>,
	inline: bool,
}

impl NestedSchema {
	pub fn schema(&self) -> &Arc<Schema> {
		&self.schema
	}

	/// `true` when declared with an inline block rather than an explicit
	/// form type.
	pub fn is_inline(&self) -> bool {
		self.inline
	}
}

#[derive(Debug, Clone)]
pub enum FieldKind {
	Scalar(ScalarKind),
	NestedSingle(NestedSchema),
	NestedCollection(NestedSchema),
}

#[derive(Debug, Clone)]
pub struct SchemaNode {
	name: String,
	kind: FieldKind,
}

impl SchemaNode {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn kind(&self) -> &FieldKind {
		&self.kind
	}

	pub fn is_scalar(&self) -> bool {
		matches!(self.kind, FieldKind::Scalar(_))
	}

	pub fn nested_schema(&self) -> Option<&NestedSchema> {
		match &self.kind {
			FieldKind::Scalar(_) => None,
			FieldKind::NestedSingle(nested) | FieldKind::NestedCollection(nested) => Some(nested),
		}
	}

	/// Name of the explicit form type bound to a nested field.
	pub fn custom_form_class(&self) -> Option<&str> {
		self.nested_schema()
			.filter(|nested| !nested.inline)
			.map(|nested| nested.schema.name())
	}
}

type CleanFunction = Arc<dyn Fn(&IndexMap<String, FieldValue>) -> FieldResult<()> + Send + Sync>;

/// Declared shape of a form type.
pub struct Schema {
	name: String,
	fields: IndexMap<String, SchemaNode>,
	validators: IndexMap<String, Vec<Validator>>,
	clean_functions: Vec<CleanFunction>,
	setters: IndexMap<String, String>,
}

impl Schema {
	pub fn builder(name: impl Into<String>) -> SchemaBuilder {
		SchemaBuilder {
			name: name.into(),
			fields: Vec::new(),
			validators: Vec::new(),
			clean_functions: Vec::new(),
			errors: Vec::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn field(&self, name: &str) -> Option<&SchemaNode> {
		self.fields.get(name)
	}

	pub fn fields(&self) -> impl Iterator<Item = &SchemaNode> {
		self.fields.values()
	}

	pub fn scalars(&self) -> impl Iterator<Item = &SchemaNode> {
		self.fields().filter(|node| node.is_scalar())
	}

	pub fn nested_fields(&self) -> impl Iterator<Item = &SchemaNode> {
		self.fields().filter(|node| !node.is_scalar())
	}

	pub fn validators_for(&self, name: &str) -> &[Validator] {
		self.validators
			.get(name)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Fields with at least one validator, in declaration order of the
	/// validators.
	pub fn validated_fields(&self) -> impl Iterator<Item = (&str, &[Validator])> {
		self.validators
			.iter()
			.map(|(name, validators)| (name.as_str(), validators.as_slice()))
	}

	pub(crate) fn clean_functions(&self) -> &[CleanFunction] {
		&self.clean_functions
	}

	/// The `<field>_attributes` pseudo-setters, one per nested field.
	pub fn attributes_setters(&self) -> impl Iterator<Item = &str> {
		self.setters.keys().map(String::as_str)
	}

	pub fn responds_to_setter(&self, setter: &str) -> bool {
		self.setters.contains_key(setter)
	}

	/// The nested field a `<field>_attributes` setter writes to.
	pub fn setter_target(&self, setter: &str) -> Option<&SchemaNode> {
		self.setters
			.get(setter)
			.and_then(|field| self.fields.get(field))
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

impl fmt::Debug for Schema {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Schema")
			.field("name", &self.name)
			.field("fields", &self.fields)
			.field("validators", &self.validators)
			.field("clean_functions", &self.clean_functions.len())
			.finish()
	}
}

/// Collects field declarations for a [`Schema`].
#[must_use]
pub struct SchemaBuilder {
	name: String,
	fields: Vec<SchemaNode>,
	validators: Vec<(String, Validator)>,
	clean_functions: Vec<CleanFunction>,
	errors: Vec<SchemaError>,
}

impl SchemaBuilder {
	/// Declares a plain scalar field.
	pub fn property(self, name: impl Into<String>) -> Self {
		self.push(name.into(), FieldKind::Scalar(ScalarKind::Text))
	}

	/// Declares a scalar field holding a date.
	pub fn date(self, name: impl Into<String>) -> Self {
		self.push(name.into(), FieldKind::Scalar(ScalarKind::Date))
	}

	/// Declares a nested single form with an inline schema.
	pub fn nested<F>(self, name: impl Into<String>, block: F) -> Self
	where
		F: FnOnce(SchemaBuilder) -> SchemaBuilder,
	{
		let name = name.into();
		self.inline(name, block, FieldKind::NestedSingle)
	}

	/// Declares a nested single form of an explicit form type.
	pub fn nested_form(self, name: impl Into<String>, schema: Arc<Schema>) -> Self {
		let nested = NestedSchema {
			schema,
			inline: false,
		};
		self.push(name.into(), FieldKind::NestedSingle(nested))
	}

	/// Declares a nested collection with an inline item schema.
	pub fn collection<F>(self, name: impl Into<String>, block: F) -> Self
	where
		F: FnOnce(SchemaBuilder) -> SchemaBuilder,
	{
		let name = name.into();
		self.inline(name, block, FieldKind::NestedCollection)
	}

	/// Declares a nested collection whose items use an explicit form type.
	pub fn collection_form(self, name: impl Into<String>, schema: Arc<Schema>) -> Self {
		let nested = NestedSchema {
			schema,
			inline: false,
		};
		self.push(name.into(), FieldKind::NestedCollection(nested))
	}

	/// Attaches a validator to a scalar field declared on this schema.
	pub fn validates(mut self, name: impl Into<String>, validator: impl Into<Validator>) -> Self {
		self.validators.push((name.into(), validator.into()));
		self
	}

	pub fn validates_presence_of(self, name: impl Into<String>) -> Self {
		self.validates(name, PresenceValidator::new())
	}

	/// Adds a form-level check over the form's own scalar values. Failures are
	/// reported under [`BASE_KEY`](crate::errors::BASE_KEY).
	pub fn validate_form<F>(mut self, check: F) -> Self
	where
		F: Fn(&IndexMap<String, FieldValue>) -> FieldResult<()> + Send + Sync + 'static,
	{
		self.clean_functions.push(Arc::new(check));
		self
	}

	pub fn build(self) -> Result<Arc<Schema>, SchemaError> {
		if let Some(err) = self.errors.into_iter().next() {
			return Err(err);
		}

		let mut fields = IndexMap::with_capacity(self.fields.len());
		let mut setters = IndexMap::new();
		for node in self.fields {
			if fields.contains_key(&node.name) {
				return Err(SchemaError::DuplicateField {
					form: self.name,
					field: node.name,
				});
			}
			if !node.is_scalar() {
				setters.insert(format!("{}{ATTRIBUTES_SUFFIX}", node.name), node.name.clone());
			}
			fields.insert(node.name.clone(), node);
		}

		let mut validators: IndexMap<String, Vec<Validator>> = IndexMap::new();
		for (field, validator) in self.validators {
			match fields.get(&field) {
				None => {
					return Err(SchemaError::UnknownField {
						form: self.name,
						field,
					});
				}
				Some(node) if !node.is_scalar() => {
					return Err(SchemaError::NotScalar {
						form: self.name,
						field,
					});
				}
				Some(_) => validators.entry(field).or_default().push(validator),
			}
		}

		Ok(Arc::new(Schema {
			name: self.name,
			fields,
			validators,
			clean_functions: self.clean_functions,
			setters,
		}))
	}

	fn push(mut self, name: String, kind: FieldKind) -> Self {
		self.fields.push(SchemaNode { name, kind });
		self
	}

	fn inline<F>(mut self, name: String, block: F, kind: fn(NestedSchema) -> FieldKind) -> Self
	where
		F: FnOnce(SchemaBuilder) -> SchemaBuilder,
	{
		match block(Schema::builder(format!("{}.{name}", self.name))).build() {
			Ok(schema) => {
				let nested = NestedSchema {
					schema,
					inline: true,
				};
				self.push(name, kind(nested))
			}
			Err(err) => {
				self.errors.push(err);
				self
			}
		}
	}
}
