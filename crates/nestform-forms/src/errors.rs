//! Form errors
//!
//! [`FormError`] covers structurally corrupt submissions and schema misuse,
//! which abort the current call. Business-rule failures are not errors in
//! that sense: they are collected as messages in [`Errors`], keyed by the
//! dotted path of the failing field.

use indexmap::IndexMap;
use serde::Serialize;

/// Key under which form-level (non-field) validation messages are stored.
pub const BASE_KEY: &str = "base";

#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Malformed {part} part for date field `{field}`: {value:?}")]
	MalformedDatePart {
		field: String,
		part: &'static str,
		value: String,
	},
	#[error("Invalid date for field `{field}`: {value:?}")]
	InvalidDate { field: String, value: String },
	#[error("Collection `{field}` has no item at index {index} (size {len})")]
	UnknownCollectionIndex {
		field: String,
		index: usize,
		len: usize,
	},
	#[error("Unknown scalar field `{0}`")]
	UnknownField(String),
	#[error("Form does not respond to `{0}`")]
	UnknownSetter(String),
}

pub type FormResult<T> = Result<T, FormError>;

/// Validation messages keyed by dotted field path.
///
/// Keys are flattened from the form tree: `name` for a root field,
/// `artist.name` inside a nested form, `songs.title` for every item of a
/// nested collection (indices are not part of the key).
///
/// # Examples
///
/// ```
/// use nestform_forms::Errors;
///
/// let mut artist = Errors::new();
/// artist.add("name", "can't be blank", true);
///
/// let mut errors = Errors::new();
/// errors.merge_nested("artist", &artist, true);
///
/// assert_eq!(errors.get("artist.name"), Some(&["can't be blank".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Errors {
	messages: IndexMap<String, Vec<String>>,
}

impl Errors {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `message` under `key`. With `dedup`, a message already present
	/// under the same key is not repeated.
	pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>, dedup: bool) {
		let message = message.into();
		let messages = self.messages.entry(key.into()).or_default();
		if dedup && messages.contains(&message) {
			return;
		}
		messages.push(message);
	}

	/// Merges a sub-form's errors, prefixing each key with `field.`.
	pub fn merge_nested(&mut self, field: &str, nested: &Errors, dedup: bool) {
		for (key, messages) in &nested.messages {
			let key = format!("{field}.{key}");
			for message in messages {
				self.add(key.as_str(), message.as_str(), dedup);
			}
		}
	}

	pub fn messages(&self) -> &IndexMap<String, Vec<String>> {
		&self.messages
	}

	pub fn get(&self, key: &str) -> Option<&[String]> {
		self.messages.get(key).map(Vec::as_slice)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.messages.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.messages.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.messages
			.iter()
			.map(|(key, messages)| (key.as_str(), messages.as_slice()))
	}

	pub fn len(&self) -> usize {
		self.messages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}

	pub fn clear(&mut self) {
		self.messages.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_add_dedup() {
		// Arrange
		let mut errors = Errors::new();

		// Act
		errors.add("title", "can't be blank", true);
		errors.add("title", "can't be blank", true);
		errors.add("title", "is too short (minimum is 2 characters)", true);

		// Assert
		assert_eq!(
			errors.get("title").unwrap(),
			["can't be blank", "is too short (minimum is 2 characters)"]
		);
	}

	#[rstest]
	fn test_add_without_dedup_keeps_repeats() {
		let mut errors = Errors::new();

		errors.add("title", "can't be blank", false);
		errors.add("title", "can't be blank", false);

		assert_eq!(errors.get("title").unwrap().len(), 2);
	}

	#[rstest]
	fn test_merge_nested_prefixes_deep_keys() {
		// Arrange
		let mut label = Errors::new();
		label.add("name", "can't be blank", true);
		let mut band = Errors::new();
		band.merge_nested("label", &label, true);

		// Act
		let mut errors = Errors::new();
		errors.merge_nested("band", &band, true);

		// Assert
		assert_eq!(errors.keys().collect::<Vec<_>>(), ["band.label.name"]);
	}

	#[rstest]
	fn test_serializes_as_plain_map() {
		let mut errors = Errors::new();
		errors.add("artist.name", "can't be blank", true);

		assert_eq!(
			serde_json::to_value(&errors).unwrap(),
			json!({"artist.name": ["can't be blank"]})
		);
	}

	#[rstest]
	fn test_form_error_messages() {
		let err = FormError::UnknownCollectionIndex {
			field: "songs".to_string(),
			index: 3,
			len: 1,
		};

		assert_eq!(
			err.to_string(),
			"Collection `songs` has no item at index 3 (size 1)"
		);
	}
}
