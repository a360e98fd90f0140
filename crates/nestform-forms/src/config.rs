//! Population and validation options

use crate::date_parts::DEFAULT_DATE_INPUT_FORMATS;
use serde::{Deserialize, Serialize};

/// What to do when a nested collection payload names an index past the end
/// of the collection. Items are never created from a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownIndexPolicy {
	/// Skip the entry and log a warning.
	#[default]
	Ignore,
	/// Fail population with [`FormError::UnknownCollectionIndex`](crate::FormError::UnknownCollectionIndex).
	Reject,
}

/// Options shared by a form and all of its sub-forms.
///
/// # Examples
///
/// ```
/// use nestform_forms::{FormConfig, UnknownIndexPolicy};
///
/// let config = FormConfig::from_json(r#"{"unknown_index": "reject"}"#).unwrap();
/// assert_eq!(config.unknown_index, UnknownIndexPolicy::Reject);
/// assert!(config.dedup_messages);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
	pub unknown_index: UnknownIndexPolicy,
	/// Drop repeated messages under the same error key, e.g. the same
	/// failure on several collection items.
	pub dedup_messages: bool,
	/// `chrono` formats for single-value date submissions.
	pub date_input_formats: Vec<String>,
}

impl Default for FormConfig {
	fn default() -> Self {
		Self {
			unknown_index: UnknownIndexPolicy::default(),
			dedup_messages: true,
			date_input_formats: DEFAULT_DATE_INPUT_FORMATS
				.iter()
				.map(|f| f.to_string())
				.collect(),
		}
	}
}

impl FormConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	pub fn with_unknown_index(mut self, policy: UnknownIndexPolicy) -> Self {
		self.unknown_index = policy;
		self
	}

	pub fn with_dedup_messages(mut self, dedup: bool) -> Self {
		self.dedup_messages = dedup;
		self
	}

	pub fn with_date_input_formats<I, S>(mut self, formats: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.date_input_formats = formats.into_iter().map(Into::into).collect();
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let config = FormConfig::default();

		assert_eq!(config.unknown_index, UnknownIndexPolicy::Ignore);
		assert!(config.dedup_messages);
		assert_eq!(config.date_input_formats[0], "%Y-%m-%d");
	}

	#[rstest]
	fn test_from_json_fills_missing_keys_with_defaults() {
		// Arrange
		let json = r#"{"dedup_messages": false, "date_input_formats": ["%d.%m.%Y"]}"#;

		// Act
		let config = FormConfig::from_json(json).unwrap();

		// Assert
		assert_eq!(config.unknown_index, UnknownIndexPolicy::Ignore);
		assert!(!config.dedup_messages);
		assert_eq!(config.date_input_formats, vec!["%d.%m.%Y".to_string()]);
	}

	#[rstest]
	fn test_from_json_rejects_unknown_policy() {
		assert!(FormConfig::from_json(r#"{"unknown_index": "create"}"#).is_err());
	}

	#[rstest]
	fn test_builder_methods() {
		let config = FormConfig::new()
			.with_unknown_index(UnknownIndexPolicy::Reject)
			.with_dedup_messages(false)
			.with_date_input_formats(["%Y/%m/%d"]);

		assert_eq!(config.unknown_index, UnknownIndexPolicy::Reject);
		assert!(!config.dedup_messages);
		assert_eq!(config.date_input_formats, vec!["%Y/%m/%d".to_string()]);
	}
}
