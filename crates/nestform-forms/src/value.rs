//! Scalar values held by form fields and records.

use chrono::NaiveDate;
use serde::Serialize;

/// A single scalar value of a form field or record attribute.
///
/// Submissions arrive as strings, so most populated fields hold
/// [`FieldValue::String`]. Dates assembled from deconstructed parts (or parsed
/// for fields declared as dates) become [`FieldValue::Date`]. Anything else
/// read from a record or submitted as non-string JSON is kept verbatim in
/// [`FieldValue::Json`].
///
/// # Examples
///
/// ```
/// use nestform_forms::FieldValue;
/// use serde_json::json;
///
/// assert_eq!(FieldValue::from_json(&json!("Damnit")), FieldValue::from("Damnit"));
/// assert!(FieldValue::from_json(&json!(null)).is_null());
/// assert!(FieldValue::from("   ").is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
	#[default]
	Null,
	String(String),
	Date(NaiveDate),
	Json(serde_json::Value),
}

impl FieldValue {
	/// Converts a submitted JSON value, mapping `null` and strings onto their
	/// dedicated variants.
	pub fn from_json(value: &serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::String(s) => Self::String(s.clone()),
			other => Self::Json(other.clone()),
		}
	}

	/// Converts back to JSON. Dates are rendered as ISO 8601 (`%Y-%m-%d`).
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Self::Null => serde_json::Value::Null,
			Self::String(s) => serde_json::Value::String(s.clone()),
			Self::Date(date) => serde_json::Value::String(date.format("%Y-%m-%d").to_string()),
			Self::Json(value) => value.clone(),
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Returns `true` for values a presence check rejects: null, empty or
	/// whitespace-only strings, and empty JSON arrays or objects.
	pub fn is_blank(&self) -> bool {
		match self {
			Self::Null => true,
			Self::String(s) => s.trim().is_empty(),
			Self::Date(_) => false,
			Self::Json(serde_json::Value::Array(items)) => items.is_empty(),
			Self::Json(serde_json::Value::Object(map)) => map.is_empty(),
			Self::Json(serde_json::Value::Null) => true,
			Self::Json(_) => false,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_date(&self) -> Option<NaiveDate> {
		match self {
			Self::Date(date) => Some(*date),
			_ => None,
		}
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<NaiveDate> for FieldValue {
	fn from(value: NaiveDate) -> Self {
		Self::Date(value)
	}
}

impl From<serde_json::Value> for FieldValue {
	fn from(value: serde_json::Value) -> Self {
		Self::from_json(&value)
	}
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}
