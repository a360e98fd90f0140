//! Field-level validators
//!
//! Validators attach to scalar fields through
//! [`SchemaBuilder::validates`](crate::SchemaBuilder::validates) and run on
//! every validation pass. Each produces a human-readable message that ends up
//! under the field's dotted key in the form's [`Errors`](crate::Errors).

use crate::value::FieldValue;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Message produced by [`PresenceValidator`].
pub const BLANK_MESSAGE: &str = "can't be blank";

/// Message produced by [`FormatValidator`].
pub const INVALID_MESSAGE: &str = "is invalid";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	#[error("{0}")]
	Required(String),
	#[error("{0}")]
	Validation(String),
}

impl FieldError {
	pub fn required(message: Option<&str>) -> Self {
		Self::Required(message.unwrap_or(BLANK_MESSAGE).to_string())
	}

	pub fn message(&self) -> &str {
		match self {
			Self::Required(msg) | Self::Validation(msg) => msg,
		}
	}
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Rejects blank values (see [`FieldValue::is_blank`]).
///
/// # Examples
///
/// ```
/// use nestform_forms::FieldValue;
/// use nestform_forms::validators::PresenceValidator;
///
/// let validator = PresenceValidator::new();
/// assert!(validator.validate(&FieldValue::from("Epitaph")).is_ok());
/// assert!(validator.validate(&FieldValue::from("")).is_err());
/// assert!(validator.validate(&FieldValue::Null).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PresenceValidator {
	message: Option<String>,
}

impl PresenceValidator {
	pub fn new() -> Self {
		Self { message: None }
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn validate(&self, value: &FieldValue) -> FieldResult<()> {
		if value.is_blank() {
			Err(FieldError::required(self.message.as_deref()))
		} else {
			Ok(())
		}
	}
}

/// Bounds the character count of string values.
///
/// Blank values pass; combine with [`PresenceValidator`] to require a value.
/// Lengths are counted in characters, not bytes.
///
/// # Examples
///
/// ```
/// use nestform_forms::FieldValue;
/// use nestform_forms::validators::LengthValidator;
///
/// let validator = LengthValidator::new().min(2).max(5);
/// assert!(validator.validate(&FieldValue::from("Damn")).is_ok());
/// assert!(validator.validate(&FieldValue::from("D")).is_err());
/// assert!(validator.validate(&FieldValue::from("Damnit!")).is_err());
/// assert!(validator.validate(&FieldValue::Null).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LengthValidator {
	min: Option<usize>,
	max: Option<usize>,
	message: Option<String>,
}

impl LengthValidator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn min(mut self, min: usize) -> Self {
		self.min = Some(min);
		self
	}

	pub fn max(mut self, max: usize) -> Self {
		self.max = Some(max);
		self
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn validate(&self, value: &FieldValue) -> FieldResult<()> {
		let Some(s) = value.as_str().filter(|s| !s.trim().is_empty()) else {
			return Ok(());
		};
		let count = s.chars().count();

		if let Some(min) = self.min.filter(|&min| count < min) {
			return Err(self.error(format!("is too short (minimum is {min} characters)")));
		}
		if let Some(max) = self.max.filter(|&max| count > max) {
			return Err(self.error(format!("is too long (maximum is {max} characters)")));
		}
		Ok(())
	}

	fn error(&self, default: String) -> FieldError {
		FieldError::Validation(self.message.clone().unwrap_or(default))
	}
}

/// Requires string values to match a regular expression.
///
/// Blank values pass. Non-string values are rejected.
///
/// # Examples
///
/// ```
/// use nestform_forms::FieldValue;
/// use nestform_forms::validators::FormatValidator;
///
/// let validator = FormatValidator::new(r"^\d{4}$").unwrap();
/// assert!(validator.validate(&FieldValue::from("1997")).is_ok());
/// assert!(validator.validate(&FieldValue::from("97")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct FormatValidator {
	pattern: Regex,
	message: Option<String>,
}

impl FormatValidator {
	pub fn new(pattern: &str) -> Result<Self, regex::Error> {
		Ok(Self::from_regex(Regex::new(pattern)?))
	}

	pub fn from_regex(pattern: Regex) -> Self {
		Self {
			pattern,
			message: None,
		}
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn validate(&self, value: &FieldValue) -> FieldResult<()> {
		if value.is_blank() {
			return Ok(());
		}
		match value.as_str() {
			Some(s) if self.pattern.is_match(s) => Ok(()),
			_ => {
				let msg = self.message.as_deref().unwrap_or(INVALID_MESSAGE);
				Err(FieldError::Validation(msg.to_string()))
			}
		}
	}
}

type CheckFn = Arc<dyn Fn(&FieldValue) -> FieldResult<()> + Send + Sync>;

/// Wraps an arbitrary check.
///
/// # Examples
///
/// ```
/// use nestform_forms::FieldValue;
/// use nestform_forms::validators::{CustomValidator, FieldError};
///
/// let validator = CustomValidator::new(|value| match value.as_str() {
///     Some("Dammit") => Err(FieldError::Validation("is misspelled".to_string())),
///     _ => Ok(()),
/// });
/// assert!(validator.validate(&FieldValue::from("Dammit")).is_err());
/// ```
#[derive(Clone)]
pub struct CustomValidator {
	check: CheckFn,
}

impl CustomValidator {
	pub fn new<F>(check: F) -> Self
	where
		F: Fn(&FieldValue) -> FieldResult<()> + Send + Sync + 'static,
	{
		Self {
			check: Arc::new(check),
		}
	}

	pub fn validate(&self, value: &FieldValue) -> FieldResult<()> {
		(self.check)(value)
	}
}

impl fmt::Debug for CustomValidator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CustomValidator").finish_non_exhaustive()
	}
}

/// Any validator that can be attached to a scalar field.
#[derive(Debug, Clone)]
pub enum Validator {
	Presence(PresenceValidator),
	Length(LengthValidator),
	Format(FormatValidator),
	Custom(CustomValidator),
}

impl Validator {
	pub fn validate(&self, value: &FieldValue) -> FieldResult<()> {
		match self {
			Self::Presence(v) => v.validate(value),
			Self::Length(v) => v.validate(value),
			Self::Format(v) => v.validate(value),
			Self::Custom(v) => v.validate(value),
		}
	}
}

impl From<PresenceValidator> for Validator {
	fn from(v: PresenceValidator) -> Self {
		Self::Presence(v)
	}
}

impl From<LengthValidator> for Validator {
	fn from(v: LengthValidator) -> Self {
		Self::Length(v)
	}
}

impl From<FormatValidator> for Validator {
	fn from(v: FormatValidator) -> Self {
		Self::Format(v)
	}
}

impl From<CustomValidator> for Validator {
	fn from(v: CustomValidator) -> Self {
		Self::Custom(v)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	// =========================================================================
	// PresenceValidator tests
	// =========================================================================

	#[rstest]
	#[case(FieldValue::Null)]
	#[case(FieldValue::from(""))]
	#[case(FieldValue::from("   "))]
	#[case(FieldValue::Json(json!([])))]
	fn test_presence_validator_rejects_blank(#[case] value: FieldValue) {
		// Arrange
		let validator = PresenceValidator::new();

		// Act
		let result = validator.validate(&value);

		// Assert
		assert_eq!(result, Err(FieldError::Required("can't be blank".to_string())));
	}

	#[rstest]
	fn test_presence_validator_custom_message() {
		let validator = PresenceValidator::new().with_message("is required");

		let result = validator.validate(&FieldValue::Null);

		assert_eq!(result.unwrap_err().message(), "is required");
	}

	// =========================================================================
	// LengthValidator tests
	// =========================================================================

	#[rstest]
	#[case("ab", Err("is too short (minimum is 3 characters)"))]
	#[case("abc", Ok(()))]
	#[case("abcdef", Ok(()))]
	#[case("abcdefg", Err("is too long (maximum is 6 characters)"))]
	#[case("日本語です", Ok(()))]
	fn test_length_validator(#[case] input: &str, #[case] expected: Result<(), &str>) {
		// Arrange
		let validator = LengthValidator::new().min(3).max(6);

		// Act
		let result = validator.validate(&FieldValue::from(input));

		// Assert
		assert_eq!(
			result.map_err(|e| e.message().to_string()),
			expected.map_err(str::to_string)
		);
	}

	#[rstest]
	fn test_length_validator_skips_blank_and_non_strings() {
		let validator = LengthValidator::new().min(3);

		assert!(validator.validate(&FieldValue::Null).is_ok());
		assert!(validator.validate(&FieldValue::from("")).is_ok());
		assert!(validator.validate(&FieldValue::Json(json!(1))).is_ok());
	}

	// =========================================================================
	// FormatValidator tests
	// =========================================================================

	#[rstest]
	fn test_format_validator_rejects_mismatch() {
		// Arrange
		let validator = FormatValidator::new(r"^[A-Z]").unwrap();

		// Act
		let result = validator.validate(&FieldValue::from("epitaph"));

		// Assert
		assert_eq!(result, Err(FieldError::Validation("is invalid".to_string())));
	}

	#[rstest]
	fn test_format_validator_rejects_non_strings() {
		let validator = FormatValidator::new(r"^\d+$").unwrap();

		assert!(validator.validate(&FieldValue::Json(json!(12))).is_err());
	}

	#[rstest]
	fn test_format_validator_invalid_pattern() {
		assert!(FormatValidator::new("(").is_err());
	}

	// =========================================================================
	// Validator dispatch
	// =========================================================================

	#[rstest]
	fn test_validator_dispatches_custom_check() {
		// Arrange
		let validator: Validator = CustomValidator::new(|value| {
			if value.as_str() == Some("Dammit") {
				Err(FieldError::Validation("is misspelled".to_string()))
			} else {
				Ok(())
			}
		})
		.into();

		// Act & Assert
		assert!(validator.validate(&FieldValue::from("Damnit")).is_ok());
		assert_eq!(
			validator
				.validate(&FieldValue::from("Dammit"))
				.unwrap_err()
				.message(),
			"is misspelled"
		);
	}
}
